use itertools::Itertools;

use crate::matrix::matrix::{Matrix, MatrixError};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;

/// A matrix of `f64` values.
///
/// Structurally the same engine as `IntMatrix`, but every operation rounds:
/// nothing here is exact, and equality comparisons against computed results
/// are the caller's business, with whatever tolerance fits the problem.
#[derive(Debug, Clone)]
pub struct FloatMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Matrix<f64> for FloatMatrix {
    fn from_list(lines: Vec<Vec<f64>>) -> Result<FloatMatrix, MatrixError> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        if lines.iter().any(|l| l.len() != cols) {
            return Err(MatrixError::NotRectangular);
        }

        Ok(FloatMatrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    fn new(rows: usize, cols: usize) -> Result<FloatMatrix, MatrixError> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(FloatMatrix {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
        })
    }

    fn identity(n: usize) -> Result<FloatMatrix, MatrixError> {
        if n == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(FloatMatrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|i| (0..n).map(move |j| if i == j { 1.0 } else { 0.0 }))
                .collect(),
        })
    }

    fn to_list(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.cols).map(|line| line.into()).collect()
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> Result<f64, MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds);
        }
        Ok(self.at(row, col))
    }

    fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds);
        }
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    fn negate(&self) -> FloatMatrix {
        FloatMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|v| -v).collect(),
        }
    }

    fn scale(&self, factor: f64) -> FloatMatrix {
        FloatMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|v| factor * v).collect(),
        }
    }

    /// Determinant by Laplace expansion along the first row, exactly like the
    /// exact engine. On top of the `O(n!)` cost, rounding error accumulates
    /// across the recursion levels, so treat results on anything larger than
    /// a handful of rows with suspicion.
    fn determinant(&self) -> Result<f64, MatrixError> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare);
        }

        let c = &self.cells;
        Ok(match self.rows {
            1 => c[0],
            2 => c[0] * c[3] - c[1] * c[2],
            3 => {
                c[0] * c[4] * c[8] + c[1] * c[5] * c[6] + c[2] * c[3] * c[7]
                    - c[2] * c[4] * c[6]
                    - c[1] * c[3] * c[8]
                    - c[0] * c[5] * c[7]
            }
            n => {
                let mut det = 0.0;
                let mut sign = 1.0;
                for i in 0..n {
                    if self.at(0, i) != 0.0 {
                        det += sign * self.at(0, i) * self.minor(0, i).determinant()?;
                    }
                    sign = -sign;
                }
                det
            }
        })
    }

    /// Solves `A * x = b` by Gaussian elimination with partial pivoting.
    ///
    /// Each pivot column first swaps up the row with the largest absolute
    /// entry, which keeps the elimination factors at most 1 in magnitude and
    /// bounds error growth. Only an exactly zero pivot after the swap is
    /// rejected as `Singular`; there is no tolerance threshold, so a
    /// near-singular system still goes through and the result degrades
    /// silently.
    fn solve(&self, rhs: &FloatMatrix) -> Result<FloatMatrix, MatrixError> {
        if self.rows != self.cols {
            return Err(MatrixError::NotSquare);
        }
        if rhs.cols != 1 {
            return Err(MatrixError::RhsNotColumn);
        }
        if rhs.rows != self.rows {
            return Err(MatrixError::ShapeMismatch);
        }

        let n = self.rows;
        let mut a = self.cells.clone();
        let mut b = rhs.cells.clone();

        for i in 0..n {
            let mut max = i;
            for j in i + 1..n {
                if a[j * n + i].abs() > a[max * n + i].abs() {
                    max = j;
                }
            }
            if max != i {
                for k in 0..n {
                    a.swap(i * n + k, max * n + k);
                }
                b.swap(i, max);
            }

            let pivot = a[i * n + i];
            if pivot == 0.0 {
                return Err(MatrixError::Singular);
            }

            for j in i + 1..n {
                let factor = a[j * n + i] / pivot;
                for k in i + 1..n {
                    a[j * n + k] -= factor * a[i * n + k];
                }
                a[j * n + i] = 0.0;
                b[j] -= factor * b[i];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let mut acc = b[i];
            for j in i + 1..n {
                acc -= a[i * n + j] * x[j];
            }
            x[i] = acc / a[i * n + i];
        }

        Ok(FloatMatrix {
            rows: n,
            cols: 1,
            cells: x,
        })
    }
}

impl FloatMatrix {
    #[inline(always)]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }

    fn minor(&self, row: usize, col: usize) -> FloatMatrix {
        FloatMatrix {
            rows: self.rows - 1,
            cols: self.cols - 1,
            cells: (0..self.rows)
                .filter(|&r| r != row)
                .flat_map(|r| {
                    (0..self.cols)
                        .filter(move |&c| c != col)
                        .map(move |c| self.at(r, c))
                })
                .collect(),
        }
    }
}

// Entries compare by IEEE-754 bit pattern, which keeps Eq and Hash mutually
// consistent (NaN == NaN, 0.0 != -0.0).
impl PartialEq for FloatMatrix {
    fn eq(&self, rhs: &FloatMatrix) -> bool {
        self.rows == rhs.rows
            && self.cols == rhs.cols
            && self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for FloatMatrix {}

impl Hash for FloatMatrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rows.hash(state);
        self.cols.hash(state);
        for v in &self.cells {
            v.to_bits().hash(state);
        }
    }
}

impl ops::Add<&FloatMatrix> for &FloatMatrix {
    type Output = Result<FloatMatrix, MatrixError>;

    fn add(self, rhs: &FloatMatrix) -> Result<FloatMatrix, MatrixError> {
        if self.cols != rhs.cols || self.rows != rhs.rows {
            return Err(MatrixError::ShapeMismatch);
        }

        Ok(FloatMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| a + b)
                .collect(),
        })
    }
}

impl ops::Mul<&FloatMatrix> for &FloatMatrix {
    type Output = Result<FloatMatrix, MatrixError>;

    fn mul(self, rhs: &FloatMatrix) -> Result<FloatMatrix, MatrixError> {
        if self.cols != rhs.rows {
            return Err(MatrixError::ShapeMismatch);
        }

        Ok(FloatMatrix {
            rows: self.rows,
            cols: rhs.cols,
            cells: (0..self.rows)
                .flat_map(|i| {
                    (0..rhs.cols)
                        .map(move |j| (0..self.cols).map(|k| self.at(i, k) * rhs.at(k, j)).sum())
                })
                .collect(),
        })
    }
}

impl fmt::Display for FloatMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.cells
                .chunks(self.cols)
                .map(|row| row.iter().join("\t"))
                .join("\n")
        )
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    const EPS: f64 = 1e-9;

    fn assert_close(computed: &FloatMatrix, expected: &[f64]) {
        assert_eq!(computed.cells.len(), expected.len());
        for (c, e) in computed.cells.iter().zip(expected) {
            assert!(
                (c - e).abs() < EPS * e.abs().max(1.0),
                "{} !~ {}",
                computed,
                e
            );
        }
    }

    fn random_matrix(rows: usize, cols: usize) -> FloatMatrix {
        let mut rng = rand::thread_rng();
        FloatMatrix::from_list(
            (0..rows)
                .map(|_| (0..cols).map(|_| rng.gen_range(-10.0..10.0)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_construction() {
        let m = FloatMatrix::from_list(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);

        assert_eq!(FloatMatrix::from_list(vec![]), Err(MatrixError::Empty));
        assert_eq!(
            FloatMatrix::from_list(vec![vec![1.0], vec![2.0, 3.0]]),
            Err(MatrixError::NotRectangular)
        );
        assert_eq!(FloatMatrix::new(0, 1), Err(MatrixError::Empty));
    }

    #[test]
    fn test_get_set() {
        let mut m = FloatMatrix::new(2, 2).unwrap();
        m.set(0, 1, 2.5).unwrap();
        assert_eq!(m.get(0, 1), Ok(2.5));
        assert_eq!(m.get(0, 2), Err(MatrixError::IndexOutOfBounds));
        assert_eq!(m.set(2, 0, 1.0), Err(MatrixError::IndexOutOfBounds));
    }

    #[test]
    fn test_elementwise() {
        let a = FloatMatrix::from_list(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = FloatMatrix::from_list(vec![vec![0.5, 0.5], vec![0.5, 0.5]]).unwrap();

        assert_eq!((&a + &b).unwrap().cells, vec![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(a.negate().cells, vec![-1.0, -2.0, -3.0, -4.0]);
        assert_eq!(a.scale(2.0).cells, vec![2.0, 4.0, 6.0, 8.0]);

        let c = FloatMatrix::new(1, 2).unwrap();
        assert_eq!(&a + &c, Err(MatrixError::ShapeMismatch));
        assert_eq!(&c * &c, Err(MatrixError::ShapeMismatch));
    }

    #[test]
    fn test_multiply_associativity() {
        for _ in 0..10 {
            let a = random_matrix(2, 3);
            let b = random_matrix(3, 4);
            let c = random_matrix(4, 2);

            let left = (&(&a * &b).unwrap() * &c).unwrap();
            let right = (&a * &(&b * &c).unwrap()).unwrap();
            assert_close(&left, &right.cells);
        }
    }

    #[test]
    fn test_determinant() {
        let det = |lines: Vec<Vec<f64>>| {
            FloatMatrix::from_list(lines)
                .unwrap()
                .determinant()
                .unwrap()
        };

        assert_eq!(det(vec![vec![7.5]]), 7.5);
        assert!((det(vec![vec![1.0, 2.0], vec![3.0, 4.0]]) - -2.0).abs() < EPS);
        assert!(
            (det(vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
                vec![7.0, 8.0, 10.0],
            ]) - -3.0)
                .abs()
                < EPS
        );
        assert!(
            (det(vec![
                vec![1.0, 0.0, 2.0, -1.0],
                vec![3.0, 0.0, 0.0, 5.0],
                vec![2.0, 1.0, 4.0, -3.0],
                vec![1.0, 0.0, 5.0, 0.0],
            ]) - 30.0)
                .abs()
                < EPS
        );

        for n in 1..=5 {
            assert_eq!(FloatMatrix::identity(n).unwrap().determinant(), Ok(1.0));
            assert_eq!(FloatMatrix::new(n, n).unwrap().determinant(), Ok(0.0));
        }

        let rect = FloatMatrix::new(2, 3).unwrap();
        assert_eq!(rect.determinant(), Err(MatrixError::NotSquare));
    }

    #[test]
    fn test_solve() {
        let a = FloatMatrix::from_list(vec![vec![2.0, 0.0], vec![0.0, 2.0]]).unwrap();
        let b = FloatMatrix::from_list(vec![vec![4.0], vec![6.0]]).unwrap();
        assert_close(&a.solve(&b).unwrap(), &[2.0, 3.0]);

        // requires the pivot swap
        let a = FloatMatrix::from_list(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let b = FloatMatrix::from_list(vec![vec![5.0], vec![7.0]]).unwrap();
        assert_close(&a.solve(&b).unwrap(), &[7.0, 5.0]);

        let a = FloatMatrix::from_list(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 10.0],
        ])
        .unwrap();
        let b = FloatMatrix::from_list(vec![vec![6.0], vec![12.0], vec![21.0]]).unwrap();
        assert_close(&a.solve(&b).unwrap(), &[1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_solve_round_trip() {
        for _ in 0..20 {
            let a = loop {
                let candidate = random_matrix(3, 3);
                if candidate.determinant().unwrap().abs() > 1.0 {
                    break candidate;
                }
            };
            let x = random_matrix(3, 1);
            let b = (&a * &x).unwrap();
            assert_close(&a.solve(&b).unwrap(), &x.cells);
        }
    }

    #[test]
    fn test_solve_failures() {
        let a = FloatMatrix::from_list(vec![vec![1.0, 2.0], vec![1.0, 2.0]]).unwrap();
        let b = FloatMatrix::from_list(vec![vec![3.0], vec![3.0]]).unwrap();
        assert_eq!(a.solve(&b), Err(MatrixError::Singular));

        let rect = FloatMatrix::new(2, 3).unwrap();
        assert_eq!(rect.solve(&b), Err(MatrixError::NotSquare));

        let square = FloatMatrix::identity(2).unwrap();
        let wide = FloatMatrix::new(2, 2).unwrap();
        assert_eq!(square.solve(&wide), Err(MatrixError::RhsNotColumn));

        let short = FloatMatrix::new(1, 1).unwrap();
        assert_eq!(square.solve(&short), Err(MatrixError::ShapeMismatch));
    }

    #[test]
    fn test_display() {
        let m = FloatMatrix::from_list(vec![vec![1.5, 2.0], vec![-3.0, 4.25]]).unwrap();
        assert_eq!(m.to_string(), "1.5\t2\n-3\t4.25");
    }

    #[test]
    fn test_eq_and_hash() {
        let hash = |m: &FloatMatrix| {
            let mut hasher = DefaultHasher::new();
            m.hash(&mut hasher);
            hasher.finish()
        };

        let a = FloatMatrix::from_list(vec![vec![1.0, 2.0]]).unwrap();
        let b = FloatMatrix::from_list(vec![vec![1.0, 2.0]]).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash(&a), hash(&b));

        // bit-level semantics
        let nan = FloatMatrix::from_list(vec![vec![f64::NAN]]).unwrap();
        assert_eq!(nan, nan.clone());
        let pos = FloatMatrix::from_list(vec![vec![0.0]]).unwrap();
        let neg = FloatMatrix::from_list(vec![vec![-0.0]]).unwrap();
        assert_ne!(pos, neg);
    }
}
