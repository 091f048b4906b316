use itertools::Itertools;
use num_integer::Integer;

use crate::matrix::matrix::{Matrix, MatrixError};
use std::fmt;
use std::ops;

/// A matrix of `i64` values with exact arithmetic.
///
/// All operations are pure: they leave their operands untouched and return a
/// freshly allocated matrix. Entries are fixed-width, so intermediate products
/// can overflow; keeping values in range is the caller's responsibility, the
/// engine never widens silently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<i64>,
}

impl Matrix<i64> for IntMatrix {
    fn from_list(lines: Vec<Vec<i64>>) -> Result<IntMatrix, MatrixError> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        if lines.iter().any(|l| l.len() != cols) {
            return Err(MatrixError::NotRectangular);
        }

        Ok(IntMatrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    fn new(rows: usize, cols: usize) -> Result<IntMatrix, MatrixError> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(IntMatrix {
            rows,
            cols,
            cells: vec![0; rows * cols],
        })
    }

    fn identity(n: usize) -> Result<IntMatrix, MatrixError> {
        if n == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(IntMatrix {
            rows: n,
            cols: n,
            cells: (0..n)
                .flat_map(|i| (0..n).map(move |j| if i == j { 1 } else { 0 }))
                .collect(),
        })
    }

    fn to_list(&self) -> Vec<Vec<i64>> {
        self.cells.chunks(self.cols).map(|line| line.into()).collect()
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> Result<i64, MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds);
        }
        Ok(self.at(row, col))
    }

    fn set(&mut self, row: usize, col: usize, value: i64) -> Result<(), MatrixError> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds);
        }
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    fn negate(&self) -> IntMatrix {
        IntMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|v| -v).collect(),
        }
    }

    fn scale(&self, factor: i64) -> IntMatrix {
        IntMatrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|v| factor * v).collect(),
        }
    }

    /// Determinant by Laplace expansion along the first row.
    ///
    /// Orders 1 to 3 are computed by their closed forms, everything above
    /// recurses into minors, skipping zero entries. That makes it `O(n!)`:
    /// fine for the handful of rows this crate targets, hopeless for large
    /// matrices (operation count and recursion depth both blow up).
    fn determinant(&self) -> Result<i64, MatrixError> {
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
                let mut det = 0;
                let mut sign = 1;
                for i in 0..n {
                    if self.at(0, i) != 0 {
                        det += sign * self.at(0, i) * self.minor(0, i).determinant()?;
                    }
                    sign = -sign;
                }
                det
            }
        })
    }

    /// Solves `A * x = b` without ever leaving the integers.
    ///
    /// Forward elimination cross-multiplies the rows of each pivot column up
    /// to the LCM of their leading entries, so the subtraction that clears
    /// the column is exact. Every row is then divided by the GCD of its
    /// entries to keep the coefficients from exploding across iterations.
    /// Back-substitution checks each division for a remainder: a singular
    /// system, or one whose unique solution is not integral, fails with
    /// `NonIntegerSolution` rather than truncating.
    fn solve(&self, rhs: &IntMatrix) -> Result<IntMatrix, MatrixError> {
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
        let width = n + 1;

        // augmented working grid [A | b]
        let mut h = Vec::with_capacity(n * width);
        for i in 0..n {
            h.extend_from_slice(&self.cells[i * n..(i + 1) * n]);
            h.push(rhs.cells[i]);
        }

        for curr in 0..n {
            // a zero diagonal entry cannot be scaled to the LCM; borrow a
            // lower row that still has one
            if h[curr * width + curr] == 0 {
                match (curr + 1..n).find(|&r| h[r * width + curr] != 0) {
                    Some(r) => {
                        for k in 0..width {
                            h.swap(curr * width + k, r * width + k);
                        }
                    }
                    // column already clear, singularity surfaces in
                    // back-substitution
                    None => continue,
                }
            }

            let lcm = (curr..n)
                .map(|i| h[i * width + curr])
                .filter(|&v| v != 0)
                .fold(1i64, |acc, v| acc.lcm(&v));

            for i in curr..n {
                let v = h[i * width + curr];
                if v != 0 {
                    let factor = lcm / v;
                    for k in 0..width {
                        h[i * width + k] *= factor;
                    }
                }
            }

            for i in curr + 1..n {
                if h[i * width + curr] != 0 {
                    for k in 0..width {
                        h[i * width + k] -= h[curr * width + k];
                    }
                }
            }

            for row in h.chunks_mut(width) {
                minimize_row(row);
            }
        }

        let mut x = vec![0; n];
        for i in (0..n).rev() {
            let mut acc = h[i * width + n];
            for j in i + 1..n {
                acc -= h[i * width + j] * x[j];
            }
            let pivot = h[i * width + i];
            if pivot == 0 || acc % pivot != 0 {
                return Err(MatrixError::NonIntegerSolution);
            }
            x[i] = acc / pivot;
        }

        Ok(IntMatrix {
            rows: n,
            cols: 1,
            cells: x,
        })
    }
}

impl IntMatrix {
    #[inline(always)]
    fn at(&self, row: usize, col: usize) -> i64 {
        self.cells[row * self.cols + col]
    }

    fn minor(&self, row: usize, col: usize) -> IntMatrix {
        IntMatrix {
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

/// Divides a row by the GCD of its entries, if there is one.
fn minimize_row(row: &mut [i64]) {
    let gcd = row.iter().fold(0i64, |acc, v| acc.gcd(v));
    if gcd > 1 {
        for v in row {
            *v /= gcd;
        }
    }
}

impl ops::Add<&IntMatrix> for &IntMatrix {
    type Output = Result<IntMatrix, MatrixError>;

    fn add(self, rhs: &IntMatrix) -> Result<IntMatrix, MatrixError> {
        if self.cols != rhs.cols || self.rows != rhs.rows {
            return Err(MatrixError::ShapeMismatch);
        }

        Ok(IntMatrix {
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

impl ops::Mul<&IntMatrix> for &IntMatrix {
    type Output = Result<IntMatrix, MatrixError>;

    fn mul(self, rhs: &IntMatrix) -> Result<IntMatrix, MatrixError> {
        if self.cols != rhs.rows {
            return Err(MatrixError::ShapeMismatch);
        }

        Ok(IntMatrix {
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

impl fmt::Display for IntMatrix {
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
