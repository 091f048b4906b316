use std::fmt;

/// Structural contract shared by the exact and the floating matrix.
///
/// The two engines are deliberately separate implementations rather than one
/// generic type: the exact engine leans on gcd/lcm and remainder-checked
/// division, none of which mean anything for floating-point entries.
pub trait Matrix<T>
where
    Self: Sized,
{
    fn from_list(lines: Vec<Vec<T>>) -> Result<Self, MatrixError>;
    fn new(rows: usize, cols: usize) -> Result<Self, MatrixError>;
    fn identity(n: usize) -> Result<Self, MatrixError>;
    fn to_list(&self) -> Vec<Vec<T>>;

    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> Result<T, MatrixError>;
    fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError>;

    fn negate(&self) -> Self;
    fn scale(&self, factor: T) -> Self;
    fn determinant(&self) -> Result<T, MatrixError>;
    fn solve(&self, rhs: &Self) -> Result<Self, MatrixError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Construction input has no rows or no columns.
    Empty,
    /// Construction input rows have different lengths.
    NotRectangular,
    /// Operand shapes are incompatible for the requested operation.
    ShapeMismatch,
    /// The right-hand side of a solve is not a single column.
    RhsNotColumn,
    /// The operation requires a square matrix.
    NotSquare,
    /// An exactly zero pivot survived partial pivoting.
    Singular,
    /// The system has no integer solution.
    NonIntegerSolution,
    /// Element access outside `[0, rows) x [0, cols)`.
    IndexOutOfBounds,
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::Empty => write!(f, "Matrix must have at least one row and one column"),
            MatrixError::NotRectangular => write!(f, "Matrix rows have different lengths"),
            MatrixError::ShapeMismatch => write!(f, "Dimensions not compatible"),
            MatrixError::RhsNotColumn => {
                write!(f, "Right-hand side must be a single column vector")
            }
            MatrixError::NotSquare => write!(f, "Matrix is not square"),
            MatrixError::Singular => write!(f, "Matrix is singular"),
            MatrixError::NonIntegerSolution => write!(f, "System has no integer solution"),
            MatrixError::IndexOutOfBounds => write!(f, "Index out of bounds"),
        }
    }
}
