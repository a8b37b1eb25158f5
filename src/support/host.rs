//! Host environment array values.
//!
//! The host hands numeric data across the boundary as dense, column-major
//! `f64` matrices, and names (robots, frames) as character arrays.
//! [`HostArray`] models both so components never deal with the host's
//! native handles directly.

use std::fmt;

use nalgebra::{DMatrix, DVector};
use num_traits::ToPrimitive;

/// Dimensions of a host array, `rows × cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    /// Creates a `rows × cols` shape.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// A column vector of `len` elements.
    #[must_use]
    pub const fn column(len: usize) -> Self {
        Self::new(len, 1)
    }

    /// A square `n × n` matrix.
    #[must_use]
    pub const fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// A single element.
    #[must_use]
    pub const fn scalar() -> Self {
        Self::new(1, 1)
    }

    /// Total number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// The element class of a host array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    Real,
    Text,
}

impl fmt::Display for ArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKind::Real => f.write_str("real"),
            ArrayKind::Text => f.write_str("text"),
        }
    }
}

/// A value crossing the host boundary.
///
/// Real arrays keep the host's column-major layout, which is also the storage
/// order of [`DMatrix`], so no transposition happens when marshaling.
///
/// # Example
///
/// ```
/// use wbm_components::support::host::{HostArray, Shape};
///
/// let q = HostArray::column(&[0.1, 0.2, 0.3]);
/// assert_eq!(q.shape(), Shape::column(3));
///
/// let robot = HostArray::text("icub");
/// assert_eq!(robot.as_text(), Some("icub"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum HostArray {
    Real(DMatrix<f64>),
    Text(String),
}

impl HostArray {
    /// A zero-filled real array, used as an output placeholder.
    #[must_use]
    pub fn zeros(shape: Shape) -> Self {
        HostArray::Real(DMatrix::zeros(shape.rows, shape.cols))
    }

    /// A `1 × 1` real array.
    #[must_use]
    pub fn scalar(value: f64) -> Self {
        HostArray::Real(DMatrix::from_element(1, 1, value))
    }

    /// A real column vector holding `values`.
    #[must_use]
    pub fn column(values: &[f64]) -> Self {
        HostArray::Real(DMatrix::from_column_slice(values.len(), 1, values))
    }

    /// A character array.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        HostArray::Text(value.into())
    }

    #[must_use]
    pub fn kind(&self) -> ArrayKind {
        match self {
            HostArray::Real(_) => ArrayKind::Real,
            HostArray::Text(_) => ArrayKind::Text,
        }
    }

    /// Returns the array's dimensions.
    ///
    /// Character arrays are reported as a single row, one column per character.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            HostArray::Real(matrix) => Shape::new(matrix.nrows(), matrix.ncols()),
            HostArray::Text(text) => Shape::new(1, text.chars().count()),
        }
    }

    #[must_use]
    pub fn as_real(&self) -> Option<&DMatrix<f64>> {
        match self {
            HostArray::Real(matrix) => Some(matrix),
            HostArray::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            HostArray::Text(text) => Some(text),
            HostArray::Real(_) => None,
        }
    }

    /// Interprets a single-element real array as a zero-based index.
    ///
    /// Returns `None` for anything other than one non-negative, integral,
    /// finite value.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        let matrix = self.as_real()?;
        if matrix.len() != 1 {
            return None;
        }
        let value = matrix[0];
        if value.fract() != 0.0 {
            return None;
        }
        value.to_usize()
    }

    /// Copies the elements of a real array into a vector, in storage order.
    ///
    /// Row and column vectors of the same length produce the same result.
    #[must_use]
    pub fn to_vector(&self) -> Option<DVector<f64>> {
        self.as_real()
            .map(|matrix| DVector::from_column_slice(matrix.as_slice()))
    }
}

impl From<DMatrix<f64>> for HostArray {
    fn from(matrix: DMatrix<f64>) -> Self {
        HostArray::Real(matrix)
    }
}

impl From<DVector<f64>> for HostArray {
    fn from(vector: DVector<f64>) -> Self {
        HostArray::column(vector.as_slice())
    }
}

impl From<&str> for HostArray {
    fn from(text: &str) -> Self {
        HostArray::text(text)
    }
}
