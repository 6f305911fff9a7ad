//! Matrices, eigenpairs and invariant subspaces

use crate::KernelError;
use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2×2 or 3×3 real matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SquareMatrix {
    Two(Matrix2<f64>),
    Three(Matrix3<f64>),
}

impl SquareMatrix {
    /// Build from row-major nested rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, KernelError> {
        let n = rows.len();
        for row in rows {
            if row.len() != n {
                return Err(KernelError::Dimension { rows: n, cols: row.len() });
            }
            if row.iter().any(|x| !x.is_finite()) {
                return Err(KernelError::non_finite("matrix", "rows"));
            }
        }

        match n {
            2 => Ok(SquareMatrix::Two(Matrix2::new(
                rows[0][0], rows[0][1],
                rows[1][0], rows[1][1],
            ))),
            3 => Ok(SquareMatrix::Three(Matrix3::new(
                rows[0][0], rows[0][1], rows[0][2],
                rows[1][0], rows[1][1], rows[1][2],
                rows[2][0], rows[2][1], rows[2][2],
            ))),
            _ => Err(KernelError::Dimension {
                rows: n,
                cols: rows.first().map_or(0, |r| r.len()),
            }),
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            SquareMatrix::Two(_) => 2,
            SquareMatrix::Three(_) => 3,
        }
    }

    /// Element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self {
            SquareMatrix::Two(m) => m.get((row, col)).copied(),
            SquareMatrix::Three(m) => m.get((row, col)).copied(),
        }
    }

    pub fn trace(&self) -> f64 {
        match self {
            SquareMatrix::Two(m) => m.trace(),
            SquareMatrix::Three(m) => m.trace(),
        }
    }
}

impl From<Matrix2<f64>> for SquareMatrix {
    fn from(m: Matrix2<f64>) -> Self {
        SquareMatrix::Two(m)
    }
}

impl From<Matrix3<f64>> for SquareMatrix {
    fn from(m: Matrix3<f64>) -> Self {
        SquareMatrix::Three(m)
    }
}

impl fmt::Display for SquareMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.dimension();
        write!(f, "[")?;
        for i in 0..n {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for j in 0..n {
                if j > 0 {
                    write!(f, ", ")?;
                }
                if let Some(val) = self.get(i, j) {
                    write!(f, "{:.4}", val)?;
                }
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// A root of the characteristic polynomial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eigenvalue {
    pub real: f64,
    pub imag: f64,
    pub is_complex: bool,
}

impl Eigenvalue {
    pub fn real(value: f64) -> Self {
        Self { real: value, imag: 0.0, is_complex: false }
    }

    pub fn complex(real: f64, imag: f64) -> Self {
        Self { real, imag, is_complex: true }
    }

    /// Real and complex conjugate pair `real ± imag·i`
    pub fn conjugate_pair(real: f64, imag: f64) -> [Self; 2] {
        let imag = imag.abs();
        [Self::complex(real, imag), Self::complex(real, -imag)]
    }

    /// The real value, if this root is real
    pub fn as_real(&self) -> Option<f64> {
        if self.is_complex {
            None
        } else {
            Some(self.real)
        }
    }
}

impl fmt::Display for Eigenvalue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complex {
            let sign = if self.imag < 0.0 { '-' } else { '+' };
            write!(f, "{:.4} {} {:.4}i", self.real, sign, self.imag.abs())
        } else {
            write!(f, "{:.4}", self.real)
        }
    }
}

/// Unit eigenvector in R² or R³
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eigenvector {
    Planar(Vector2<f64>),
    Spatial(Vector3<f64>),
}

impl Eigenvector {
    /// Embed in R³; planar vectors get `z = 0`
    pub fn to_vector3(&self) -> Vector3<f64> {
        match self {
            Eigenvector::Planar(v) => Vector3::new(v.x, v.y, 0.0),
            Eigenvector::Spatial(v) => *v,
        }
    }
}

/// Eigenvalue with its eigenvector; the vector is absent for complex
/// eigenvalues and for real ones whose nullspace could not be verified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Eigenpair {
    pub eigenvalue: Eigenvalue,
    pub vector: Option<Eigenvector>,
}

/// A subspace mapped into itself by the matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvariantSubspace {
    /// Span of a single eigenvector
    Line {
        eigenvalue: f64,
        direction: Vector3<f64>,
    },
    /// Span of two independent eigenvectors sharing one eigenvalue
    Plane {
        eigenvalue: f64,
        normal: Vector3<f64>,
        basis: [Vector3<f64>; 2],
    },
    /// Scalar matrix: every direction is invariant
    WholeSpace {
        eigenvalue: f64,
    },
}

impl InvariantSubspace {
    pub fn eigenvalue(&self) -> f64 {
        match self {
            InvariantSubspace::Line { eigenvalue, .. }
            | InvariantSubspace::Plane { eigenvalue, .. }
            | InvariantSubspace::WholeSpace { eigenvalue } => *eigenvalue,
        }
    }
}

/// Full result of decomposing one matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub dimension: usize,
    pub eigenpairs: Vec<Eigenpair>,
    pub subspaces: Vec<InvariantSubspace>,
}

impl Decomposition {
    /// Eigenvectors that were resolved, in eigenpair order
    pub fn eigenvectors(&self) -> impl Iterator<Item = &Eigenvector> + '_ {
        self.eigenpairs.iter().filter_map(|p| p.vector.as_ref())
    }

    pub fn is_whole_space(&self) -> bool {
        matches!(self.subspaces.as_slice(), [InvariantSubspace::WholeSpace { .. }])
    }

    pub fn has_complex_eigenvalues(&self) -> bool {
        self.eigenpairs.iter().any(|p| p.eigenvalue.is_complex)
    }
}
