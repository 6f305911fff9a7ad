//! linviz Core - Fundamental types
//!
//! This crate provides the core types used throughout linviz:
//! - `SquareMatrix`, `Eigenvalue`, `Eigenpair`, `InvariantSubspace`: spectral data
//! - `Line`, `Plane`, `IntersectionResult`: geometric primitives
//! - `KernelError`: structured errors for front-end consumption
//! - `Tolerances`: named epsilons, loadable from JSON

mod error;
mod geometry;
mod spectral;
mod tolerance;

pub use error::{codes, ErrorReport, KernelError};
pub use geometry::{IntersectionResult, Line, PairwiseIntersection, Plane, Primitive};
pub use spectral::{
    Decomposition, Eigenpair, Eigenvalue, Eigenvector, InvariantSubspace, SquareMatrix,
};
pub use tolerance::{DisplayTolerances, EigenTolerances, IntersectionTolerances, Tolerances};
