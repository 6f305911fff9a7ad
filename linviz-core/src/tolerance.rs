//! Numeric tolerances
//!
//! Structural decisions (is a row zero, are two rows parallel, is a root real)
//! and verification checks (residual after substitution) live at different
//! scales, so each comparison gets its own named constant.

use crate::KernelError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tolerances used by the polynomial, eigen and subspace routines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenTolerances {
    /// Discriminant sign test and vanishing `p` in the depressed cubic
    pub root: f64,
    /// Squared row magnitude / normalized squared cross product treated as zero
    pub structural: f64,
    /// Maximum `‖(A − λI)v‖` accepted for a unit candidate
    pub residual: f64,
    /// Candidates with `|v·f|` above this are duplicates of a found direction
    pub duplicate_cosine: f64,
    /// Eigenvalues closer than this belong to one group
    pub grouping: f64,
    /// Minimum squared cross-product length for two eigenvectors to span a plane
    pub independence: f64,
    /// Entry tolerance for the scalar-matrix short-circuit
    pub identity: f64,
}

impl Default for EigenTolerances {
    fn default() -> Self {
        Self {
            root: 1e-10,
            structural: 1e-10,
            residual: 0.01,
            duplicate_cosine: 0.99,
            grouping: 1e-6,
            independence: 0.01,
            identity: 1e-6,
        }
    }
}

/// Tolerances used by the intersection routines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionTolerances {
    /// `|n·d|` below this means the line runs parallel to the plane
    pub line_plane_parallel: f64,
    /// `‖n₁ × n₂‖` below this means the planes are parallel
    pub plane_plane_parallel: f64,
    /// `‖d₁ × d₂‖²` below this means the lines are parallel
    pub line_line_parallel: f64,
    /// `|(p₂ − p₁)·(d₁ × d₂)|` above this means the lines are skew
    pub coplanarity: f64,
}

impl Default for IntersectionTolerances {
    fn default() -> Self {
        Self {
            line_plane_parallel: 1e-4,
            plane_plane_parallel: 1e-4,
            line_line_parallel: 1e-4,
            coplanarity: 0.01,
        }
    }
}

/// Tolerances used when rationalizing eigenvectors for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayTolerances {
    /// Components below this magnitude count as zero
    pub zero: f64,
    /// Distance from an integer accepted for a scaled ratio
    pub integer: f64,
    /// Largest multiplier tried
    pub max_multiplier: u32,
}

impl Default for DisplayTolerances {
    fn default() -> Self {
        Self {
            zero: 1e-6,
            integer: 1e-10,
            max_multiplier: 50,
        }
    }
}

/// Complete kernel configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub eigen: EigenTolerances,
    pub intersection: IntersectionTolerances,
    pub display: DisplayTolerances,
}

impl Tolerances {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json_str(s: &str) -> Result<Self, KernelError> {
        let tolerances: Tolerances = serde_json::from_str(s)?;
        tolerances.validate()?;
        Ok(tolerances)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, KernelError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KernelError::config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Reject tolerances that would make every comparison meaningless
    pub fn validate(&self) -> Result<(), KernelError> {
        let e = &self.eigen;
        let i = &self.intersection;
        let positive = [
            ("eigen.root", e.root),
            ("eigen.structural", e.structural),
            ("eigen.residual", e.residual),
            ("eigen.grouping", e.grouping),
            ("eigen.independence", e.independence),
            ("eigen.identity", e.identity),
            ("intersection.line_plane_parallel", i.line_plane_parallel),
            ("intersection.plane_plane_parallel", i.plane_plane_parallel),
            ("intersection.line_line_parallel", i.line_line_parallel),
            ("intersection.coplanarity", i.coplanarity),
            ("display.zero", self.display.zero),
            ("display.integer", self.display.integer),
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(KernelError::config(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }

        if !(e.duplicate_cosine > 0.0 && e.duplicate_cosine <= 1.0) {
            return Err(KernelError::config(format!(
                "eigen.duplicate_cosine must be in (0, 1], got {}",
                e.duplicate_cosine
            )));
        }

        if self.display.max_multiplier == 0 {
            return Err(KernelError::config("display.max_multiplier must be at least 1"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tolerances::default().validate().is_ok());
        assert_eq!(Tolerances::default().eigen.grouping, 1e-6);
        assert_eq!(Tolerances::default().eigen.duplicate_cosine, 0.99);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tolerances::from_json_str(r#"{"eigen": {"residual": 0.001}}"#).unwrap();
        assert_eq!(t.eigen.residual, 0.001);
        assert_eq!(t.eigen.grouping, 1e-6);
        assert_eq!(t.intersection, IntersectionTolerances::default());
    }

    #[test]
    fn test_empty_json() {
        let t = Tolerances::from_json_str("{}").unwrap();
        assert_eq!(t, Tolerances::default());
    }

    #[test]
    fn test_rejects_negative() {
        let err = Tolerances::from_json_str(r#"{"intersection": {"coplanarity": -1.0}}"#).unwrap_err();
        assert_eq!(err.code(), crate::codes::CONFIG);
    }

    #[test]
    fn test_rejects_cosine_out_of_range() {
        assert!(Tolerances::from_json_str(r#"{"eigen": {"duplicate_cosine": 1.5}}"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Tolerances::from_json_str("{not json").is_err());
    }
}
