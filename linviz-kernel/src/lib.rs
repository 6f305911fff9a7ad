//! linviz Kernel - Numeric core of the visualizer
//!
//! Provides everything the scene needs from linear algebra:
//! - Characteristic roots (quadratic, depressed cubic)
//! - Eigenvectors via an ordered list of nullspace strategies
//! - Classification of eigenvectors into invariant lines, planes or the whole space
//! - Line/plane intersections and a pairwise sweep over a scene
//! - Small-integer directions for labels
//!
//! All routines are pure f64 arithmetic on 2×2 and 3×3 inputs. Degenerate
//! cases are values, never errors.

mod polynomial;
mod nullspace;
mod subspace;
mod intersect;
mod display;
mod helpers;
mod ops;

pub use polynomial::{characteristic_roots, cubic_roots, depressed_cubic_roots, quadratic_roots};
pub use nullspace::{eigenvector2, eigenvector3};
pub use subspace::{classify, eigendecompose, is_identity_like};
pub use intersect::{
    intersect_all, intersect_line_line, intersect_line_plane, intersect_pair,
    intersect_plane_plane,
};
pub use display::{normalize_for_display, normalize_for_display_with};
pub use helpers::{extract_line, extract_matrix, extract_plane, extract_primitive, extract_vector3};

use linviz_plugin::OpRegistry;

/// Load kernel operations into registry
pub fn load_kernel_ops(registry: OpRegistry) -> OpRegistry {
    registry
        // Spectral (2 operations)
        .with_op(ops::EigendecomposeOp)
        .with_op(ops::CharacteristicRootsOp)

        // Geometry (4 operations)
        .with_op(ops::LinePlaneOp)
        .with_op(ops::PlanePlaneOp)
        .with_op(ops::LineLineOp)
        .with_op(ops::IntersectAllOp)

        // Display (1 operation)
        .with_op(ops::NormalizeForDisplayOp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linviz_plugin::CallContext;
    use serde_json::json;

    #[test]
    fn test_load_kernel_ops() {
        let registry = load_kernel_ops(OpRegistry::new());
        assert_eq!(registry.len(), 7);

        for name in [
            "eigendecompose",
            "characteristic_roots",
            "intersect_line_plane",
            "intersect_plane_plane",
            "intersect_line_line",
            "intersect_all",
            "normalize_for_display",
        ] {
            assert!(registry.get_op(name).is_some(), "{} not registered", name);
        }
    }

    #[test]
    fn test_call_through_registry() {
        let registry = load_kernel_ops(OpRegistry::new());
        let result = registry
            .call_op("normalize_for_display", &json!({"vector": [0.0, 2.0, 4.0]}), &CallContext::default())
            .unwrap();
        assert_eq!(result, json!([0, 1, 2]));
    }

    #[test]
    fn test_unknown_op_suggests_similar() {
        let registry = load_kernel_ops(OpRegistry::new());
        let err = registry
            .call_op("intersect", &json!({}), &CallContext::default())
            .unwrap_err();
        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("intersect_all"));
    }
}
