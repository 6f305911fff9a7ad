//! Kernel operations exposed through the registry

use linviz_core::KernelError;
use linviz_plugin::{ArgMeta, CallContext, OpMeta, OpPlugin};
use serde_json::{json, Value as JsonValue};

use crate::display::normalize_for_display_with;
use crate::helpers::{
    extract_line, extract_matrix, extract_plane, extract_primitive, extract_vector3, field, to_json,
};
use crate::intersect::{
    intersect_all, intersect_line_line, intersect_line_plane, intersect_plane_plane,
};
use crate::polynomial::characteristic_roots;
use crate::subspace::eigendecompose;

// ============================================================================
// EIGENDECOMPOSE - eigenpairs and invariant subspaces
// ============================================================================

pub struct EigendecomposeOp;

static EIGENDECOMPOSE_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "matrix",
    "Matrix",
    "2×2 or 3×3 matrix as nested rows",
)];
static EIGENDECOMPOSE_EXAMPLES: [&str; 2] = [
    "{\"matrix\": [[1, 0], [0, -1]]} → eigenvalues 1, -1 with two invariant lines",
    "{\"matrix\": [[3, 1, 1], [1, 3, 1], [1, 1, 3]]} → plane for 2, line for 5",
];
static EIGENDECOMPOSE_RELATED: [&str; 2] = ["characteristic_roots", "normalize_for_display"];

impl OpPlugin for EigendecomposeOp {
    fn meta(&self) -> OpMeta {
        OpMeta {
            name: "eigendecompose",
            description: "Eigenvalues, eigenvectors and invariant lines/planes of a matrix",
            usage: "eigendecompose(matrix)",
            args: &EIGENDECOMPOSE_ARGS,
            returns: "Decomposition",
            examples: &EIGENDECOMPOSE_EXAMPLES,
            category: "spectral",
            related: &EIGENDECOMPOSE_RELATED,
        }
    }

    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError> {
        let value = field(args, "eigendecompose", "matrix")?;
        let matrix = extract_matrix(value, "eigendecompose", "matrix")?;
        to_json(&eigendecompose(&matrix, &ctx.tolerances.eigen))
    }
}

// ============================================================================
// CHARACTERISTIC_ROOTS - roots of det(A - λI)
// ============================================================================

pub struct CharacteristicRootsOp;

static ROOTS_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "matrix",
    "Matrix",
    "2×2 or 3×3 matrix as nested rows",
)];
static ROOTS_EXAMPLES: [&str; 1] = [
    "{\"matrix\": [[0, -1], [1, 0]]} → 0 ± 1i",
];
static ROOTS_RELATED: [&str; 1] = ["eigendecompose"];

impl OpPlugin for CharacteristicRootsOp {
    fn meta(&self) -> OpMeta {
        OpMeta {
            name: "characteristic_roots",
            description: "Roots of the characteristic polynomial, real or complex",
            usage: "characteristic_roots(matrix)",
            args: &ROOTS_ARGS,
            returns: "List<Eigenvalue>",
            examples: &ROOTS_EXAMPLES,
            category: "spectral",
            related: &ROOTS_RELATED,
        }
    }

    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError> {
        let matrix = extract_matrix(
            field(args, "characteristic_roots", "matrix")?,
            "characteristic_roots",
            "matrix",
        )?;
        to_json(&characteristic_roots(&matrix, ctx.tolerances.eigen.root))
    }
}

// ============================================================================
// INTERSECT_LINE_PLANE
// ============================================================================

pub struct LinePlaneOp;

static LINE_PLANE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("line", "Line", "{\"point\": [x, y, z], \"direction\": [x, y, z]}"),
    ArgMeta::required("plane", "Plane", "{\"a\", \"b\", \"c\", \"d\"} for ax + by + cz = d"),
];
static LINE_PLANE_EXAMPLES: [&str; 1] = [
    "{\"line\": {\"point\": [0, 0, 0], \"direction\": [0, 0, 1]}, \"plane\": {\"a\": 0, \"b\": 0, \"c\": 1, \"d\": 5}} → point (0, 0, 5)",
];
static LINE_PLANE_RELATED: [&str; 2] = ["intersect_plane_plane", "intersect_all"];

impl OpPlugin for LinePlaneOp {
    fn meta(&self) -> OpMeta {
        OpMeta {
            name: "intersect_line_plane",
            description: "Point where a line crosses a plane, or none if parallel or contained",
            usage: "intersect_line_plane(line, plane)",
            args: &LINE_PLANE_ARGS,
            returns: "IntersectionResult",
            examples: &LINE_PLANE_EXAMPLES,
            category: "geometry",
            related: &LINE_PLANE_RELATED,
        }
    }

    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError> {
        const OP: &str = "intersect_line_plane";
        let line = extract_line(field(args, OP, "line")?, OP, "line")?;
        let plane = extract_plane(field(args, OP, "plane")?, OP, "plane")?;
        to_json(&intersect_line_plane(&line, &plane, &ctx.tolerances.intersection))
    }
}

// ============================================================================
// INTERSECT_PLANE_PLANE
// ============================================================================

pub struct PlanePlaneOp;

static PLANE_PLANE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("first", "Plane", "First plane"),
    ArgMeta::required("second", "Plane", "Second plane"),
];
static PLANE_PLANE_EXAMPLES: [&str; 1] = [
    "{\"first\": {\"a\": 1, \"b\": 0, \"c\": 0, \"d\": 0}, \"second\": {\"a\": 0, \"b\": 1, \"c\": 0, \"d\": 0}} → line along (0, 0, 1)",
];
static PLANE_PLANE_RELATED: [&str; 2] = ["intersect_line_plane", "intersect_all"];

impl OpPlugin for PlanePlaneOp {
    fn meta(&self) -> OpMeta {
        OpMeta {
            name: "intersect_plane_plane",
            description: "Line shared by two planes, or none if parallel or coincident",
            usage: "intersect_plane_plane(first, second)",
            args: &PLANE_PLANE_ARGS,
            returns: "IntersectionResult",
            examples: &PLANE_PLANE_EXAMPLES,
            category: "geometry",
            related: &PLANE_PLANE_RELATED,
        }
    }

    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError> {
        const OP: &str = "intersect_plane_plane";
        let first = extract_plane(field(args, OP, "first")?, OP, "first")?;
        let second = extract_plane(field(args, OP, "second")?, OP, "second")?;
        to_json(&intersect_plane_plane(&first, &second, &ctx.tolerances.intersection))
    }
}

// ============================================================================
// INTERSECT_LINE_LINE
// ============================================================================

pub struct LineLineOp;

static LINE_LINE_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("first", "Line", "First line"),
    ArgMeta::required("second", "Line", "Second line"),
];
static LINE_LINE_EXAMPLES: [&str; 1] = [
    "{\"first\": {\"point\": [0, 0, 0], \"direction\": [1, 0, 0]}, \"second\": {\"point\": [0, 0, 0], \"direction\": [0, 1, 0]}} → point (0, 0, 0)",
];
static LINE_LINE_RELATED: [&str; 2] = ["intersect_line_plane", "intersect_all"];

impl OpPlugin for LineLineOp {
    fn meta(&self) -> OpMeta {
        OpMeta {
            name: "intersect_line_line",
            description: "Crossing point of two lines; parallel and skew lines give none",
            usage: "intersect_line_line(first, second)",
            args: &LINE_LINE_ARGS,
            returns: "IntersectionResult",
            examples: &LINE_LINE_EXAMPLES,
            category: "geometry",
            related: &LINE_LINE_RELATED,
        }
    }

    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError> {
        const OP: &str = "intersect_line_line";
        let first = extract_line(field(args, OP, "first")?, OP, "first")?;
        let second = extract_line(field(args, OP, "second")?, OP, "second")?;
        to_json(&intersect_line_line(&first, &second, &ctx.tolerances.intersection))
    }
}

// ============================================================================
// INTERSECT_ALL - every pair in a scene
// ============================================================================

pub struct IntersectAllOp;

static INTERSECT_ALL_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "primitives",
    "List<Primitive>",
    "Scene objects, each {\"line\": {..}} or {\"plane\": {..}}",
)];
static INTERSECT_ALL_EXAMPLES: [&str; 1] = [
    "{\"primitives\": [{\"plane\": {..}}, {\"line\": {..}}]} → [{\"first\": 0, \"second\": 1, \"result\": {..}}]",
];
static INTERSECT_ALL_RELATED: [&str; 3] = [
    "intersect_line_plane",
    "intersect_plane_plane",
    "intersect_line_line",
];

impl OpPlugin for IntersectAllOp {
    fn meta(&self) -> OpMeta {
        OpMeta {
            name: "intersect_all",
            description: "Intersect every unordered pair of lines and planes",
            usage: "intersect_all(primitives)",
            args: &INTERSECT_ALL_ARGS,
            returns: "List<PairwiseIntersection>",
            examples: &INTERSECT_ALL_EXAMPLES,
            category: "geometry",
            related: &INTERSECT_ALL_RELATED,
        }
    }

    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError> {
        const OP: &str = "intersect_all";
        let items = field(args, OP, "primitives")?
            .as_array()
            .ok_or_else(|| KernelError::invalid_argument(OP, "primitives", "expected a list"))?;

        let primitives = items.iter()
            .map(|item| extract_primitive(item, OP, "primitives"))
            .collect::<Result<Vec<_>, _>>()?;

        to_json(&intersect_all(&primitives, &ctx.tolerances.intersection))
    }
}

// ============================================================================
// NORMALIZE_FOR_DISPLAY - small-integer direction
// ============================================================================

pub struct NormalizeForDisplayOp;

static NORMALIZE_ARGS: [ArgMeta; 1] = [ArgMeta::required(
    "vector",
    "Vector",
    "Direction with 2 or 3 components",
)];
static NORMALIZE_EXAMPLES: [&str; 2] = [
    "{\"vector\": [0.7071, 0.7071, 0]} → [1, 1, 0]",
    "{\"vector\": [0.5345, 0.2673, 0.8018]} → [2, 1, 3]",
];
static NORMALIZE_RELATED: [&str; 1] = ["eigendecompose"];

impl OpPlugin for NormalizeForDisplayOp {
    fn meta(&self) -> OpMeta {
        OpMeta {
            name: "normalize_for_display",
            description: "Integer direction parallel to a unit vector, for labels",
            usage: "normalize_for_display(vector)",
            args: &NORMALIZE_ARGS,
            returns: "List<Integer>",
            examples: &NORMALIZE_EXAMPLES,
            category: "display",
            related: &NORMALIZE_RELATED,
        }
    }

    fn call(&self, args: &JsonValue, ctx: &CallContext) -> Result<JsonValue, KernelError> {
        const OP: &str = "normalize_for_display";
        let v = extract_vector3(field(args, OP, "vector")?, OP, "vector")?;
        let (x, y, z) = normalize_for_display_with(&v, &ctx.tolerances.display);
        Ok(json!([x, y, z]))
    }
}
