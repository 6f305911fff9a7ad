//! Closed-form intersections of lines and planes
//!
//! Degenerate configurations never fail: parallel, coincident, contained and
//! skew cases all map to `IntersectionResult::NoIntersection`.

use linviz_core::{
    IntersectionResult, IntersectionTolerances, Line, PairwiseIntersection, Plane, Primitive,
};
use nalgebra::Vector3;

/// Intersection of a line with a plane.
///
/// A line lying inside the plane is reported the same way as a parallel
/// line off the plane.
pub fn intersect_line_plane(
    line: &Line,
    plane: &Plane,
    tol: &IntersectionTolerances,
) -> IntersectionResult {
    let n = plane.normal();
    let (p, d) = (line.point(), line.direction());

    let denom = n.dot(&d);
    if denom.abs() < tol.line_plane_parallel {
        return IntersectionResult::NoIntersection;
    }

    let t = (plane.offset() - n.dot(&p)) / denom;
    IntersectionResult::Point { point: p + d * t }
}

/// Intersection line of two planes, or nothing for parallel/coincident planes
pub fn intersect_plane_plane(
    first: &Plane,
    second: &Plane,
    tol: &IntersectionTolerances,
) -> IntersectionResult {
    let (n1, n2) = (first.normal(), second.normal());
    let direction = n1.cross(&n2);
    if direction.norm() < tol.plane_plane_parallel {
        return IntersectionResult::NoIntersection;
    }

    // Zero the coordinate where the direction is largest; the remaining
    // 2×2 determinant equals that component, so it is the best conditioned.
    let k = direction.iamax();
    let (u, w) = match k {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    };

    let det = n1[u] * n2[w] - n1[w] * n2[u];
    let (d1, d2) = (first.offset(), second.offset());
    let mut point = Vector3::zeros();
    point[u] = (d1 * n2[w] - n1[w] * d2) / det;
    point[w] = (n1[u] * d2 - d1 * n2[u]) / det;

    IntersectionResult::LinePencil {
        point,
        direction: direction.normalize(),
    }
}

/// Intersection point of two lines; parallel, coincident and skew lines give nothing
pub fn intersect_line_line(
    first: &Line,
    second: &Line,
    tol: &IntersectionTolerances,
) -> IntersectionResult {
    let (p1, p2) = (first.point(), second.point());
    let d1 = first.direction().normalize();
    let d2 = second.direction().normalize();

    let cross = d1.cross(&d2);
    let cross_sq = cross.norm_squared();
    if cross_sq < tol.line_line_parallel {
        return IntersectionResult::NoIntersection;
    }

    let w = p2 - p1;
    if w.dot(&cross).abs() > tol.coplanarity {
        return IntersectionResult::NoIntersection;
    }

    let s = w.cross(&d2).dot(&cross) / cross_sq;
    IntersectionResult::Point { point: p1 + d1 * s }
}

/// Intersect one pair of primitives in whichever order they come
pub fn intersect_pair(
    first: &Primitive,
    second: &Primitive,
    tol: &IntersectionTolerances,
) -> IntersectionResult {
    match (first, second) {
        (Primitive::Line(a), Primitive::Line(b)) => intersect_line_line(a, b, tol),
        (Primitive::Line(l), Primitive::Plane(p)) | (Primitive::Plane(p), Primitive::Line(l)) => {
            intersect_line_plane(l, p, tol)
        }
        (Primitive::Plane(a), Primitive::Plane(b)) => intersect_plane_plane(a, b, tol),
    }
}

/// Every unordered pair `(i, j)` with `i < j`, including pairs that do not meet
pub fn intersect_all(
    primitives: &[Primitive],
    tol: &IntersectionTolerances,
) -> Vec<PairwiseIntersection> {
    let mut results = Vec::with_capacity(primitives.len() * primitives.len().saturating_sub(1) / 2);
    for (i, first) in primitives.iter().enumerate() {
        for (j, second) in primitives.iter().enumerate().skip(i + 1) {
            results.push(PairwiseIntersection {
                first: i,
                second: j,
                result: intersect_pair(first, second, tol),
            });
        }
    }
    tracing::debug!(
        primitives = primitives.len(),
        hits = results.iter().filter(|r| !r.result.is_none()).count(),
        "pairwise intersections"
    );
    results
}
