//! Eigenvectors as nullspace vectors of `A − λI`
//!
//! The 3×3 case runs an ordered list of construction strategies. Each one
//! either yields a verified unit vector or declines, and the first success
//! wins. Every candidate must pass re-substitution (`‖(A − λI)v‖ < residual`)
//! and must not repeat a direction the caller already holds.

use linviz_core::EigenTolerances;
use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

/// Unit eigenvector of a 2×2 matrix for the real eigenvalue `lambda`.
///
/// Returns `None` when no verified direction distinct from `already_found`
/// exists.
pub fn eigenvector2(
    m: &Matrix2<f64>,
    lambda: f64,
    already_found: &[Vector2<f64>],
    tol: &EigenTolerances,
) -> Option<Vector2<f64>> {
    let shifted = m - Matrix2::identity() * lambda;
    let (a, b) = (shifted[(0, 0)], shifted[(0, 1)]);
    let (c, d) = (shifted[(1, 0)], shifted[(1, 1)]);
    let eps = tol.structural;

    let candidate = if b.abs() > eps {
        Vector2::new(b, -a)
    } else if c.abs() > eps {
        Vector2::new(-d, c)
    } else {
        match (a.abs() > eps, d.abs() > eps) {
            (true, false) => Vector2::new(0.0, 1.0),
            (false, true) => Vector2::new(1.0, 0.0),
            // A = λI: any direction works, take the first free axis
            (false, false) => match already_found.last() {
                None => Vector2::new(1.0, 0.0),
                Some(f) => Vector2::new(-f.y, f.x),
            },
            (true, true) => return None,
        }
    };

    let norm = candidate.norm();
    if !norm.is_finite() || norm == 0.0 {
        return None;
    }
    let v = candidate / norm;

    if (shifted * v).norm() >= tol.residual {
        tracing::debug!(lambda, "2x2 eigenvector failed residual check");
        return None;
    }
    if already_found.iter().any(|f| v.dot(f).abs() > tol.duplicate_cosine) {
        return None;
    }
    Some(v)
}

/// Unit eigenvector of a 3×3 matrix for the real eigenvalue `lambda`.
///
/// `already_found` holds directions previously found for the same
/// eigenvalue; the result is never a duplicate of one of them. Returns
/// `None` when every strategy fails verification.
pub fn eigenvector3(
    m: &Matrix3<f64>,
    lambda: f64,
    already_found: &[Vector3<f64>],
    tol: &EigenTolerances,
) -> Option<Vector3<f64>> {
    let problem = NullspaceProblem::new(m, lambda, already_found, tol);
    let found = first_success(&problem);
    if found.is_none() {
        tracing::debug!(lambda, already_found = already_found.len(), "no verified eigenvector");
    }
    found
}

type Strategy = fn(&NullspaceProblem<'_>) -> Option<Vector3<f64>>;

const STRATEGIES: [(&str, Strategy); 4] = [
    ("zero_matrix", zero_matrix),
    ("parallel_rows", parallel_rows),
    ("row_cross_products", row_cross_products),
    ("fixed_coordinate", fixed_coordinate),
];

fn first_success(problem: &NullspaceProblem<'_>) -> Option<Vector3<f64>> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let v = strategy(problem)?;
        tracing::trace!(strategy = *name, x = v.x, y = v.y, z = v.z, "nullspace vector accepted");
        Some(v)
    })
}

/// `A − λI` together with what the caller already holds
struct NullspaceProblem<'a> {
    shifted: Matrix3<f64>,
    rows: [Vector3<f64>; 3],
    /// Squared magnitude below which a row counts as zero, relative to the
    /// largest row. Infinite when every entry of `A − λI` is negligible.
    zero_threshold: f64,
    already_found: &'a [Vector3<f64>],
    tol: &'a EigenTolerances,
}

impl<'a> NullspaceProblem<'a> {
    fn new(
        m: &Matrix3<f64>,
        lambda: f64,
        already_found: &'a [Vector3<f64>],
        tol: &'a EigenTolerances,
    ) -> Self {
        let shifted = m - Matrix3::identity() * lambda;
        let rows = [0, 1, 2].map(|i| shifted.row(i).transpose());

        let zero_threshold = if shifted.amax() < tol.identity {
            f64::INFINITY
        } else {
            let largest = rows.iter().map(|r| r.norm_squared()).fold(0.0, f64::max);
            tol.structural * largest
        };

        Self {
            shifted,
            rows,
            zero_threshold,
            already_found,
            tol,
        }
    }

    fn is_zero(&self, v: &Vector3<f64>) -> bool {
        v.norm_squared() <= self.zero_threshold
    }

    fn nonzero_rows(&self) -> Vec<Vector3<f64>> {
        self.rows.iter().filter(|r| !self.is_zero(r)).copied().collect()
    }

    /// Normalized squared cross product below the structural tolerance
    fn parallel(&self, a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
        a.cross(b).norm_squared() <= self.tol.structural * a.norm_squared() * b.norm_squared()
    }

    /// Normalize and verify a candidate
    fn accept(&self, candidate: Vector3<f64>) -> Option<Vector3<f64>> {
        let norm = candidate.norm();
        if !norm.is_finite() || norm * norm < self.tol.structural {
            return None;
        }
        let v = candidate / norm;

        if (self.shifted * v).norm() >= self.tol.residual {
            return None;
        }
        if self.already_found.iter().any(|f| v.dot(f).abs() > self.tol.duplicate_cosine) {
            return None;
        }
        Some(v)
    }
}

/// Standard axes ordered from least to most aligned with `v`
fn axes_least_aligned(v: &Vector3<f64>) -> [Vector3<f64>; 3] {
    let mut axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    axes.sort_by(|a, b| a.dot(v).abs().total_cmp(&b.dot(v).abs()));
    axes
}

/// `A − λI` is negligible: the eigenspace is all of R³
fn zero_matrix(p: &NullspaceProblem<'_>) -> Option<Vector3<f64>> {
    if !p.rows.iter().all(|r| p.is_zero(r)) {
        return None;
    }

    match p.already_found {
        [] => p.accept(Vector3::x()),
        [f] => axes_least_aligned(f)
            .into_iter()
            .find_map(|axis| p.accept(axis - f * axis.dot(f))),
        [f, g] => p.accept(f.cross(g)),
        _ => None,
    }
}

/// Every non-zero row is parallel to one normal: a plane of eigenvectors
fn parallel_rows(p: &NullspaceProblem<'_>) -> Option<Vector3<f64>> {
    let rows = p.nonzero_rows();
    let normal = *rows
        .iter()
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))?;
    if !rows.iter().all(|r| p.parallel(r, &normal)) {
        return None;
    }
    let normal = normal.normalize();

    if p.already_found.len() >= 2 {
        return None;
    }

    p.already_found
        .iter()
        .rev()
        .map(|f| normal.cross(f))
        .chain(axes_least_aligned(&normal).into_iter().map(|axis| normal.cross(&axis)))
        .find_map(|candidate| p.accept(candidate))
}

/// Cross product of two independent rows spans a 1-dimensional nullspace
fn row_cross_products(p: &NullspaceProblem<'_>) -> Option<Vector3<f64>> {
    [(0, 1), (0, 2), (1, 2)].into_iter().find_map(|(i, j)| {
        let (a, b) = (&p.rows[i], &p.rows[j]);
        if p.is_zero(a) || p.is_zero(b) || p.parallel(a, b) {
            return None;
        }
        p.accept(a.normalize().cross(&b.normalize()))
    })
}

/// Fix one coordinate to 1 and solve the remaining 2×2 system
fn fixed_coordinate(p: &NullspaceProblem<'_>) -> Option<Vector3<f64>> {
    let m = &p.shifted;
    [(0, 1, 2), (1, 0, 2), (2, 0, 1)].into_iter().find_map(|(k, u, w)| {
        let (i, j, det) = [(0, 1), (0, 2), (1, 2)].into_iter().find_map(|(i, j)| {
            let det = m[(i, u)] * m[(j, w)] - m[(i, w)] * m[(j, u)];
            (det.abs() > p.zero_threshold).then_some((i, j, det))
        })?;

        let (ri, rj) = (-m[(i, k)], -m[(j, k)]);
        let mut v = Vector3::zeros();
        v[k] = 1.0;
        v[u] = (ri * m[(j, w)] - m[(i, w)] * rj) / det;
        v[w] = (m[(i, u)] * rj - ri * m[(j, u)]) / det;
        p.accept(v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> EigenTolerances {
        EigenTolerances::default()
    }

    fn assert_parallel3(v: &Vector3<f64>, expected: Vector3<f64>) {
        let cos = v.dot(&expected.normalize()).abs();
        assert!((cos - 1.0).abs() < 1e-9, "{:?} not parallel to {:?}", v, expected);
    }

    fn assert_eigen3(m: &Matrix3<f64>, lambda: f64, v: &Vector3<f64>) {
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((m * v - v * lambda).norm() < 1e-9);
    }

    #[test]
    fn test_2x2_reflection() {
        let m = Matrix2::new(1.0, 0.0, 0.0, -1.0);
        let v = eigenvector2(&m, 1.0, &[], &tol()).unwrap();
        assert!((v.x.abs() - 1.0).abs() < 1e-12 && v.y.abs() < 1e-12);
        let v = eigenvector2(&m, -1.0, &[], &tol()).unwrap();
        assert!(v.x.abs() < 1e-12 && (v.y.abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_2x2_general() {
        let m = Matrix2::new(2.0, 1.0, 1.0, 2.0);
        let v = eigenvector2(&m, 3.0, &[], &tol()).unwrap();
        assert!((v.x - v.y).abs() < 1e-12);
        let v = eigenvector2(&m, 1.0, &[], &tol()).unwrap();
        assert!((v.x + v.y).abs() < 1e-12);
    }

    #[test]
    fn test_2x2_lower_triangular_uses_second_row() {
        let m = Matrix2::new(1.0, 0.0, 2.0, 3.0);
        let v = eigenvector2(&m, 1.0, &[], &tol()).unwrap();
        assert!((m * v - v).norm() < 1e-12);
    }

    #[test]
    fn test_2x2_scalar_matrix_axes() {
        let m = Matrix2::identity() * 2.0;
        let first = eigenvector2(&m, 2.0, &[], &tol()).unwrap();
        assert_eq!(first, Vector2::new(1.0, 0.0));
        let second = eigenvector2(&m, 2.0, &[first], &tol()).unwrap();
        assert!(second.dot(&first).abs() < 1e-12);
    }

    #[test]
    fn test_2x2_defective_has_single_direction() {
        let m = Matrix2::new(2.0, 1.0, 0.0, 2.0);
        let first = eigenvector2(&m, 2.0, &[], &tol()).unwrap();
        assert!(eigenvector2(&m, 2.0, &[first], &tol()).is_none());
    }

    #[test]
    fn test_2x2_not_an_eigenvalue() {
        let m = Matrix2::new(1.0, 0.0, 0.0, 2.0);
        assert!(eigenvector2(&m, 5.0, &[], &tol()).is_none());
    }

    #[test]
    fn test_3x3_generic() {
        let m = Matrix3::new(2.0, 0.0, 0.0, 1.0, 3.0, 0.0, 4.0, 5.0, 6.0);
        for lambda in [2.0, 3.0, 6.0] {
            let v = eigenvector3(&m, lambda, &[], &tol()).unwrap();
            assert_eigen3(&m, lambda, &v);
        }
    }

    #[test]
    fn test_3x3_zero_matrix_strategy() {
        let m = Matrix3::identity() * 3.0;
        let first = eigenvector3(&m, 3.0, &[], &tol()).unwrap();
        assert_eq!(first, Vector3::x());
        let second = eigenvector3(&m, 3.0, &[first], &tol()).unwrap();
        assert!(second.dot(&first).abs() < 1e-12);
        let third = eigenvector3(&m, 3.0, &[first, second], &tol()).unwrap();
        assert!(third.dot(&first).abs() < 1e-12);
        assert!(third.dot(&second).abs() < 1e-12);
        assert!(eigenvector3(&m, 3.0, &[first, second, third], &tol()).is_none());
    }

    #[test]
    fn test_3x3_parallel_rows_plane() {
        let m = Matrix3::new(3.0, 1.0, 1.0, 1.0, 3.0, 1.0, 1.0, 1.0, 3.0);
        let first = eigenvector3(&m, 2.0, &[], &tol()).unwrap();
        assert_eigen3(&m, 2.0, &first);
        let second = eigenvector3(&m, 2.0, &[first], &tol()).unwrap();
        assert_eigen3(&m, 2.0, &second);
        assert!(first.cross(&second).norm_squared() > 0.5);
        assert!(eigenvector3(&m, 2.0, &[first, second], &tol()).is_none());

        let line = eigenvector3(&m, 5.0, &[], &tol()).unwrap();
        assert_parallel3(&line, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_3x3_diagonal_plane() {
        let m = Matrix3::from_diagonal(&Vector3::new(2.0, 2.0, 5.0));
        let first = eigenvector3(&m, 2.0, &[], &tol()).unwrap();
        let second = eigenvector3(&m, 2.0, &[first], &tol()).unwrap();
        assert!(first.z.abs() < 1e-12 && second.z.abs() < 1e-12);
        assert!(first.dot(&second).abs() < 1e-12);
        assert_parallel3(&eigenvector3(&m, 5.0, &[], &tol()).unwrap(), Vector3::z());
    }

    #[test]
    fn test_3x3_defective_rejects_duplicate() {
        // Jordan block: eigenvalue 2 has a one-dimensional eigenspace
        let m = Matrix3::new(2.0, 1.0, 0.0, 0.0, 2.0, 1.0, 0.0, 0.0, 2.0);
        let first = eigenvector3(&m, 2.0, &[], &tol()).unwrap();
        assert_parallel3(&first, Vector3::x());
        assert!(eigenvector3(&m, 2.0, &[first], &tol()).is_none());
    }

    #[test]
    fn test_3x3_not_an_eigenvalue() {
        let m = Matrix3::from_diagonal(&Vector3::new(1.0, 2.0, 3.0));
        assert!(eigenvector3(&m, 10.0, &[], &tol()).is_none());
    }

    #[test]
    fn test_fixed_coordinate_strategy() {
        // Rank-2 matrix with nullspace (1, 1, 1)
        let m = Matrix3::new(1.0, -1.0, 0.0, 0.0, 1.0, -1.0, 1.0, 0.0, -1.0);
        let t = EigenTolerances::default();
        let problem = NullspaceProblem::new(&m, 0.0, &[], &t);
        let v = fixed_coordinate(&problem).unwrap();
        assert_parallel3(&v, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_strategies_decline_outside_their_case() {
        let m = Matrix3::new(2.0, 0.0, 0.0, 1.0, 3.0, 0.0, 4.0, 5.0, 6.0);
        let t = EigenTolerances::default();
        let problem = NullspaceProblem::new(&m, 3.0, &[], &t);
        assert!(zero_matrix(&problem).is_none());
        assert!(parallel_rows(&problem).is_none());
        assert!(row_cross_products(&problem).is_some());
    }

    #[test]
    fn test_near_scalar_uses_the_one_real_row() {
        // 0.005 away from 1000·I: not scalar, rank one after the shift
        let m = Matrix3::new(1000.0, 0.005, 0.0, 0.0, 1000.0, 0.0, 0.0, 0.0, 1000.0);
        let t = tol();
        let problem = NullspaceProblem::new(&m, 1000.0, &[], &t);
        assert!(zero_matrix(&problem).is_none());

        let first = eigenvector3(&m, 1000.0, &[], &t).unwrap();
        assert!(first.y.abs() < 1e-12);
        let second = eigenvector3(&m, 1000.0, &[first], &t).unwrap();
        assert!(second.y.abs() < 1e-12);
        assert!(first.dot(&second).abs() < 1e-12);
        assert!(eigenvector3(&m, 1000.0, &[first, second], &t).is_none());
    }

    #[test]
    fn test_negligible_shift_is_zero_matrix() {
        let m = Matrix3::identity() * 1000.0;
        let t = tol();
        let problem = NullspaceProblem::new(&m, 1000.0 + 1e-9, &[], &t);
        assert_eq!(zero_matrix(&problem), Some(Vector3::x()));
    }
}
