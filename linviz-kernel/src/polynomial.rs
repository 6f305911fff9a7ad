//! Closed-form characteristic roots for 2×2 and 3×3 matrices

use linviz_core::{Eigenvalue, SquareMatrix};
use nalgebra::{Matrix2, Matrix3};
use std::f64::consts::PI;

/// Roots of the characteristic polynomial, real and complex, in solver order.
/// Repeated roots appear repeatedly; grouping happens later.
pub fn characteristic_roots(matrix: &SquareMatrix, eps: f64) -> Vec<Eigenvalue> {
    match matrix {
        SquareMatrix::Two(m) => quadratic_roots(m, eps).to_vec(),
        SquareMatrix::Three(m) => cubic_roots(m, eps).to_vec(),
    }
}

/// Roots of `λ² − trace·λ + det` for `[[a, b], [c, d]]`
pub fn quadratic_roots(m: &Matrix2<f64>, eps: f64) -> [Eigenvalue; 2] {
    let trace = m[(0, 0)] + m[(1, 1)];
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    let discriminant = trace * trace - 4.0 * det;

    if discriminant < -eps {
        return Eigenvalue::conjugate_pair(trace / 2.0, (-discriminant).sqrt() / 2.0);
    }

    let root = discriminant.max(0.0).sqrt();
    [
        Eigenvalue::real((trace + root) / 2.0),
        Eigenvalue::real((trace - root) / 2.0),
    ]
}

/// Coefficients `(c2, c1, c0)` of `−λ³ + c2·λ² + c1·λ + c0`
pub fn characteristic_coefficients(m: &Matrix3<f64>) -> (f64, f64, f64) {
    let trace = m.trace();
    let minors = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
        + m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)]
        + m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)];
    (trace, -minors, m.determinant())
}

/// Roots of the characteristic cubic of a 3×3 matrix.
///
/// Coefficients come from `A − (trace/3)·I`; taking them from `A` directly
/// cancels most of the digits of `q` for large, nearly scalar matrices.
pub fn cubic_roots(m: &Matrix3<f64>, eps: f64) -> [Eigenvalue; 3] {
    let shift = m.trace() / 3.0;
    let centered = m - Matrix3::identity() * shift;
    let (c2, c1, c0) = characteristic_coefficients(&centered);
    // Monic form λ³ + bλ² + cλ + d
    depressed_cubic_roots(-c2, -c1, -c0, eps).map(|root| Eigenvalue {
        real: root.real + shift,
        ..root
    })
}

/// Roots of `λ³ + bλ² + cλ + d` through the substitution `λ = t − b/3`
pub fn depressed_cubic_roots(b: f64, c: f64, d: f64, eps: f64) -> [Eigenvalue; 3] {
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;
    let shift = b / 3.0;
    let delta = -(4.0 * p * p * p + 27.0 * q * q);

    if p.abs() < eps && delta >= -eps {
        let t = (-q).cbrt();
        return [Eigenvalue::real(t - shift); 3];
    }

    // Rounding in delta grows with the magnitude of its terms.
    let delta_floor = -eps * (4.0 * p.abs().powi(3) + 27.0 * q * q).max(1.0);

    // Tiny positive p can leave delta above the floor; the trigonometric
    // form needs p < 0, so that case goes through Cardano.
    if delta >= delta_floor && p < 0.0 {
        let r = (-p / 3.0).sqrt();
        let cos_arg = (-q / (2.0 * r * r * r)).clamp(-1.0, 1.0);
        let theta = cos_arg.acos() / 3.0;
        return [0.0, 1.0, 2.0].map(|k| {
            Eigenvalue::real(2.0 * r * (theta - 2.0 * PI * k / 3.0).cos() - shift)
        });
    }

    let s = (-delta / 108.0).max(0.0).sqrt();
    let a = (-q / 2.0 + s).cbrt();
    let bb = (-q / 2.0 - s).cbrt();
    let real = -(a + bb) / 2.0 - shift;
    let imag = (a - bb).abs() * 3f64.sqrt() / 2.0;
    let [upper, lower] = Eigenvalue::conjugate_pair(real, imag);
    [Eigenvalue::real(a + bb - shift), upper, lower]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-10;

    fn reals(roots: &[Eigenvalue]) -> Vec<f64> {
        let mut values: Vec<f64> = roots.iter().filter_map(|r| r.as_real()).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        values
    }

    /// Seeded LCG in [-range, range)
    fn lcg(state: &mut u64, range: f64) -> f64 {
        *state = state.wrapping_mul(1103515245).wrapping_add(12345);
        let r = ((*state >> 16) & 0x7fff) as f64 / 32768.0;
        (2.0 * r - 1.0) * range
    }

    #[test]
    fn test_quadratic_real() {
        let roots = quadratic_roots(&Matrix2::new(2.0, 1.0, 1.0, 2.0), EPS);
        assert!((roots[0].real - 3.0).abs() < 1e-12);
        assert!((roots[1].real - 1.0).abs() < 1e-12);
        assert!(!roots[0].is_complex);
    }

    #[test]
    fn test_quadratic_rotation_is_complex() {
        let theta: f64 = 0.7;
        let m = Matrix2::new(theta.cos(), -theta.sin(), theta.sin(), theta.cos());
        let roots = quadratic_roots(&m, EPS);
        assert!(roots.iter().all(|r| r.is_complex));
        assert!((roots[0].real - theta.cos()).abs() < 1e-12);
        assert!((roots[0].imag - theta.sin()).abs() < 1e-12);
        assert!((roots[1].imag + theta.sin()).abs() < 1e-12);
    }

    #[test]
    fn test_quadratic_repeated() {
        let roots = quadratic_roots(&Matrix2::new(2.0, 1.0, 0.0, 2.0), EPS);
        assert_eq!(roots[0].real, 2.0);
        assert_eq!(roots[1].real, 2.0);
    }

    #[test]
    fn test_cubic_diagonal() {
        let m = Matrix3::from_diagonal(&nalgebra::Vector3::new(1.0, 2.0, 3.0));
        let roots = cubic_roots(&m, EPS);
        let values = reals(&roots);
        assert_eq!(values.len(), 3);
        for (got, want) in values.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-9, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_cubic_double_root() {
        // 2I + ones: eigenvalues 2, 2, 5
        let m = Matrix3::new(3.0, 1.0, 1.0, 1.0, 3.0, 1.0, 1.0, 1.0, 3.0);
        let values = reals(&cubic_roots(&m, EPS));
        assert!((values[0] - 2.0).abs() < 1e-9);
        assert!((values[1] - 2.0).abs() < 1e-9);
        assert!((values[2] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_cubic_triple_root() {
        let roots = cubic_roots(&(Matrix3::identity() * 4.0), EPS);
        for r in roots {
            assert!(!r.is_complex);
            assert!((r.real - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cubic_rotation_about_z() {
        let theta: f64 = 1.1;
        let m = Matrix3::new(
            theta.cos(), -theta.sin(), 0.0,
            theta.sin(), theta.cos(), 0.0,
            0.0, 0.0, 1.0,
        );
        let roots = cubic_roots(&m, EPS);
        assert!(!roots[0].is_complex);
        assert!((roots[0].real - 1.0).abs() < 1e-9);
        assert!(roots[1].is_complex && roots[2].is_complex);
        assert!((roots[1].real - theta.cos()).abs() < 1e-9);
        assert!((roots[1].imag - theta.sin()).abs() < 1e-9);
        assert!((roots[2].imag + theta.sin()).abs() < 1e-9);
    }

    #[test]
    fn test_characteristic_coefficients() {
        let m = Matrix3::new(3.0, 1.0, 1.0, 1.0, 3.0, 1.0, 1.0, 1.0, 3.0);
        let (c2, c1, c0) = characteristic_coefficients(&m);
        assert!((c2 - 9.0).abs() < 1e-12);
        assert!((c1 + 24.0).abs() < 1e-12);
        assert!((c0 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_random_symmetric_roots_are_finite_and_real() {
        let mut state = 12345u64;
        for _ in 0..2000 {
            let (a, b, c) = (lcg(&mut state, 10.0), lcg(&mut state, 10.0), lcg(&mut state, 10.0));
            let (d, e, f) = (lcg(&mut state, 10.0), lcg(&mut state, 10.0), lcg(&mut state, 10.0));
            let m = Matrix3::new(a, d, e, d, b, f, e, f, c);
            let roots = cubic_roots(&m, EPS);
            for r in roots {
                assert!(r.real.is_finite(), "non-finite root for {:?}", m);
                assert!(!r.is_complex, "complex root for symmetric {:?}", m);
            }
            let sum: f64 = roots.iter().map(|r| r.real).sum();
            assert!((sum - m.trace()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_cubic_large_entries_double_root() {
        // 1000·(2I + ones): eigenvalues 2000, 2000, 5000
        let m = Matrix3::new(
            3000.0, 1000.0, 1000.0,
            1000.0, 3000.0, 1000.0,
            1000.0, 1000.0, 3000.0,
        );
        let roots = cubic_roots(&m, EPS);
        assert!(roots.iter().all(|r| !r.is_complex));
        let values = reals(&roots);
        for (got, want) in values.iter().zip([2000.0, 2000.0, 5000.0]) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_delta_rounding_at_large_scale_stays_real() {
        // t³ − 3e6·t − 2e9 has roots 2000, −1000, −1000. Nudging q by one ulp
        // makes Δ slightly negative, far above an absolute 1e-10.
        let q = f64::from_bits((-2e9f64).to_bits() + 1);
        assert!(q < -2e9);
        let roots = depressed_cubic_roots(0.0, -3e6, q, EPS);
        assert!(roots.iter().all(|r| !r.is_complex), "{:?}", roots);
        let values = reals(&roots);
        for (got, want) in values.iter().zip([-1000.0, -1000.0, 2000.0]) {
            assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_tiny_positive_p_uses_cardano() {
        // t³ + 1e-9·t: roots 0 and ±i·√1e-9; p is above eps so no triple root
        let roots = depressed_cubic_roots(0.0, 1e-9, 0.0, EPS);
        assert!(roots.iter().all(|r| r.real.is_finite() && r.imag.is_finite()));
        assert!(!roots[0].is_complex);
        assert!(roots[0].real.abs() < 1e-12);
        assert!(roots[1].is_complex && roots[2].is_complex);
        let expected = 1e-9f64.sqrt();
        assert!((roots[1].imag - expected).abs() < 1e-9 * expected);
        assert!((roots[2].imag + expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn test_characteristic_roots_dispatch() {
        let two = SquareMatrix::Two(Matrix2::identity());
        assert_eq!(characteristic_roots(&two, EPS).len(), 2);
        let three = SquareMatrix::Three(Matrix3::identity());
        assert_eq!(characteristic_roots(&three, EPS).len(), 3);
    }
}
