//! Small-integer directions for display
//!
//! Purely cosmetic: users read `(1, 1, 0)` more easily than
//! `(0.707, 0.707, 0)`. Nothing downstream computes with the result.

use linviz_core::DisplayTolerances;
use nalgebra::Vector3;

/// Integer direction parallel to `v`, with default tolerances
pub fn normalize_for_display(v: &Vector3<f64>) -> (i64, i64, i64) {
    normalize_for_display_with(v, &DisplayTolerances::default())
}

/// Integer direction parallel to `v`.
///
/// Components are divided by the smallest non-zero magnitude; the first
/// multiplier that turns every ratio into an integer wins, otherwise the raw
/// ratios are rounded. The result is reduced by the GCD of its entries.
pub fn normalize_for_display_with(v: &Vector3<f64>, tol: &DisplayTolerances) -> (i64, i64, i64) {
    let smallest = v.iter()
        .map(|x| x.abs())
        .filter(|x| *x > tol.zero)
        .fold(f64::INFINITY, f64::min);
    if !smallest.is_finite() {
        return (0, 0, 0);
    }

    let ratios = v.map(|x| if x.abs() > tol.zero { x / smallest } else { 0.0 });

    let scaled = (1..=tol.max_multiplier)
        .map(|m| ratios * f64::from(m))
        .find(|s| s.iter().all(|x| (x - x.round()).abs() < tol.integer))
        .unwrap_or(ratios);

    let [x, y, z] = [scaled.x, scaled.y, scaled.z].map(|c| c.round() as i64);
    let g = gcd(gcd(x.unsigned_abs(), y.unsigned_abs()), z.unsigned_abs());
    if g > 1 {
        let g = g as i64;
        (x / g, y / g, z / g)
    } else {
        (x, y, z)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
