//! Eigendecomposition and invariant subspace classification

use crate::nullspace::{eigenvector2, eigenvector3};
use crate::polynomial::{cubic_roots, quadratic_roots};
use linviz_core::{
    Decomposition, EigenTolerances, Eigenpair, Eigenvector, InvariantSubspace, SquareMatrix,
};
use nalgebra::{Matrix2, Matrix3, Vector2, Vector3};

/// Eigenpairs and invariant subspaces of a 2×2 or 3×3 matrix.
///
/// Scalar matrices short-circuit to a single `WholeSpace` with no eigenpairs,
/// since no direction is more of an eigenvector than any other.
pub fn eigendecompose(matrix: &SquareMatrix, tol: &EigenTolerances) -> Decomposition {
    let dimension = matrix.dimension();

    if is_identity_like(matrix, tol.identity) {
        let eigenvalue = matrix.trace() / dimension as f64;
        tracing::debug!(eigenvalue, "scalar matrix, every direction is invariant");
        return Decomposition {
            dimension,
            eigenpairs: Vec::new(),
            subspaces: vec![InvariantSubspace::WholeSpace { eigenvalue }],
        };
    }

    let eigenpairs = match matrix {
        SquareMatrix::Two(m) => eigenpairs2(m, tol),
        SquareMatrix::Three(m) => eigenpairs3(m, tol),
    };

    let unresolved = eigenpairs
        .iter()
        .filter(|p| !p.eigenvalue.is_complex && p.vector.is_none());
    for pair in unresolved {
        tracing::debug!(
            eigenvalue = pair.eigenvalue.real,
            "real eigenvalue without verified eigenvector"
        );
    }

    let subspaces = classify(&eigenpairs, tol);
    tracing::debug!(
        %matrix,
        eigenpairs = eigenpairs.len(),
        subspaces = subspaces.len(),
        "eigendecomposition"
    );

    Decomposition { dimension, eigenpairs, subspaces }
}

/// Off-diagonal entries near zero and diagonal entries mutually close
pub fn is_identity_like(matrix: &SquareMatrix, tol: f64) -> bool {
    let n = matrix.dimension();
    let entry = |i: usize, j: usize| matrix.get(i, j).unwrap_or(0.0);

    let off_diagonal_zero = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|(i, j)| i != j)
        .all(|(i, j)| entry(i, j).abs() < tol);

    let diagonal_equal = (1..n).all(|i| (entry(i, i) - entry(0, 0)).abs() < tol);

    off_diagonal_zero && diagonal_equal
}

fn eigenpairs2(m: &Matrix2<f64>, tol: &EigenTolerances) -> Vec<Eigenpair> {
    let mut found: Vec<(f64, Vector2<f64>)> = Vec::new();

    quadratic_roots(m, tol.root)
        .into_iter()
        .map(|eigenvalue| {
            let vector = eigenvalue.as_real().and_then(|lambda| {
                let same: Vec<Vector2<f64>> = found
                    .iter()
                    .filter(|(mu, _)| (mu - lambda).abs() < tol.grouping)
                    .map(|(_, v)| *v)
                    .collect();
                let v = eigenvector2(m, lambda, &same, tol)?;
                found.push((lambda, v));
                Some(Eigenvector::Planar(v))
            });
            Eigenpair { eigenvalue, vector }
        })
        .collect()
}

fn eigenpairs3(m: &Matrix3<f64>, tol: &EigenTolerances) -> Vec<Eigenpair> {
    let mut found: Vec<(f64, Vector3<f64>)> = Vec::new();

    cubic_roots(m, tol.root)
        .into_iter()
        .map(|eigenvalue| {
            let vector = eigenvalue.as_real().and_then(|lambda| {
                let same: Vec<Vector3<f64>> = found
                    .iter()
                    .filter(|(mu, _)| (mu - lambda).abs() < tol.grouping)
                    .map(|(_, v)| *v)
                    .collect();
                let v = eigenvector3(m, lambda, &same, tol)?;
                found.push((lambda, v));
                Some(Eigenvector::Spatial(v))
            });
            Eigenpair { eigenvalue, vector }
        })
        .collect()
}

/// Eigenvalue group: the first eigenvalue seen and every resolved vector
struct Group {
    eigenvalue: f64,
    vectors: Vec<Vector3<f64>>,
}

/// Group real eigenpairs by near-equal eigenvalue and emit one subspace per
/// group that resolved at least one eigenvector, in order of first appearance.
pub fn classify(eigenpairs: &[Eigenpair], tol: &EigenTolerances) -> Vec<InvariantSubspace> {
    let mut groups: Vec<Group> = Vec::new();

    for pair in eigenpairs {
        let Some(lambda) = pair.eigenvalue.as_real() else {
            continue;
        };
        let index = match groups.iter().position(|g| (g.eigenvalue - lambda).abs() < tol.grouping) {
            Some(index) => index,
            None => {
                groups.push(Group { eigenvalue: lambda, vectors: Vec::new() });
                groups.len() - 1
            }
        };
        if let Some(v) = pair.vector {
            groups[index].vectors.push(v.to_vector3());
        }
    }

    groups.iter().filter_map(|g| classify_group(g, tol)).collect()
}

fn classify_group(group: &Group, tol: &EigenTolerances) -> Option<InvariantSubspace> {
    let eigenvalue = group.eigenvalue;
    let vectors = &group.vectors;

    let independent_pair = (0..vectors.len())
        .flat_map(|i| (i + 1..vectors.len()).map(move |j| (i, j)))
        .map(|(i, j)| (vectors[i], vectors[j]))
        .find(|(a, b)| a.cross(b).norm_squared() > tol.independence);

    if let Some((a, b)) = independent_pair {
        let normal = a.cross(&b).normalize();

        // A third direction off the plane means every direction is invariant
        let off_plane = vectors.iter().any(|v| v.dot(&normal).powi(2) > tol.independence);
        if off_plane {
            tracing::debug!(eigenvalue, "three independent eigenvectors share one eigenvalue");
            return Some(InvariantSubspace::WholeSpace { eigenvalue });
        }
        if vectors.len() > 2 {
            tracing::debug!(
                eigenvalue,
                extra = vectors.len() - 2,
                "eigenvectors inside the plane dropped"
            );
        }

        return Some(InvariantSubspace::Plane {
            eigenvalue,
            normal,
            basis: [a, b],
        });
    }

    match vectors.first() {
        Some(direction) => Some(InvariantSubspace::Line { eigenvalue, direction: *direction }),
        None => {
            tracing::debug!(eigenvalue, "eigenvalue group has no resolved eigenvector");
            None
        }
    }
}
