//! Lines, planes and intersection results

use crate::KernelError;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// The set `point + t·direction`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLine")]
pub struct Line {
    point: Vector3<f64>,
    direction: Vector3<f64>,
}

#[derive(Deserialize)]
struct RawLine {
    point: Vector3<f64>,
    direction: Vector3<f64>,
}

impl TryFrom<RawLine> for Line {
    type Error = KernelError;

    fn try_from(raw: RawLine) -> Result<Self, Self::Error> {
        Line::new(raw.point, raw.direction)
    }
}

impl Line {
    /// Create a line; the direction must be non-zero and every component finite
    pub fn new(point: Vector3<f64>, direction: Vector3<f64>) -> Result<Self, KernelError> {
        if !all_finite(&point) || !all_finite(&direction) {
            return Err(KernelError::non_finite("line", "point/direction"));
        }
        if direction.norm_squared() == 0.0 {
            return Err(KernelError::DegenerateLine);
        }
        Ok(Self { point, direction })
    }

    pub fn point(&self) -> Vector3<f64> {
        self.point
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    /// Point at parameter `t`
    pub fn at(&self, t: f64) -> Vector3<f64> {
        self.point + self.direction * t
    }
}

/// The plane `a·x + b·y + c·z = d`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPlane")]
pub struct Plane {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

#[derive(Deserialize)]
struct RawPlane {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl TryFrom<RawPlane> for Plane {
    type Error = KernelError;

    fn try_from(raw: RawPlane) -> Result<Self, Self::Error> {
        Plane::new(raw.a, raw.b, raw.c, raw.d)
    }
}

impl Plane {
    /// Create a plane; `(a, b, c)` must be non-zero and every coefficient finite
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Result<Self, KernelError> {
        if ![a, b, c, d].iter().all(|x| x.is_finite()) {
            return Err(KernelError::non_finite("plane", "a/b/c/d"));
        }
        if a == 0.0 && b == 0.0 && c == 0.0 {
            return Err(KernelError::DegeneratePlane);
        }
        Ok(Self { a, b, c, d })
    }

    /// Plane with the given normal passing through `point`
    pub fn from_point_normal(
        point: Vector3<f64>,
        normal: Vector3<f64>,
    ) -> Result<Self, KernelError> {
        Self::new(normal.x, normal.y, normal.z, normal.dot(&point))
    }

    /// `(a, b, c)`
    pub fn normal(&self) -> Vector3<f64> {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Right-hand side `d`
    pub fn offset(&self) -> f64 {
        self.d
    }

    /// `n·p − d`; zero on the plane
    pub fn evaluate(&self, p: &Vector3<f64>) -> f64 {
        self.normal().dot(p) - self.d
    }
}

/// Outcome of intersecting two primitives.
///
/// `NoIntersection` covers parallel, coincident, contained and skew
/// configurations alike; they are deliberately not told apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntersectionResult {
    Point {
        point: Vector3<f64>,
    },
    LinePencil {
        point: Vector3<f64>,
        direction: Vector3<f64>,
    },
    NoIntersection,
}

impl IntersectionResult {
    pub fn is_none(&self) -> bool {
        matches!(self, IntersectionResult::NoIntersection)
    }

    pub fn as_point(&self) -> Option<Vector3<f64>> {
        match self {
            IntersectionResult::Point { point } => Some(*point),
            _ => None,
        }
    }
}

/// A geometric object the user placed in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Line(Line),
    Plane(Plane),
}

/// Result for one unordered pair of primitives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseIntersection {
    /// Index of the first primitive
    pub first: usize,
    /// Index of the second primitive (always greater than `first`)
    pub second: usize,
    pub result: IntersectionResult,
}

fn all_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}
