//! Three-point plane representation used when writing brush sides.

use nalgebra::{Point3, Vector3};

use crate::RigidTransform;

/// Three points spanning a brush side's plane.
///
/// Editors store planes this way instead of normal + distance. The winding
/// order determines the normal direction via the right-hand rule:
/// normal = (b - a) × (c - a).
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f64>; 3],
}

impl Triangle {
    /// Creates a new triangle from three points.
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Returns the three vertices of the triangle.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>; 3] {
        &self.vertices
    }

    /// Computes the (unnormalized) normal vector of the triangle.
    pub fn normal(&self) -> Vector3<f64> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Computes the unit normal vector of the triangle.
    ///
    /// Returns `None` if the triangle is degenerate (zero area).
    pub fn unit_normal(&self) -> Option<Vector3<f64>> {
        let n = self.normal();
        let len = n.norm();
        if len > f64::EPSILON {
            Some(n / len)
        } else {
            None
        }
    }

    /// Returns `true` if every coordinate of every point is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }

    /// Returns the first point that exactly equals another one, if any.
    pub fn duplicate_point(&self) -> Option<Point3<f64>> {
        let [a, b, c] = &self.vertices;
        if a == b || a == c {
            Some(*a)
        } else if b == c {
            Some(*b)
        } else {
            None
        }
    }

    /// Returns a copy with every point moved by `transform`.
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            vertices: self.vertices.map(|p| transform.apply(p)),
        }
    }
}
