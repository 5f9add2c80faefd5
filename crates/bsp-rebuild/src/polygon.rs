//! Winding representation for brush sides.

use std::fmt;

use nalgebra::Point3;

use crate::{Classification, Plane3D, PlaneSide, RigidTransform, Triangle};

/// An ordered loop of vertices describing one face of a brush.
///
/// Vertices wind counter-clockwise when viewed from the front (the direction
/// the side's plane normal points). Unlike a finished face, a polygon may hold
/// fewer than three vertices while it is being clipped or cleaned up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3<f64>>,
}

impl Polygon {
    /// Creates a new polygon from a list of vertices.
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        Self { vertices }
    }

    /// Returns the vertices of the polygon.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Classifies this polygon relative to a plane.
    pub fn classify(&self, plane: &Plane3D, epsilon: f64) -> Classification {
        let mut front = 0;
        let mut back = 0;

        for vertex in &self.vertices {
            match plane.classify_point(*vertex, epsilon) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => {}
            }
        }

        match (front, back) {
            (0, 0) => Classification::Coplanar,
            (_, 0) => Classification::Front,
            (0, _) => Classification::Back,
            _ => Classification::Spanning,
        }
    }

    /// Removes vertices that lie within `epsilon` of their predecessor,
    /// including the wrap-around pair (last, first).
    ///
    /// These come out of clipping as numerical duplicates of the same corner.
    pub fn remove_degenerate(&mut self, epsilon: f64) {
        let mut kept: Vec<Point3<f64>> = Vec::with_capacity(self.vertices.len());
        for &vertex in &self.vertices {
            match kept.last() {
                Some(prev) if (vertex - prev).norm() < epsilon => {}
                _ => kept.push(vertex),
            }
        }
        while kept.len() > 1 && (kept[kept.len() - 1] - kept[0]).norm() < epsilon {
            kept.pop();
        }
        self.vertices = kept;
    }

    /// Returns the first coordinate whose magnitude exceeds `max_coord`, if
    /// any. Non-finite coordinates count as exceeding.
    pub fn oversized_coord(&self, max_coord: f64) -> Option<f64> {
        self.vertices
            .iter()
            .flat_map(|p| p.coords.iter().copied())
            .find(|c| !(c.abs() <= max_coord))
    }

    /// Picks three well-separated vertices spanning the polygon's plane.
    ///
    /// Starts from the first vertex, takes the vertex farthest from it, then
    /// the vertex that maximises the triangle's area. Returns `None` for
    /// polygons with fewer than three vertices.
    pub fn plane_points(&self) -> Option<Triangle> {
        let a = *self.vertices.first()?;
        if self.vertices.len() < 3 {
            return None;
        }

        let b = self
            .vertices
            .iter()
            .copied()
            .max_by(|p, q| (p - a).norm_squared().total_cmp(&(q - a).norm_squared()))?;
        let c = self.vertices.iter().copied().max_by(|p, q| {
            let area_p = (b - a).cross(&(p - a)).norm_squared();
            let area_q = (b - a).cross(&(q - a)).norm_squared();
            area_p.total_cmp(&area_q)
        })?;

        Some(Triangle::new(a, b, c))
    }

    /// Applies a rigid transform to every vertex.
    pub fn transform(&mut self, transform: &RigidTransform) {
        for vertex in &mut self.vertices {
            *vertex = transform.apply(*vertex);
        }
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "({} {} {})", v.x, v.y, v.z)?;
        }
        Ok(())
    }
}
