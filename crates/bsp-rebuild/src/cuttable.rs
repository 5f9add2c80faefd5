//! Half-space clipping for windings.

use nalgebra::Point3;

use crate::{Classification, Plane3D, PlaneSide, Polygon};

/// Trait for geometry that can be clipped by a plane.
pub trait Cuttable {
    /// Keeps the part of the geometry behind `plane` (the inside of a brush
    /// whose side owns that plane).
    ///
    /// Vertices within `epsilon` of the plane count as on it and are kept.
    ///
    /// # Return values by classification
    ///
    /// - **Back** or **Coplanar**: the geometry unchanged
    /// - **Front**: an empty polygon
    /// - **Spanning**: the back part, with new vertices where edges cross
    fn clip(&self, plane: &Plane3D, epsilon: f64) -> Polygon;
}

impl Cuttable for Polygon {
    fn clip(&self, plane: &Plane3D, epsilon: f64) -> Polygon {
        match self.classify(plane, epsilon) {
            Classification::Back | Classification::Coplanar => self.clone(),
            Classification::Front => Polygon::default(),
            Classification::Spanning => clip_polygon(self, plane, epsilon),
        }
    }
}

/// Clips a spanning polygon to the back side of `plane`.
///
/// Uses the Sutherland-Hodgman algorithm: walks the polygon edges, keeping
/// back and on-plane vertices and adding intersection points where an edge
/// crosses from one side to the other.
fn clip_polygon(polygon: &Polygon, plane: &Plane3D, epsilon: f64) -> Polygon {
    let vertices = polygon.vertices();
    let n = vertices.len();

    let dists: Vec<f64> = vertices.iter().map(|v| plane.signed_distance(*v)).collect();
    let sides: Vec<PlaneSide> = vertices
        .iter()
        .map(|v| plane.classify_point(*v, epsilon))
        .collect();

    let mut kept = Vec::with_capacity(n + 1);
    for i in 0..n {
        let current = vertices[i];
        let next_idx = (i + 1) % n;

        if sides[i] != PlaneSide::Front {
            kept.push(current);
        }

        let crosses = matches!(
            (sides[i], sides[next_idx]),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        );
        if crosses {
            kept.push(intersection(
                plane,
                current,
                vertices[next_idx],
                dists[i],
                dists[next_idx],
            ));
        }
    }

    Polygon::new(kept)
}

/// Finds where the edge `start -> end` meets the plane, snapping the axis an
/// axial plane is perpendicular to so the new vertex lies exactly on it.
fn intersection(
    plane: &Plane3D,
    start: Point3<f64>,
    end: Point3<f64>,
    start_dist: f64,
    end_dist: f64,
) -> Point3<f64> {
    let t = start_dist / (start_dist - end_dist);
    let mut point = start + (end - start) * t;
    if let Some(axis) = plane.axial() {
        point[axis] = plane.normal()[axis] * plane.offset();
    }
    point
}
