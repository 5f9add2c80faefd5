//! Rectangle representation, used to seed a side's winding.

use nalgebra::{Point3, Vector3};

use crate::{Plane3D, Polygon};

/// A rectangle in 3D space, defined by an origin corner and two edge vectors.
///
/// The rectangle has vertices at:
/// - `origin`
/// - `origin + u`
/// - `origin + u + v`
/// - `origin + v`
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
}

impl Rectangle {
    /// Creates a new rectangle from an origin point and two edge vectors.
    ///
    /// The edges should be perpendicular for a true rectangle.
    pub fn new(origin: Point3<f64>, u: Vector3<f64>, v: Vector3<f64>) -> Self {
        Self { origin, u, v }
    }

    /// Creates a square lying exactly on `plane`, centred on the point of the
    /// plane closest to the world origin, reaching `half_extent` along both
    /// in-plane axes.
    ///
    /// The vertices wind counter-clockwise seen from the front of the plane,
    /// so `u × v` points along the plane normal.
    pub fn spanning_plane(plane: &Plane3D, half_extent: f64) -> Self {
        let normal = plane.normal();

        // Pick an "up" that is not parallel to the normal.
        let major = normal.iamax();
        let mut up = if major == 2 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };
        up -= normal * up.dot(&normal);
        let up = up.normalize();
        let right = up.cross(&normal);

        let center = Point3::from(normal * plane.offset());
        let origin = center - (right + up) * half_extent;
        Self::new(origin, right * (2.0 * half_extent), up * (2.0 * half_extent))
    }

    /// Returns the four vertices of the rectangle.
    ///
    /// Order: origin, origin+u, origin+u+v, origin+v (counter-clockwise).
    pub fn vertices(&self) -> [Point3<f64>; 4] {
        [
            self.origin,
            self.origin + self.u,
            self.origin + self.u + self.v,
            self.origin + self.v,
        ]
    }
}

impl From<Rectangle> for Polygon {
    fn from(rectangle: Rectangle) -> Self {
        Polygon::new(rectangle.vertices().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vertices_order() {
        let rect = Rectangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 3.0, 0.0),
        );
        let verts = rect.vertices();
        assert_eq!(verts[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(verts[1], Point3::new(2.0, 0.0, 0.0));
        assert_eq!(verts[2], Point3::new(2.0, 3.0, 0.0));
        assert_eq!(verts[3], Point3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn spanning_plane_lies_on_plane() {
        let planes = [
            Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 64.0),
            Plane3D::new(Vector3::new(-1.0, 0.0, 0.0), 32.0),
            Plane3D::new(Vector3::new(1.0, 2.0, -3.0), -17.5),
        ];
        for plane in &planes {
            let rect = Rectangle::spanning_plane(plane, 1024.0);
            for v in rect.vertices() {
                assert_relative_eq!(plane.signed_distance(v), 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn spanning_plane_winds_along_normal() {
        let plane = Plane3D::new(Vector3::new(0.3, -0.4, 0.8), 12.0);
        let rect = Rectangle::spanning_plane(&plane, 100.0);
        let [a, b, _, d] = rect.vertices();
        let normal = (b - a).cross(&(d - a)).normalize();
        assert!(normal.dot(&plane.normal()) > 0.999);
    }

    #[test]
    fn spanning_plane_reaches_extent() {
        let plane = Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.0);
        let rect = Rectangle::spanning_plane(&plane, 500.0);
        let max = rect
            .vertices()
            .iter()
            .map(|v| v.x.abs().max(v.z.abs()))
            .fold(0.0, f64::max);
        assert_relative_eq!(max, 500.0, epsilon = 1e-9);
    }
}
