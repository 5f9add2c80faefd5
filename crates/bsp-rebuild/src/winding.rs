//! Rebuilding a side's face from the planes of its brush.
//!
//! Compiled maps keep only the planes bounding each brush. A side's face is
//! recovered by starting from a huge square on the side's plane and clipping
//! it against every other plane of the brush; what survives is the face.
//! Floating-point error adds up over many clips, so every result is
//! cleaned and validated before it may be written.

use nalgebra::Vector3;

use crate::{
    Cuttable, GeometrySettings, Plane3D, Polygon, Rectangle, RigidTransform, SideError, Triangle,
};

/// A validated face, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct SideWinding {
    polygon: Polygon,
    plane_points: Triangle,
    normal: Vector3<f64>,
}

impl SideWinding {
    /// The face's vertex loop.
    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Three points spanning the face's plane. `(b - a) × (c - a)` points
    /// out of the brush.
    #[inline]
    pub fn plane_points(&self) -> &Triangle {
        &self.plane_points
    }

    /// Outward unit normal, computed from the plane points after any
    /// transform was applied.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }
}

/// Rebuilds the face of the side lying on `plane`.
///
/// `clip_planes` are the planes of the brush's other non-bevel sides. The
/// face is cleaned of near-duplicate vertices and rejected when it is empty,
/// has fewer than three vertices, reaches beyond `settings.max_coord`, or
/// cannot be expressed as three distinct finite plane points. If `transform`
/// is given the finished face is moved by it.
pub fn side_winding<'a, I>(
    plane: &Plane3D,
    clip_planes: I,
    transform: Option<&RigidTransform>,
    settings: &GeometrySettings,
) -> Result<SideWinding, SideError>
where
    I: IntoIterator<Item = &'a Plane3D>,
{
    let mut polygon = Polygon::from(Rectangle::spanning_plane(plane, settings.seed_extent));
    for clip in clip_planes {
        if polygon.is_empty() {
            break;
        }
        polygon = polygon.clip(clip, settings.clip_epsilon);
    }

    polygon.remove_degenerate(settings.degenerate_epsilon);

    if polygon.is_empty() {
        return Err(SideError::EmptyPolygon);
    }
    if polygon.len() < 3 {
        return Err(SideError::DegeneratePolygon {
            vertices: polygon.len(),
        });
    }
    if let Some(coord) = polygon.oversized_coord(settings.max_coord) {
        return Err(SideError::OversizedPolygon { coord });
    }

    let mut plane_points = oriented_plane_points(&polygon, plane)?;
    if let Some(transform) = transform {
        polygon.transform(transform);
        plane_points = plane_points.transformed(transform);
    }
    let normal = plane_points
        .unit_normal()
        .ok_or(SideError::InvalidPlanePoints)?;

    Ok(SideWinding {
        polygon,
        plane_points,
        normal,
    })
}

/// Picks the polygon's plane points, ordered so their normal agrees with the
/// side's plane.
fn oriented_plane_points(polygon: &Polygon, plane: &Plane3D) -> Result<Triangle, SideError> {
    let points = polygon.plane_points().ok_or(SideError::InvalidPlanePoints)?;
    if !points.is_finite() {
        return Err(SideError::InvalidPlanePoints);
    }
    if let Some(point) = points.duplicate_point() {
        return Err(SideError::DuplicatePlanePoint { point });
    }
    // Distinct but collinear points span no plane.
    if points.unit_normal().is_none() {
        return Err(SideError::InvalidPlanePoints);
    }

    let [a, b, c] = *points.vertices();
    if points.normal().dot(&plane.normal()) < 0.0 {
        Ok(Triangle::new(a, c, b))
    } else {
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    /// Outward planes of the box `min..max`: +X, -X, +Y, -Y, +Z, -Z.
    fn box_planes(min: [f64; 3], max: [f64; 3]) -> Vec<Plane3D> {
        let mut planes = Vec::new();
        for axis in 0..3 {
            let mut n = Vector3::zeros();
            n[axis] = 1.0;
            planes.push(Plane3D::new(n, max[axis]));
            planes.push(Plane3D::new(-n, -min[axis]));
        }
        planes
    }

    fn others(planes: &[Plane3D], skip: usize) -> impl Iterator<Item = &Plane3D> {
        planes
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != skip)
            .map(|(_, p)| p)
    }

    #[test]
    fn box_faces_are_quads_on_their_planes() {
        let planes = box_planes([0.0, 0.0, 0.0], [64.0, 32.0, 16.0]);
        let settings = GeometrySettings::default();
        for (i, plane) in planes.iter().enumerate() {
            let side = side_winding(plane, others(&planes, i), None, &settings).unwrap();
            assert_eq!(side.polygon().len(), 4, "side {i}");
            for v in side.polygon().vertices() {
                assert_eq!(plane.signed_distance(*v), 0.0);
                assert!(v.x >= 0.0 && v.x <= 64.0);
                assert!(v.y >= 0.0 && v.y <= 32.0);
                assert!(v.z >= 0.0 && v.z <= 16.0);
            }
            assert_relative_eq!(side.normal(), plane.normal(), epsilon = 1e-12);
        }
    }

    #[test]
    fn slanted_side_is_a_triangle() {
        // A wedge: box 0..64 cut by x + z <= 64.
        let mut planes = box_planes([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        planes.push(Plane3D::new(Vector3::new(1.0, 0.0, 1.0), 64.0));
        let settings = GeometrySettings::default();

        // -Y side is the square cut in half
        let side = side_winding(&planes[3], others(&planes, 3), None, &settings).unwrap();
        assert_eq!(side.polygon().len(), 3);
    }

    #[test]
    fn unbounded_side_is_oversized() {
        let planes = box_planes([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        let settings = GeometrySettings::default();
        // Only clipped by +X: still reaches the seed extent elsewhere
        let err = side_winding(&planes[4], [&planes[0]], None, &settings).unwrap_err();
        assert!(matches!(err, SideError::OversizedPolygon { .. }));
    }

    #[test]
    fn side_outside_its_brush_is_empty() {
        let planes = box_planes([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        let settings = GeometrySettings::default();
        // A plane beyond +X, clipped by the box, leaves nothing.
        let outside = Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 128.0);
        let err = side_winding(&outside, &planes, None, &settings).unwrap_err();
        assert_eq!(err, SideError::EmptyPolygon);
    }

    #[test]
    fn sliver_collapses_to_degenerate() {
        // Box 0..64 squeezed to a 0.05 wide strip along Y.
        let settings = GeometrySettings::default();
        let mut planes = box_planes([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        planes.push(Plane3D::new(Vector3::new(0.0, 1.0, 0.0), 0.05));
        let err = side_winding(&planes[0], others(&planes, 0), None, &settings).unwrap_err();
        assert!(
            matches!(err, SideError::DegeneratePolygon { vertices: 1 | 2 }),
            "got {err:?}"
        );
    }

    #[test]
    fn translation_offsets_every_vertex() {
        let planes = box_planes([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        let settings = GeometrySettings::default();
        let offset = Vector3::new(100.0, -50.0, 8.0);
        let transform = RigidTransform::translation(offset);

        for i in 0..planes.len() {
            let plain = side_winding(&planes[i], others(&planes, i), None, &settings).unwrap();
            let moved =
                side_winding(&planes[i], others(&planes, i), Some(&transform), &settings).unwrap();
            for (a, b) in plain.polygon().vertices().iter().zip(moved.polygon().vertices()) {
                assert_relative_eq!(*a + offset, *b, epsilon = 1e-9);
            }
            for (a, b) in plain.plane_points().vertices().iter().zip(moved.plane_points().vertices()) {
                assert_relative_eq!(*a + offset, *b, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn rotation_turns_plane_points() {
        let planes = box_planes([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        let settings = GeometrySettings::default();
        let transform =
            RigidTransform::from_origin_angles(Vector3::zeros(), Vector3::new(0.0, 90.0, 0.0));
        // +X side turned by 90 degrees of yaw faces +Y
        let side = side_winding(&planes[0], others(&planes, 0), Some(&transform), &settings).unwrap();
        assert_relative_eq!(side.normal(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-9);
        for v in side.polygon().vertices() {
            assert_relative_eq!(v.y, 64.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn reconstruction_is_deterministic() {
        let mut planes = box_planes([-13.0, 7.5, 0.0], [40.0, 90.0, 33.0]);
        planes.push(Plane3D::new(Vector3::new(0.3, 0.7, 0.2), 60.0));
        let settings = GeometrySettings::default();
        for i in 0..planes.len() {
            let a = side_winding(&planes[i], others(&planes, i), None, &settings);
            let b = side_winding(&planes[i], others(&planes, i), None, &settings);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn plane_points_are_corners() {
        let planes = box_planes([0.0, 0.0, 0.0], [64.0, 64.0, 64.0]);
        let settings = GeometrySettings::default();
        let side = side_winding(&planes[4], others(&planes, 4), None, &settings).unwrap();
        let corners = [
            Point3::new(0.0, 0.0, 64.0),
            Point3::new(64.0, 0.0, 64.0),
            Point3::new(64.0, 64.0, 64.0),
            Point3::new(0.0, 64.0, 64.0),
        ];
        for p in side.plane_points().vertices() {
            assert!(corners.contains(p), "{p:?} is not a corner");
        }
    }
}
