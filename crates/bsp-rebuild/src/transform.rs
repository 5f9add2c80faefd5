//! Rigid transforms for re-emitting brushes at another location.

use nalgebra::{Point3, Rotation3, Vector3};

/// A rotation about the origin followed by a translation.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidTransform {
    rotation: Rotation3<f64>,
    translation: Vector3<f64>,
}

impl RigidTransform {
    /// Creates a transform from an explicit rotation and translation.
    pub fn new(rotation: Rotation3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// A pure translation.
    pub fn translation(translation: Vector3<f64>) -> Self {
        Self::new(Rotation3::identity(), translation)
    }

    /// Builds the transform of an entity placed at `origin` with Source-style
    /// `(pitch, yaw, roll)` angles in degrees.
    ///
    /// Yaw turns about +Z, pitch about +Y and roll about +X, applied in
    /// roll, pitch, yaw order.
    pub fn from_origin_angles(origin: Vector3<f64>, angles: Vector3<f64>) -> Self {
        let [pitch, yaw, roll] = [angles.x, angles.y, angles.z].map(f64::to_radians);
        Self::new(Rotation3::from_euler_angles(roll, pitch, yaw), origin)
    }

    /// Returns the rotation part.
    #[inline]
    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    /// Returns the translation part.
    #[inline]
    pub fn offset(&self) -> Vector3<f64> {
        self.translation
    }

    /// Rotates a point about the origin, then translates it.
    #[inline]
    pub fn apply(&self, point: Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    /// Rotates a direction. Translation does not affect directions.
    #[inline]
    pub fn apply_vector(&self, vector: Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }
}
