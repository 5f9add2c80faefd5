//! Texture bindings of rebuilt sides.
//!
//! Resolving materials and projecting texture axes is the job of a separate
//! texture module; the brush rebuilder only talks to it through
//! [`TextureResolver`]. [`AlignedTextures`] is a small stand-in that maps
//! texinfos to material names and world-aligns every face. Moved faces keep
//! the alignment they had before the move.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Vector3;

use crate::RigidTransform;
use crate::writer::{BlockWriter, Value};

/// One texture axis: `[x y z shift] scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAxis {
    pub axis: Vector3<f64>,
    pub shift: f64,
    pub scale: f64,
}

impl fmt::Display for TextureAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {}] {}",
            self.axis.x, self.axis.y, self.axis.z, self.shift, self.scale
        )
    }
}

/// Material and mapping of a single side.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBinding {
    pub material: String,
    pub uaxis: TextureAxis,
    pub vaxis: TextureAxis,
    pub lightmap_scale: u32,
}

impl TextureBinding {
    /// Writes the texture keys of a `side` block.
    pub fn write<W: BlockWriter + ?Sized>(&self, writer: &mut W) {
        writer.put("material", Value::Text(self.material.clone()));
        writer.put("uaxis", Value::Text(self.uaxis.to_string()));
        writer.put("vaxis", Value::Text(self.vaxis.to_string()));
        writer.put("rotation", Value::Int(0));
        writer.put("lightmapscale", self.lightmap_scale.into());
    }
}

/// Texture collaborator of the brush rebuilder.
pub trait TextureResolver {
    /// Builds the binding of a side from its texinfo.
    ///
    /// `normal` is the side's outward normal after `transform` was applied.
    fn resolve(
        &mut self,
        texinfo: Option<u32>,
        transform: Option<&RigidTransform>,
        normal: &Vector3<f64>,
    ) -> TextureBinding;

    /// Repairs known-broken tool textures in place.
    ///
    /// Returns the original material if it was replaced.
    fn fix_tool_texture(
        &mut self,
        _texture: &mut TextureBinding,
        _brush: usize,
        _side: usize,
    ) -> Option<String> {
        None
    }

    /// Called with the ID of every side written, e.g. to build cubemap side lists.
    fn register_side(&mut self, _texture: &TextureBinding, _side_id: u32) {}
}

impl<T: TextureResolver + ?Sized> TextureResolver for &mut T {
    fn resolve(
        &mut self,
        texinfo: Option<u32>,
        transform: Option<&RigidTransform>,
        normal: &Vector3<f64>,
    ) -> TextureBinding {
        (**self).resolve(texinfo, transform, normal)
    }

    fn fix_tool_texture(
        &mut self,
        texture: &mut TextureBinding,
        brush: usize,
        side: usize,
    ) -> Option<String> {
        (**self).fix_tool_texture(texture, brush, side)
    }

    fn register_side(&mut self, texture: &TextureBinding, side_id: u32) {
        (**self).register_side(texture, side_id);
    }
}

/// Maps texinfos to material names and world-aligns every face.
///
/// Faces of transformed brushes are aligned in their original position and
/// the axes follow the transform, so the texture stays locked to the face.
#[derive(Debug, Clone)]
pub struct AlignedTextures {
    default_material: String,
    materials: BTreeMap<u32, String>,
    scale: f64,
    lightmap_scale: u32,
    sides: BTreeMap<String, Vec<u32>>,
}

impl AlignedTextures {
    /// Resolver giving every side `default_material`.
    pub fn new(default_material: impl Into<String>) -> Self {
        Self {
            default_material: default_material.into(),
            materials: BTreeMap::new(),
            scale: 0.25,
            lightmap_scale: 16,
            sides: BTreeMap::new(),
        }
    }

    /// Uses `material` for sides with texinfo `texinfo`.
    pub fn with_material(mut self, texinfo: u32, material: impl Into<String>) -> Self {
        self.materials.insert(texinfo, material.into());
        self
    }

    /// Carries an axis through `transform`. For a moved point `R p + t` the
    /// texture coordinate equals the one of `p` before the move.
    fn locked_axis(&self, axis: Vector3<f64>, transform: Option<&RigidTransform>) -> TextureAxis {
        let (axis, shift) = match transform {
            Some(transform) => {
                let axis = transform.apply_vector(axis);
                (axis, -axis.dot(&transform.offset()) / self.scale)
            }
            None => (axis, 0.0),
        };
        TextureAxis {
            axis,
            shift,
            scale: self.scale,
        }
    }

    /// Side IDs written with `material`, in the order they were written.
    pub fn sides_with(&self, material: &str) -> &[u32] {
        self.sides.get(material).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Picks the world-aligned (u, v) axes for a face normal: floors and
/// ceilings project along Z, walls along whichever of X or Y they face most.
fn world_axes(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let (x, y, z) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    if z >= x && z >= y {
        (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
    } else if x >= y {
        (Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
    } else {
        (Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))
    }
}

impl TextureResolver for AlignedTextures {
    fn resolve(
        &mut self,
        texinfo: Option<u32>,
        transform: Option<&RigidTransform>,
        normal: &Vector3<f64>,
    ) -> TextureBinding {
        let material = texinfo
            .and_then(|t| self.materials.get(&t))
            .unwrap_or(&self.default_material)
            .clone();
        let (u, v) = match transform {
            Some(transform) => world_axes(&(transform.rotation().inverse() * normal)),
            None => world_axes(normal),
        };
        TextureBinding {
            material,
            uaxis: self.locked_axis(u, transform),
            vaxis: self.locked_axis(v, transform),
            lightmap_scale: self.lightmap_scale,
        }
    }

    fn register_side(&mut self, texture: &TextureBinding, side_id: u32) {
        self.sides
            .entry(texture.material.clone())
            .or_default()
            .push(side_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::BlockTree;
    use approx::assert_relative_eq;

    #[test]
    fn axis_formatting() {
        let axis = TextureAxis {
            axis: Vector3::new(1.0, 0.0, 0.0),
            shift: 16.0,
            scale: 0.25,
        };
        assert_eq!(axis.to_string(), "[1 0 0 16] 0.25");
    }

    #[test]
    fn resolves_material_by_texinfo() {
        let mut textures = AlignedTextures::new("DEV/DEV_MEASUREGENERIC01").with_material(2, "BRICK/BRICKWALL001");
        let up = Vector3::new(0.0, 0.0, 1.0);
        assert_eq!(textures.resolve(Some(2), None, &up).material, "BRICK/BRICKWALL001");
        assert_eq!(textures.resolve(Some(5), None, &up).material, "DEV/DEV_MEASUREGENERIC01");
        assert_eq!(textures.resolve(None, None, &up).material, "DEV/DEV_MEASUREGENERIC01");
    }

    #[test]
    fn world_alignment_by_dominant_axis() {
        let mut textures = AlignedTextures::new("X");
        let floor = textures.resolve(None, None, &Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(floor.vaxis.axis, Vector3::new(0.0, -1.0, 0.0));
        let wall = textures.resolve(None, None, &Vector3::new(0.9, 0.1, 0.0));
        assert_eq!(wall.uaxis.axis, Vector3::new(0.0, 1.0, 0.0));
        let other = textures.resolve(None, None, &Vector3::new(0.1, -0.9, 0.2));
        assert_eq!(other.uaxis.axis, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn translated_faces_keep_their_alignment() {
        let mut textures = AlignedTextures::new("X");
        let t = RigidTransform::translation(Vector3::new(32.0, 8.0, -4.0));
        let floor = textures.resolve(None, Some(&t), &Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(floor.uaxis.axis, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(floor.vaxis.axis, Vector3::new(0.0, -1.0, 0.0));
        // Texture coordinates are (axis . p) / scale + shift.
        assert_relative_eq!(floor.uaxis.shift, -128.0);
        assert_relative_eq!(floor.vaxis.shift, 32.0);
    }

    #[test]
    fn rotated_faces_carry_their_axes() {
        let mut textures = AlignedTextures::new("X");
        let t = RigidTransform::from_origin_angles(
            Vector3::new(0.0, 0.0, 64.0),
            Vector3::new(0.0, 90.0, 0.0),
        );
        // A +X wall turned to face +Y is still projected as an X wall.
        let wall = textures.resolve(None, Some(&t), &Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(wall.uaxis.axis, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(wall.vaxis.axis, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(wall.uaxis.shift, 0.0, epsilon = 1e-9);
        assert_relative_eq!(wall.vaxis.shift, 256.0, epsilon = 1e-9);

        // Any point keeps its texture coordinates across the move.
        let p = nalgebra::Point3::new(64.0, 12.0, 20.0);
        let moved = t.apply(p);
        let (u, _) = world_axes(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(
            wall.uaxis.axis.dot(&moved.coords) / 0.25 + wall.uaxis.shift,
            u.dot(&p.coords) / 0.25,
            epsilon = 1e-9
        );
    }

    #[test]
    fn register_side_groups_by_material() {
        let mut textures = AlignedTextures::new("A").with_material(1, "B");
        let up = Vector3::new(0.0, 0.0, 1.0);
        let a = textures.resolve(None, None, &up);
        let b = textures.resolve(Some(1), None, &up);
        textures.register_side(&a, 1);
        textures.register_side(&b, 2);
        textures.register_side(&a, 3);
        assert_eq!(textures.sides_with("A"), &[1, 3]);
        assert_eq!(textures.sides_with("B"), &[2]);
        assert!(textures.sides_with("C").is_empty());
    }

    #[test]
    fn writes_side_keys() {
        let mut textures = AlignedTextures::new("A");
        let binding = textures.resolve(None, None, &Vector3::new(0.0, 0.0, 1.0));
        let mut tree = BlockTree::new();
        tree.start("side");
        binding.write(&mut tree);
        tree.end("side");

        let side = &tree.roots()[0];
        assert_eq!(side.get("material"), Some(&Value::Text("A".into())));
        assert_eq!(side.get("uaxis"), Some(&Value::Text("[1 0 0 0] 0.25".into())));
        assert_eq!(side.get("lightmapscale"), Some(&Value::Int(16)));
    }
}
