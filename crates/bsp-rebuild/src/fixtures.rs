//! In-memory maps shared by the unit tests.

use nalgebra::Vector3;

use crate::map::{Brush, BrushSide, Contents, MapData, Model, SurfaceFlags, TexInfo};
use crate::tree::{NodeRef, SpatialTree, TreeLeaf, TreeNode};
use crate::Plane3D;

/// Installs a test-writer subscriber so `tracing` output shows up for
/// failing tests. Safe to call from every test.
pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Outward planes of the box `min..max`: +X, -X, +Y, -Y, +Z, -Z.
pub(crate) fn box_planes(min: [f64; 3], max: [f64; 3]) -> Vec<Plane3D> {
    let mut planes = Vec::new();
    for axis in 0..3 {
        let mut n = Vector3::zeros();
        n[axis] = 1.0;
        planes.push(Plane3D::new(n, max[axis]));
        planes.push(Plane3D::new(-n, -min[axis]));
    }
    planes
}

pub(crate) fn leaf(brushes: &[u32]) -> TreeLeaf {
    TreeLeaf {
        brushes: brushes.to_vec(),
    }
}

pub(crate) fn node(front: NodeRef, back: NodeRef) -> TreeNode {
    TreeNode {
        plane: 0,
        children: [front, back],
    }
}

/// Builds a [`MapData`] brush by brush.
pub(crate) struct MapBuilder {
    map: MapData,
}

impl MapBuilder {
    pub(crate) fn new() -> Self {
        Self {
            map: MapData {
                texinfos: vec![TexInfo {
                    flags: SurfaceFlags::empty(),
                    texdata: 0,
                }],
                ..MapData::default()
            },
        }
    }

    /// Adds a brush bounded by `sides` (plane, bevel) and returns its index.
    pub(crate) fn brush(&mut self, sides: &[(Plane3D, bool)], contents: Contents) -> u32 {
        let first_side = self.map.brush_sides.len() as u32;
        for (plane, bevel) in sides {
            self.map.brush_sides.push(BrushSide {
                plane: self.map.planes.len() as u32,
                texinfo: Some(0),
                bevel: *bevel,
            });
            self.map.planes.push(plane.clone());
        }
        self.map.brushes.push(Brush {
            first_side,
            num_sides: sides.len() as u32,
            contents,
        });
        (self.map.brushes.len() - 1) as u32
    }

    /// Adds an axis-aligned box brush without bevels.
    pub(crate) fn cube(&mut self, min: [f64; 3], max: [f64; 3], contents: Contents) -> u32 {
        let sides: Vec<_> = box_planes(min, max).into_iter().map(|p| (p, false)).collect();
        self.brush(&sides, contents)
    }

    pub(crate) fn tree(&mut self, nodes: Vec<TreeNode>, leaves: Vec<TreeLeaf>) -> &mut Self {
        self.map.tree = SpatialTree::new(nodes, leaves);
        self
    }

    pub(crate) fn model(&mut self, head_node: NodeRef) -> &mut Self {
        self.map.models.push(Model { head_node });
        self
    }

    pub(crate) fn build(&mut self) -> MapData {
        std::mem::take(&mut self.map)
    }
}
