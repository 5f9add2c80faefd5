//! Read-only access to the decoded tables of a compiled map.
//!
//! Byte-level parsing lives outside this crate. Whatever does it exposes the
//! tables through [`BspSource`]; [`MapData`] is a plain in-memory
//! implementation.

mod brush;
mod flags;

pub use brush::{Brush, BrushSide, TexInfo};
pub use flags::{Contents, SurfaceFlags};

use crate::tree::{NodeRef, SpatialTree};
use crate::{Plane3D, SourceError};

/// The world or a brush entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Root of this model's subtree in the spatial tree.
    pub head_node: NodeRef,
}

/// Tables of a compiled map needed to rebuild brushes.
///
/// Lookups return [`SourceError`] when an index is out of range: the map is
/// corrupt and the run cannot continue.
pub trait BspSource {
    fn plane(&self, index: usize) -> Result<&Plane3D, SourceError>;
    fn brush(&self, index: usize) -> Result<&Brush, SourceError>;
    fn brush_side(&self, index: usize) -> Result<&BrushSide, SourceError>;
    fn texinfo(&self, index: usize) -> Result<&TexInfo, SourceError>;

    /// All models. The first is the world.
    fn models(&self) -> &[Model];

    fn tree(&self) -> &SpatialTree;
}

/// A compiled map held in memory.
#[derive(Debug, Clone, Default)]
pub struct MapData {
    pub planes: Vec<Plane3D>,
    pub brushes: Vec<Brush>,
    pub brush_sides: Vec<BrushSide>,
    pub texinfos: Vec<TexInfo>,
    pub models: Vec<Model>,
    pub tree: SpatialTree,
}

fn lookup<'a, T>(table: &'a [T], lump: &'static str, index: usize) -> Result<&'a T, SourceError> {
    table.get(index).ok_or(SourceError::IndexOutOfRange {
        lump,
        index,
        len: table.len(),
    })
}

impl BspSource for MapData {
    fn plane(&self, index: usize) -> Result<&Plane3D, SourceError> {
        lookup(&self.planes, "planes", index)
    }

    fn brush(&self, index: usize) -> Result<&Brush, SourceError> {
        lookup(&self.brushes, "brushes", index)
    }

    fn brush_side(&self, index: usize) -> Result<&BrushSide, SourceError> {
        lookup(&self.brush_sides, "brush sides", index)
    }

    fn texinfo(&self, index: usize) -> Result<&TexInfo, SourceError> {
        lookup(&self.texinfos, "texinfos", index)
    }

    fn models(&self) -> &[Model] {
        &self.models
    }

    fn tree(&self) -> &SpatialTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn out_of_range_lookup_names_the_table() {
        let map = MapData::default();
        let err = map.brush(3).unwrap_err();
        assert!(matches!(
            err,
            SourceError::IndexOutOfRange { lump: "brushes", index: 3, len: 0 }
        ));
    }

    #[test]
    fn lookup_returns_entry() {
        let map = MapData {
            planes: vec![Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 16.0)],
            ..MapData::default()
        };
        assert_eq!(map.plane(0).unwrap().offset(), 16.0);
    }
}
