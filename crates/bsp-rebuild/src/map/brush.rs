//! Brush, brush side and texture info records.

use std::ops::Range;

use super::{Contents, SurfaceFlags};

/// A convex volume, bounded by the sides `first_side..first_side + num_sides`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    pub first_side: u32,
    pub num_sides: u32,
    pub contents: Contents,
}

impl Brush {
    /// Indices of this brush's sides in the side table.
    pub fn sides(&self) -> Range<usize> {
        let first = self.first_side as usize;
        first..first + self.num_sides as usize
    }

    pub fn is_solid(&self) -> bool {
        self.contents.contains(Contents::SOLID)
    }

    pub fn is_detail(&self) -> bool {
        self.contents.contains(Contents::DETAIL)
    }

    pub fn is_areaportal(&self) -> bool {
        self.contents.contains(Contents::AREAPORTAL)
    }
}

/// One bounding half-space of a brush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrushSide {
    /// Index into the plane table. The plane faces out of the brush.
    pub plane: u32,
    /// Index into the texture info table, `None` for untextured sides.
    pub texinfo: Option<u32>,
    /// Added by the compiler to round off collision hulls. Never a real face.
    pub bevel: bool,
}

/// Texture mapping of a side, as far as the brush rebuilder cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexInfo {
    pub flags: SurfaceFlags,
    /// Index into the texture data table, resolved by the texture collaborator.
    pub texdata: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides_range() {
        let brush = Brush {
            first_side: 12,
            num_sides: 6,
            contents: Contents::SOLID,
        };
        assert_eq!(brush.sides(), 12..18);
    }

    #[test]
    fn content_queries() {
        let brush = Brush {
            first_side: 0,
            num_sides: 0,
            contents: Contents::SOLID | Contents::DETAIL,
        };
        assert!(brush.is_solid());
        assert!(brush.is_detail());
        assert!(!brush.is_areaportal());
    }
}
