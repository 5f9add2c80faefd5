//! Content and surface flags stored in compiled maps.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Brush content flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Contents: u32 {
        const SOLID        = 0x0000_0001;
        const WINDOW       = 0x0000_0002;
        const AUX          = 0x0000_0004;
        const GRATE        = 0x0000_0008;
        const SLIME        = 0x0000_0010;
        const WATER        = 0x0000_0020;
        const BLOCKLOS     = 0x0000_0040;
        const OPAQUE       = 0x0000_0080;
        const AREAPORTAL   = 0x0000_8000;
        const PLAYERCLIP   = 0x0001_0000;
        const MONSTERCLIP  = 0x0002_0000;
        const ORIGIN       = 0x0100_0000;
        const MONSTER      = 0x0200_0000;
        const DEBRIS       = 0x0400_0000;
        const DETAIL       = 0x0800_0000;
        const TRANSLUCENT  = 0x1000_0000;
        const LADDER       = 0x2000_0000;
        const HITBOX       = 0x4000_0000;

        // Keep bits we have no name for.
        const _ = !0;
    }
}

bitflags! {
    /// Surface flags of a texture info.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SurfaceFlags: u32 {
        const LIGHT     = 0x0001;
        const SKY2D     = 0x0002;
        const SKY       = 0x0004;
        const WARP      = 0x0008;
        const TRANS     = 0x0010;
        const NOPORTAL  = 0x0020;
        const TRIGGER   = 0x0040;
        const NODRAW    = 0x0080;
        const HINT      = 0x0100;
        const SKIP      = 0x0200;
        const NOLIGHT   = 0x0400;
        const BUMPLIGHT = 0x0800;
        const NOSHADOWS = 0x1000;
        const NODECALS  = 0x2000;
        const NOCHOP    = 0x4000;
        const HITBOX    = 0x8000;

        const _ = !0;
    }
}

impl fmt::Display for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl fmt::Display for SurfaceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}
