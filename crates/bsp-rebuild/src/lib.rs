//! Rebuilds editable brushes from compiled BSP maps.
//!
//! A compiled map stores each brush only as the planes bounding it. This
//! crate recovers the faces of those brushes by clipping, decides which
//! brushes belong to the world and which to brush entities by walking the
//! spatial tree, and writes the result as `solid` blocks of the editor's map
//! format.
//!
//! Reading the map file, resolving textures and writing entities are left to
//! collaborators behind [`map::BspSource`], [`texture::TextureResolver`],
//! [`protection::ProtectionClassifier`] and [`writer::BlockWriter`].
//!
//! ```no_run
//! use bsp_rebuild::map::MapData;
//! use bsp_rebuild::protection::NoProtection;
//! use bsp_rebuild::texture::AlignedTextures;
//! use bsp_rebuild::writer::BlockTree;
//! use bsp_rebuild::{BrushRebuilder, IdAllocator, Output, RebuildConfig};
//!
//! # fn load() -> MapData { MapData::default() }
//! let map = load();
//! let config = RebuildConfig::default();
//! let mut ids = IdAllocator::new();
//! let mut blocks = BlockTree::new();
//! let mut textures = AlignedTextures::new("DEV/DEV_MEASUREGENERIC01");
//!
//! let mut rebuilder = BrushRebuilder::new(&map, &config);
//! let mut out = Output::new(&mut ids, &mut blocks, &mut textures, &NoProtection);
//! let stats = rebuilder.rebuild_world(&mut out)?;
//! println!("{} brushes\n{blocks}", stats.brushes_emitted);
//! # Ok::<(), bsp_rebuild::SourceError>(())
//! ```

mod brushes;
mod config;
mod cuttable;
mod error;
mod ids;
mod plane;
mod polygon;
mod rectangle;
mod transform;
mod triangle;
mod winding;

pub mod map;
pub mod protection;
pub mod texture;
pub mod tree;
pub mod writer;

#[cfg(test)]
mod fixtures;

pub use brushes::{BrushOutcome, BrushRebuilder, MIN_VALID_SIDES, Output, RebuildStats};
pub use config::{GeometrySettings, RebuildConfig, WorldPolicy};
pub use cuttable::Cuttable;
pub use error::{BrushSkip, SideError, SourceError};
pub use ids::IdAllocator;
pub use plane::{Classification, Plane3D, PlaneSide};
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use transform::RigidTransform;
pub use triangle::Triangle;
pub use winding::{SideWinding, side_winding};
