//! Error types for brush reconstruction.

use std::error::Error;

use nalgebra::Point3;
use thiserror::Error;

/// Why a single brush side produced no usable face.
///
/// These are local and recoverable: the side is skipped and the remaining
/// sides of the brush are still reconstructed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SideError {
    #[error("no vertices")]
    EmptyPolygon,

    #[error("less than 3 vertices (got {vertices})")]
    DegeneratePolygon { vertices: usize },

    #[error("too big (coordinate {coord})")]
    OversizedPolygon { coord: f64 },

    #[error("invalid plane")]
    InvalidPlanePoints,

    #[error("duplicate plane point ({} {} {})", .point.x, .point.y, .point.z)]
    DuplicatePlanePoint { point: Point3<f64> },
}

/// Why a whole brush was not emitted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BrushSkip {
    /// Every side failed to reconstruct.
    #[error("no valid sides")]
    Invalid,

    /// Too few sides survived to close a convex volume safely.
    #[error("only {valid} valid sides, at least 3 required")]
    Uncompilable { valid: usize },
}

/// A read from the compiled map failed.
///
/// Unlike [`SideError`] and [`BrushSkip`], these abort the run: the map is
/// truncated or corrupt and nothing downstream can be trusted.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{lump} index {index} out of range ({len} entries)")]
    IndexOutOfRange {
        lump: &'static str,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn Error + Send + Sync>),
}
