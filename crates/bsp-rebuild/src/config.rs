//! Reconstruction settings.

use serde::{Deserialize, Serialize};

/// Numeric tolerances for rebuilding side windings.
///
/// The defaults are tuned against Source-engine maps; other games may need
/// different values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Vertices closer than this are merged after clipping.
    pub degenerate_epsilon: f64,
    /// Points within this distance of a clip plane count as on it.
    pub clip_epsilon: f64,
    /// Windings with any coordinate beyond this magnitude are rejected.
    pub max_coord: f64,
    /// Half size of the square each side's winding starts from. Must be
    /// larger than `max_coord`.
    pub seed_extent: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            degenerate_epsilon: 0.1,
            clip_epsilon: 0.01,
            max_coord: 32768.0,
            seed_extent: 65536.0,
        }
    }
}

/// Which world brushes are left for the entity rebuilder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldPolicy {
    /// Skip solid detail brushes; they are written as `func_detail` elsewhere.
    pub skip_detail: bool,
    /// Skip areaportal brushes; they are written as `func_areaportal` elsewhere.
    pub skip_areaportals: bool,
}

/// Settings for a brush reconstruction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuildConfig {
    pub geometry: GeometrySettings,
    /// Write `bspsrc_debug` blocks and log every skipped side at warn level.
    pub debug: bool,
    /// Replace every face material with this one. An empty name means no
    /// override.
    pub face_texture: Option<String>,
    /// Let the texture resolver repair broken tool textures.
    pub fix_tool_textures: bool,
    /// Policy used by the world pass.
    pub world: WorldPolicy,
    /// Visgroup that protected brushes are put in.
    pub protector_visgroup: String,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            geometry: GeometrySettings::default(),
            debug: false,
            face_texture: None,
            fix_tool_textures: true,
            world: WorldPolicy {
                skip_detail: true,
                skip_areaportals: true,
            },
            protector_visgroup: "VMEX protector brushes".to_owned(),
        }
    }
}

impl RebuildConfig {
    /// The face material override, if one is set and not empty.
    pub fn face_texture(&self) -> Option<&str> {
        self.face_texture.as_deref().filter(|name| !name.is_empty())
    }
}
