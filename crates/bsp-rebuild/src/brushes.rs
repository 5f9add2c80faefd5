//! Rebuilding and writing whole brushes.
//!
//! [`BrushRebuilder`] ties the pieces together. On construction it walks the
//! spatial tree once for the world and once per model to learn which brushes
//! each owns. The `rebuild_*` entry points then reconstruct every side of a
//! brush, decide whether enough sides survived, and write a `solid` block.
//!
//! Brush states:
//!
//! ```text
//! unvisited -> sides evaluated -> emitted
//!                              -> skipped (Invalid | Uncompilable)
//! ```
//!
//! The decision depends only on how many sides were rebuilt. Skipped brushes
//! never take an ID.

use std::collections::BTreeMap;
use std::ops::Range;

use tracing::{debug, info, instrument, warn};

use crate::map::{Brush, BspSource, SurfaceFlags};
use crate::protection::ProtectionClassifier;
use crate::texture::TextureResolver;
use crate::tree::{BrushRangeVisitor, BrushSpan, NodeRef};
use crate::writer::{BlockWriter, Value};
use crate::{
    BrushSkip, IdAllocator, Plane3D, RebuildConfig, RigidTransform, SideError, SideWinding,
    SourceError, side_winding,
};

/// Fewest rebuilt sides a brush needs to be written.
pub const MIN_VALID_SIDES: usize = 3;

/// What happened to one brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushOutcome {
    /// Written with solid ID `id` and `sides` sides.
    Emitted { id: u32, sides: usize },
    Skipped(BrushSkip),
}

/// Counters of a rebuild run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub brushes_emitted: usize,
    pub brushes_invalid: usize,
    pub brushes_uncompilable: usize,
    pub sides_emitted: usize,
    pub sides_skipped: usize,
}

/// Collaborators receiving a rebuilder's output.
///
/// The same `ids` must be passed to every module writing geometry in a run.
pub struct Output<'o, W: ?Sized, T: ?Sized, P: ?Sized> {
    pub ids: &'o mut IdAllocator,
    pub writer: &'o mut W,
    pub textures: &'o mut T,
    pub protection: &'o P,
}

impl<'o, W, T, P> Output<'o, W, T, P>
where
    W: BlockWriter + ?Sized,
    T: TextureResolver + ?Sized,
    P: ProtectionClassifier + ?Sized,
{
    pub fn new(
        ids: &'o mut IdAllocator,
        writer: &'o mut W,
        textures: &'o mut T,
        protection: &'o P,
    ) -> Self {
        Self {
            ids,
            writer,
            textures,
            protection,
        }
    }
}

/// A side whose face was rebuilt.
#[derive(Debug, Clone, PartialEq)]
struct SideFace {
    index: usize,
    texinfo: Option<u32>,
    winding: SideWinding,
}

/// Result of rebuilding every side of a brush, before anything is written.
#[derive(Debug, Clone, PartialEq)]
struct BrushGeometry {
    faces: Vec<SideFace>,
    skipped: usize,
}

/// Rebuilds brushes of a compiled map and writes them as `solid` blocks.
pub struct BrushRebuilder<'a, S: ?Sized> {
    source: &'a S,
    config: &'a RebuildConfig,
    world_brushes: usize,
    model_spans: Vec<BrushSpan>,
    brush_ids: BTreeMap<usize, u32>,
    side_ids: BTreeMap<usize, u32>,
    stats: RebuildStats,
}

impl<'a, S: BspSource + ?Sized> BrushRebuilder<'a, S> {
    /// Creates a rebuilder and assigns brush spans to the world and every
    /// model by walking the spatial tree.
    pub fn new(source: &'a S, config: &'a RebuildConfig) -> Self {
        let tree = source.tree();
        let mut visitor = BrushRangeVisitor::new();

        let world = visitor.walk(tree, NodeRef::Node(0));
        let world_brushes = world.max().map_or(0, |max| max as usize + 1);

        let model_spans: Vec<BrushSpan> = source
            .models()
            .iter()
            .map(|model| visitor.walk(tree, model.head_node))
            .collect();

        info!(
            world_brushes,
            models = model_spans.len(),
            "assigned brushes to models"
        );
        for (model, span) in model_spans.iter().enumerate() {
            debug!(model, first = ?span.min(), count = span.len(), "model brushes");
        }

        Self {
            source,
            config,
            world_brushes,
            model_spans,
            brush_ids: BTreeMap::new(),
            side_ids: BTreeMap::new(),
            stats: RebuildStats::default(),
        }
    }

    /// Brushes reachable from `root`.
    pub fn brush_span(&self, root: NodeRef) -> BrushSpan {
        BrushRangeVisitor::new().walk(self.source.tree(), root)
    }

    /// Number of brushes owned by the world: one past the highest brush
    /// index under node 0.
    pub fn world_brushes(&self) -> usize {
        self.world_brushes
    }

    pub fn model_span(&self, model: usize) -> Option<BrushSpan> {
        self.model_spans.get(model).copied()
    }

    /// Solid ID written for brush `brush`, if it was emitted.
    pub fn brush_id(&self, brush: usize) -> Option<u32> {
        self.brush_ids.get(&brush).copied()
    }

    /// Side ID written for brush side `side`, if it was emitted.
    pub fn side_id(&self, side: usize) -> Option<u32> {
        self.side_ids.get(&side).copied()
    }

    pub fn stats(&self) -> RebuildStats {
        self.stats
    }

    /// Rebuilds brush `index` and writes it unless too few sides survived.
    ///
    /// Geometric failures never make this fail; only a read from the source
    /// does.
    pub fn rebuild_brush<W, T, P>(
        &mut self,
        index: usize,
        transform: Option<&RigidTransform>,
        out: &mut Output<'_, W, T, P>,
    ) -> Result<BrushOutcome, SourceError>
    where
        W: BlockWriter + ?Sized,
        T: TextureResolver + ?Sized,
        P: ProtectionClassifier + ?Sized,
    {
        let geometry = self.reconstruct(index, transform)?;
        self.emit(index, geometry, transform, out)
    }

    /// Rebuilds every brush in `range`, returning how many were written.
    pub fn rebuild_range<W, T, P>(
        &mut self,
        range: Range<usize>,
        transform: Option<&RigidTransform>,
        out: &mut Output<'_, W, T, P>,
    ) -> Result<usize, SourceError>
    where
        W: BlockWriter + ?Sized,
        T: TextureResolver + ?Sized,
        P: ProtectionClassifier + ?Sized,
    {
        let mut emitted = 0;
        for index in range {
            if let BrushOutcome::Emitted { .. } = self.rebuild_brush(index, transform, out)? {
                emitted += 1;
            }
        }
        Ok(emitted)
    }

    /// Rebuilds the brushes of model `model`.
    ///
    /// Returns `Ok(false)` and writes nothing when the model does not exist.
    pub fn rebuild_model<W, T, P>(
        &mut self,
        model: usize,
        transform: Option<&RigidTransform>,
        out: &mut Output<'_, W, T, P>,
    ) -> Result<bool, SourceError>
    where
        W: BlockWriter + ?Sized,
        T: TextureResolver + ?Sized,
        P: ProtectionClassifier + ?Sized,
    {
        let Some(span) = self.model_span(model) else {
            warn!(model, models = self.model_spans.len(), "invalid model index");
            return Ok(false);
        };
        self.rebuild_range(span.range(), transform, out)?;
        Ok(true)
    }

    /// Rebuilds all world brushes, leaving out those the configured
    /// [`WorldPolicy`](crate::WorldPolicy) reserves for brush entities.
    #[instrument(skip_all, fields(world_brushes = self.world_brushes))]
    pub fn rebuild_world<W, T, P>(
        &mut self,
        out: &mut Output<'_, W, T, P>,
    ) -> Result<RebuildStats, SourceError>
    where
        W: BlockWriter + ?Sized,
        T: TextureResolver + ?Sized,
        P: ProtectionClassifier + ?Sized,
    {
        let candidates = self.world_candidates()?;
        info!(brushes = candidates.len(), "rebuilding world brushes");

        for index in candidates {
            self.rebuild_brush(index, None, out)?;
        }

        self.log_finished();
        Ok(self.stats)
    }

    /// World brush indices left after applying the world policy.
    fn world_candidates(&self) -> Result<Vec<usize>, SourceError> {
        let policy = self.config.world;
        let mut candidates = Vec::with_capacity(self.world_brushes);
        let mut reserved = 0;

        for index in 0..self.world_brushes {
            let brush = self.source.brush(index)?;
            // Non-solid detail brushes (e.g. water) stay in the world.
            let detail = policy.skip_detail && brush.is_solid() && brush.is_detail();
            let areaportal = policy.skip_areaportals && brush.is_areaportal();
            if detail || areaportal {
                reserved += 1;
                continue;
            }
            candidates.push(index);
        }

        if reserved > 0 {
            debug!(reserved, "left brushes for brush entities");
        }
        Ok(candidates)
    }

    fn log_finished(&self) {
        let stats = &self.stats;
        info!(
            emitted = stats.brushes_emitted,
            invalid = stats.brushes_invalid,
            uncompilable = stats.brushes_uncompilable,
            sides = stats.sides_emitted,
            sides_skipped = stats.sides_skipped,
            "finished rebuilding brushes"
        );
    }

    /// Rebuilds the face of every non-bevel side of brush `index`.
    ///
    /// Reads the source but writes nothing, so it can run for many brushes
    /// at once.
    fn reconstruct(
        &self,
        index: usize,
        transform: Option<&RigidTransform>,
    ) -> Result<BrushGeometry, SourceError> {
        let source = self.source;
        let brush = source.brush(index)?;

        let mut sides: Vec<(usize, Option<u32>, &Plane3D)> = Vec::with_capacity(brush.sides().len());
        for side_index in brush.sides() {
            let side = source.brush_side(side_index)?;
            if side.bevel {
                continue;
            }
            sides.push((side_index, side.texinfo, source.plane(side.plane as usize)?));
        }

        let mut faces = Vec::with_capacity(sides.len());
        let mut skipped = 0;
        for (i, &(side_index, texinfo, plane)) in sides.iter().enumerate() {
            let clip_planes = sides
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &(_, _, p))| p);

            match side_winding(plane, clip_planes, transform, &self.config.geometry) {
                Ok(winding) => faces.push(SideFace {
                    index: side_index,
                    texinfo,
                    winding,
                }),
                Err(err) => {
                    skipped += 1;
                    self.log_side_skip(index, side_index, &err);
                }
            }
        }

        Ok(BrushGeometry { faces, skipped })
    }

    fn log_side_skip(&self, brush: usize, side: usize, err: &SideError) {
        if self.config.debug {
            warn!(brush, side, "skipped side: {err}");
        } else {
            debug!(brush, side, "skipped side: {err}");
        }
    }

    /// Writes a reconstructed brush, or records why it was skipped.
    fn emit<W, T, P>(
        &mut self,
        index: usize,
        geometry: BrushGeometry,
        transform: Option<&RigidTransform>,
        out: &mut Output<'_, W, T, P>,
    ) -> Result<BrushOutcome, SourceError>
    where
        W: BlockWriter + ?Sized,
        T: TextureResolver + ?Sized,
        P: ProtectionClassifier + ?Sized,
    {
        let source = self.source;
        let brush = source.brush(index)?;
        self.stats.sides_skipped += geometry.skipped;

        let valid = geometry.faces.len();
        if valid == 0 {
            return Ok(self.skip(index, BrushSkip::Invalid));
        }
        if valid < MIN_VALID_SIDES {
            return Ok(self.skip(index, BrushSkip::Uncompilable { valid }));
        }

        // Texinfo reads can fail; do them before the block is opened.
        let mut flags = Vec::with_capacity(valid);
        for face in &geometry.faces {
            let texinfo_flags = match (self.config.debug, face.texinfo) {
                (true, Some(texinfo)) => Some(source.texinfo(texinfo as usize)?.flags),
                _ => None,
            };
            flags.push(texinfo_flags);
        }

        let id = out.ids.next_solid_id();
        self.brush_ids.insert(index, id);

        out.writer.start("solid");
        out.writer.put("id", id.into());

        if self.config.debug {
            out.writer.start("bspsrc_debug");
            out.writer.put("brush_index", index.into());
            out.writer.put("brush_contents", brush.contents.to_string().into());
            out.writer.end("bspsrc_debug");
        }

        for (face, flags) in geometry.faces.iter().zip(flags) {
            self.emit_side(index, face, flags, transform, out);
        }

        self.emit_visgroup(brush, out);

        out.writer.end("solid");

        self.stats.brushes_emitted += 1;
        self.stats.sides_emitted += valid;
        Ok(BrushOutcome::Emitted { id, sides: valid })
    }

    fn skip(&mut self, index: usize, reason: BrushSkip) -> BrushOutcome {
        match reason {
            BrushSkip::Invalid => self.stats.brushes_invalid += 1,
            BrushSkip::Uncompilable { .. } => self.stats.brushes_uncompilable += 1,
        }
        warn!(brush = index, "skipped brush: {reason}");
        BrushOutcome::Skipped(reason)
    }

    fn emit_side<W, T, P>(
        &mut self,
        brush: usize,
        face: &SideFace,
        texinfo_flags: Option<SurfaceFlags>,
        transform: Option<&RigidTransform>,
        out: &mut Output<'_, W, T, P>,
    ) where
        W: BlockWriter + ?Sized,
        T: TextureResolver + ?Sized,
        P: ProtectionClassifier + ?Sized,
    {
        let winding = &face.winding;
        let normal = winding.normal();

        let mut texture = out.textures.resolve(face.texinfo, transform, &normal);
        let mut original_material = None;
        if let Some(material) = self.config.face_texture() {
            texture.material = material.to_owned();
        } else if self.config.fix_tool_textures {
            original_material = out.textures.fix_tool_texture(&mut texture, brush, face.index);
        }

        let id = out.ids.next_side_id();
        out.textures.register_side(&texture, id);
        self.side_ids.insert(face.index, id);

        out.writer.start("side");
        out.writer.put("id", id.into());

        if self.config.debug {
            out.writer.start("bspsrc_debug");
            out.writer.put("brushside_index", face.index.into());
            out.writer.put("normal", normal.into());
            out.writer.put("winding", winding.polygon().to_string().into());
            if let Some(material) = original_material {
                out.writer.put("original_material", material.into());
            }
            if let Some(texinfo) = face.texinfo {
                out.writer.put("texinfo_index", texinfo.into());
            }
            if let Some(flags) = texinfo_flags {
                out.writer.put("texinfo_flags", flags.to_string().into());
            }
            out.writer.end("bspsrc_debug");
        }

        out.writer.put("plane", winding.plane_points().into());
        out.writer.put("smoothing_groups", Value::Int(0));
        texture.write(&mut *out.writer);

        out.writer.end("side");
    }

    /// Puts brushes added by protection tools into their own visgroup.
    fn emit_visgroup<W, T, P>(&self, brush: &Brush, out: &mut Output<'_, W, T, P>)
    where
        W: BlockWriter + ?Sized,
        T: TextureResolver + ?Sized,
        P: ProtectionClassifier + ?Sized,
    {
        if brush.is_detail() || !out.protection.is_protected_brush(brush) {
            return;
        }
        out.writer.start("editor");
        out.writer.put("visgroup", self.config.protector_visgroup.as_str().into());
        out.writer.end("editor");
    }
}

#[cfg(feature = "parallel")]
mod parallel {
    use rayon::prelude::*;

    use super::*;

    /// Below this many brushes the pool costs more than it saves.
    const PARALLEL_BRUSH_THRESHOLD: usize = 64;

    impl<S: BspSource + Sync + ?Sized> BrushRebuilder<'_, S> {
        /// Like [`Self::rebuild_world`], with geometry rebuilt on the rayon
        /// pool. Blocks are written and IDs assigned in ascending brush
        /// order, so the output is identical.
        #[instrument(skip_all, fields(world_brushes = self.world_brushes))]
        pub fn rebuild_world_parallel<W, T, P>(
            &mut self,
            out: &mut Output<'_, W, T, P>,
        ) -> Result<RebuildStats, SourceError>
        where
            W: BlockWriter + ?Sized,
            T: TextureResolver + ?Sized,
            P: ProtectionClassifier + ?Sized,
        {
            let candidates = self.world_candidates()?;
            info!(brushes = candidates.len(), "rebuilding world brushes in parallel");

            self.rebuild_indices_parallel(&candidates, None, out)?;

            self.log_finished();
            Ok(self.stats)
        }

        /// Like [`Self::rebuild_range`], with geometry rebuilt on the rayon
        /// pool.
        pub fn rebuild_range_parallel<W, T, P>(
            &mut self,
            range: Range<usize>,
            transform: Option<&RigidTransform>,
            out: &mut Output<'_, W, T, P>,
        ) -> Result<usize, SourceError>
        where
            W: BlockWriter + ?Sized,
            T: TextureResolver + ?Sized,
            P: ProtectionClassifier + ?Sized,
        {
            let indices: Vec<usize> = range.collect();
            self.rebuild_indices_parallel(&indices, transform, out)
        }

        fn rebuild_indices_parallel<W, T, P>(
            &mut self,
            indices: &[usize],
            transform: Option<&RigidTransform>,
            out: &mut Output<'_, W, T, P>,
        ) -> Result<usize, SourceError>
        where
            W: BlockWriter + ?Sized,
            T: TextureResolver + ?Sized,
            P: ProtectionClassifier + ?Sized,
        {
            let geometry: Vec<BrushGeometry> = if indices.len() >= PARALLEL_BRUSH_THRESHOLD {
                let this = &*self;
                indices
                    .par_iter()
                    .map(|&index| this.reconstruct(index, transform))
                    .collect::<Result<_, _>>()?
            } else {
                indices
                    .iter()
                    .map(|&index| self.reconstruct(index, transform))
                    .collect::<Result<_, _>>()?
            };

            let mut emitted = 0;
            for (&index, geometry) in indices.iter().zip(geometry) {
                if let BrushOutcome::Emitted { .. } = self.emit(index, geometry, transform, out)? {
                    emitted += 1;
                }
            }
            Ok(emitted)
        }
    }
}
