//! Brush ranges recovered from the spatial tree.

use std::ops::Range;

use tracing::debug;

use super::node::{NodeRef, SpatialTree, WalkState};
use super::visitor::TreeVisitor;

/// An inclusive span of brush indices, possibly empty.
///
/// The compiler lays out each model's brushes contiguously, in the order their
/// leaves are reached, so the lowest and highest brush index under a model's
/// head node bound exactly the brushes it owns. This also catches brushes that
/// contribute no faces and would be missed by face-based guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrushSpan {
    min: u32,
    max: u32,
}

impl BrushSpan {
    /// The span containing no brushes.
    pub const EMPTY: Self = Self {
        min: u32::MAX,
        max: 0,
    };

    /// Span from `min` to `max`, both inclusive. Empty when `min > max`.
    pub fn new(min: u32, max: u32) -> Self {
        if min > max { Self::EMPTY } else { Self { min, max } }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Lowest brush index, if any.
    pub fn min(&self) -> Option<u32> {
        (!self.is_empty()).then_some(self.min)
    }

    /// Highest brush index, if any.
    pub fn max(&self) -> Option<u32> {
        (!self.is_empty()).then_some(self.max)
    }

    /// Number of brushes in the span.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max - self.min) as usize + 1
        }
    }

    /// The span as a half-open index range. Empty spans give `0..0`.
    pub fn range(&self) -> Range<usize> {
        if self.is_empty() {
            0..0
        } else {
            self.min as usize..self.max as usize + 1
        }
    }

    /// Widens the span to cover `brush`.
    pub fn include(&mut self, brush: u32) {
        self.min = self.min.min(brush);
        self.max = self.max.max(brush);
    }
}

impl Default for BrushSpan {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Visitor accumulating the span of brushes referenced by the leaves it sees.
///
/// Reusable: [`walk`](Self::walk) resets the span and keeps the tree walk's
/// scratch buffers, so walking many models of one map stays cheap.
#[derive(Debug, Clone, Default)]
pub struct BrushRangeVisitor {
    span: BrushSpan,
    state: WalkState,
}

impl BrushRangeVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything seen so far.
    pub fn reset(&mut self) {
        self.span = BrushSpan::EMPTY;
    }

    /// Span accumulated so far.
    pub fn span(&self) -> BrushSpan {
        self.span
    }

    /// Resets, walks the subtree under `root` and returns its brush span.
    pub fn walk(&mut self, tree: &SpatialTree, root: NodeRef) -> BrushSpan {
        self.reset();
        let mut state = std::mem::take(&mut self.state);
        tree.walk_with(root, self, &mut state);
        self.state = state;
        debug!(?root, span = ?self.span.range(), "walked tree");
        self.span
    }
}

impl TreeVisitor for BrushRangeVisitor {
    fn visit_leaf(&mut self, _leaf: usize, brushes: &[u32]) {
        for &brush in brushes {
            self.span.include(brush);
        }
    }
}
