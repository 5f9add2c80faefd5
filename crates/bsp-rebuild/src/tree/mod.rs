//! The compiled map's spatial partition tree.
//!
//! The rebuilder only uses the tree to recover which contiguous block of
//! brushes belongs to which model: each model's head node is walked and the
//! brush indices referenced by its leaves are folded into a [`BrushSpan`].
//!
//! # Architecture
//!
//! - [`SpatialTree`]: flat node and leaf arrays, indexed by [`NodeRef`]
//! - [`TreeVisitor`]: visitor trait called for every leaf of a walk
//! - [`BrushRangeVisitor`]: visitor computing the brush span of a subtree

mod limit;
mod node;
mod visitor;

pub use limit::{BrushRangeVisitor, BrushSpan};
pub use node::{NodeRef, SpatialTree, TreeLeaf, TreeNode, WalkState};
pub use visitor::{FnVisitor, TreeVisitor};
