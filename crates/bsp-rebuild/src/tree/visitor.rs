//! Visitor pattern for spatial tree walks.
//!
//! Visitors allow custom processing of leaves during a walk without coupling
//! the traversal to a specific use.

/// Visitor for processing leaves during a [`SpatialTree::walk`].
///
/// [`SpatialTree::walk`]: super::SpatialTree::walk
pub trait TreeVisitor {
    /// Called once for every leaf reached, with the brushes touching it.
    fn visit_leaf(&mut self, leaf: usize, brushes: &[u32]);
}

/// A visitor that calls a closure for each leaf.
pub struct FnVisitor<F>
where
    F: FnMut(usize, &[u32]),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(usize, &[u32]),
{
    /// Creates a new visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> TreeVisitor for FnVisitor<F>
where
    F: FnMut(usize, &[u32]),
{
    fn visit_leaf(&mut self, leaf: usize, brushes: &[u32]) {
        (self.func)(leaf, brushes);
    }
}
