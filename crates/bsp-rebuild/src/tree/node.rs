//! Flat storage for the compiled spatial tree.

use tracing::warn;

use super::visitor::TreeVisitor;

/// Reference from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Node(usize),
    Leaf(usize),
}

impl NodeRef {
    /// Decodes a child index as stored in compiled maps: non-negative values
    /// are node indices, negative values encode leaf `-(index + 1)`.
    pub fn from_raw(raw: i32) -> Self {
        if raw >= 0 {
            NodeRef::Node(raw as usize)
        } else {
            NodeRef::Leaf((-(raw as i64) - 1) as usize)
        }
    }
}

/// An internal node: a splitting plane and two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub plane: u32,
    /// Front child, then back child.
    pub children: [NodeRef; 2],
}

/// A leaf: the brushes that touch its volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeLeaf {
    pub brushes: Vec<u32>,
}

/// The spatial tree of a compiled map, stored as flat node and leaf arrays.
///
/// Every model's head node indexes into the same node array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpatialTree {
    nodes: Vec<TreeNode>,
    leaves: Vec<TreeLeaf>,
}

impl SpatialTree {
    /// Creates a tree from its node and leaf arrays.
    pub fn new(nodes: Vec<TreeNode>, leaves: Vec<TreeLeaf>) -> Self {
        Self { nodes, leaves }
    }

    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    #[inline]
    pub fn leaves(&self) -> &[TreeLeaf] {
        &self.leaves
    }

    /// Visits every leaf reachable from `root`, depth first, front child
    /// before back child.
    ///
    /// Child references pointing outside the arrays are logged and skipped,
    /// and each node is entered at most once, so a corrupt tree still yields
    /// a finite walk.
    pub fn walk<V: TreeVisitor>(&self, root: NodeRef, visitor: &mut V) {
        self.walk_with(root, visitor, &mut WalkState::default());
    }

    /// Like [`Self::walk`], reusing the scratch buffers in `state`.
    ///
    /// After the first walk over this tree, a walk costs only as much as the
    /// nodes it reaches.
    pub fn walk_with<V: TreeVisitor>(&self, root: NodeRef, visitor: &mut V, state: &mut WalkState) {
        state.begin(self.nodes.len());
        state.stack.push(root);

        while let Some(next) = state.stack.pop() {
            match next {
                NodeRef::Node(index) => {
                    let Some(node) = self.nodes.get(index) else {
                        warn!(node = index, nodes = self.nodes.len(), "tree references missing node");
                        continue;
                    };
                    if !state.enter(index) {
                        warn!(node = index, "tree node reached twice, skipping");
                        continue;
                    }
                    // Back is pushed first so front is visited first.
                    state.stack.push(node.children[1]);
                    state.stack.push(node.children[0]);
                }
                NodeRef::Leaf(index) => match self.leaves.get(index) {
                    Some(leaf) => visitor.visit_leaf(index, &leaf.brushes),
                    None => {
                        warn!(leaf = index, leaves = self.leaves.len(), "tree references missing leaf");
                    }
                },
            }
        }
    }
}

/// Scratch buffers for [`SpatialTree::walk_with`].
///
/// Nodes are marked with the number of the walk that entered them, so
/// starting a walk does not clear the marks.
#[derive(Debug, Clone, Default)]
pub struct WalkState {
    stack: Vec<NodeRef>,
    marks: Vec<u32>,
    generation: u32,
}

impl WalkState {
    fn begin(&mut self, nodes: usize) {
        self.stack.clear();
        if self.marks.len() < nodes {
            self.marks.resize(nodes, 0);
        }
        self.generation = match self.generation.checked_add(1) {
            Some(generation) => generation,
            None => {
                self.marks.fill(0);
                1
            }
        };
    }

    /// Marks `node` as entered; `false` if this walk entered it already.
    fn enter(&mut self, node: usize) -> bool {
        let mark = &mut self.marks[node];
        if *mark == self.generation {
            false
        } else {
            *mark = self.generation;
            true
        }
    }
}
