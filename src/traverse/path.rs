use crate::ast::{Node, NodeType};

/// Position of a node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Root,
    /// `RegExp` body.
    Body,
    /// `Group` or `Repetition` expression.
    Expression,
    /// Position in an `Alternative`, `Disjunction` or `CharacterClass`.
    Index(usize),
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Signals {
    pub replaced: bool,
    pub removed: bool,
    pub skip: bool,
    pub stop: bool,
}

/// The node a handler is invoked on, together with where it sits in the
/// tree. Edits go through the path so the walker can keep its bookkeeping.
pub struct NodePath<'a> {
    node: &'a mut Node,
    slot: Slot,
    ancestors: &'a [NodeType],
    signals: Signals,
}

impl<'a> NodePath<'a> {
    pub(crate) fn new(node: &'a mut Node, slot: Slot, ancestors: &'a [NodeType]) -> Self {
        Self {
            node,
            slot,
            ancestors,
            signals: Signals::default(),
        }
    }

    pub fn node(&self) -> &Node {
        self.node
    }

    /// In-place edits through this reference are not counted as mutations;
    /// use [`NodePath::replace`] when the change must be observed by a
    /// fixpoint driver.
    pub fn node_mut(&mut self) -> &mut Node {
        self.node
    }

    pub fn node_type(&self) -> NodeType {
        self.node.node_type()
    }

    pub fn parent(&self) -> Option<NodeType> {
        self.ancestors.last().copied()
    }

    /// Variant tags from the root down to the parent.
    pub fn ancestors(&self) -> &[NodeType] {
        self.ancestors
    }

    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn index(&self) -> Option<usize> {
        match self.slot {
            Slot::Index(index) => Some(index),
            _ => None,
        }
    }

    /// Puts `node` in this slot. The walker descends into the replacement's
    /// children and runs the exit handler of the replacement's variant.
    pub fn replace(&mut self, node: Node) {
        *self.node = node;
        self.signals.replaced = true;
    }

    /// Like [`NodePath::replace`] but the replacement's children are not
    /// visited.
    pub fn replace_and_skip(&mut self, node: Node) {
        self.replace(node);
        self.signals.skip = true;
    }

    /// Detaches the node. In a list the gap closes; a `Body` or `Expression`
    /// slot is left holding an empty alternative. Removing the root is
    /// ignored.
    pub fn remove(&mut self) {
        self.signals.removed = true;
    }

    pub fn is_removed(&self) -> bool {
        self.signals.removed
    }

    /// Do not descend into this node's children.
    pub fn skip(&mut self) {
        self.signals.skip = true;
    }

    /// Abort the whole traversal once the handler returns.
    pub fn stop(&mut self) {
        self.signals.stop = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.signals.stop
    }

    pub(crate) fn into_signals(self) -> Signals {
        self.signals
    }
}
