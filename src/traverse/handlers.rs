use hashbrown::HashMap as FastHashMap;

use super::NodePath;
use crate::ast::NodeType;

pub type Handler<'h> = Box<dyn FnMut(&mut NodePath<'_>) + 'h>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Enter,
    Exit,
}

#[derive(Default)]
struct Visitor<'h> {
    enter: Option<Handler<'h>>,
    exit: Option<Handler<'h>>,
}

impl<'h> Visitor<'h> {
    fn slot(&mut self, phase: Phase) -> &mut Option<Handler<'h>> {
        match phase {
            Phase::Enter => &mut self.enter,
            Phase::Exit => &mut self.exit,
        }
    }
}

/// Enter/exit callbacks keyed by node variant. A catch-all pair runs before
/// the variant-specific handler.
#[derive(Default)]
pub struct Handlers<'h> {
    by_type: FastHashMap<NodeType, Visitor<'h>>,
    any: Visitor<'h>,
}

impl<'h> Handlers<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter<F>(mut self, node_type: NodeType, handler: F) -> Self
    where
        F: FnMut(&mut NodePath<'_>) + 'h,
    {
        self.by_type.entry(node_type).or_default().enter = Some(Box::new(handler));
        self
    }

    pub fn on_exit<F>(mut self, node_type: NodeType, handler: F) -> Self
    where
        F: FnMut(&mut NodePath<'_>) + 'h,
    {
        self.by_type.entry(node_type).or_default().exit = Some(Box::new(handler));
        self
    }

    pub fn on_any_enter<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut NodePath<'_>) + 'h,
    {
        self.any.enter = Some(Box::new(handler));
        self
    }

    pub fn on_any_exit<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&mut NodePath<'_>) + 'h,
    {
        self.any.exit = Some(Box::new(handler));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.any.enter.is_none() && self.any.exit.is_none() && self.by_type.is_empty()
    }

    pub fn handles(&self, node_type: NodeType) -> bool {
        self.by_type.contains_key(&node_type)
    }

    pub(crate) fn has(&self, node_type: NodeType, phase: Phase) -> bool {
        let registered = |visitor: &Visitor<'h>| match phase {
            Phase::Enter => visitor.enter.is_some(),
            Phase::Exit => visitor.exit.is_some(),
        };
        registered(&self.any) || self.by_type.get(&node_type).is_some_and(registered)
    }

    /// Runs the catch-all handler, then the variant handler unless the first
    /// one removed the node, stopped the walk or swapped in a node of another
    /// variant.
    pub(crate) fn call(&mut self, node_type: NodeType, phase: Phase, path: &mut NodePath<'_>) {
        if let Some(handler) = self.any.slot(phase) {
            handler(path);
            if path.is_removed() || path.is_stopped() || path.node_type() != node_type {
                return;
            }
        }
        if let Some(handler) = self
            .by_type
            .get_mut(&node_type)
            .and_then(|visitor| visitor.slot(phase).as_mut())
        {
            handler(path);
        }
    }
}
