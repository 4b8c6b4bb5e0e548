use smallvec::SmallVec;

use super::handlers::Phase;
use super::path::Signals;
use super::{Handlers, NodePath, Slot};
use crate::ast::{Node, NodeType};

const ANCESTOR_STACK_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Nodes whose enter phase ran.
    pub entered: usize,
    /// Replacements plus removals.
    pub mutations: usize,
    pub stopped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Removed,
    Stop,
}

/// Depth-first walk calling `enter` before and `exit` after each node's
/// children. Children are visited in semantic order; a removed node's
/// subtree is never entered and `stop` ends the walk at once.
pub fn traverse(root: &mut Node, handlers: &mut Handlers<'_>) -> TraversalStats {
    let mut walker = Walker {
        handlers,
        ancestors: SmallVec::new(),
        stats: TraversalStats::default(),
    };
    walker.visit(root, Slot::Root);
    walker.stats
}

struct Walker<'w, 'h> {
    handlers: &'w mut Handlers<'h>,
    ancestors: SmallVec<[NodeType; ANCESTOR_STACK_CAPACITY]>,
    stats: TraversalStats,
}

impl Walker<'_, '_> {
    fn visit(&mut self, node: &mut Node, slot: Slot) -> Flow {
        self.stats.entered += 1;

        let entered = self.dispatch(node, slot, Phase::Enter);
        if let Some(flow) = self.interrupt(entered, slot) {
            return flow;
        }

        if !entered.skip && self.visit_children(node) == Flow::Stop {
            return Flow::Stop;
        }

        let exited = self.dispatch(node, slot, Phase::Exit);
        self.interrupt(exited, slot).unwrap_or(Flow::Continue)
    }

    fn interrupt(&mut self, signals: Signals, slot: Slot) -> Option<Flow> {
        if signals.stop {
            self.stats.stopped = true;
            return Some(Flow::Stop);
        }
        if signals.removed {
            if slot == Slot::Root {
                tracing::debug!("ignoring removal of the traversal root");
                return None;
            }
            return Some(Flow::Removed);
        }
        None
    }

    fn dispatch(&mut self, node: &mut Node, slot: Slot, phase: Phase) -> Signals {
        let node_type = node.node_type();
        if !self.handlers.has(node_type, phase) {
            return Signals::default();
        }

        let mut path = NodePath::new(node, slot, &self.ancestors);
        self.handlers.call(node_type, phase, &mut path);
        let signals = path.into_signals();
        if signals.replaced {
            self.stats.mutations += 1;
        }
        signals
    }

    fn visit_children(&mut self, node: &mut Node) -> Flow {
        self.ancestors.push(node.node_type());
        let flow = match node {
            Node::RegExp(regexp) => self.visit_single(&mut regexp.body, Slot::Body),
            Node::Alternative(alternative) => self.visit_list(&mut alternative.expressions),
            Node::Disjunction(disjunction) => self.visit_list(&mut disjunction.branches),
            Node::CharacterClass(class) => self.visit_list(&mut class.members),
            Node::Group(group) => self.visit_single(&mut group.expression, Slot::Expression),
            Node::Repetition(repetition) => {
                self.visit_single(&mut repetition.expression, Slot::Expression)
            }
            Node::Backreference(_) | Node::Assertion(_) | Node::Char(_) | Node::ClassRange(_) => {
                Flow::Continue
            }
        };
        self.ancestors.pop();
        flow
    }

    fn visit_single(&mut self, child: &mut Node, slot: Slot) -> Flow {
        match self.visit(child, slot) {
            Flow::Removed => {
                *child = Node::empty();
                self.stats.mutations += 1;
                Flow::Continue
            }
            flow => flow,
        }
    }

    fn visit_list(&mut self, children: &mut Vec<Node>) -> Flow {
        let mut index = 0;
        while index < children.len() {
            match self.visit(&mut children[index], Slot::Index(index)) {
                Flow::Continue => index += 1,
                Flow::Removed => {
                    children.remove(index);
                    self.stats.mutations += 1;
                }
                Flow::Stop => return Flow::Stop,
            }
        }
        Flow::Continue
    }
}
