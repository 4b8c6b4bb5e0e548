use crate::ast::{Node, NodeType};
use crate::transform::Pass;
use crate::traverse::Handlers;

pub(crate) const NAME: &str = "remove-degenerate-quantifiers";

/// `x{1}` and `x{1,1}`, greedy or lazy, match exactly what `x` matches.
pub(crate) fn pass() -> Pass<'static> {
    Pass::new(
        NAME,
        Handlers::new().on_exit(NodeType::Repetition, |path| {
            if let Node::Repetition(repetition) = path.node_mut()
                && repetition.min == 1
                && repetition.max == Some(1)
            {
                let inner = std::mem::replace(repetition.expression.as_mut(), Node::empty());
                path.replace(inner);
            }
        }),
    )
}
