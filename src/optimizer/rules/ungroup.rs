use crate::ast::{Alternative, GroupKind, Node, NodeType};
use crate::transform::Pass;
use crate::traverse::Handlers;

pub(crate) const NAME: &str = "ungroup";

/// Removes non-capturing groups whose parentheses have no effect. Inside a
/// sequence the group's items are spliced into the parent; elsewhere the
/// group is replaced by its body when the body reads the same without it.
pub(crate) fn pass() -> Pass<'static> {
    Pass::new(
        NAME,
        Handlers::new()
            .on_exit(NodeType::Alternative, |path| {
                let Node::Alternative(alternative) = path.node() else {
                    return;
                };
                if let Some(expressions) = splice(&alternative.expressions) {
                    path.replace(Node::Alternative(Alternative::new(expressions)));
                }
            })
            .on_exit(NodeType::Group, |path| {
                let parent = path.parent();
                if parent == Some(NodeType::Alternative) || !unwrappable(path.node(), parent) {
                    return;
                }
                if let Node::Group(group) = path.node_mut() {
                    let body = std::mem::replace(group.expression.as_mut(), Node::empty());
                    path.replace(body);
                }
            }),
    )
}

fn is_spliceable(node: &Node) -> bool {
    matches!(
        node,
        Node::Group(group)
            if group.kind == GroupKind::NonCapturing
                && !matches!(*group.expression, Node::Disjunction(_))
    )
}

fn splice(expressions: &[Node]) -> Option<Vec<Node>> {
    if !expressions.iter().any(is_spliceable) {
        return None;
    }
    let mut out = Vec::with_capacity(expressions.len());
    for expression in expressions {
        match expression {
            Node::Group(group) if is_spliceable(expression) => match group.expression.as_ref() {
                Node::Alternative(inner) => out.extend(inner.expressions.iter().cloned()),
                body => out.push(body.clone()),
            },
            other => out.push(other.clone()),
        }
    }
    Some(out)
}

/// Whether a group outside a sequence can give way to its body.
fn unwrappable(node: &Node, parent: Option<NodeType>) -> bool {
    let Node::Group(group) = node else {
        return false;
    };
    if group.kind != GroupKind::NonCapturing || group.expression.is_empty_alternative() {
        return false;
    }
    let body = group.expression.as_ref();
    match parent {
        // Only single atoms may carry a quantifier; a lookbehind may not.
        Some(NodeType::Repetition) => match body {
            Node::Char(_) | Node::CharacterClass(_) | Node::Backreference(_) => true,
            Node::Group(inner) => !inner.kind.is_lookaround(),
            _ => false,
        },
        Some(NodeType::Disjunction) => !matches!(body, Node::Disjunction(_)),
        Some(NodeType::RegExp) | Some(NodeType::Group) | None => true,
        _ => false,
    }
}
