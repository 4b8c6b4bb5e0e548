use crate::ast::{Alternative, Node, NodeType, Repetition};
use crate::transform::Pass;
use crate::traverse::Handlers;

pub(crate) const NAME: &str = "quantifier-fusion";

/// Folds a piece into an immediately following repetition of the same
/// piece: `aa*` becomes `a+`, `(?:ab)(?:ab){2,3}` becomes `(?:ab){3,4}`.
pub(crate) fn pass() -> Pass<'static> {
    Pass::new(
        NAME,
        Handlers::new().on_exit(NodeType::Alternative, |path| {
            let Node::Alternative(alternative) = path.node() else {
                return;
            };
            if let Some(mut fused) = fuse(&alternative.expressions) {
                let replacement = if fused.len() == 1 {
                    fused.remove(0)
                } else {
                    Node::Alternative(Alternative::new(fused))
                };
                path.replace(replacement);
            }
        }),
    )
}

fn fuse(expressions: &[Node]) -> Option<Vec<Node>> {
    let any = expressions.windows(2).any(|pair| match &pair[1] {
        Node::Repetition(repetition) => fusible(&pair[0], repetition),
        _ => false,
    });
    if !any {
        return None;
    }

    let mut out: Vec<Node> = Vec::with_capacity(expressions.len());
    for expression in expressions {
        if let Node::Repetition(repetition) = expression
            && let Some(previous) = out.last()
            && fusible(previous, repetition)
        {
            let fused = Repetition::new(
                (*repetition.expression).clone(),
                repetition.min + 1,
                repetition.max.map(|max| max + 1),
                repetition.greedy,
            );
            out.pop();
            out.push(fused.into());
            continue;
        }
        out.push(expression.clone());
    }
    Some(out)
}

fn fusible(previous: &Node, repetition: &Repetition) -> bool {
    let atom = match previous {
        Node::Char(_) | Node::CharacterClass(_) | Node::Backreference(_) => true,
        Node::Group(group) => !group.kind.is_lookaround(),
        _ => false,
    };
    atom && *repetition.expression == *previous
        && !previous.contains_capturing_group()
        && repetition.min < u32::MAX
        && repetition.max.is_none_or(|max| max < u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Char;

    fn star(node: Node) -> Node {
        Repetition::new(node, 0, None, true).into()
    }

    #[test]
    fn folds_leading_copy_into_repetition() {
        let fused = fuse(&[Char::simple('a').into(), star(Char::simple('a').into())])
            .expect("fusion applies");
        assert_eq!(
            fused,
            vec![Node::from(Repetition::new(Char::simple('a').into(), 1, None, true))]
        );
    }

    #[test]
    fn leaves_different_pieces_alone() {
        assert!(fuse(&[Char::simple('a').into(), star(Char::simple('b').into())]).is_none());
    }

    #[test]
    fn refuses_to_overflow_bounds() {
        let saturated = Repetition::new(Char::simple('a').into(), 0, Some(u32::MAX), true);
        assert!(fuse(&[Char::simple('a').into(), saturated.into()]).is_none());
    }
}
