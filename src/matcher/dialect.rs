//! Rewrites constructs whose meaning differs between the pattern dialect
//! and the host engine, or that the host engine spells differently.

use smallvec::{SmallVec, smallvec};

use crate::ast::{Char, CharKind, CharacterClass, ClassRange, Node, NodeType};
use crate::flags::Flags;
use crate::transform::Pass;
use crate::traverse::Handlers;

pub(super) const NAME: &str = "host-dialect";

const MAX_CODE_POINT: u32 = 0x10FFFF;

type Intervals = SmallVec<[(u32, u32); 6]>;

fn digit() -> Intervals {
    smallvec![(0x30, 0x39)]
}

fn word() -> Intervals {
    smallvec![(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)]
}

/// Line terminators excluded by `.` without the `s` flag.
fn line_terminators() -> Intervals {
    smallvec![(0x0A, 0x0A), (0x0D, 0x0D), (0x2028, 0x2029)]
}

fn complement(intervals: &Intervals) -> Intervals {
    let mut out = Intervals::new();
    let mut next = 0;
    for &(from, to) in intervals {
        if from > next {
            out.push((next, from - 1));
        }
        next = to + 1;
    }
    if next <= MAX_CODE_POINT {
        out.push((next, MAX_CODE_POINT));
    }
    out
}

fn members(intervals: &Intervals) -> Vec<Node> {
    intervals
        .iter()
        .map(|&(from, to)| {
            if from == to {
                Char::from_code_point(from).into()
            } else {
                Node::ClassRange(ClassRange {
                    from: Char::from_code_point(from),
                    to: Char::from_code_point(to),
                })
            }
        })
        .collect()
}

/// `\d`, `\w` and their negations are ASCII-only in the pattern dialect.
fn class_escape(value: &str) -> Option<(Intervals, bool)> {
    match value {
        "\\d" => Some((digit(), false)),
        "\\D" => Some((digit(), true)),
        "\\w" => Some((word(), false)),
        "\\W" => Some((word(), true)),
        _ => None,
    }
}

/// Escapes the host engine does not read the same way, respelled by code
/// point.
fn respell(ch: &Char) -> Option<Char> {
    let foreign = match ch.kind {
        CharKind::Oct | CharKind::Control => true,
        CharKind::Meta => ch.value == "\\b",
        _ => false,
    };
    if !foreign {
        return None;
    }
    ch.code_point().map(Char::from_code_point)
}

fn rewrite_class(class: &CharacterClass) -> Option<CharacterClass> {
    if class.members.is_empty() {
        // `[]` never matches, `[^]` matches anything.
        return Some(CharacterClass {
            negated: !class.negated,
            members: members(&smallvec![(0, MAX_CODE_POINT)]),
        });
    }

    let mut changed = false;
    let mut out = Vec::with_capacity(class.members.len());
    for member in &class.members {
        match member {
            Node::Char(ch) => {
                if let Some((intervals, negated)) = class_escape(&ch.value) {
                    let intervals = if negated { complement(&intervals) } else { intervals };
                    out.extend(members(&intervals));
                    changed = true;
                } else if let Some(respelled) = respell(ch) {
                    out.push(respelled.into());
                    changed = true;
                } else {
                    out.push(member.clone());
                }
            }
            Node::ClassRange(range) => {
                let from = respell(&range.from);
                let to = respell(&range.to);
                if from.is_some() || to.is_some() {
                    changed = true;
                }
                out.push(Node::ClassRange(ClassRange {
                    from: from.unwrap_or_else(|| range.from.clone()),
                    to: to.unwrap_or_else(|| range.to.clone()),
                }));
            }
            other => out.push(other.clone()),
        }
    }
    changed.then(|| CharacterClass {
        negated: class.negated,
        members: out,
    })
}

fn rewrite_char(ch: &Char, flags: Flags) -> Option<Node> {
    if ch.kind == CharKind::Meta && ch.value == "." {
        if flags.contains(Flags::DOT_ALL) {
            return None;
        }
        return Some(
            CharacterClass {
                negated: true,
                members: members(&line_terminators()),
            }
            .into(),
        );
    }
    if let Some((intervals, negated)) = class_escape(&ch.value) {
        return Some(
            CharacterClass {
                negated,
                members: members(&intervals),
            }
            .into(),
        );
    }
    respell(ch).map(Node::from)
}

pub(super) fn pass(flags: Flags) -> Pass<'static> {
    Pass::new(
        NAME,
        Handlers::new()
            .on_enter(NodeType::Char, move |path| {
                if path.parent() == Some(NodeType::CharacterClass) {
                    return;
                }
                if let Node::Char(ch) = path.node()
                    && let Some(replacement) = rewrite_char(ch, flags)
                {
                    path.replace_and_skip(replacement);
                }
            })
            .on_exit(NodeType::CharacterClass, |path| {
                if let Node::CharacterClass(class) = path.node()
                    && let Some(rewritten) = rewrite_class(class)
                {
                    path.replace(rewritten.into());
                }
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complements_against_the_code_space() {
        let gaps = complement(&digit());
        assert_eq!(gaps.as_slice(), &[(0, 0x2F), (0x3A, MAX_CODE_POINT)]);
    }

    #[test]
    fn respells_octal_and_control_escapes() {
        assert_eq!(
            respell(&Char::new("\\0", CharKind::Oct)),
            Some(Char::new("\\x00", CharKind::Hex))
        );
        assert_eq!(
            respell(&Char::new("\\cJ", CharKind::Control)),
            Some(Char::new("\\x0A", CharKind::Hex))
        );
        assert_eq!(respell(&Char::simple('a')), None);
    }

    #[test]
    fn expands_class_escapes_inside_classes() {
        let class = CharacterClass {
            negated: false,
            members: vec![Char::meta("\\d").into(), Char::simple('x').into()],
        };
        let rewritten = rewrite_class(&class).expect("class changes");
        assert_eq!(
            rewritten.members,
            vec![
                Node::ClassRange(ClassRange {
                    from: Char::simple('0'),
                    to: Char::simple('9'),
                }),
                Char::simple('x').into(),
            ]
        );
    }
}
