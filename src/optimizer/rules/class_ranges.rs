use hashbrown::HashMap as FastHashMap;
use smallvec::SmallVec;

use crate::ast::{Char, CharacterClass, ClassRange, Node, NodeType};
use crate::flags::Flags;
use crate::transform::Pass;
use crate::traverse::Handlers;

pub(crate) const NAME: &str = "normalize-class-ranges";

type Interval = (u32, u32);

const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

/// Rewrites class members as sorted, disjoint, non-adjacent intervals.
/// Members without a code point (`\d`, `\p{L}`) keep their relative order
/// and go first. Under `u` a reordered lone surrogate could pair up with its
/// new neighbour, so classes holding surrogates are left as written.
pub(crate) fn pass(flags: Flags) -> Pass<'static> {
    let unicode = flags.contains(Flags::UNICODE);
    Pass::new(
        NAME,
        Handlers::new().on_exit(NodeType::CharacterClass, move |path| {
            let Node::CharacterClass(class) = path.node() else {
                return;
            };
            if unicode && has_surrogate(class) {
                return;
            }
            if let Some(normalized) = normalize(class) {
                path.replace(normalized.into());
            }
        }),
    )
}

fn normalize(class: &CharacterClass) -> Option<CharacterClass> {
    let mut members: Vec<Node> = Vec::new();
    let mut intervals: SmallVec<[Interval; 8]> = SmallVec::new();
    // First spelling seen for each code point, reused when it ends up as an
    // interval endpoint.
    let mut spellings: FastHashMap<u32, &Char> = FastHashMap::new();

    for member in &class.members {
        match member {
            Node::Char(ch) => match ch.code_point() {
                Some(code_point) => {
                    intervals.push((code_point, code_point));
                    spellings.entry(code_point).or_insert(ch);
                }
                None => members.push(member.clone()),
            },
            Node::ClassRange(range) => match (range.from.code_point(), range.to.code_point()) {
                (Some(from), Some(to)) if from <= to => {
                    intervals.push((from, to));
                    spellings.entry(from).or_insert(&range.from);
                    spellings.entry(to).or_insert(&range.to);
                }
                _ => members.push(member.clone()),
            },
            other => members.push(other.clone()),
        }
    }

    let spell = |code_point: u32| {
        spellings
            .get(&code_point)
            .map(|ch| (*ch).clone())
            .unwrap_or_else(|| Char::from_code_point(code_point))
    };
    for (from, to) in merge_intervals(intervals) {
        match to - from {
            0 => members.push(spell(from).into()),
            1 => {
                members.push(spell(from).into());
                members.push(spell(to).into());
            }
            _ => members.push(Node::ClassRange(ClassRange {
                from: spell(from),
                to: spell(to),
            })),
        }
    }

    (members != class.members).then(|| CharacterClass {
        negated: class.negated,
        members,
    })
}

fn has_surrogate(class: &CharacterClass) -> bool {
    let is_surrogate = |ch: &Char| ch.code_point().is_some_and(|cp| SURROGATES.contains(&cp));
    class.members.iter().any(|member| match member {
        Node::Char(ch) => is_surrogate(ch),
        Node::ClassRange(range) => is_surrogate(&range.from) || is_surrogate(&range.to),
        _ => false,
    })
}

/// Sorts and coalesces overlapping or touching intervals.
pub(crate) fn merge_intervals(mut intervals: SmallVec<[Interval; 8]>) -> SmallVec<[Interval; 8]> {
    intervals.sort_unstable();
    let mut merged: SmallVec<[Interval; 8]> = SmallVec::with_capacity(intervals.len());
    for (from, to) in intervals {
        match merged.last_mut() {
            Some(last) if from <= last.1.saturating_add(1) => last.1 = last.1.max(to),
            _ => merged.push((from, to)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CharKind;
    use smallvec::smallvec;

    fn range(from: char, to: char) -> Node {
        Node::ClassRange(ClassRange {
            from: Char::simple(from),
            to: Char::simple(to),
        })
    }

    fn class(members: Vec<Node>) -> CharacterClass {
        CharacterClass {
            negated: false,
            members,
        }
    }

    #[test]
    fn merges_overlapping_and_touching_intervals() {
        let merged = merge_intervals(smallvec![(10, 12), (0, 3), (4, 5), (11, 20)]);
        assert_eq!(merged.as_slice(), &[(0, 5), (10, 20)]);
    }

    #[test]
    fn collapses_covered_ranges() {
        let normalized = normalize(&class(vec![range('a', 'c'), range('a', 'z')]))
            .expect("class changes");
        assert_eq!(normalized.members, vec![range('a', 'z')]);
    }

    #[test]
    fn keeps_escapes_without_code_points_first() {
        let normalized = normalize(&class(vec![
            Char::simple('b').into(),
            Char::meta("\\d").into(),
            Char::simple('a').into(),
        ]))
        .expect("class changes");
        assert_eq!(
            normalized.members,
            vec![
                Char::meta("\\d").into(),
                Char::simple('a').into(),
                Char::simple('b').into(),
            ]
        );
    }

    #[test]
    fn reuses_original_spelling_of_endpoints() {
        let hex_a = Char::new("\\x61", CharKind::Hex);
        let normalized = normalize(&class(vec![
            Node::ClassRange(ClassRange {
                from: hex_a.clone(),
                to: Char::simple('f'),
            }),
            range('c', 'z'),
        ]))
        .expect("class changes");
        assert_eq!(
            normalized.members,
            vec![Node::ClassRange(ClassRange {
                from: hex_a,
                to: Char::simple('z'),
            })]
        );
    }

    #[test]
    fn spots_surrogate_members() {
        let lone = class(vec![
            Char::new("\\uDE00", CharKind::Unicode).into(),
            Char::simple('a').into(),
        ]);
        assert!(has_surrogate(&lone));
        assert!(!has_surrogate(&class(vec![range('a', 'z')])));
    }

    #[test]
    fn normalized_class_is_stable() {
        let sorted = class(vec![Char::meta("\\w").into(), range('0', '9')]);
        assert!(normalize(&sorted).is_none());
    }
}
