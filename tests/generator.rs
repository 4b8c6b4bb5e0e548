use regexp_tree::ast::{
    Alternative, BackrefTarget, Backreference, Char, CharKind, CharacterClass, ClassRange,
    Disjunction, Group, GroupKind, Node, RegExp, Repetition,
};
use regexp_tree::flags::Flags;
use regexp_tree::{generate, parse};

fn roundtrip(source: &str) -> String {
    generate(&parse(source).expect("pattern should parse"))
}

#[test]
fn reproduces_canonical_patterns() {
    let patterns = [
        "/a/i",
        "/a|b|/",
        "/(a)(?<year>\\d{4})\\k<year>\\1/g",
        "/(?:ab)+?c{2,}d{3}e{1,4}/",
        "/(?=a)(?!b)(?<=c)(?<!d)/",
        "/^\\bx\\B$/m",
        "/[^a-z\\d_\\-]/",
        "/\\x41\\u0042\\u{1F600}\\cJ\\0\\p{L}/u",
        "/a\\/b\\.c/",
        "/.[.]/s",
    ];
    for pattern in patterns {
        assert_eq!(roundtrip(pattern), pattern, "pattern {pattern}");
    }
}

#[test]
fn prints_flags_in_canonical_order() {
    assert_eq!(roundtrip("/a/yusmig"), "/a/gimsuy");
}

#[test]
fn drops_redundant_identity_escapes() {
    assert_eq!(roundtrip("/\\a\\-/"), "/a-/");
    assert_eq!(roundtrip("/[\\*]/"), "/[*]/");
}

#[test]
fn empty_body_prints_as_empty_group() {
    assert_eq!(roundtrip("//"), "/(?:)/");
    assert_eq!(roundtrip("/(?:)/"), "/(?:)/");
}

#[test]
fn output_is_a_fixpoint_of_parse_and_generate() {
    let patterns = [
        "/a{1}b{0,}c{1,}d{0,1}/",
        "/\\q[\\b]/",
        "//",
        "/[\\]-]/",
        "/{/",
        "/a{,5}/",
    ];
    for pattern in patterns {
        let once = roundtrip(pattern);
        assert_eq!(roundtrip(&once), once, "pattern {pattern}");
    }
}

#[test]
fn normalizes_quantifier_spelling() {
    assert_eq!(roundtrip("/a{0,}b{1,}c{0,1}d{2,2}/"), "/a*b+c?d{2}/");
}

#[test]
fn wraps_alternation_inside_sequence() {
    let tree = Node::RegExp(RegExp::new(
        Node::Alternative(Alternative::new(vec![
            Char::simple('x').into(),
            Node::Disjunction(Disjunction::new(vec![
                Char::simple('a').into(),
                Char::simple('b').into(),
            ])),
        ])),
        Flags::empty(),
    ));
    assert_eq!(generate(&tree), "/x(?:a|b)/");
}

#[test]
fn wraps_non_atomic_repetition_operands() {
    let tree = Node::Repetition(Repetition::new(
        Node::Alternative(Alternative::new(vec![
            Char::simple('a').into(),
            Char::simple('b').into(),
        ])),
        0,
        None,
        true,
    ));
    assert_eq!(generate(&tree), "(?:ab)*");
}

#[test]
fn separates_numeric_escapes_from_following_digits() {
    let tree = Node::RegExp(RegExp::new(
        Node::Alternative(Alternative::new(vec![
            Group::new(
                GroupKind::Capturing {
                    number: 1,
                    name: None,
                },
                Char::simple('a').into(),
            )
            .into(),
            Node::Backreference(Backreference {
                target: BackrefTarget::Number(1),
                number: 1,
            }),
            Char::simple('0').into(),
            Char::new("\\0", CharKind::Oct).into(),
            Char::simple('7').into(),
        ])),
        Flags::empty(),
    ));
    let text = generate(&tree);
    assert_eq!(text, "/(a)(?:\\1)0(?:\\0)7/");
    assert_eq!(roundtrip(&text), text);
}

#[test]
fn digit_guard_looks_past_empty_pieces() {
    let tree = Node::RegExp(RegExp::new(
        Node::Alternative(Alternative::new(vec![
            Group::new(
                GroupKind::Capturing {
                    number: 1,
                    name: None,
                },
                Char::simple('a').into(),
            )
            .into(),
            Node::Backreference(Backreference {
                target: BackrefTarget::Number(1),
                number: 1,
            }),
            Node::empty(),
            Char::simple('2').into(),
        ])),
        Flags::empty(),
    ));
    let text = generate(&tree);
    assert_eq!(text, "/(a)(?:\\1)2/");
    assert_eq!(roundtrip(&text), text);
}

#[test]
fn respells_class_octal_escape_before_a_digit() {
    let tree = Node::CharacterClass(CharacterClass {
        negated: false,
        members: vec![
            Char::new("\\0", CharKind::Oct).into(),
            Node::ClassRange(ClassRange {
                from: Char::simple('2'),
                to: Char::simple('5'),
            }),
            Char::new("\\7", CharKind::Oct).into(),
            Char::simple('x').into(),
        ],
    });
    assert_eq!(generate(&tree), "[\\x002-5\\7x]");
}

#[test]
fn escapes_synthesized_chars_by_context() {
    let tree = Node::Alternative(Alternative::new(vec![
        Char::simple('+').into(),
        Char::simple('-').into(),
    ]));
    assert_eq!(generate(&tree), "\\+-");
}

#[test]
#[should_panic(expected = "repetition bounds out of order")]
fn panics_on_inverted_bounds() {
    let tree = Node::Repetition(Repetition::new(Char::simple('a').into(), 3, Some(1), true));
    generate(&tree);
}
