use regexp_tree::ast::{Node, NodeType};
use regexp_tree::errors::RegexpTreeError;
use regexp_tree::flags::Flags;
use regexp_tree::matcher::MatcherError;
use regexp_tree::traverse::Handlers;
use regexp_tree::{
    OptimizerOptions, PatternSource, generate, optimize, parse, to_matcher, traverse,
};
use serde_json::json;

#[test]
fn parse_produces_the_documented_shape() {
    let ast = parse("/a/i").expect("pattern should parse");
    let value = serde_json::to_value(&ast).expect("tree should serialize");
    assert_eq!(
        value,
        json!({
            "type": "RegExp",
            "body": { "type": "Char", "value": "a", "kind": "simple" },
            "flags": "i",
        })
    );
}

#[test]
fn groups_serialize_with_their_kind() {
    let ast = parse("/(?<y>a)/").expect("pattern should parse");
    let value = serde_json::to_value(&ast).expect("tree should serialize");
    assert_eq!(
        value["body"],
        json!({
            "type": "Group",
            "kind": "capturing",
            "number": 1,
            "name": "y",
            "expression": { "type": "Char", "value": "a", "kind": "simple" },
        })
    );
}

#[test]
fn trees_survive_a_serde_roundtrip() {
    let ast = parse(r"/(?:a|[^\d-z])+?\k<n>(?<n>b)\x41/gimsuy").expect("pattern should parse");
    let text = serde_json::to_string(&ast).expect("tree should serialize");
    let back: Node = serde_json::from_str(&text).expect("tree should deserialize");
    assert_eq!(back, ast);
}

#[test]
fn flags_serialize_as_text() {
    let flags: Flags = serde_json::from_str(r#""yg""#).expect("flags should deserialize");
    assert_eq!(flags, Flags::GLOBAL | Flags::STICKY);
    assert_eq!(
        serde_json::to_string(&flags).expect("flags should serialize"),
        r#""gy""#
    );
    serde_json::from_str::<Flags>(r#""gx""#).expect_err("unknown flag should be rejected");
}

#[test]
fn traverse_visits_root_then_char() {
    let mut ast = parse("/a/i").expect("pattern should parse");
    let mut visited = Vec::new();
    let mut handlers = Handlers::new().on_any_enter(|path| visited.push(path.node_type()));
    traverse(&mut ast, &mut handlers);
    drop(handlers);
    assert_eq!(visited, vec![NodeType::RegExp, NodeType::Char]);
}

#[test]
fn generate_inverts_parse() {
    let ast = parse("/a/i").expect("pattern should parse");
    assert_eq!(generate(&ast), "/a/i");
}

#[test]
fn parses_anything_that_displays_as_a_pattern() {
    let source = String::from("/m/m");
    let ast = parse(PatternSource::display(&source)).expect("pattern should parse");
    assert_eq!(generate(&ast), "/m/m");
}

#[test]
fn optimize_folds_star() {
    let result = optimize("/aa*/", &OptimizerOptions::default()).expect("pattern should optimize");
    assert_eq!(result.to_string(), "/a+/");
}

#[test]
fn matcher_honours_case_insensitivity() {
    let matcher = to_matcher("/[a-z]/i").expect("pattern should compile");
    assert!(matcher.is_match("a"));
    assert!(matcher.is_match("Z"));
    assert!(!matcher.is_match("1"));
    assert_eq!(matcher.to_string(), "/[a-z]/i");
}

#[test]
fn matcher_keeps_ascii_class_escapes() {
    let digits = to_matcher(r"/^\d+$/").expect("pattern should compile");
    assert!(digits.is_match("2024"));
    assert!(!digits.is_match("\u{0661}\u{0662}"));

    let word = to_matcher(r"/^[\w-]+$/").expect("pattern should compile");
    assert!(word.is_match("snake_case-name"));
    assert!(!word.is_match("caf\u{e9}"));

    let non_digit = to_matcher(r"/^[\D]$/").expect("pattern should compile");
    assert!(non_digit.is_match("x"));
    assert!(!non_digit.is_match("7"));
}

#[test]
fn matcher_dot_excludes_line_terminators() {
    let dot = to_matcher("/^.$/").expect("pattern should compile");
    assert!(dot.is_match("a"));
    assert!(!dot.is_match("\r"));
    assert!(!dot.is_match("\u{2028}"));

    let dot_all = to_matcher("/^.$/s").expect("pattern should compile");
    assert!(dot_all.is_match("\n"));
}

#[test]
fn matcher_translates_numeric_escapes() {
    let nul = to_matcher(r"/\0/").expect("pattern should compile");
    assert!(nul.is_match("a\0b"));

    let control = to_matcher(r"/[\cJ\b]/").expect("pattern should compile");
    assert!(control.is_match("\n"));
    assert!(control.is_match("\u{8}"));
    assert!(!control.is_match("b"));

    let anything = to_matcher("/^[^]$/").expect("pattern should compile");
    assert!(anything.is_match("\n"));
}

#[test]
fn sticky_matcher_anchors_at_the_start() {
    let sticky = to_matcher("/b/y").expect("pattern should compile");
    assert!(sticky.is_sticky());
    assert!(!sticky.is_match("ab"));
    assert!(sticky.is_match("ba"));
    assert_eq!(sticky.find_at("ab", 1).map(|found| found.start()), Some(1));

    let global = to_matcher("/b/g").expect("pattern should compile");
    assert!(global.is_global());
    assert!(global.is_match("ab"));
}

#[test]
fn matcher_rejects_constructs_without_host_support() {
    match to_matcher("/(?=a)b/").expect_err("lookahead is unsupported") {
        RegexpTreeError::Matcher(MatcherError::Unsupported {
            construct,
            node_index,
        }) => {
            assert_eq!(construct, "lookaround");
            assert_eq!(node_index, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    match to_matcher(r"/(a)\1/").expect_err("backreference is unsupported") {
        RegexpTreeError::Matcher(MatcherError::Unsupported { construct, .. }) => {
            assert_eq!(construct, "backreference");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn matcher_surfaces_parse_errors() {
    match to_matcher("/a{2,1}/").expect_err("pattern is invalid") {
        RegexpTreeError::Parse(_) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn optimized_patterns_match_the_same_strings() {
    let cases = [
        ("/^aa*$/", ["a", "aaa", "", "b"]),
        ("/^[a-ca-z]x{1}$/", ["qx", "ax", "Ax", "zxx"]),
        ("/^x(?:ab)y$/", ["xaby", "xy", "xab", "xabyy"]),
    ];
    for (pattern, inputs) in cases {
        let before = to_matcher(pattern).expect("pattern should compile");
        let optimized = optimize(pattern, &OptimizerOptions::default())
            .expect("pattern should optimize")
            .to_string();
        let after = to_matcher(optimized.as_str()).expect("optimized pattern should compile");
        for input in inputs {
            assert_eq!(
                before.is_match(input),
                after.is_match(input),
                "{pattern} vs {optimized} on {input:?}"
            );
        }
    }
}
