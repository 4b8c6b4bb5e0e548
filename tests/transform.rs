use regexp_tree::ast::{Char, CharKind, Node, NodeType};
use regexp_tree::errors::RegexpTreeError;
use regexp_tree::transform::{Pass, Pipeline, TransformResult, transform};
use regexp_tree::traverse::Handlers;
use regexp_tree::parse;

fn rename(from: char, to: char) -> Pass<'static> {
    Pass::new(
        format!("rename-{from}-{to}"),
        Handlers::new().on_enter(NodeType::Char, move |path| {
            if let Node::Char(ch) = path.node()
                && ch.kind == CharKind::Simple
                && ch.value == from.to_string()
            {
                path.replace(Char::simple(to).into());
            }
        }),
    )
}

fn uppercase() -> Pass<'static> {
    Pass::new(
        "uppercase",
        Handlers::new().on_enter(NodeType::Char, |path| {
            let upper = match path.node() {
                Node::Char(ch) if ch.kind == CharKind::Simple => {
                    ch.value.chars().next().filter(char::is_ascii_lowercase)
                }
                _ => None,
            };
            if let Some(lower) = upper {
                path.replace(Char::simple(lower.to_ascii_uppercase()).into());
            }
        }),
    )
}

#[test]
fn applies_a_pass_to_pattern_text() {
    let mut pipeline = Pipeline::from(uppercase());
    let result = transform("/ab/i", &mut pipeline).expect("transform should succeed");
    assert_eq!(result.to_string(), "/AB/i");
    assert_eq!(result.to_pattern_text(), "/AB/i");
    assert_eq!(result.pattern(), "AB");
    assert_eq!(result.flags(), "i");
}

#[test]
fn runs_passes_in_order() {
    let mut pipeline = Pipeline::new()
        .with_pass(rename('a', 'b'))
        .with_pass(rename('b', 'c'));
    let result = transform("/ab/", &mut pipeline).expect("transform should succeed");
    assert_eq!(result.to_string(), "/cc/");

    let mut reversed: Pipeline<'_> = [rename('b', 'c'), rename('a', 'b')].into_iter().collect();
    let result = transform("/ab/", &mut reversed).expect("transform should succeed");
    assert_eq!(result.to_string(), "/bc/");
}

#[test]
fn accepts_an_existing_tree() {
    let ast = parse("/xa/").expect("pattern should parse");
    let mut pipeline = Pipeline::from(rename('a', 'z'));
    let result = transform(ast, &mut pipeline).expect("transform should succeed");
    assert_eq!(result.to_string(), "/xz/");
}

#[test]
fn fragments_have_no_flags() {
    let mut pipeline = Pipeline::from(uppercase());
    let result =
        transform(Node::from(Char::simple('q')), &mut pipeline).expect("transform should succeed");
    assert_eq!(result.pattern(), "Q");
    assert_eq!(result.flags(), "");
    assert_eq!(result.into_ast(), Node::from(Char::simple('Q')));
}

#[test]
fn empty_pipeline_keeps_the_tree() {
    let mut pipeline = Pipeline::new();
    let result = transform("/a(b)c/m", &mut pipeline).expect("transform should succeed");
    let ast: Node = result.clone().into();
    assert_eq!(ast, parse("/a(b)c/m").expect("pattern should parse"));
    assert_eq!(result, TransformResult::new(ast));
}

#[test]
fn stop_only_ends_the_current_pass() {
    let mut seen = 0;
    let mut pipeline = Pipeline::new()
        .with_pass(Pass::new(
            "stop-early",
            Handlers::new().on_enter(NodeType::Char, |path| path.stop()),
        ))
        .with_pass(Pass::new(
            "count",
            Handlers::new().on_enter(NodeType::Char, |_| seen += 1),
        ));
    let mut ast = parse("/abc/").expect("pattern should parse");
    let stats = pipeline.run(&mut ast);
    assert_eq!(stats.passes, 2);
    assert_eq!(stats.stopped, 1);
    assert_eq!(stats.mutations, 0);
    drop(pipeline);
    assert_eq!(seen, 3);
}

#[test]
fn counts_mutations_across_passes() {
    let mut pipeline = Pipeline::new()
        .with_pass(rename('a', 'b'))
        .with_pass(rename('b', 'c'));
    let names: Vec<&str> = pipeline.names().collect();
    assert_eq!(names, ["rename-a-b", "rename-b-c"]);

    let mut ast = parse("/ab/").expect("pattern should parse");
    let stats = pipeline.run(&mut ast);
    assert_eq!(stats.mutations, 3);
}

#[test]
fn surfaces_parse_errors() {
    let mut pipeline = Pipeline::new();
    match transform("/[/", &mut pipeline).expect_err("pattern is invalid") {
        RegexpTreeError::Lex(_) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}
