mod escape;

use escape::{Context, write_char};

use crate::ast::{
    AssertionKind, BackrefTarget, Char, CharKind, ClassRange, Group, GroupKind, Node, RegExp,
    Repetition,
};

/// Text printed for an empty pattern body, which `//` cannot express.
pub const EMPTY_BODY: &str = "(?:)";

/// Serializes a tree. A `RegExp` root prints as `/pattern/flags`; any other
/// node prints as its pattern fragment.
///
/// # Panics
///
/// Panics when a `Repetition` has `min > max`; the tree is expected to obey
/// the invariants the parser establishes.
#[tracing::instrument(level = "trace", skip(node), fields(node_type = %node.node_type()))]
pub fn generate(node: &Node) -> String {
    match node {
        Node::RegExp(regexp) => {
            let (pattern, flags) = generate_parts(regexp);
            format!("/{pattern}/{flags}")
        }
        other => {
            let mut out = String::new();
            write_node(other, &mut out);
            out
        }
    }
}

/// Pattern text and flag text of a root, without delimiters.
pub fn generate_parts(regexp: &RegExp) -> (String, String) {
    let mut pattern = String::new();
    write_node(&regexp.body, &mut pattern);
    if pattern.is_empty() {
        pattern.push_str(EMPTY_BODY);
    }
    (pattern, regexp.flags.to_string())
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::RegExp(regexp) => write_node(&regexp.body, out),
        Node::Alternative(alternative) => write_sequence(&alternative.expressions, out),
        Node::Disjunction(disjunction) => {
            for (index, branch) in disjunction.branches.iter().enumerate() {
                if index > 0 {
                    out.push('|');
                }
                write_node(branch, out);
            }
        }
        Node::Group(group) => write_group(group, out),
        Node::Backreference(reference) => match &reference.target {
            BackrefTarget::Number(number) => {
                out.push('\\');
                out.push_str(&number.to_string());
            }
            BackrefTarget::Name(name) => {
                out.push_str("\\k<");
                out.push_str(name);
                out.push('>');
            }
        },
        Node::Assertion(assertion) => out.push_str(match assertion.kind {
            AssertionKind::Start => "^",
            AssertionKind::End => "$",
            AssertionKind::WordBoundary => "\\b",
            AssertionKind::NonWordBoundary => "\\B",
        }),
        Node::Char(ch) => write_char(ch, Context::Pattern, out),
        Node::CharacterClass(class) => {
            out.push('[');
            if class.negated {
                out.push('^');
            }
            write_class_members(&class.members, out);
            out.push(']');
        }
        Node::ClassRange(range) => write_range(range, out),
        Node::Repetition(repetition) => write_repetition(repetition, out),
    }
}

/// Concatenation. Wraps a piece in `(?:...)` only where plain
/// juxtaposition would read differently: a disjunction operand, or an
/// escape that keeps consuming digits followed by a digit.
fn write_sequence(expressions: &[Node], out: &mut String) {
    let pieces: Vec<String> = expressions
        .iter()
        .map(|expression| {
            let mut piece = String::new();
            if matches!(expression, Node::Disjunction(_)) {
                wrap(expression, &mut piece);
            } else {
                write_node(expression, &mut piece);
            }
            piece
        })
        .collect();

    for (index, piece) in pieces.iter().enumerate() {
        if next_starts_with_digit(&pieces[index + 1..]) && ends_with_open_escape(&expressions[index])
        {
            out.push_str("(?:");
            out.push_str(piece);
            out.push(')');
        } else {
            out.push_str(piece);
        }
    }
}

/// Empty pieces print nothing, so the digit that decides is the first one
/// after them.
fn next_starts_with_digit(rest: &[String]) -> bool {
    rest.iter()
        .find_map(|piece| piece.chars().next())
        .is_some_and(|ch| ch.is_ascii_digit())
}

fn ends_with_open_escape(node: &Node) -> bool {
    match node {
        Node::Backreference(reference) => matches!(reference.target, BackrefTarget::Number(_)),
        Node::Char(ch) => ch.kind == CharKind::Oct,
        Node::Alternative(alternative) => alternative
            .expressions
            .iter()
            .rev()
            .find(|expression| !prints_nothing(expression))
            .is_some_and(ends_with_open_escape),
        _ => false,
    }
}

fn prints_nothing(node: &Node) -> bool {
    match node {
        Node::Alternative(alternative) => alternative.expressions.iter().all(prints_nothing),
        _ => false,
    }
}

/// Class members sit side by side with no grouping available, so an octal
/// escape followed by a digit is respelled by code point instead.
fn write_class_members(members: &[Node], out: &mut String) {
    let pieces: Vec<String> = members
        .iter()
        .map(|member| {
            let mut piece = String::new();
            match member {
                Node::Char(ch) => write_char(ch, Context::Class, &mut piece),
                Node::ClassRange(range) => write_range(range, &mut piece),
                other => write_node(other, &mut piece),
            }
            piece
        })
        .collect();

    for (index, piece) in pieces.iter().enumerate() {
        let open_octal = match &members[index] {
            Node::Char(ch) if ch.kind == CharKind::Oct => Some(ch),
            Node::ClassRange(range) if range.to.kind == CharKind::Oct => Some(&range.to),
            _ => None,
        };
        match open_octal.and_then(Char::code_point) {
            Some(code_point) if next_starts_with_digit(&pieces[index + 1..]) => {
                let respelled = Char::from_code_point(code_point);
                if let Node::ClassRange(range) = &members[index] {
                    write_char(&range.from, Context::Class, out);
                    out.push('-');
                }
                write_char(&respelled, Context::Class, out);
            }
            _ => out.push_str(piece),
        }
    }
}

fn write_group(group: &Group, out: &mut String) {
    match &group.kind {
        GroupKind::Capturing { name: None, .. } => out.push('('),
        GroupKind::Capturing {
            name: Some(name), ..
        } => {
            out.push_str("(?<");
            out.push_str(name);
            out.push('>');
        }
        GroupKind::NonCapturing => out.push_str("(?:"),
        GroupKind::Lookahead => out.push_str("(?="),
        GroupKind::NegativeLookahead => out.push_str("(?!"),
        GroupKind::Lookbehind => out.push_str("(?<="),
        GroupKind::NegativeLookbehind => out.push_str("(?<!"),
    }
    write_node(&group.expression, out);
    out.push(')');
}

fn write_range(range: &ClassRange, out: &mut String) {
    write_char(&range.from, Context::Class, out);
    out.push('-');
    write_char(&range.to, Context::Class, out);
}

fn write_repetition(repetition: &Repetition, out: &mut String) {
    let Repetition {
        expression,
        min,
        max,
        greedy,
    } = repetition;
    if let Some(max) = max {
        assert!(
            min <= max,
            "repetition bounds out of order: {{{min},{max}}}"
        );
    }

    match expression.as_ref() {
        Node::Char(_) | Node::CharacterClass(_) | Node::Group(_) | Node::Backreference(_) => {
            write_node(expression, out)
        }
        other => wrap(other, out),
    }

    match (*min, *max) {
        (0, None) => out.push('*'),
        (1, None) => out.push('+'),
        (0, Some(1)) => out.push('?'),
        (min, None) => out.push_str(&format!("{{{min},}}")),
        (min, Some(max)) if min == max => out.push_str(&format!("{{{min}}}")),
        (min, Some(max)) => out.push_str(&format!("{{{min},{max}}}")),
    }
    if !greedy {
        out.push('?');
    }
}

fn wrap(node: &Node, out: &mut String) {
    out.push_str("(?:");
    write_node(node, out);
    out.push(')');
}
