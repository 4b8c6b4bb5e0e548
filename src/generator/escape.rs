use crate::ast::{Char, CharKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Context {
    Pattern,
    Class,
}

const PATTERN_SPECIAL: &[char] = &[
    '\\', '^', '$', '.', '|', '?', '*', '+', '(', ')', '[', ']', '{', '}', '/',
];
const CLASS_SPECIAL: &[char] = &['\\', ']', '[', '^', '-', '/'];

/// Escape kinds keep their recorded text; simple chars are escaped exactly
/// when they are special in `context`.
pub(super) fn write_char(ch: &Char, context: Context, out: &mut String) {
    if ch.kind == CharKind::Simple && needs_escape(&ch.value, context) {
        out.push('\\');
    }
    out.push_str(&ch.value);
}

fn needs_escape(value: &str, context: Context) -> bool {
    let mut chars = value.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return false;
    };
    match context {
        Context::Pattern => PATTERN_SPECIAL.contains(&ch),
        Context::Class => CLASS_SPECIAL.contains(&ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(ch: &Char, context: Context) -> String {
        let mut out = String::new();
        write_char(ch, context, &mut out);
        out
    }

    #[test]
    fn escapes_by_context() {
        assert_eq!(render(&Char::simple('*'), Context::Pattern), "\\*");
        assert_eq!(render(&Char::simple('*'), Context::Class), "*");
        assert_eq!(render(&Char::simple('-'), Context::Pattern), "-");
        assert_eq!(render(&Char::simple('-'), Context::Class), "\\-");
    }

    #[test]
    fn drops_redundant_identity_escapes() {
        assert_eq!(render(&Char::escaped('a'), Context::Pattern), "a");
        assert_eq!(render(&Char::escaped('.'), Context::Pattern), "\\.");
    }

    #[test]
    fn keeps_recorded_escape_text() {
        assert_eq!(render(&Char::meta("\\d"), Context::Pattern), "\\d");
        assert_eq!(
            render(&Char::new("\\x2D", CharKind::Hex), Context::Class),
            "\\x2D"
        );
    }
}
