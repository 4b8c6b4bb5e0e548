mod error;
mod lexer;
mod parser;
mod token;

pub use error::{LexError, LexResult, ParseError, ParseResult};
pub use lexer::tokenize;
pub use parser::{MAX_NESTING_DEPTH, parse_body};
pub use token::{GroupOpen, Token, TokenKind};

/// Splits `/body/flags` at the first and last slash. The last slash always
/// ends the body because flags never contain one.
pub fn split_delimited(source: &str) -> ParseResult<(&str, &str)> {
    let missing = || ParseError::MissingDelimiter {
        input: source.to_string(),
    };
    if !source.starts_with('/') {
        return Err(missing());
    }
    match memchr::memrchr(b'/', source.as_bytes()) {
        Some(end) if end > 0 => Ok((&source[1..end], &source[end + 1..])),
        _ => Err(missing()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_body_and_flags() {
        assert_eq!(split_delimited("/a\\/b/gi"), Ok(("a\\/b", "gi")));
        assert_eq!(split_delimited("/[/]/"), Ok(("[/]", "")));
    }

    #[test]
    fn rejects_undelimited_source() {
        assert!(matches!(
            split_delimited("abc"),
            Err(ParseError::MissingDelimiter { .. })
        ));
        assert!(matches!(
            split_delimited("/abc"),
            Err(ParseError::MissingDelimiter { .. })
        ));
    }
}
