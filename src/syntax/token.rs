use crate::ast::{AssertionKind, BackrefTarget, Char};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text of the token.
    pub raw: &'a str,
    /// Byte offset of the token in the pattern body.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Char(Char),
    ClassOpen { negated: bool },
    ClassClose,
    GroupOpen(GroupOpen),
    GroupClose,
    Quantifier {
        min: u32,
        max: Option<u32>,
        greedy: bool,
    },
    Bar,
    Assertion(AssertionKind),
    Backreference(BackrefTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOpen {
    Capturing,
    Named(String),
    NonCapturing,
    Lookahead,
    NegativeLookahead,
    Lookbehind,
    NegativeLookbehind,
}

impl TokenKind {
    pub fn is_quantifier(&self) -> bool {
        matches!(self, TokenKind::Quantifier { .. })
    }

    /// True for an unescaped `-` inside a class.
    pub fn is_range_dash(&self) -> bool {
        matches!(self, TokenKind::Char(ch) if !ch.escaped && ch.value == "-")
    }
}
