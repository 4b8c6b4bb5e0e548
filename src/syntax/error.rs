use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("pattern ends with a dangling backslash at offset {offset}")]
    DanglingBackslash { offset: usize },
    #[error("character class opened at offset {offset} is never closed")]
    UnterminatedClass { offset: usize },
    #[error("malformed hexadecimal escape at offset {offset}")]
    InvalidHexEscape { offset: usize },
    #[error("malformed unicode escape at offset {offset}")]
    InvalidUnicodeEscape { offset: usize },
    #[error("malformed control escape at offset {offset}")]
    InvalidControlEscape { offset: usize },
    #[error("malformed unicode property escape at offset {offset}")]
    InvalidPropertyEscape { offset: usize },
    #[error("malformed named backreference at offset {offset}")]
    InvalidNamedReference { offset: usize },
    #[error("invalid group syntax at offset {offset}")]
    InvalidGroupSyntax { offset: usize },
    #[error("invalid group name '{name}' at offset {offset}")]
    InvalidGroupName { offset: usize, name: String },
    #[error("group name starting at offset {offset} is never closed with '>'")]
    UnterminatedGroupName { offset: usize },
    #[error("quantifier bound at offset {offset} is too large")]
    QuantifierOverflow { offset: usize },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            Self::DanglingBackslash { offset }
            | Self::UnterminatedClass { offset }
            | Self::InvalidHexEscape { offset }
            | Self::InvalidUnicodeEscape { offset }
            | Self::InvalidControlEscape { offset }
            | Self::InvalidPropertyEscape { offset }
            | Self::InvalidNamedReference { offset }
            | Self::InvalidGroupSyntax { offset }
            | Self::InvalidGroupName { offset, .. }
            | Self::UnterminatedGroupName { offset }
            | Self::QuantifierOverflow { offset } => *offset,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("pattern '{input}' is not of the form /body/flags")]
    MissingDelimiter { input: String },
    #[error("group opened at offset {offset} expected ')' but found {found}")]
    UnterminatedGroup { offset: usize, found: String },
    #[error("unmatched ')' at offset {offset}")]
    UnmatchedClosingParen { offset: usize },
    #[error("character class opened at offset {offset} is never closed")]
    UnterminatedClass { offset: usize },
    #[error("nothing to repeat at offset {offset}")]
    NothingToRepeat { offset: usize },
    #[error("numbers out of order in quantifier {{{min},{max}}} at offset {offset}")]
    RepetitionOutOfOrder { offset: usize, min: u32, max: u32 },
    #[error("range out of order in character class ('{from}' > '{to}') at offset {offset}")]
    RangeOutOfOrder {
        offset: usize,
        from: String,
        to: String,
    },
    #[error("duplicate capture group name '{name}' at offset {offset}")]
    DuplicateGroupName { name: String, offset: usize },
    #[error("backreference \\{reference} at offset {offset} does not name an existing group")]
    UnresolvedBackreference { reference: String, offset: usize },
    #[error("groups nested deeper than {limit} at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken { offset: usize, found: String },
}

pub type ParseResult<T> = Result<T, ParseError>;
