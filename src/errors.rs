use crate::flags::FlagError;
use crate::matcher::MatcherError;
use crate::optimizer::OptimizerOptionsError;
use crate::syntax::{LexError, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegexpTreeError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Flag(#[from] FlagError),
    #[error(transparent)]
    Matcher(#[from] MatcherError),
    #[error(transparent)]
    OptimizerOptions(#[from] OptimizerOptionsError),
}

impl RegexpTreeError {
    /// Byte offset of the offending input, when the error has one. Flag
    /// offsets count from the start of the flag string.
    pub fn offset(&self) -> Option<usize> {
        match self {
            RegexpTreeError::Lex(err) => Some(err.offset()),
            RegexpTreeError::Flag(err) => Some(err.offset()),
            RegexpTreeError::Parse(err) => match err {
                ParseError::MissingDelimiter { .. } => None,
                ParseError::UnterminatedGroup { offset, .. }
                | ParseError::UnmatchedClosingParen { offset }
                | ParseError::UnterminatedClass { offset }
                | ParseError::NothingToRepeat { offset }
                | ParseError::RepetitionOutOfOrder { offset, .. }
                | ParseError::RangeOutOfOrder { offset, .. }
                | ParseError::DuplicateGroupName { offset, .. }
                | ParseError::UnresolvedBackreference { offset, .. }
                | ParseError::NestingTooDeep { offset, .. }
                | ParseError::UnexpectedToken { offset, .. } => Some(*offset),
            },
            RegexpTreeError::Matcher(_) | RegexpTreeError::OptimizerOptions(_) => None,
        }
    }
}

pub type RegexpTreeResult<T> = Result<T, RegexpTreeError>;
