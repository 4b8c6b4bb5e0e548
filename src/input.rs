use std::borrow::Cow;
use std::fmt;

use crate::ast::Node;
use crate::errors::RegexpTreeResult;

/// Pattern text handed to the parser. Values that only know how to print
/// themselves are converted here, once; the parser only ever sees text.
pub enum PatternSource<'a> {
    Text(Cow<'a, str>),
    Display(&'a dyn fmt::Display),
}

impl<'a> PatternSource<'a> {
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        PatternSource::Display(value)
    }

    pub fn into_text(self) -> Cow<'a, str> {
        match self {
            PatternSource::Text(text) => text,
            PatternSource::Display(value) => Cow::Owned(value.to_string()),
        }
    }
}

impl fmt::Debug for PatternSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSource::Text(text) => f.debug_tuple("Text").field(text).finish(),
            PatternSource::Display(value) => {
                f.debug_tuple("Display").field(&value.to_string()).finish()
            }
        }
    }
}

impl<'a> From<&'a str> for PatternSource<'a> {
    fn from(text: &'a str) -> Self {
        PatternSource::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for PatternSource<'a> {
    fn from(text: &'a String) -> Self {
        PatternSource::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<String> for PatternSource<'_> {
    fn from(text: String) -> Self {
        PatternSource::Text(Cow::Owned(text))
    }
}

/// Input of `transform` and `optimize`: an existing tree or pattern text.
#[derive(Debug)]
pub enum TransformInput<'a> {
    Ast(Node),
    Source(PatternSource<'a>),
}

impl TransformInput<'_> {
    pub(crate) fn into_ast(self) -> RegexpTreeResult<Node> {
        match self {
            TransformInput::Ast(node) => Ok(node),
            TransformInput::Source(source) => crate::parse(source),
        }
    }
}

impl From<Node> for TransformInput<'_> {
    fn from(node: Node) -> Self {
        TransformInput::Ast(node)
    }
}

impl<'a> From<PatternSource<'a>> for TransformInput<'a> {
    fn from(source: PatternSource<'a>) -> Self {
        TransformInput::Source(source)
    }
}

impl<'a> From<&'a str> for TransformInput<'a> {
    fn from(text: &'a str) -> Self {
        TransformInput::Source(text.into())
    }
}

impl From<String> for TransformInput<'_> {
    fn from(text: String) -> Self {
        TransformInput::Source(text.into())
    }
}
