pub mod ast;
pub mod errors;
pub mod flags;
pub mod generator;
mod input;
pub mod matcher;
pub mod optimizer;
pub mod syntax;
pub mod transform;
pub mod traverse;

pub use ast::{Node, NodeType, RegExp};
pub use errors::{RegexpTreeError, RegexpTreeResult};
pub use flags::Flags;
pub use generator::generate;
pub use input::{PatternSource, TransformInput};
pub use matcher::{Matcher, compile, to_matcher};
pub use optimizer::{OptimizeReport, OptimizerOptions, optimize, optimize_tree};
pub use transform::{Pass, Pipeline, TransformResult, transform};
pub use traverse::{Handlers, NodePath, TraversalStats, traverse};

/// Parses a delimited pattern such as `/a+b/gi` into a `RegExp` tree.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse<'a>(source: impl Into<PatternSource<'a>>) -> RegexpTreeResult<Node> {
    let text = source.into().into_text();
    let (body, flags) = syntax::split_delimited(&text)?;
    parse_with_flags(body, flags)
}

/// Parses a pattern body and its flag string given separately.
pub fn parse_with_flags(body: &str, flags: &str) -> RegexpTreeResult<Node> {
    let flags = Flags::parse(flags)?;
    syntax::parse_body(body, flags)
}
