mod pipeline;

pub use pipeline::{Pass, Pipeline, PipelineStats};

use std::fmt;

use crate::ast::Node;
use crate::errors::RegexpTreeResult;
use crate::generator::{generate, generate_parts};
use crate::input::TransformInput;

/// Runs every pass of `pipeline`, in order, over the parsed (or given) tree.
#[tracing::instrument(level = "debug", skip_all, fields(passes = pipeline.len()))]
pub fn transform<'a>(
    input: impl Into<TransformInput<'a>>,
    pipeline: &mut Pipeline<'_>,
) -> RegexpTreeResult<TransformResult> {
    let mut ast = input.into().into_ast()?;
    let stats = pipeline.run(&mut ast);
    tracing::debug!(
        mutations = stats.mutations,
        stopped = stats.stopped,
        "transform finished"
    );
    Ok(TransformResult::new(ast))
}

/// A transformed tree and its textual forms. `Display` prints the same text
/// as [`TransformResult::to_pattern_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    ast: Node,
}

impl TransformResult {
    pub fn new(ast: Node) -> Self {
        Self { ast }
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }

    pub fn into_ast(self) -> Node {
        self.ast
    }

    pub fn to_pattern_text(&self) -> String {
        generate(&self.ast)
    }

    /// Pattern text without delimiters or flags.
    pub fn pattern(&self) -> String {
        match self.ast.as_regexp() {
            Some(regexp) => generate_parts(regexp).0,
            None => generate(&self.ast),
        }
    }

    /// Canonical flag text; empty when the tree has no `RegExp` root.
    pub fn flags(&self) -> String {
        self.ast
            .as_regexp()
            .map(|regexp| regexp.flags.to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for TransformResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pattern_text())
    }
}

impl From<TransformResult> for Node {
    fn from(result: TransformResult) -> Self {
        result.ast
    }
}
