use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("{construct} (node {node_index}) cannot be compiled by the host regex engine")]
    Unsupported {
        construct: &'static str,
        /// Pre-order position of the offending node.
        node_index: usize,
    },
    #[error("the pattern root must be a RegExp node, found {found}")]
    NotARoot { found: String },
    #[error(transparent)]
    Build(#[from] regex::Error),
}
