use std::borrow::Cow;

use crate::ast::Node;
use crate::traverse::{Handlers, TraversalStats, traverse};

/// One named handler set, applied as a single traversal.
pub struct Pass<'h> {
    name: Cow<'static, str>,
    handlers: Handlers<'h>,
}

impl<'h> Pass<'h> {
    pub fn new(name: impl Into<Cow<'static, str>>, handlers: Handlers<'h>) -> Self {
        Self {
            name: name.into(),
            handlers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[tracing::instrument(level = "trace", skip_all, fields(pass = %self.name))]
    pub fn run(&mut self, ast: &mut Node) -> TraversalStats {
        let stats = traverse(ast, &mut self.handlers);
        tracing::trace!(
            entered = stats.entered,
            mutations = stats.mutations,
            stopped = stats.stopped,
            "pass finished"
        );
        stats
    }
}

impl std::fmt::Debug for Pass<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pass").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub passes: usize,
    pub mutations: usize,
    /// Passes whose traversal was ended early by a handler.
    pub stopped: usize,
}

/// Ordered passes. Every pass sees the tree as left by the previous one; a
/// stop ends the current pass only.
#[derive(Debug, Default)]
pub struct Pipeline<'h> {
    passes: Vec<Pass<'h>>,
}

impl<'h> Pipeline<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pass(mut self, pass: Pass<'h>) -> Self {
        self.push(pass);
        self
    }

    pub fn push(&mut self, pass: Pass<'h>) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(Pass::name)
    }

    pub fn run(&mut self, ast: &mut Node) -> PipelineStats {
        let mut stats = PipelineStats::default();
        for pass in &mut self.passes {
            let pass_stats = pass.run(ast);
            stats.passes += 1;
            stats.mutations += pass_stats.mutations;
            if pass_stats.stopped {
                stats.stopped += 1;
            }
        }
        stats
    }
}

impl<'h> From<Pass<'h>> for Pipeline<'h> {
    fn from(pass: Pass<'h>) -> Self {
        Self::new().with_pass(pass)
    }
}

impl<'h> FromIterator<Pass<'h>> for Pipeline<'h> {
    fn from_iter<I: IntoIterator<Item = Pass<'h>>>(iter: I) -> Self {
        Self {
            passes: iter.into_iter().collect(),
        }
    }
}
