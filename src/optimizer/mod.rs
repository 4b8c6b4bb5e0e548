mod options;
mod rules;

pub use options::{
    DEFAULT_ITERATION_FACTOR, OptimizerOptions, OptimizerOptionsBuilder, OptimizerOptionsError,
};

use crate::ast::Node;
use crate::errors::RegexpTreeResult;
use crate::flags::Flags;
use crate::input::TransformInput;
use crate::transform::{Pipeline, TransformResult};

/// Outcome of a fixpoint run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeReport {
    /// Full passes over the rule pipeline.
    pub rounds: usize,
    pub mutations: usize,
    /// False when the round cap was hit while rules were still firing.
    pub reached_fixpoint: bool,
    pub iteration_cap: usize,
}

/// Parses (when given text) and optimizes a pattern. The result matches
/// the same strings as the input and is never longer in node count.
#[tracing::instrument(level = "debug", skip_all)]
pub fn optimize<'a>(
    input: impl Into<TransformInput<'a>>,
    options: &OptimizerOptions,
) -> RegexpTreeResult<TransformResult> {
    options.validate()?;
    let mut ast = input.into().into_ast()?;
    optimize_tree(&mut ast, options);
    Ok(TransformResult::new(ast))
}

/// Applies the enabled rules to `ast` until a whole round changes nothing
/// or the round cap is reached.
pub fn optimize_tree(ast: &mut Node, options: &OptimizerOptions) -> OptimizeReport {
    let iteration_cap = options.iteration_cap(ast.node_count());
    let flags = ast.as_regexp().map_or(Flags::empty(), |regexp| regexp.flags);
    let mut pipeline = rules::pipeline(options, flags);
    run_rounds(ast, &mut pipeline, iteration_cap)
}

fn run_rounds(
    ast: &mut Node,
    pipeline: &mut Pipeline<'_>,
    iteration_cap: usize,
) -> OptimizeReport {
    let mut report = OptimizeReport {
        rounds: 0,
        mutations: 0,
        reached_fixpoint: pipeline.is_empty(),
        iteration_cap,
    };

    while !report.reached_fixpoint && report.rounds < iteration_cap {
        let stats = pipeline.run(ast);
        report.rounds += 1;
        report.mutations += stats.mutations;
        tracing::trace!(
            round = report.rounds,
            mutations = stats.mutations,
            "optimizer round"
        );
        report.reached_fixpoint = stats.mutations == 0;
    }

    if report.reached_fixpoint {
        tracing::debug!(
            rounds = report.rounds,
            mutations = report.mutations,
            "optimizer reached a fixpoint"
        );
    } else {
        tracing::warn!(
            iteration_cap,
            mutations = report.mutations,
            "optimizer stopped at its round cap before reaching a fixpoint"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Char, NodeType};
    use crate::transform::Pass;
    use crate::traverse::Handlers;

    fn flip_flop() -> Pass<'static> {
        Pass::new(
            "flip-flop",
            Handlers::new().on_enter(NodeType::Char, |path| {
                let next = if matches!(path.node(), Node::Char(ch) if ch.value == "a") {
                    'b'
                } else {
                    'a'
                };
                path.replace(Char::simple(next).into());
            }),
        )
    }

    #[test]
    fn stops_at_the_round_cap() {
        let mut ast = crate::parse("/a/").expect("pattern should parse");
        let mut pipeline = Pipeline::from(flip_flop());
        let report = run_rounds(&mut ast, &mut pipeline, 3);

        assert_eq!(report.rounds, 3);
        assert_eq!(report.mutations, 3);
        assert_eq!(report.iteration_cap, 3);
        assert!(!report.reached_fixpoint);
    }

    #[test]
    fn empty_pipeline_is_already_a_fixpoint() {
        let mut ast = crate::parse("/a/").expect("pattern should parse");
        let report = run_rounds(&mut ast, &mut Pipeline::new(), 3);
        assert_eq!(report.rounds, 0);
        assert!(report.reached_fixpoint);
    }
}
