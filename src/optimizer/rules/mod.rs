mod class_ranges;
mod degenerate_quantifier;
mod quantifier_fusion;
mod ungroup;

use super::OptimizerOptions;
use crate::flags::Flags;
use crate::transform::Pipeline;

/// Enabled rules in application order. Fusion runs before ungrouping so
/// that `(?:ab)(?:ab)*` still sees two equal groups.
pub(super) fn pipeline(options: &OptimizerOptions, flags: Flags) -> Pipeline<'static> {
    let mut pipeline = Pipeline::new();
    if options.remove_degenerate_quantifiers {
        pipeline.push(degenerate_quantifier::pass());
    }
    if options.quantifier_fusion {
        pipeline.push(quantifier_fusion::pass());
    }
    if options.ungroup {
        pipeline.push(ungroup::pass());
    }
    if options.normalize_class_ranges {
        pipeline.push(class_ranges::pass(flags));
    }
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_rules_are_left_out() {
        let options = OptimizerOptions::builder()
            .ungroup(false)
            .quantifier_fusion(false)
            .build()
            .expect("valid options");
        let built = pipeline(&options, Flags::empty());
        let names: Vec<&str> = built.names().collect();
        assert_eq!(names, [degenerate_quantifier::NAME, class_ranges::NAME]);
    }
}
