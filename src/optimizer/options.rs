use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ITERATION_FACTOR: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizerOptionsError {
    #[error("iteration factor must be greater than zero")]
    ZeroIterationFactor,
}

/// Rule switches and the fixpoint budget. Every rule is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerOptions {
    /// `aa*` to `a+`, `aa{2}` to `a{3}`.
    pub quantifier_fusion: bool,
    /// `a{1}` to `a`.
    pub remove_degenerate_quantifiers: bool,
    /// Sort and merge class members, `[a-ca-z]` to `[a-z]`.
    pub normalize_class_ranges: bool,
    /// Drop non-capturing groups that change nothing.
    pub ungroup: bool,
    /// Rounds allowed per tree node before the driver gives up.
    pub iteration_factor: usize,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            quantifier_fusion: true,
            remove_degenerate_quantifiers: true,
            normalize_class_ranges: true,
            ungroup: true,
            iteration_factor: DEFAULT_ITERATION_FACTOR,
        }
    }
}

impl OptimizerOptions {
    pub fn builder() -> OptimizerOptionsBuilder {
        OptimizerOptionsBuilder::default()
    }

    /// Options with every rule switched off.
    pub fn none() -> Self {
        Self {
            quantifier_fusion: false,
            remove_degenerate_quantifiers: false,
            normalize_class_ranges: false,
            ungroup: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), OptimizerOptionsError> {
        if self.iteration_factor == 0 {
            return Err(OptimizerOptionsError::ZeroIterationFactor);
        }
        Ok(())
    }

    /// Round cap for a tree of `node_count` nodes; never below one.
    pub fn iteration_cap(&self, node_count: usize) -> usize {
        self.iteration_factor.saturating_mul(node_count).max(1)
    }
}

#[derive(Debug, Default, Clone)]
pub struct OptimizerOptionsBuilder {
    options: OptimizerOptions,
}

impl OptimizerOptionsBuilder {
    pub fn quantifier_fusion(mut self, value: bool) -> Self {
        self.options.quantifier_fusion = value;
        self
    }

    pub fn remove_degenerate_quantifiers(mut self, value: bool) -> Self {
        self.options.remove_degenerate_quantifiers = value;
        self
    }

    pub fn normalize_class_ranges(mut self, value: bool) -> Self {
        self.options.normalize_class_ranges = value;
        self
    }

    pub fn ungroup(mut self, value: bool) -> Self {
        self.options.ungroup = value;
        self
    }

    pub fn iteration_factor(mut self, value: usize) -> Self {
        self.options.iteration_factor = value;
        self
    }

    pub fn build(self) -> Result<OptimizerOptions, OptimizerOptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }
}
