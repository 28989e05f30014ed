//! Configuration management for Quarry.
//!
//! Provides the rewrite batch composition and fixed-point settings consumed
//! by the optimizer. Nothing here is global: callers build a config value and
//! hand it to the optimizer explicitly.

use std::collections::HashSet;
use std::fmt;

use common_error::{QuarryError, QuarryResult};
use serde::{Deserialize, Serialize};

/// Top-level Quarry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarryConfig {
    /// Rewrite stage configuration.
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

impl QuarryConfig {
    /// Parse a configuration from JSON, validating it afterwards.
    pub fn from_json_str(json: &str) -> QuarryResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.optimizer.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> QuarryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Identifies one of the built-in rewrite rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleName {
    ReplaceExceptWithFilter,
    ReplaceExceptWithAntiJoin,
    ReplaceIntersectWithSemiJoin,
    ReplaceDistinctWithAggregate,
    ReplaceDeduplicateWithAggregate,
}

impl RuleName {
    /// Every built-in rule, in default batch order.
    pub const ALL: [RuleName; 5] = [
        Self::ReplaceExceptWithFilter,
        Self::ReplaceExceptWithAntiJoin,
        Self::ReplaceIntersectWithSemiJoin,
        Self::ReplaceDistinctWithAggregate,
        Self::ReplaceDeduplicateWithAggregate,
    ];

    /// The rule's display name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReplaceExceptWithFilter => "ReplaceExceptWithFilter",
            Self::ReplaceExceptWithAntiJoin => "ReplaceExceptWithAntiJoin",
            Self::ReplaceIntersectWithSemiJoin => "ReplaceIntersectWithSemiJoin",
            Self::ReplaceDistinctWithAggregate => "ReplaceDistinctWithAggregate",
            Self::ReplaceDeduplicateWithAggregate => "ReplaceDeduplicateWithAggregate",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the fixed-point rewrite executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Rules to run, in the order they are attempted within each pass.
    pub rules: Vec<RuleName>,
    /// Maximum number of passes before giving up on reaching a fixpoint.
    pub max_iterations: usize,
    /// Whether to record before/after plans for each rule that fires.
    pub enable_trace: bool,
    /// Whether to check that every rule application preserves the output schema.
    pub verify_schema: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            rules: RuleName::ALL.to_vec(),
            max_iterations: 100,
            enable_trace: false,
            verify_schema: false,
        }
    }
}

impl OptimizerConfig {
    /// Replace the rule batch.
    pub fn with_rules(mut self, rules: impl IntoIterator<Item = RuleName>) -> Self {
        self.rules = rules.into_iter().collect();
        self
    }

    /// Set the maximum number of passes.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Enable or disable tracing.
    pub fn with_trace(mut self, enable: bool) -> Self {
        self.enable_trace = enable;
        self
    }

    /// Enable or disable schema verification after each rule.
    pub fn with_schema_verification(mut self, enable: bool) -> Self {
        self.verify_schema = enable;
        self
    }

    /// Check that the configuration describes a runnable batch.
    ///
    /// Rejects a zero iteration cap and rules listed more than once.
    pub fn validate(&self) -> QuarryResult<()> {
        if self.max_iterations == 0 {
            return Err(QuarryError::invalid_parameter(
                "max_iterations must be at least 1",
            ));
        }
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule) {
                return Err(QuarryError::invalid_parameter(format!(
                    "rule {rule} listed more than once"
                )));
            }
        }
        Ok(())
    }
}
