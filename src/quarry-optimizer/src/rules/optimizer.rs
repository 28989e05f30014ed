//! The fixed-point executor that applies a rule batch to logical plans.
//!
//! Each pass applies every rule in order to the whole tree. Passes repeat
//! until one leaves the plan structurally unchanged or the iteration cap is
//! reached.

use common_config::OptimizerConfig;
use common_error::{QuarryError, QuarryResult};
use log::{debug, warn};
use quarry_core::Attribute;
use quarry_logical::validation::validate_plan;
use quarry_logical::LogicalPlan;

use super::rule::{OptimizedPlan, RewriteRule, RuleTrace};
use super::rule_for;

/// The fixed-point rule executor.
///
/// The rule list and settings are fixed at construction; the optimizer holds
/// no other state, so one instance can serve any number of plans.
pub struct Optimizer {
    /// The rules to apply (in order).
    rules: Vec<Box<dyn RewriteRule>>,
    /// Configuration. Its `rules` list is only read by [`Optimizer::from_config`].
    config: OptimizerConfig,
}

impl Optimizer {
    /// Create a new optimizer with the given rules and default settings.
    pub fn new(rules: Vec<Box<dyn RewriteRule>>) -> Self {
        Self {
            rules,
            config: OptimizerConfig::default(),
        }
    }

    /// Create a new optimizer with custom settings.
    ///
    /// `rules` is the batch that runs; `config.rules` is ignored here. Use
    /// [`Optimizer::from_config`] to build the batch from the configuration.
    pub fn with_config(rules: Vec<Box<dyn RewriteRule>>, config: OptimizerConfig) -> Self {
        let configured = config.rules.iter().map(|r| r.as_str());
        if configured.ne(rules.iter().map(|r| r.name())) {
            debug!(
                "Optimizer built with [{}]; configured rule list [{}] is not used",
                rules.iter().map(|r| r.name()).collect::<Vec<_>>().join(", "),
                config
                    .rules
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Self { rules, config }
    }

    /// Build the batch named by `config.rules`, in that order.
    pub fn from_config(config: &OptimizerConfig) -> QuarryResult<Self> {
        config.validate()?;
        let rules = config.rules.iter().copied().map(rule_for).collect();
        Ok(Self::with_config(rules, config.clone()))
    }

    /// Add a rule to the end of the batch.
    pub fn add_rule<R: RewriteRule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    /// Names of the rules in the batch, in order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// The executor settings.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Optimize a logical plan.
    ///
    /// Runs passes until the plan stops changing. Hitting the iteration cap
    /// is not an error: the last plan is returned with `converged == false`.
    pub fn optimize(&self, plan: LogicalPlan) -> QuarryResult<OptimizedPlan> {
        let mut current_plan = plan;
        let mut iterations = 0;
        let mut rules_applied = 0;
        let mut trace = Vec::new();
        let mut converged = false;

        while iterations < self.config.max_iterations {
            iterations += 1;
            let start = current_plan.clone();
            current_plan = self.run_pass(current_plan, iterations, &mut rules_applied, &mut trace)?;

            if current_plan == start {
                debug!("No changes in iteration {}, reached fixpoint", iterations);
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(
                "Rewrite batch did not reach a fixpoint within {} iterations; returning the last plan",
                self.config.max_iterations
            );
        }

        Ok(OptimizedPlan {
            plan: current_plan,
            iterations,
            rules_applied,
            converged,
            trace,
        })
    }

    /// Optimize with a single pass (no fixpoint iteration).
    pub fn optimize_once(&self, plan: LogicalPlan) -> QuarryResult<OptimizedPlan> {
        let start = plan.clone();
        let mut rules_applied = 0;
        let mut trace = Vec::new();

        let plan = self.run_pass(plan, 1, &mut rules_applied, &mut trace)?;
        let converged = plan == start;

        Ok(OptimizedPlan {
            plan,
            iterations: 1,
            rules_applied,
            converged,
            trace,
        })
    }

    fn run_pass(
        &self,
        mut current_plan: LogicalPlan,
        iteration: usize,
        rules_applied: &mut usize,
        trace: &mut Vec<RuleTrace>,
    ) -> QuarryResult<LogicalPlan> {
        for rule in &self.rules {
            let before = self.config.enable_trace.then(|| current_plan.explain());
            let schema_before = self.config.verify_schema.then(|| current_plan.output());

            let result = rule.apply(current_plan)?;

            if result.changed {
                *rules_applied += 1;
                debug!("Rule '{}' applied in iteration {}", rule.name(), iteration);

                if let Some(schema) = schema_before {
                    verify_rewrite(&**rule, &schema, &result.plan)?;
                }

                if let Some(before) = before {
                    trace.push(RuleTrace::new(
                        rule.name(),
                        before,
                        result.plan.explain(),
                        true,
                    ));
                }
            }

            current_plan = result.plan;
        }

        Ok(current_plan)
    }
}

/// Check that a rule kept the plan's output and left it well-formed.
fn verify_rewrite(
    rule: &dyn RewriteRule,
    schema_before: &[Attribute],
    plan: &LogicalPlan,
) -> QuarryResult<()> {
    let schema_after = plan.output();
    if schema_after != schema_before {
        return Err(QuarryError::internal(format!(
            "rule {} changed the plan output from [{}] to [{}]",
            rule.name(),
            join_attrs(schema_before),
            join_attrs(&schema_after)
        )));
    }

    validate_plan(plan).map_err(|e| {
        QuarryError::internal(format!("rule {} produced an invalid plan: {e}", rule.name()))
    })
}

fn join_attrs(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Default for Optimizer {
    fn default() -> Self {
        let config = OptimizerConfig::default();
        let rules = config.rules.iter().copied().map(rule_for).collect();
        Self::with_config(rules, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Transformed;
    use common_config::RuleName;
    use quarry_core::DataType;
    use quarry_logical::{attr, lit, LogicalOp, PlanBuilder, RelationOp};

    /// Wraps the root in a limit unless one is already there.
    struct AddLimitRule;

    impl RewriteRule for AddLimitRule {
        fn name(&self) -> &'static str {
            "AddLimit"
        }

        fn rewrite(&self, _op: &LogicalOp) -> QuarryResult<Option<LogicalOp>> {
            Ok(None)
        }

        fn apply(&self, plan: LogicalPlan) -> QuarryResult<Transformed> {
            if matches!(plan.root(), LogicalOp::Limit(_)) {
                return Ok(plan.into());
            }
            Ok(Transformed::yes(LogicalPlan::new(
                LogicalOp::limit(plan.into_root(), 1000),
            )))
        }
    }

    /// Drops the first output column, breaking the schema.
    struct DropColumnRule;

    impl RewriteRule for DropColumnRule {
        fn name(&self) -> &'static str {
            "DropColumn"
        }

        fn rewrite(&self, op: &LogicalOp) -> QuarryResult<Option<LogicalOp>> {
            Ok(match op {
                LogicalOp::Distinct(d) => {
                    let kept = d.input.output().into_iter().skip(1);
                    Some(LogicalOp::project(
                        d.input.as_ref().clone(),
                        kept.map(|a| attr(&a)).collect(),
                    ))
                }
                _ => None,
            })
        }
    }

    fn relation() -> RelationOp {
        RelationOp::new(
            "person",
            vec![
                Attribute::new("name", DataType::String),
                Attribute::new("age", DataType::Int64),
            ],
        )
    }

    #[test]
    fn test_optimizer_basic() {
        let optimizer = Optimizer::new(vec![Box::new(AddLimitRule)]);
        let rel = relation();
        let age = rel.output[1].clone();

        let plan = PlanBuilder::relation(rel)
            .filter(attr(&age).gt(lit(18i64)))
            .build();

        let result = optimizer.optimize(plan).unwrap();

        assert_eq!(result.rules_applied, 1);
        assert_eq!(result.iterations, 2);
        assert!(result.converged);
        assert!(result
            .plan
            .contains_op(|op| matches!(op, LogicalOp::Limit(_))));
    }

    #[test]
    fn test_optimizer_fixpoint() {
        let optimizer = Optimizer::new(vec![]);
        let plan = PlanBuilder::relation(relation()).build();

        let result = optimizer.optimize(plan).unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.rules_applied, 0);
        assert!(result.converged);
    }

    #[test]
    fn test_optimizer_with_trace() {
        let config = OptimizerConfig::default().with_trace(true);
        let optimizer = Optimizer::with_config(vec![Box::new(AddLimitRule)], config);

        let plan = PlanBuilder::relation(relation()).build();

        let result = optimizer.optimize(plan).unwrap();

        assert_eq!(result.trace.len(), 1);
        assert!(result.trace[0].changed);
        assert_eq!(result.trace[0].rule_name, "AddLimit");
        assert!(result.trace[0].after.contains("Limit 1000"));
        assert!(result.format_trace().contains("--- Rule 1 applied: AddLimit ---"));
    }

    #[test]
    fn test_optimize_once() {
        let optimizer = Optimizer::new(vec![Box::new(AddLimitRule)]);
        let result = optimizer
            .optimize_once(PlanBuilder::relation(relation()).build())
            .unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.rules_applied, 1);
        assert!(!result.converged);
    }

    #[test]
    fn test_schema_verification_catches_broken_rule() {
        let plan = PlanBuilder::relation(relation()).distinct().build();

        let unchecked = Optimizer::new(vec![Box::new(DropColumnRule)]);
        assert!(unchecked.optimize(plan.clone()).is_ok());

        let config = OptimizerConfig::default().with_schema_verification(true);
        let checked = Optimizer::with_config(vec![Box::new(DropColumnRule)], config);
        let err = checked.optimize(plan).unwrap_err();
        assert!(matches!(err, QuarryError::InternalError(_)));
        assert!(err.to_string().contains("DropColumn"));
    }

    #[test]
    fn test_from_config() {
        let config = OptimizerConfig::default().with_rules([
            RuleName::ReplaceDistinctWithAggregate,
            RuleName::ReplaceExceptWithAntiJoin,
        ]);
        let optimizer = Optimizer::from_config(&config).unwrap();
        assert_eq!(
            optimizer.rule_names(),
            vec!["ReplaceDistinctWithAggregate", "ReplaceExceptWithAntiJoin"]
        );

        let invalid = OptimizerConfig::default().with_max_iterations(0);
        assert!(Optimizer::from_config(&invalid).is_err());
    }

    #[test]
    fn test_with_config_runs_supplied_rules() {
        let config = OptimizerConfig::default().with_rules([RuleName::ReplaceDistinctWithAggregate]);
        let optimizer = Optimizer::with_config(vec![Box::new(AddLimitRule)], config);
        assert_eq!(optimizer.rule_names(), vec!["AddLimit"]);
        assert_eq!(
            optimizer.config().rules,
            vec![RuleName::ReplaceDistinctWithAggregate]
        );

        let plan = PlanBuilder::relation(relation()).distinct().build();
        let result = optimizer.optimize(plan).unwrap();
        assert!(matches!(result.plan.root(), LogicalOp::Limit(_)));
        assert!(result
            .plan
            .contains_op(|op| matches!(op, LogicalOp::Distinct(_))));
    }

    #[test]
    fn test_default_batch_order() {
        let mut optimizer = Optimizer::default();
        assert_eq!(
            optimizer.rule_names(),
            RuleName::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>()
        );
        optimizer.add_rule(AddLimitRule);
        assert_eq!(optimizer.rule_names().last(), Some(&"AddLimit"));
    }
}
