//! Rewrite rule trait and the results the optimizer reports.

use common_error::QuarryResult;
use quarry_logical::{LogicalOp, LogicalPlan};

/// A single rewrite rule.
///
/// A rule matches one operator shape and produces an equivalent replacement
/// subtree whose output attributes (order, names, ids, nullability) are the
/// same as the node it replaces. A rule that does not match, or whose safety
/// preconditions fail, declines by returning `None`; declining is never an
/// error.
pub trait RewriteRule: Send + Sync {
    /// Get the name of this rule.
    fn name(&self) -> &'static str;

    /// Get a description of what this rule does.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Try to rewrite a single operator whose children have already been
    /// visited.
    fn rewrite(&self, op: &LogicalOp) -> QuarryResult<Option<LogicalOp>>;

    /// Apply this rule to every operator of the plan, bottom-up.
    fn apply(&self, plan: LogicalPlan) -> QuarryResult<Transformed> {
        let mut changed = false;
        let plan = plan.try_transform_up(|op| -> QuarryResult<LogicalOp> {
            match self.rewrite(&op)? {
                Some(rewritten) => {
                    changed = true;
                    Ok(rewritten)
                }
                None => Ok(op),
            }
        })?;

        Ok(Transformed { plan, changed })
    }
}

/// The result of applying a rewrite rule.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The (potentially transformed) plan.
    pub plan: LogicalPlan,
    /// Whether the plan was actually changed.
    pub changed: bool,
}

impl Transformed {
    /// The plan was changed.
    pub fn yes(plan: LogicalPlan) -> Self {
        Self {
            plan,
            changed: true,
        }
    }

    /// The plan was left as it was.
    pub fn no(plan: LogicalPlan) -> Self {
        Self {
            plan,
            changed: false,
        }
    }
}

impl From<LogicalPlan> for Transformed {
    fn from(plan: LogicalPlan) -> Self {
        Self::no(plan)
    }
}

/// A trace entry for a single rule application.
#[derive(Debug, Clone)]
pub struct RuleTrace {
    /// The name of the rule that was applied.
    pub rule_name: String,
    /// The plan before the rule was applied (as explain string).
    pub before: String,
    /// The plan after the rule was applied (as explain string).
    pub after: String,
    /// Whether the rule actually changed the plan.
    pub changed: bool,
}

impl RuleTrace {
    /// Create a new trace entry.
    pub fn new(
        rule_name: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
        changed: bool,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            before: before.into(),
            after: after.into(),
            changed,
        }
    }
}

/// The result of optimization with optional trace information.
#[derive(Debug, Clone)]
pub struct OptimizedPlan {
    /// The final plan.
    pub plan: LogicalPlan,
    /// Number of passes over the rule batch.
    pub iterations: usize,
    /// Number of rule applications that changed the plan.
    pub rules_applied: usize,
    /// Whether the last pass left the plan unchanged. `false` means the
    /// iteration cap stopped the executor first.
    pub converged: bool,
    /// Rule applications that changed the plan (if tracing was enabled).
    pub trace: Vec<RuleTrace>,
}

impl OptimizedPlan {
    /// Create a result for a plan no pass has run over yet.
    pub fn new(plan: LogicalPlan) -> Self {
        Self {
            plan,
            iterations: 0,
            rules_applied: 0,
            converged: false,
            trace: Vec::new(),
        }
    }

    /// Format the trace as a human-readable string.
    pub fn format_trace(&self) -> String {
        let mut output = format!(
            "Optimization completed in {} iterations, {} rules applied{}\n",
            self.iterations,
            self.rules_applied,
            if self.converged {
                ""
            } else {
                " (iteration cap reached)"
            }
        );

        if self.trace.is_empty() {
            output.push_str("  (no trace available)\n");
        } else {
            for (i, entry) in self.trace.iter().filter(|t| t.changed).enumerate() {
                output.push_str(&format!(
                    "\n--- Rule {} applied: {} ---\n",
                    i + 1,
                    entry.rule_name
                ));
                output.push_str("Before:\n");
                output.push_str(&entry.before);
                output.push_str("\nAfter:\n");
                output.push_str(&entry.after);
            }
        }

        output
    }
}
