//! Property tests: rewritten plans return the same multiset of rows as the
//! plans they replace, on random small tables with nulls and duplicates.

mod common;

use common::{bag, execute, Database, Row};
use proptest::prelude::*;
use quarry_core::{Attribute, DataType, Value};
use quarry_logical::{attr, lit, Expr, LogicalOp, LogicalPlan, RelationOp};
use quarry_optimizer::optimize;

fn small_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Null),
        3 => (0i64..3).prop_map(Value::Int64),
    ]
}

fn table() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(prop::collection::vec(small_value(), 2), 0..8)
}

struct Fixture {
    t: RelationOp,
    s: RelationOp,
    db: Database,
}

impl Fixture {
    fn new(t_rows: Vec<Row>, s_rows: Vec<Row>) -> Self {
        let relation = |name: &str, cols: [&str; 2]| {
            RelationOp::new(
                name,
                cols.iter()
                    .map(|c| Attribute::new(*c, DataType::Int64))
                    .collect(),
            )
        };
        Self {
            t: relation("t", ["a", "b"]),
            s: relation("s", ["c", "d"]),
            db: Database::new()
                .with_table("t", t_rows)
                .with_table("s", s_rows),
        }
    }

    fn a(&self) -> Expr {
        attr(&self.t.output[0])
    }

    fn b(&self) -> Expr {
        attr(&self.t.output[1])
    }

    fn t(&self) -> LogicalOp {
        LogicalOp::relation(self.t.clone())
    }

    fn s(&self) -> LogicalOp {
        LogicalOp::relation(self.s.clone())
    }

    /// Run `op` before and after optimization and compare the results.
    fn check(&self, op: LogicalOp) -> Result<(), TestCaseError> {
        let plan = LogicalPlan::new(op);
        let optimized = optimize(plan.clone()).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(optimized.output(), plan.output());
        prop_assert!(
            !optimized.contains_op(|op| matches!(op, LogicalOp::Except(_) | LogicalOp::Intersect(_))),
            "set operation left in:\n{}",
            optimized.explain()
        );

        let expected = execute(plan.root(), &self.db).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let actual =
            execute(optimized.root(), &self.db).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(
            bag(actual),
            bag(expected),
            "before:\n{}\nafter:\n{}",
            plan.explain(),
            optimized.explain()
        );
        Ok(())
    }
}

proptest! {
    #[test]
    fn except_matches_anti_join(t in table(), s in table()) {
        let f = Fixture::new(t, s);
        f.check(LogicalOp::except(f.t(), f.s()))?;
    }

    #[test]
    fn intersect_matches_semi_join(t in table(), s in table()) {
        let f = Fixture::new(t, s);
        f.check(LogicalOp::intersect(f.t(), f.s()))?;
    }

    #[test]
    fn distinct_matches_aggregate(t in table()) {
        let f = Fixture::new(t, vec![]);
        f.check(LogicalOp::distinct(f.t()))?;
    }

    #[test]
    fn deduplicate_matches_aggregate(t in table()) {
        let f = Fixture::new(t, vec![]);
        let (a, b) = (f.t.output[0].clone(), f.t.output[1].clone());
        f.check(LogicalOp::deduplicate(f.t(), vec![a.clone()]))?;
        f.check(LogicalOp::deduplicate(f.t(), vec![b.clone()]))?;
        f.check(LogicalOp::deduplicate(f.t(), vec![b, a]))?;
        f.check(LogicalOp::deduplicate(f.t(), vec![]))?;
    }

    #[test]
    fn except_of_filtered_views_matches_filter(t in table(), k in 0i64..3) {
        let f = Fixture::new(t, vec![]);
        let left = LogicalOp::filter(f.t(), f.a().not_eq(lit(k)));
        let shapes = vec![
            (f.t(), LogicalOp::filter(f.t(), f.a().gt_eq(lit(k)))),
            (
                left.clone(),
                LogicalOp::filter(f.t(), f.a().gt_eq(lit(k)).and(f.b().lt(lit(1i64)))),
            ),
            (
                left,
                LogicalOp::filter(
                    LogicalOp::filter(f.t(), f.b().eq(lit(k))),
                    f.a().lt(f.b()),
                ),
            ),
            (
                LogicalOp::project(f.t(), vec![f.a()]),
                LogicalOp::project(LogicalOp::filter(f.t(), f.a().eq(lit(k))), vec![f.a()]),
            ),
        ];
        for (l, r) in shapes {
            f.check(LogicalOp::except(l, r))?;
        }
    }

    #[test]
    fn except_with_null_tolerant_filter(t in table(), s in table()) {
        let f = Fixture::new(t, s);
        f.check(LogicalOp::except(f.t(), LogicalOp::filter(f.t(), f.a().is_null())))?;
        f.check(LogicalOp::except(
            f.t(),
            LogicalOp::filter(f.t(), f.a().is_null().or(f.b().gt(lit(0i64)))),
        ))?;
    }

    #[test]
    fn intersect_of_filtered_views(t in table(), k in 0i64..3) {
        let f = Fixture::new(t, vec![]);
        f.check(LogicalOp::intersect(
            LogicalOp::filter(f.t(), f.a().gt_eq(lit(k))),
            LogicalOp::filter(f.t(), f.b().lt(lit(k))),
        ))?;
        f.check(LogicalOp::intersect(
            f.t(),
            LogicalOp::filter(f.t(), f.a().is_null().or(f.b().eq(lit(k)))),
        ))?;
        f.check(LogicalOp::intersect(f.t(), f.t()))?;
    }

    #[test]
    fn except_of_relation_with_itself(t in table()) {
        let f = Fixture::new(t, vec![]);
        f.check(LogicalOp::except(f.t(), f.t()))?;
        f.check(LogicalOp::except(LogicalOp::distinct(f.t()), f.t()))?;
    }

    #[test]
    fn nested_set_operations(t in table(), s in table()) {
        let f = Fixture::new(t, s);
        let inner = LogicalOp::except(
            LogicalOp::distinct(f.t()),
            LogicalOp::filter(f.s(), attr(&f.s.output[0]).gt(lit(0i64))),
        );
        f.check(LogicalOp::intersect(inner, f.s()))?;
        f.check(LogicalOp::deduplicate(
            LogicalOp::union(LogicalOp::intersect(f.t(), f.s()), f.t()),
            vec![f.t.output[1].clone()],
        ))?;
    }
}
