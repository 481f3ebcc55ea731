//! FILENAME: core/drilldown-engine/src/rollup.rs
//! Rollup Evaluator - Bottom-up sums over an aggregated tree.
//!
//! Rollups are never stored in the tree. Each builder pairs with a policy:
//! - Fixed-slot trees read only childless nodes (`LeafOnly`).
//! - Skip-and-prune trees add a node's own contribution to its children's
//!   (`Inclusive`), because records may stop at any depth.
//!
//! `MemoRollup` caches results for one render pass. It borrows the tree, so
//! the cache cannot outlive a rebuild.

use records::Measure;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

use crate::definition::BuilderMode;
use crate::tree::{AggregatedNode, DrilldownTree, NodeId};

/// How a node's own contribution combines with its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollupPolicy {
    /// Childless nodes report their own values; inner nodes sum children.
    LeafOnly,
    /// Own values plus the sum over children.
    Inclusive,
}

impl RollupPolicy {
    fn combine(
        self,
        node: &AggregatedNode,
        own: f64,
        child_value: impl Fn(&AggregatedNode) -> f64,
    ) -> f64 {
        match self {
            RollupPolicy::LeafOnly => {
                if node.is_leaf() {
                    own
                } else {
                    node.children.iter().map(child_value).sum()
                }
            }
            RollupPolicy::Inclusive => own + node.children.iter().map(child_value).sum::<f64>(),
        }
    }
}

/// Query surface shared by the plain and memoizing evaluators.
pub trait RollupEvaluator {
    fn policy(&self) -> RollupPolicy;

    /// Rolled-up value of one measure for one job title. Unknown job
    /// titles contribute 0.
    fn sum_by_job(&self, node: &AggregatedNode, job_title: &str, measure: Measure) -> f64;

    /// Rolled-up value of one measure over every job title.
    fn sum_deep(&self, node: &AggregatedNode, measure: Measure) -> f64;

    /// `sum_by_job` addressed by measure identifier; unknown identifiers give 0.
    fn sum_by_job_key(&self, node: &AggregatedNode, job_title: &str, measure_key: &str) -> f64 {
        Measure::from_key(measure_key).map_or(0.0, |m| self.sum_by_job(node, job_title, m))
    }

    /// `sum_deep` addressed by measure identifier; unknown identifiers give 0.
    fn sum_deep_key(&self, node: &AggregatedNode, measure_key: &str) -> f64 {
        Measure::from_key(measure_key).map_or(0.0, |m| self.sum_deep(node, m))
    }

    /// `sum_deep(a) - sum_deep(b)`.
    fn balance(&self, node: &AggregatedNode, a: Measure, b: Measure) -> f64 {
        self.sum_deep(node, a) - self.sum_deep(node, b)
    }

    fn forest_sum_deep(&self, roots: &[AggregatedNode], measure: Measure) -> f64 {
        roots.iter().map(|root| self.sum_deep(root, measure)).sum()
    }

    fn forest_sum_by_job(&self, roots: &[AggregatedNode], job_title: &str, measure: Measure) -> f64 {
        roots
            .iter()
            .map(|root| self.sum_by_job(root, job_title, measure))
            .sum()
    }
}

// ============================================================================
// PLAIN EVALUATOR
// ============================================================================

/// Stateless evaluator for one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollup {
    policy: RollupPolicy,
}

static LEAF_ONLY: Rollup = Rollup::new(RollupPolicy::LeafOnly);
static INCLUSIVE: Rollup = Rollup::new(RollupPolicy::Inclusive);

impl Rollup {
    pub const fn new(policy: RollupPolicy) -> Self {
        Rollup { policy }
    }

    pub fn leaf_only() -> &'static Rollup {
        &LEAF_ONLY
    }

    pub fn inclusive() -> &'static Rollup {
        &INCLUSIVE
    }
}

impl RollupEvaluator for Rollup {
    fn policy(&self) -> RollupPolicy {
        self.policy
    }

    fn sum_by_job(&self, node: &AggregatedNode, job_title: &str, measure: Measure) -> f64 {
        self.policy
            .combine(node, node.own_job_value(job_title, measure), |child| {
                self.sum_by_job(child, job_title, measure)
            })
    }

    fn sum_deep(&self, node: &AggregatedNode, measure: Measure) -> f64 {
        self.policy
            .combine(node, node.self_totals.get(measure), |child| {
                self.sum_deep(child, measure)
            })
    }
}

impl BuilderMode {
    pub fn rollup_policy(self) -> RollupPolicy {
        match self {
            BuilderMode::FixedSlot => RollupPolicy::LeafOnly,
            BuilderMode::SkipAndPrune => RollupPolicy::Inclusive,
        }
    }

    /// The evaluator that reads trees built in this mode correctly.
    pub fn rollup(self) -> &'static dyn RollupEvaluator {
        match self.rollup_policy() {
            RollupPolicy::LeafOnly => Rollup::leaf_only(),
            RollupPolicy::Inclusive => Rollup::inclusive(),
        }
    }
}

// ============================================================================
// MEMOIZING EVALUATOR
// ============================================================================

type JobKey = (NodeId, String, Measure);
type DeepKey = (NodeId, Measure);

/// Caches rollups by node id for the lifetime of a tree borrow.
pub struct MemoRollup<'t> {
    tree: &'t DrilldownTree,
    policy: RollupPolicy,
    by_job: RefCell<FxHashMap<JobKey, f64>>,
    deep: RefCell<FxHashMap<DeepKey, f64>>,
}

impl<'t> MemoRollup<'t> {
    pub fn new(tree: &'t DrilldownTree) -> Self {
        MemoRollup {
            tree,
            policy: tree.mode.rollup_policy(),
            by_job: RefCell::new(FxHashMap::default()),
            deep: RefCell::new(FxHashMap::default()),
        }
    }

    /// Number of cached values.
    pub fn cached(&self) -> usize {
        self.by_job.borrow().len() + self.deep.borrow().len()
    }

    pub fn total_deep(&self, measure: Measure) -> f64 {
        self.forest_sum_deep(&self.tree.roots, measure)
    }

    pub fn total_by_job(&self, job_title: &str, measure: Measure) -> f64 {
        self.forest_sum_by_job(&self.tree.roots, job_title, measure)
    }
}

impl RollupEvaluator for MemoRollup<'_> {
    fn policy(&self) -> RollupPolicy {
        self.policy
    }

    fn sum_by_job(&self, node: &AggregatedNode, job_title: &str, measure: Measure) -> f64 {
        let key = (node.id.clone(), job_title.to_string(), measure);
        if let Some(value) = self.by_job.borrow().get(&key) {
            return *value;
        }
        let value = self
            .policy
            .combine(node, node.own_job_value(job_title, measure), |child| {
                self.sum_by_job(child, job_title, measure)
            });
        self.by_job.borrow_mut().insert(key, value);
        value
    }

    fn sum_deep(&self, node: &AggregatedNode, measure: Measure) -> f64 {
        let key = (node.id.clone(), measure);
        if let Some(value) = self.deep.borrow().get(&key) {
            return *value;
        }
        let value = self
            .policy
            .combine(node, node.self_totals.get(measure), |child| {
                self.sum_deep(child, measure)
            });
        self.deep.borrow_mut().insert(key, value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use records::{sample_records, FlatRecord, Organization};

    fn scenario() -> Vec<FlatRecord> {
        let base = || {
            FlatRecord::new(Organization::Vj, "Production")
                .with_team("T1")
                .with_process("P1")
                .with_plant("PlantA")
        };
        vec![
            base().with_line(1.0).with_job_title("TL").with_measures(4.0, 3.0, 2.0),
            base().with_line(2.0).with_job_title("GL").with_measures(2.0, 2.0, 1.0),
        ]
    }

    #[test]
    fn two_record_scenario_rolls_up_in_both_modes() {
        let records = scenario();
        for mode in [BuilderMode::SkipAndPrune, BuilderMode::FixedSlot] {
            let tree = build_tree(mode, &records);
            let division = &tree.roots[0];
            let rollup = tree.rollup();

            assert_eq!(rollup.sum_deep(division, Measure::TargetHeadcount), 6.0);
            assert_eq!(rollup.sum_by_job(division, "TL", Measure::TargetHeadcount), 4.0);
            assert_eq!(rollup.sum_by_job(division, "GL", Measure::ActualHeadcountPrimary), 2.0);
            assert_eq!(
                rollup.balance(division, Measure::TargetHeadcount, Measure::ActualHeadcountPrimary),
                1.0
            );
        }
    }

    #[test]
    fn unknown_job_or_measure_key_is_zero() {
        let tree = build_tree(BuilderMode::SkipAndPrune, &scenario());
        let division = &tree.roots[0];
        let rollup = tree.rollup();

        assert_eq!(rollup.sum_by_job(division, "Nobody", Measure::TargetHeadcount), 0.0);
        assert_eq!(rollup.sum_by_job_key(division, "TL", "headcount"), 0.0);
        assert_eq!(rollup.sum_deep_key(division, "bogus"), 0.0);
        assert_eq!(rollup.sum_deep_key(division, "ToBeTargetTO"), 6.0);
        assert_eq!(rollup.sum_by_job_key(division, "TL", "actualHeadcountPrimary"), 3.0);
    }

    #[test]
    fn inclusive_counts_records_that_stop_above_the_leaves() {
        let records = vec![
            FlatRecord::new(Organization::Jj, "Support")
                .with_job_title("HOT")
                .with_measures(3.0, 1.0, 0.0),
            FlatRecord::new(Organization::Jj, "Support")
                .with_team("Office")
                .with_job_title("HOT")
                .with_measures(2.0, 2.0, 0.0),
        ];
        let tree = build_tree(BuilderMode::SkipAndPrune, &records);
        let division = &tree.roots[0];

        assert_eq!(division.children.len(), 1);
        assert_eq!(tree.sum_deep(division, Measure::TargetHeadcount), 5.0);
        assert_eq!(tree.sum_by_job(division, "HOT", Measure::ActualHeadcountPrimary), 3.0);

        // Leaf-only reading of the same tree ignores the division's own record.
        let leaf_only = Rollup::leaf_only();
        assert_eq!(leaf_only.sum_deep(division, Measure::TargetHeadcount), 2.0);
    }

    #[test]
    fn deep_sum_is_additive_over_children() {
        let records = sample_records();
        for mode in [BuilderMode::SkipAndPrune, BuilderMode::FixedSlot] {
            let tree = build_tree(mode, &records);
            let rollup = tree.rollup();
            for node in tree.nodes() {
                if node.is_leaf() {
                    continue;
                }
                let children: f64 = node
                    .children
                    .iter()
                    .map(|c| rollup.sum_deep(c, Measure::TargetHeadcount))
                    .sum();
                let own = match mode {
                    BuilderMode::SkipAndPrune => node.self_totals.target_headcount,
                    BuilderMode::FixedSlot => 0.0,
                };
                assert_eq!(rollup.sum_deep(node, Measure::TargetHeadcount), children + own);
            }
        }
    }

    #[test]
    fn memo_matches_plain_evaluation() {
        let tree = build_tree(BuilderMode::FixedSlot, &sample_records());
        let memo = MemoRollup::new(&tree);
        let plain = tree.rollup();

        for node in tree.nodes() {
            for measure in Measure::ALL {
                assert_eq!(memo.sum_deep(node, measure), plain.sum_deep(node, measure));
                assert_eq!(
                    memo.sum_by_job(node, "TM/Staff", measure),
                    plain.sum_by_job(node, "TM/Staff", measure)
                );
            }
        }
        assert!(memo.cached() > 0);
        assert_eq!(memo.total_deep(Measure::TargetHeadcount), 37.0);
        assert_eq!(memo.total_by_job("TL", Measure::TargetHeadcount), 11.0);
    }
}
