//! FILENAME: core/drilldown-engine/src/tree.rs
//! Aggregated Tree - The output of a builder.
//!
//! Nodes own their children outright (no parent links). A node only carries
//! totals for records it absorbed directly; everything above that is
//! computed on demand by the rollup evaluator.

use records::{FlatRecord, Measure, MeasureTotals};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::BuilderMode;
use crate::rollup::RollupEvaluator;

/// Path-qualified node identity (`"PL:Production/Upper1/VSM1/Plant A"`).
pub type NodeId = String;

/// Per-job-title totals absorbed by a single node.
pub type JobBreakdown = FxHashMap<String, MeasureTotals>;

// ============================================================================
// HIERARCHY LEVELS
// ============================================================================

/// The hierarchy field a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HierarchyLevel {
    Division,
    Team,
    Process,
    Factory,
    Plant,
    Line,
}

impl HierarchyLevel {
    /// Levels below the division, outermost first.
    pub const BELOW_DIVISION: [HierarchyLevel; 5] = [
        HierarchyLevel::Team,
        HierarchyLevel::Process,
        HierarchyLevel::Factory,
        HierarchyLevel::Plant,
        HierarchyLevel::Line,
    ];

    /// Id prefix for this level.
    pub fn tag(self) -> &'static str {
        match self {
            HierarchyLevel::Division => "D",
            HierarchyLevel::Team => "U",
            HierarchyLevel::Process => "P",
            HierarchyLevel::Factory => "F",
            HierarchyLevel::Plant => "PL",
            HierarchyLevel::Line => "L",
        }
    }

    /// Literal `level` value. Plant and line shift down one when the record
    /// has a factory.
    pub fn depth(self, has_factory: bool) -> u8 {
        let shift = u8::from(has_factory);
        match self {
            HierarchyLevel::Division => 0,
            HierarchyLevel::Team => 1,
            HierarchyLevel::Process => 2,
            HierarchyLevel::Factory => 3,
            HierarchyLevel::Plant => 3 + shift,
            HierarchyLevel::Line => 4 + shift,
        }
    }
}

/// Hierarchy values along a node's path. Blank values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLabels {
    pub division: String,
    pub team: Option<String>,
    pub process: Option<String>,
    pub factory: Option<String>,
    pub plant: Option<String>,
    pub line: Option<String>,
}

impl NodeLabels {
    pub fn get(&self, level: HierarchyLevel) -> Option<&str> {
        match level {
            HierarchyLevel::Division => Some(self.division.as_str()),
            HierarchyLevel::Team => self.team.as_deref(),
            HierarchyLevel::Process => self.process.as_deref(),
            HierarchyLevel::Factory => self.factory.as_deref(),
            HierarchyLevel::Plant => self.plant.as_deref(),
            HierarchyLevel::Line => self.line.as_deref(),
        }
    }
}

// ============================================================================
// AGGREGATED NODE
// ============================================================================

/// One node of the drilldown tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedNode {
    pub id: NodeId,
    /// Builder-relative depth (division = 0 ... line = 5).
    pub level: u8,
    pub kind: HierarchyLevel,
    pub labels: NodeLabels,
    /// Sums of records absorbed directly by this node.
    pub self_totals: MeasureTotals,
    /// Same sums split by job title.
    #[serde(default)]
    pub job_breakdown: JobBreakdown,
    /// Number of records absorbed directly by this node.
    #[serde(default)]
    pub record_count: u32,
    /// Ordered by first appearance in the input.
    #[serde(default)]
    pub children: Vec<AggregatedNode>,
}

impl AggregatedNode {
    pub fn new(id: NodeId, kind: HierarchyLevel, level: u8, labels: NodeLabels) -> Self {
        AggregatedNode {
            id,
            level,
            kind,
            labels,
            self_totals: MeasureTotals::ZERO,
            job_breakdown: JobBreakdown::default(),
            record_count: 0,
            children: Vec::new(),
        }
    }

    /// Display label: the value of the field this node represents.
    pub fn label(&self) -> &str {
        self.labels.get(self.kind).unwrap_or("")
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Adds a record's measures to this node's own totals and job breakdown.
    pub fn absorb(&mut self, record: &FlatRecord) {
        let totals = record.totals();
        self.self_totals += totals;
        *self
            .job_breakdown
            .entry(record.job_title.trim().to_string())
            .or_default() += totals;
        self.record_count += 1;
    }

    /// Direct (non-rolled-up) value for one job title and measure.
    pub fn own_job_value(&self, job_title: &str, measure: Measure) -> f64 {
        self.job_breakdown
            .get(job_title)
            .map_or(0.0, |totals| totals.get(measure))
    }

    /// Pre-order traversal.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a AggregatedNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn find(&self, id: &str) -> Option<&AggregatedNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

// ============================================================================
// DRILLDOWN TREE
// ============================================================================

/// A built forest plus the mode that shaped it. The mode decides which
/// rollup policy applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrilldownTree {
    pub mode: BuilderMode,
    /// One root per division, in first-seen order.
    pub roots: Vec<AggregatedNode>,
    /// Records dropped because their division was blank.
    pub skipped_records: usize,
}

impl DrilldownTree {
    pub fn new(mode: BuilderMode, roots: Vec<AggregatedNode>, skipped_records: usize) -> Self {
        DrilldownTree {
            mode,
            roots,
            skipped_records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&AggregatedNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Every node, pre-order.
    pub fn nodes(&self) -> Vec<&AggregatedNode> {
        let mut nodes = Vec::new();
        for root in &self.roots {
            root.walk(&mut |node| nodes.push(node));
        }
        nodes
    }

    /// Every node id, pre-order.
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes().into_iter().map(|n| n.id.as_str()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// The rollup policy matching this tree's builder.
    pub fn rollup(&self) -> &'static dyn RollupEvaluator {
        self.mode.rollup()
    }

    pub fn sum_by_job(&self, node: &AggregatedNode, job_title: &str, measure: Measure) -> f64 {
        self.rollup().sum_by_job(node, job_title, measure)
    }

    pub fn sum_deep(&self, node: &AggregatedNode, measure: Measure) -> f64 {
        self.rollup().sum_deep(node, measure)
    }

    pub fn sum_by_job_key(&self, node: &AggregatedNode, job_title: &str, measure_key: &str) -> f64 {
        self.rollup().sum_by_job_key(node, job_title, measure_key)
    }

    pub fn sum_deep_key(&self, node: &AggregatedNode, measure_key: &str) -> f64 {
        self.rollup().sum_deep_key(node, measure_key)
    }

    /// Grand total of one measure over the whole root set.
    pub fn total_deep(&self, measure: Measure) -> f64 {
        self.rollup().forest_sum_deep(&self.roots, measure)
    }

    /// Grand total of one job title and measure over the whole root set.
    pub fn total_by_job(&self, job_title: &str, measure: Measure) -> f64 {
        self.rollup().forest_sum_by_job(&self.roots, job_title, measure)
    }
}
