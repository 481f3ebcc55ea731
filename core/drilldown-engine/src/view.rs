//! FILENAME: core/drilldown-engine/src/view.rs
//! Drilldown View - Renderable output for the terminal and JSON consumers.
//!
//! This module turns a built tree into rows and columns:
//! - One row per visible node (children show only under expanded parents)
//! - Per job title: Matrix A, Matrix B and their balance
//! - Row-level deep totals and deep balance
//! - A trailing TOTAL row computed over every root, whatever is collapsed
//!
//! The expand state lives here, keyed by node id, never inside the tree.

use records::Measure;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::{BuilderMode, ColumnLayout, DrilldownDefinition};
use crate::rollup::{MemoRollup, RollupEvaluator};
use crate::tree::{AggregatedNode, DrilldownTree, NodeId};

/// Label of the synthetic grand total row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Header of the hierarchy column.
pub const HIERARCHY_HEADER: &str = "Department";

// ============================================================================
// VALUES
// ============================================================================

/// Sign of a balance, used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSign {
    /// A exceeds B.
    Surplus,
    /// B exceeds A.
    Shortage,
    Even,
}

impl BalanceSign {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            BalanceSign::Surplus
        } else if value < 0.0 {
            BalanceSign::Shortage
        } else {
            BalanceSign::Even
        }
    }
}

/// Matrix A, Matrix B and `a - b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricPair {
    pub a: f64,
    pub b: f64,
    pub balance: f64,
}

impl MetricPair {
    pub fn new(a: f64, b: f64) -> Self {
        MetricPair { a, b, balance: a - b }
    }

    pub fn sign(&self) -> BalanceSign {
        BalanceSign::of(self.balance)
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// The type of a row in the drilldown view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewRowType {
    /// A tree node.
    Node,
    /// The grand total row.
    Total,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub row_type: ViewRowType,

    /// Id of the node behind this row. `None` for the TOTAL row.
    pub node_id: Option<NodeId>,

    /// Display label.
    pub label: String,

    /// The node's builder level.
    pub level: u8,

    /// Indentation for the label (equal to `level`).
    pub indent_level: u8,

    /// Whether the node has children to show.
    pub is_expandable: bool,

    pub is_expanded: bool,

    /// One entry per job-title column, in column order.
    pub jobs: Vec<MetricPair>,

    /// Deep totals across every job title.
    pub totals: MetricPair,
}

impl ViewRow {
    /// Values for a job title, by position in `DrilldownView::job_titles`.
    pub fn job(&self, index: usize) -> MetricPair {
        self.jobs.get(index).copied().unwrap_or_default()
    }

    pub fn is_total(&self) -> bool {
        self.row_type == ViewRowType::Total
    }
}

// ============================================================================
// COLUMNS
// ============================================================================

/// Which of the three values a column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricSlot {
    A,
    B,
    Balance,
}

impl MetricSlot {
    fn pick(self, pair: MetricPair) -> f64 {
        match self {
            MetricSlot::A => pair.a,
            MetricSlot::B => pair.b,
            MetricSlot::Balance => pair.balance,
        }
    }
}

/// Types of columns in the drilldown view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewColumnType {
    /// Row labels.
    Hierarchy,
    /// One job title, one slot. `job_index` points into `job_titles`.
    Job { job_index: usize, slot: MetricSlot },
    /// Deep total over all job titles.
    Total { slot: MetricSlot },
}

/// Describes a column in the drilldown view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewColumn {
    /// Stable column id (`m1-TL`, `m2-total`, `bal-GL`, `balance`).
    pub id: String,

    pub header: String,

    /// Header of the column group this column sits under, if any.
    pub group: Option<String>,

    pub column_type: ViewColumnType,
}

impl ViewColumn {
    fn new(id: String, header: &str, group: Option<&str>, column_type: ViewColumnType) -> Self {
        ViewColumn {
            id,
            header: header.to_string(),
            group: group.map(str::to_string),
            column_type,
        }
    }

    /// The numeric value of this column in a row. `None` for the hierarchy
    /// column.
    pub fn value(&self, row: &ViewRow) -> Option<f64> {
        match self.column_type {
            ViewColumnType::Hierarchy => None,
            ViewColumnType::Job { job_index, slot } => Some(slot.pick(row.job(job_index))),
            ViewColumnType::Total { slot } => Some(slot.pick(row.totals)),
        }
    }

    pub fn is_balance(&self) -> bool {
        matches!(
            self.column_type,
            ViewColumnType::Job { slot: MetricSlot::Balance, .. }
                | ViewColumnType::Total { slot: MetricSlot::Balance }
        )
    }
}

/// Column set for a layout.
pub fn build_columns(
    layout: ColumnLayout,
    job_titles: &[String],
    matrix_a: Measure,
    matrix_b: Measure,
) -> Vec<ViewColumn> {
    let a_group = matrix_a.display_name();
    let b_group = matrix_b.display_name();
    let mut columns = vec![ViewColumn::new(
        "hierarchy".to_string(),
        HIERARCHY_HEADER,
        None,
        ViewColumnType::Hierarchy,
    )];

    match layout {
        ColumnLayout::Grouped => {
            for (prefix, group, slot) in [("m1", a_group, MetricSlot::A), ("m2", b_group, MetricSlot::B)] {
                for (job_index, title) in job_titles.iter().enumerate() {
                    columns.push(ViewColumn::new(
                        format!("{}-{}", prefix, title),
                        title,
                        Some(group),
                        ViewColumnType::Job { job_index, slot },
                    ));
                }
                columns.push(ViewColumn::new(
                    format!("{}-total", prefix),
                    "Total",
                    Some(group),
                    ViewColumnType::Total { slot },
                ));
            }
            columns.push(ViewColumn::new(
                "balance".to_string(),
                "Balance",
                None,
                ViewColumnType::Total { slot: MetricSlot::Balance },
            ));
        }
        ColumnLayout::Interleaved => {
            for (job_index, title) in job_titles.iter().enumerate() {
                let job = |slot| ViewColumnType::Job { job_index, slot };
                columns.push(ViewColumn::new(format!("m1-{}", title), title, Some(a_group), job(MetricSlot::A)));
                columns.push(ViewColumn::new(format!("m2-{}", title), title, Some(b_group), job(MetricSlot::B)));
                columns.push(ViewColumn::new(format!("bal-{}", title), "Balance", Some(title), job(MetricSlot::Balance)));
            }
        }
    }
    columns
}

// ============================================================================
// EXPAND STATE
// ============================================================================

/// Expanded/collapsed flags keyed by node id. Missing ids are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandState {
    entries: FxHashMap<NodeId, bool>,
}

impl ExpandState {
    pub fn new() -> Self {
        ExpandState::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.entries.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: &str, expanded: bool) {
        self.entries.insert(id.to_string(), expanded);
    }

    /// Flips one entry and returns the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let expanded = !self.is_expanded(id);
        self.set(id, expanded);
        expanded
    }

    /// Expands every node that has children.
    pub fn expand_all(&mut self, tree: &DrilldownTree) {
        for node in tree.nodes() {
            if !node.is_leaf() {
                self.set(&node.id, true);
            }
        }
    }

    /// Collapses every node. Entries are written explicitly so the state is
    /// not mistaken for a fresh one.
    pub fn collapse_all(&mut self, tree: &DrilldownTree) {
        for node in tree.nodes() {
            self.set(&node.id, false);
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// On an empty state with a non-empty tree, expands every division.
    /// Returns whether the default was applied.
    pub fn ensure_default(&mut self, tree: &DrilldownTree) -> bool {
        if !self.is_empty() || tree.is_empty() {
            return false;
        }
        for root in &tree.roots {
            self.set(&root.id, true);
        }
        true
    }
}

// ============================================================================
// MAIN VIEW STRUCT
// ============================================================================

/// The complete rendered drilldown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrilldownView {
    pub mode: BuilderMode,
    pub layout: ColumnLayout,
    pub matrix_a: Measure,
    pub matrix_b: Measure,

    /// Job-title columns, in display order.
    pub job_titles: Vec<String>,

    pub columns: Vec<ViewColumn>,

    /// Visible node rows, pre-order.
    pub rows: Vec<ViewRow>,

    /// Grand total over every root.
    pub total: ViewRow,

    /// Records the builder dropped for a blank division.
    pub skipped_records: usize,
}

impl DrilldownView {
    /// Node rows followed by the TOTAL row.
    pub fn all_rows(&self) -> impl Iterator<Item = &ViewRow> {
        self.rows.iter().chain(std::iter::once(&self.total))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Index of a job title column, if shown.
    pub fn job_index(&self, job_title: &str) -> Option<usize> {
        self.job_titles.iter().position(|t| t == job_title)
    }

    pub fn find_row(&self, id: &str) -> Option<&ViewRow> {
        self.rows.iter().find(|r| r.node_id.as_deref() == Some(id))
    }
}

// ============================================================================
// VIEW GENERATION
// ============================================================================

fn node_row(
    node: &AggregatedNode,
    rollup: &MemoRollup<'_>,
    definition: &DrilldownDefinition,
    expand: &ExpandState,
) -> ViewRow {
    let (a, b) = (definition.matrix_a, definition.matrix_b);
    let jobs = definition
        .job_titles
        .iter()
        .map(|title| MetricPair::new(rollup.sum_by_job(node, title, a), rollup.sum_by_job(node, title, b)))
        .collect();
    let is_expandable = !node.is_leaf();

    ViewRow {
        row_type: ViewRowType::Node,
        node_id: Some(node.id.clone()),
        label: node.label().to_string(),
        level: node.level,
        indent_level: node.level,
        is_expandable,
        is_expanded: is_expandable && expand.is_expanded(&node.id),
        jobs,
        totals: MetricPair::new(rollup.sum_deep(node, a), rollup.sum_deep(node, b)),
    }
}

fn collect_visible(
    nodes: &[AggregatedNode],
    rollup: &MemoRollup<'_>,
    definition: &DrilldownDefinition,
    expand: &ExpandState,
    rows: &mut Vec<ViewRow>,
) {
    for node in nodes {
        let row = node_row(node, rollup, definition, expand);
        let descend = row.is_expanded;
        rows.push(row);
        if descend {
            collect_visible(&node.children, rollup, definition, expand, rows);
        }
    }
}

fn total_row(rollup: &MemoRollup<'_>, definition: &DrilldownDefinition) -> ViewRow {
    let (a, b) = (definition.matrix_a, definition.matrix_b);
    let jobs = definition
        .job_titles
        .iter()
        .map(|title| MetricPair::new(rollup.total_by_job(title, a), rollup.total_by_job(title, b)))
        .collect();

    ViewRow {
        row_type: ViewRowType::Total,
        node_id: None,
        label: TOTAL_LABEL.to_string(),
        level: 0,
        indent_level: 0,
        is_expandable: false,
        is_expanded: false,
        jobs,
        totals: MetricPair::new(rollup.total_deep(a), rollup.total_deep(b)),
    }
}

/// Produces the rows for the nodes `expand` makes visible plus the TOTAL
/// row. The state is read as given; callers apply `ensure_default` first.
pub fn generate_view(
    tree: &DrilldownTree,
    definition: &DrilldownDefinition,
    expand: &ExpandState,
) -> DrilldownView {
    let rollup = MemoRollup::new(tree);
    let mut rows = Vec::new();
    collect_visible(&tree.roots, &rollup, definition, expand, &mut rows);
    let total = total_row(&rollup, definition);

    DrilldownView {
        mode: tree.mode,
        layout: definition.layout,
        matrix_a: definition.matrix_a,
        matrix_b: definition.matrix_b,
        job_titles: definition.job_titles.clone(),
        columns: build_columns(
            definition.layout,
            &definition.job_titles,
            definition.matrix_a,
            definition.matrix_b,
        ),
        rows,
        total,
        skipped_records: tree.skipped_records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_tree;
    use crate::definition::{DepartmentView, PartitionFilter};
    use records::{sample_records, FlatRecord, Organization};

    fn vj_production(mode: BuilderMode) -> (DrilldownTree, DrilldownDefinition) {
        let definition = DrilldownDefinition::new(
            PartitionFilter::new(Organization::Vj, DepartmentView::Production),
            mode,
        );
        let records: Vec<FlatRecord> = sample_records()
            .into_iter()
            .filter(|r| definition.filter.matches(r))
            .collect();
        (build_tree(mode, &records), definition)
    }

    #[test]
    fn default_state_expands_divisions_only() {
        let (tree, definition) = vj_production(BuilderMode::SkipAndPrune);
        let mut expand = ExpandState::new();
        assert!(expand.ensure_default(&tree));
        assert!(!expand.ensure_default(&tree));

        let view = generate_view(&tree, &definition, &expand);
        let labels: Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Production", "Upper1", "Upper2"]);
        assert!(view.rows[0].is_expanded);
        assert_eq!(view.rows[1].indent_level, 1);
        assert!(view.rows[1].is_expandable);
        assert!(!view.rows[1].is_expanded);
    }

    #[test]
    fn total_ignores_expand_state() {
        let (tree, definition) = vj_production(BuilderMode::FixedSlot);
        let mut expand = ExpandState::new();
        expand.ensure_default(&tree);
        let default_view = generate_view(&tree, &definition, &expand);

        expand.collapse_all(&tree);
        let collapsed = generate_view(&tree, &definition, &expand);
        expand.expand_all(&tree);
        let expanded = generate_view(&tree, &definition, &expand);

        assert_eq!(collapsed.rows.len(), 1);
        assert!(expanded.rows.len() > default_view.rows.len());
        assert_eq!(collapsed.total, default_view.total);
        assert_eq!(expanded.total, default_view.total);
        assert_eq!(default_view.total.totals, MetricPair::new(24.0, 19.0));
    }

    #[test]
    fn job_values_follow_column_order() {
        let (tree, definition) = vj_production(BuilderMode::SkipAndPrune);
        let definition = definition.with_job_titles(["TL", "Unknown", "GL"]);
        let view = generate_view(&tree, &definition, &ExpandState::new());

        let division = &view.rows[0];
        assert_eq!(division.job(0), MetricPair::new(4.0, 3.0));
        assert_eq!(division.job(1), MetricPair::default());
        assert_eq!(division.job(2), MetricPair::new(2.0, 2.0));
        assert_eq!(view.job_index("GL"), Some(2));
        assert!(!division.is_expanded);
    }

    #[test]
    fn balance_sign_matches_deep_difference() {
        let (tree, definition) = vj_production(BuilderMode::SkipAndPrune);
        let mut expand = ExpandState::new();
        expand.expand_all(&tree);
        let view = generate_view(&tree, &definition, &expand);

        let rollup = tree.rollup();
        for row in &view.rows {
            let node = tree.find(row.node_id.as_deref().unwrap()).unwrap();
            let expected = rollup.balance(node, definition.matrix_a, definition.matrix_b);
            assert_eq!(row.totals.balance, expected);
            assert_eq!(row.totals.sign(), BalanceSign::of(expected));
        }
        assert_eq!(BalanceSign::of(-1.0), BalanceSign::Shortage);
        assert_eq!(BalanceSign::of(0.0), BalanceSign::Even);
    }

    #[test]
    fn layouts_produce_expected_column_ids() {
        let jobs = vec!["GL".to_string(), "TL".to_string()];
        let grouped = build_columns(
            ColumnLayout::Grouped,
            &jobs,
            Measure::TargetHeadcount,
            Measure::ActualHeadcountPrimary,
        );
        let ids: Vec<&str> = grouped.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["hierarchy", "m1-GL", "m1-TL", "m1-total", "m2-GL", "m2-TL", "m2-total", "balance"]
        );
        assert_eq!(grouped[1].group.as_deref(), Some("To-be Target TO"));

        let interleaved = build_columns(
            ColumnLayout::Interleaved,
            &jobs,
            Measure::TargetHeadcount,
            Measure::ActualHeadcountSecondary,
        );
        let ids: Vec<&str> = interleaved.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["hierarchy", "m1-GL", "m2-GL", "bal-GL", "m1-TL", "m2-TL", "bal-TL"]);
        assert!(interleaved[3].is_balance());
    }

    #[test]
    fn toggle_and_reset() {
        let mut expand = ExpandState::new();
        assert!(expand.toggle("D:Production"));
        assert!(expand.is_expanded("D:Production"));
        assert!(!expand.toggle("D:Production"));
        assert_eq!(expand.len(), 1);
        expand.reset();
        assert!(expand.is_empty());
    }
}
