//! FILENAME: core/drilldown-engine/src/engine.rs
//! Drilldown Engine - Records in, renderable view out.
//!
//! Algorithm:
//! 1. Partition the snapshot by organization and department class
//! 2. Build a tree with the builder the definition selects
//! 3. Apply the default expand state when none exists yet
//! 4. Generate visible rows plus the TOTAL row
//!
//! `DrilldownSession` keeps the snapshot, the current tree and the expand
//! state together so interactive front ends only send intents.

use records::{FlatRecord, Measure};

use crate::builder::{FixedSlotBuilder, SkipAndPruneBuilder, TreeBuilder};
use crate::definition::{BuilderMode, ColumnLayout, DrilldownDefinition, PartitionFilter};
use crate::tree::DrilldownTree;
use crate::view::{generate_view, DrilldownView, ExpandState};

// ============================================================================
// STATELESS API
// ============================================================================

/// Records that feed one tree build.
pub fn partition_records<'a>(
    records: &'a [FlatRecord],
    filter: &'a PartitionFilter,
) -> impl Iterator<Item = &'a FlatRecord> + 'a {
    records.iter().filter(move |r| filter.matches(r))
}

/// Divisions of the filter's department class across the whole snapshot,
/// every organization included, in first-seen order.
pub fn known_divisions(records: &[FlatRecord], filter: &PartitionFilter) -> Vec<String> {
    let mut divisions: Vec<String> = Vec::new();
    for record in records {
        let division = record.division.trim();
        if division.is_empty() || !filter.includes_division(division) {
            continue;
        }
        if !divisions.iter().any(|d| d == division) {
            divisions.push(division.to_string());
        }
    }
    divisions
}

/// Builds the tree a definition describes.
pub fn calculate_drilldown(records: &[FlatRecord], definition: &DrilldownDefinition) -> DrilldownTree {
    let selected = partition_records(records, &definition.filter);
    let tree = match definition.mode {
        BuilderMode::FixedSlot => FixedSlotBuilder::new().build(selected),
        BuilderMode::SkipAndPrune => {
            let mut builder = SkipAndPruneBuilder::new();
            if definition.show_empty_divisions {
                builder = builder.with_known_divisions(known_divisions(records, &definition.filter));
            }
            builder.build(selected)
        }
    };
    log::info!(
        target: "drilldown",
        "built {:?} tree for {} ({:?}): {} divisions, {} nodes",
        definition.mode,
        definition.filter.organization,
        definition.filter.department_view,
        tree.roots.len(),
        tree.node_count()
    );
    tree
}

/// Renders a tree, applying the default expand state first if needed.
pub fn render_drilldown(
    tree: &DrilldownTree,
    definition: &DrilldownDefinition,
    expand: &mut ExpandState,
) -> DrilldownView {
    if expand.ensure_default(tree) {
        log::debug!(target: "drilldown", "applied default expand state");
    }
    generate_view(tree, definition, expand)
}

// ============================================================================
// SESSION
// ============================================================================

/// Owns a snapshot, its current tree and the expand state.
#[derive(Debug, Clone)]
pub struct DrilldownSession {
    records: Vec<FlatRecord>,
    definition: DrilldownDefinition,
    tree: DrilldownTree,
    expand: ExpandState,
}

impl DrilldownSession {
    pub fn new(records: Vec<FlatRecord>, definition: DrilldownDefinition) -> Self {
        let tree = calculate_drilldown(&records, &definition);
        DrilldownSession {
            records,
            definition,
            tree,
            expand: ExpandState::new(),
        }
    }

    pub fn records(&self) -> &[FlatRecord] {
        &self.records
    }

    pub fn definition(&self) -> &DrilldownDefinition {
        &self.definition
    }

    pub fn tree(&self) -> &DrilldownTree {
        &self.tree
    }

    pub fn expand_state(&self) -> &ExpandState {
        &self.expand
    }

    /// Rebuilds from the current snapshot. Expand entries survive because
    /// node ids are stable for identical input.
    pub fn rebuild(&mut self) {
        self.tree = calculate_drilldown(&self.records, &self.definition);
    }

    /// Replaces the snapshot and rebuilds.
    pub fn set_records(&mut self, records: Vec<FlatRecord>) {
        self.records = records;
        self.rebuild();
    }

    pub fn set_filter(&mut self, filter: PartitionFilter) {
        if self.definition.filter != filter {
            self.definition.filter = filter;
            self.rebuild();
        }
    }

    /// Switches builder and its layout. Ids differ between modes, so the
    /// expand state starts over.
    pub fn set_mode(&mut self, mode: BuilderMode) {
        if self.definition.mode == mode {
            return;
        }
        self.definition.mode = mode;
        self.definition.layout = mode.default_layout();
        self.expand.reset();
        self.rebuild();
    }

    pub fn set_layout(&mut self, layout: ColumnLayout) {
        self.definition.layout = layout;
    }

    pub fn set_matrices(&mut self, matrix_a: Measure, matrix_b: Measure) {
        self.definition.matrix_a = matrix_a;
        self.definition.matrix_b = matrix_b;
    }

    /// Changing the job-title columns collapses the table back to its
    /// default state.
    pub fn set_job_titles(&mut self, job_titles: Vec<String>) {
        if self.definition.job_titles != job_titles {
            self.definition.job_titles = job_titles;
            self.expand.reset();
        }
    }

    pub fn set_show_empty_divisions(&mut self, show: bool) {
        if self.definition.show_empty_divisions != show {
            self.definition.show_empty_divisions = show;
            self.rebuild();
        }
    }

    fn expandable(&self, id: &str) -> bool {
        self.tree.find(id).is_some_and(|node| !node.is_leaf())
    }

    /// Flips a node. Returns the new state, or `None` for unknown ids and
    /// leaves.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        if !self.expandable(id) {
            return None;
        }
        self.expand.ensure_default(&self.tree);
        Some(self.expand.toggle(id))
    }

    /// Flips the node shown at `row` (0-based) in the current rendering.
    pub fn toggle_row(&mut self, row: usize) -> Option<(String, bool)> {
        let view = self.render();
        let id = view.rows.get(row)?.node_id.clone()?;
        let expanded = self.toggle(&id)?;
        Some((id, expanded))
    }

    /// Sets one node's state. Returns `false` for unknown ids and leaves.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> bool {
        if !self.expandable(id) {
            return false;
        }
        self.expand.ensure_default(&self.tree);
        self.expand.set(id, expanded);
        true
    }

    pub fn expand_all(&mut self) {
        self.expand.expand_all(&self.tree);
    }

    pub fn collapse_all(&mut self) {
        self.expand.collapse_all(&self.tree);
    }

    pub fn reset_expand_state(&mut self) {
        self.expand.reset();
    }

    /// Renders the current tree. An empty expand state gets the default.
    pub fn render(&mut self) -> DrilldownView {
        render_drilldown(&self.tree, &self.definition, &mut self.expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DepartmentView;
    use records::{sample_records, Organization};

    fn session(mode: BuilderMode) -> DrilldownSession {
        let definition = DrilldownDefinition::new(
            PartitionFilter::new(Organization::Vj, DepartmentView::Production),
            mode,
        );
        DrilldownSession::new(sample_records(), definition)
    }

    #[test]
    fn partition_selects_organization_and_department() {
        let records = sample_records();
        let filter = PartitionFilter::new(Organization::Qd, DepartmentView::NonProduction);
        let selected: Vec<&FlatRecord> = partition_records(&records, &filter).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].division, "Quality");
    }

    #[test]
    fn known_divisions_span_organizations() {
        let mut records = sample_records();
        records.push(FlatRecord::new(Organization::Jj, "Maintenance"));
        records.push(FlatRecord::new(Organization::Vj, "Quality"));

        let filter = PartitionFilter::new(Organization::Vj, DepartmentView::NonProduction);
        assert_eq!(known_divisions(&records, &filter), vec!["Quality", "Maintenance"]);

        let definition = DrilldownDefinition {
            show_empty_divisions: true,
            ..DrilldownDefinition::new(filter, BuilderMode::SkipAndPrune)
        };
        let tree = calculate_drilldown(&records, &definition);
        let roots: Vec<&str> = tree.roots.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(roots, vec!["D:Quality", "D:Maintenance"]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let records = sample_records();
        for mode in [BuilderMode::SkipAndPrune, BuilderMode::FixedSlot] {
            let definition = DrilldownDefinition::new(
                PartitionFilter::new(Organization::Vj, DepartmentView::Production),
                mode,
            );
            let first = calculate_drilldown(&records, &definition);
            let second = calculate_drilldown(&records, &definition);
            assert_eq!(first.node_ids(), second.node_ids());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn expand_state_survives_identical_rebuild() {
        let mut session = session(BuilderMode::SkipAndPrune);
        session.render();
        assert_eq!(session.toggle("U:Production/Upper1"), Some(true));
        let before = session.render();

        session.set_records(sample_records());
        let after = session.render();
        assert_eq!(before.rows, after.rows);
        assert!(after.find_row("P:Production/Upper1/VSM1").is_some());
    }

    #[test]
    fn job_title_change_resets_expand_state() {
        let mut session = session(BuilderMode::SkipAndPrune);
        session.expand_all();
        let expanded_rows = session.render().rows.len();

        session.set_job_titles(vec!["TL".to_string()]);
        assert!(session.expand_state().is_empty());
        let view = session.render();
        assert!(view.rows.len() < expanded_rows);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.total.jobs.len(), 1);
    }

    #[test]
    fn mode_change_switches_layout_and_resets() {
        let mut session = session(BuilderMode::SkipAndPrune);
        session.expand_all();
        session.set_mode(BuilderMode::FixedSlot);
        assert!(session.expand_state().is_empty());
        assert_eq!(session.definition().layout, ColumnLayout::Interleaved);
        assert_eq!(session.tree().mode, BuilderMode::FixedSlot);
    }

    #[test]
    fn toggle_row_uses_rendered_positions() {
        let mut session = session(BuilderMode::SkipAndPrune);
        let (id, expanded) = session.toggle_row(1).unwrap();
        assert_eq!(id, "U:Production/Upper1");
        assert!(expanded);
        assert_eq!(session.toggle_row(99), None);
        assert_eq!(session.toggle("L:Production/Upper1/VSM1/Plant A/1"), None);
        assert!(!session.set_expanded("D:Nowhere", true));
    }

    #[test]
    fn filter_change_rebuilds() {
        let mut session = session(BuilderMode::FixedSlot);
        session.set_filter(PartitionFilter::new(Organization::Jj, DepartmentView::Production));
        let view = session.render();
        assert_eq!(view.total.totals.a, 6.0);
        assert_eq!(view.rows[0].label, "Production");
    }
}
