//! FILENAME: tests/test_drilldown.rs
//! Integration tests for tree building, rollups and the rendered view.

mod common;

use common::{ScenarioFixture, TestHarness};
use drilldown_engine::{
    calculate_drilldown, BuilderMode, DepartmentView, DrilldownDefinition, ExpandState,
    PartitionFilter, RollupEvaluator,
};
use records::{Measure, Organization};

fn definition(mode: BuilderMode) -> DrilldownDefinition {
    DrilldownDefinition::new(
        PartitionFilter::new(Organization::Vj, DepartmentView::Production),
        mode,
    )
}

// ============================================================================
// SCENARIO
// ============================================================================

#[test]
fn test_scenario_tree_shape() {
    let records = ScenarioFixture::records();
    for mode in [BuilderMode::SkipAndPrune, BuilderMode::FixedSlot] {
        let tree = calculate_drilldown(&records, &definition(mode));
        assert_eq!(tree.roots.len(), 1);

        let division = &tree.roots[0];
        assert_eq!(division.label(), "Production");
        let team = &division.children[0];
        assert_eq!(team.label(), "T1");
        let process = &team.children[0];
        assert_eq!(process.label(), "P1");
        let plant = &process.children[0];
        assert_eq!(plant.label(), "PlantA");
        let lines: Vec<&str> = plant.children.iter().map(|l| l.label()).collect();
        assert_eq!(lines, vec!["1", "2"]);
    }
}

#[test]
fn test_scenario_rollups_and_balance() {
    let records = ScenarioFixture::records();
    for mode in [BuilderMode::SkipAndPrune, BuilderMode::FixedSlot] {
        let tree = calculate_drilldown(&records, &definition(mode));
        let division = &tree.roots[0];

        assert_eq!(tree.sum_deep(division, Measure::TargetHeadcount), 6.0);
        assert_eq!(tree.sum_by_job(division, "TL", Measure::TargetHeadcount), 4.0);
        assert_eq!(tree.sum_by_job(division, "GL", Measure::ActualHeadcountPrimary), 2.0);
        assert_eq!(tree.sum_deep_key(division, "targetHeadcount"), 6.0);
        assert_eq!(tree.sum_by_job_key(division, "TL", "nonsense"), 0.0);

        let mut expand = ExpandState::new();
        let view = drilldown_engine::render_drilldown(&tree, &definition(mode), &mut expand);
        assert_eq!(view.rows[0].totals.balance, 1.0);
        assert_eq!(view.total.totals.balance, 1.0);
    }
}

// ============================================================================
// SAMPLE DATA
// ============================================================================

#[test]
fn test_total_is_independent_of_expansion() {
    let harness = TestHarness::new();
    let mut session = harness.session();

    let default_total = session.render().total;
    session.collapse_all();
    let collapsed = session.render();
    session.expand_all();
    let expanded = session.render();

    assert_eq!(collapsed.rows.len(), 1);
    assert!(expanded.rows.len() > collapsed.rows.len());
    assert_eq!(collapsed.total, default_total);
    assert_eq!(expanded.total, default_total);
}

#[test]
fn test_modes_agree_on_sample_totals() {
    let harness = TestHarness::new();
    let mut session = harness.session();
    let skip = session.render().total;
    session.set_mode(BuilderMode::FixedSlot);
    let fixed = session.render().total;

    assert_eq!(skip.totals, fixed.totals);
    assert_eq!(skip.jobs, fixed.jobs);
}

#[test]
fn test_unknown_job_title_is_zero_everywhere() {
    let harness = TestHarness::new();
    let mut session = harness.session();
    session.set_job_titles(vec!["Astronaut".to_string()]);
    session.expand_all();
    let view = session.render();

    for row in view.all_rows() {
        assert_eq!(row.job(0).a, 0.0);
        assert_eq!(row.job(0).b, 0.0);
    }
}

#[test]
fn test_non_production_view_for_qd() {
    let mut harness = TestHarness::new();
    harness.config.organization = Organization::Qd;
    harness.config.department_view = DepartmentView::NonProduction;
    let mut session = harness.session();
    let view = session.render();

    assert_eq!(view.rows[0].label, "Quality");
    assert_eq!(view.job_titles, vec!["HOT", "Part Leader", "Section Leader", "TM/Staff"]);
    assert_eq!(view.total.totals.a, 7.0);
    assert_eq!(view.total.totals.b, 6.0);
}

#[test]
fn test_balance_matches_rollup_difference() {
    let harness = TestHarness::new();
    let mut session = harness.session();
    session.set_matrices(Measure::ActualHeadcountPrimary, Measure::ActualHeadcountSecondary);
    session.expand_all();
    let view = session.render();
    let tree = session.tree();
    let rollup = tree.rollup();

    for row in &view.rows {
        let node = tree.find(row.node_id.as_deref().unwrap()).unwrap();
        assert_eq!(
            row.totals.balance,
            rollup.balance(node, Measure::ActualHeadcountPrimary, Measure::ActualHeadcountSecondary)
        );
    }
}
