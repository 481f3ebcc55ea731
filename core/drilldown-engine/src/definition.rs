//! FILENAME: core/drilldown-engine/src/definition.rs
//! Drilldown Definition - The serializable configuration.
//!
//! This module contains everything needed to DESCRIBE a drilldown view:
//! which slice of the records feeds the tree (partition filter), which
//! builder strategy shapes it, and which job-title columns and measures the
//! presentation layer shows. Definitions are plain values; changing one
//! means rebuilding the tree.

use records::{FlatRecord, Measure, Organization};
use serde::{Deserialize, Serialize};

/// Division name that marks the production department class.
pub const DEFAULT_PRODUCTION_DIVISION: &str = "Production";

/// Job-title columns shown for the production department view.
pub const PRODUCTION_JOB_TITLES: [&str; 7] =
    ["MGL", "A.MGL", "VSM", "A.VSM", "GL", "TL", "TM/Staff"];

/// Job-title columns shown for every other department.
pub const NON_PRODUCTION_JOB_TITLES: [&str; 4] =
    ["HOT", "Part Leader", "Section Leader", "TM/Staff"];

// ============================================================================
// PARTITION FILTER
// ============================================================================

/// Coarse department-class selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentView {
    /// Only the production division.
    #[default]
    Production,
    /// Every division except production (support, quality, management...).
    NonProduction,
}

impl DepartmentView {
    /// Whether a division belongs to this department class.
    pub fn includes(self, division: &str, production_division: &str) -> bool {
        let is_production = division.trim() == production_division.trim();
        match self {
            DepartmentView::Production => is_production,
            DepartmentView::NonProduction => !is_production,
        }
    }

    pub fn default_job_titles(self) -> Vec<String> {
        let titles: &[&str] = match self {
            DepartmentView::Production => &PRODUCTION_JOB_TITLES,
            DepartmentView::NonProduction => &NON_PRODUCTION_JOB_TITLES,
        };
        titles.iter().map(|t| t.to_string()).collect()
    }
}

fn default_production_division() -> String {
    DEFAULT_PRODUCTION_DIVISION.to_string()
}

/// Selects the records that feed one tree build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionFilter {
    pub organization: Organization,
    pub department_view: DepartmentView,
    /// Division name that counts as production.
    #[serde(default = "default_production_division")]
    pub production_division: String,
}

impl PartitionFilter {
    pub fn new(organization: Organization, department_view: DepartmentView) -> Self {
        PartitionFilter {
            organization,
            department_view,
            production_division: default_production_division(),
        }
    }

    pub fn with_production_division(mut self, name: &str) -> Self {
        self.production_division = name.trim().to_string();
        self
    }

    pub fn includes_division(&self, division: &str) -> bool {
        self.department_view.includes(division, &self.production_division)
    }

    pub fn matches(&self, record: &FlatRecord) -> bool {
        record.organization == self.organization && self.includes_division(&record.division)
    }
}

impl Default for PartitionFilter {
    fn default() -> Self {
        PartitionFilter::new(Organization::default(), DepartmentView::default())
    }
}

// ============================================================================
// BUILDER MODE & LAYOUT
// ============================================================================

/// Which tree builder shapes the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderMode {
    /// Only populated levels appear; empty leaves are pruned.
    #[default]
    SkipAndPrune,
    /// Team, process and plant always occupy their slot.
    FixedSlot,
}

impl BuilderMode {
    /// The column layout each mode was designed around.
    pub fn default_layout(self) -> ColumnLayout {
        match self {
            BuilderMode::SkipAndPrune => ColumnLayout::Grouped,
            BuilderMode::FixedSlot => ColumnLayout::Interleaved,
        }
    }
}

/// How job-title columns are arranged in the rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLayout {
    /// Matrix A per job + total, Matrix B per job + total, then balance.
    #[default]
    Grouped,
    /// Matrix A, Matrix B and balance side by side for each job.
    Interleaved,
}

// ============================================================================
// DRILLDOWN DEFINITION
// ============================================================================

/// Complete description of one drilldown view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrilldownDefinition {
    pub filter: PartitionFilter,
    pub mode: BuilderMode,
    /// Job-title columns, in display order.
    pub job_titles: Vec<String>,
    /// Left-hand measure ("Matrix A").
    pub matrix_a: Measure,
    /// Right-hand measure ("Matrix B").
    pub matrix_b: Measure,
    pub layout: ColumnLayout,
    /// Seed the skip-and-prune tree with every division of the department
    /// class found in the full snapshot, so divisions without records for
    /// the selected organization still show with zero values.
    #[serde(default)]
    pub show_empty_divisions: bool,
}

impl DrilldownDefinition {
    pub fn new(filter: PartitionFilter, mode: BuilderMode) -> Self {
        DrilldownDefinition {
            job_titles: filter.department_view.default_job_titles(),
            filter,
            mode,
            matrix_a: Measure::TargetHeadcount,
            matrix_b: Measure::ActualHeadcountPrimary,
            layout: mode.default_layout(),
            show_empty_divisions: false,
        }
    }

    pub fn with_job_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.job_titles = titles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_matrices(mut self, matrix_a: Measure, matrix_b: Measure) -> Self {
        self.matrix_a = matrix_a;
        self.matrix_b = matrix_b;
        self
    }
}

impl Default for DrilldownDefinition {
    fn default() -> Self {
        DrilldownDefinition::new(PartitionFilter::default(), BuilderMode::default())
    }
}
