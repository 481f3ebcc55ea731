//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use app_lib::{open_session, run_sample, run_shell, Dashboard, DashboardConfig, RenderOptions};
use drilldown_engine::DrilldownSession;
use records::{FlatRecord, Organization};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test harness owning a scratch directory and a configuration.
pub struct TestHarness {
    pub dir: TempDir,
    pub config: DashboardConfig,
}

impl TestHarness {
    /// Default configuration: bundled sample records, no workbook.
    pub fn new() -> Self {
        TestHarness {
            dir: tempfile::tempdir().expect("create temp dir"),
            config: DashboardConfig::default(),
        }
    }

    /// Configuration pointing at a freshly written sample workbook.
    pub fn with_sample_workbook() -> Self {
        let mut harness = Self::new();
        let path = harness.path("sample.xlsx");
        run_sample(&path).expect("write sample workbook");
        harness.config.workbook = Some(path);
        harness
    }

    /// Configuration pointing at a workbook holding `records`.
    pub fn with_records(records: &[FlatRecord]) -> Self {
        let mut harness = Self::new();
        let path = harness.path("records.xlsx");
        persistence::save_records_xlsx(records, &path).expect("write workbook");
        harness.config.workbook = Some(path);
        harness
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn session(&self) -> DrilldownSession {
        open_session(&self.config).expect("open session")
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.session(), self.config.clone()).with_options(RenderOptions {
            plain: true,
            ..RenderOptions::default()
        })
    }

    /// Runs shell input against a fresh dashboard and returns the output.
    pub fn run_script(&self, script: &str) -> String {
        let mut dashboard = self.dashboard();
        let mut output = Vec::new();
        run_shell(&mut dashboard, script.as_bytes(), &mut output).expect("run shell");
        String::from_utf8(output).expect("utf-8 output")
    }
}

/// The two-record Production/T1/P1/PlantA fixture.
pub struct ScenarioFixture;

impl ScenarioFixture {
    pub fn records() -> Vec<FlatRecord> {
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
}
