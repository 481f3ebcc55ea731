//! FILENAME: app/src/config.rs
// PURPOSE: Dashboard configuration loaded from JSON, with defaults for every field.

use drilldown_engine::{
    BuilderMode, DepartmentView, DrilldownDefinition, PartitionFilter,
    DEFAULT_PRODUCTION_DIVISION, NON_PRODUCTION_JOB_TITLES, PRODUCTION_JOB_TITLES,
};
use log::LevelFilter;
use records::{Measure, Organization};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Unknown log level: {0}")]
    UnknownLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file, truncated on start. Console only when absent.
    pub file: Option<PathBuf>,
    /// One of off, error, warn, info, debug, trace.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: "warn".to_string(),
        }
    }
}

fn titles(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Workbook to load. The bundled sample set is used when absent.
    pub workbook: Option<PathBuf>,
    /// Sheet to read; `data` or the first sheet when absent.
    pub sheet: Option<String>,
    pub production_division: String,
    pub production_job_titles: Vec<String>,
    pub non_production_job_titles: Vec<String>,
    pub organization: Organization,
    pub department_view: DepartmentView,
    pub mode: BuilderMode,
    pub matrix_a: Measure,
    pub matrix_b: Measure,
    pub show_empty_divisions: bool,
    pub logging: LoggingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            workbook: None,
            sheet: None,
            production_division: DEFAULT_PRODUCTION_DIVISION.to_string(),
            production_job_titles: titles(&PRODUCTION_JOB_TITLES),
            non_production_job_titles: titles(&NON_PRODUCTION_JOB_TITLES),
            organization: Organization::default(),
            department_view: DepartmentView::default(),
            mode: BuilderMode::default(),
            matrix_a: Measure::TargetHeadcount,
            matrix_b: Measure::ActualHeadcountPrimary,
            show_empty_divisions: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => DashboardConfig::load(path),
            None => Ok(DashboardConfig::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.production_division.trim().is_empty() {
            return Err(ConfigError::Invalid("production_division is blank".to_string()));
        }
        for (name, list) in [
            ("production_job_titles", &self.production_job_titles),
            ("non_production_job_titles", &self.non_production_job_titles),
        ] {
            if list.is_empty() {
                return Err(ConfigError::Invalid(format!("{} is empty", name)));
            }
            if list.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!("{} contains a blank title", name)));
            }
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        self.logging
            .level
            .parse()
            .map_err(|_| ConfigError::UnknownLogLevel(self.logging.level.clone()))
    }

    pub fn job_titles(&self, view: DepartmentView) -> Vec<String> {
        match view {
            DepartmentView::Production => self.production_job_titles.clone(),
            DepartmentView::NonProduction => self.non_production_job_titles.clone(),
        }
    }

    pub fn filter(&self) -> PartitionFilter {
        PartitionFilter::new(self.organization, self.department_view)
            .with_production_division(&self.production_division)
    }

    /// The drilldown this configuration opens with.
    pub fn definition(&self) -> DrilldownDefinition {
        DrilldownDefinition {
            show_empty_divisions: self.show_empty_divisions,
            ..DrilldownDefinition::new(self.filter(), self.mode)
                .with_job_titles(self.job_titles(self.department_view))
                .with_matrices(self.matrix_a, self.matrix_b)
        }
    }
}
