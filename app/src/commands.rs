//! FILENAME: app/src/commands.rs
// PURPOSE: One-shot commands behind the binary's subcommands.

use crate::cli::OutputFormat;
use crate::config::{ConfigError, DashboardConfig};
use crate::render::{render_json, render_text, RenderOptions};
use crate::{log_enter, log_exit, log_info, log_warn};
use drilldown_engine::DrilldownSession;
use persistence::PersistenceError;
use records::{sample_records, FlatRecord};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The record snapshot a configuration points at: the configured workbook,
/// or the bundled sample set.
pub fn load_snapshot(config: &DashboardConfig) -> Result<Vec<FlatRecord>, AppError> {
    match &config.workbook {
        Some(path) => {
            let loaded = persistence::load_records(path, config.sheet.as_deref())?;
            if loaded.blank_divisions > 0 {
                log_warn!(
                    "LOAD",
                    "{} row(s) in sheet '{}' have no division and will be skipped",
                    loaded.blank_divisions,
                    loaded.sheet_name
                );
            }
            Ok(loaded.records)
        }
        None => {
            log_info!("LOAD", "no workbook configured, using bundled sample records");
            Ok(sample_records())
        }
    }
}

/// Opens a session for the configuration.
pub fn open_session(config: &DashboardConfig) -> Result<DrilldownSession, AppError> {
    let records = load_snapshot(config)?;
    Ok(DrilldownSession::new(records, config.definition()))
}

/// Renders the configured drilldown once.
pub fn run_show(
    config: &DashboardConfig,
    format: OutputFormat,
    expand_all: bool,
    options: RenderOptions,
) -> Result<String, AppError> {
    log_enter!("CMD", "run_show", "format={:?} expand_all={}", format, expand_all);
    let mut session = open_session(config)?;
    if expand_all {
        session.expand_all();
    }
    let view = session.render();
    let output = match format {
        OutputFormat::Table => render_text(&view, options),
        OutputFormat::Json => render_json(&view)?,
    };
    log_exit!("CMD", "run_show", "{} rows", view.rows.len());
    Ok(output)
}

/// Writes the bundled sample set as a workbook. Returns the record count.
pub fn run_sample(output: &Path) -> Result<usize, AppError> {
    let records = sample_records();
    persistence::save_records_xlsx(&records, output)?;
    log_info!("CMD", "sample workbook written to {}", output.display());
    Ok(records.len())
}
