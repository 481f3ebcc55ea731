//! FILENAME: app/src/lib.rs
// PURPOSE: Staffing dashboard application library. The binary in main.rs is
// a thin clap front end over these modules.

pub mod logging;

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod shell;

pub use cli::{parse_value, LayoutArg, ModeArg, OnOff, OutputFormat, ViewArg};
pub use commands::{load_snapshot, open_session, run_sample, run_show, AppError};
pub use config::{ConfigError, DashboardConfig, LoggingConfig};
pub use logging::init_logging;
pub use render::{format_number, render_json, render_table, render_text, RenderOptions};
pub use shell::{run_shell, Dashboard, ShellCommand, ShellError, ShellOutcome};
