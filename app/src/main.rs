//! Staffing dashboard command line.
//!
//! `show` prints the drilldown once, `shell` opens an interactive session,
//! `sample` writes the bundled sample records as a workbook.

use anyhow::Context;
use app_lib::{
    init_logging, open_session, run_sample, run_shell, run_show, Dashboard, DashboardConfig,
    ModeArg, OutputFormat, RenderOptions, ViewArg,
};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use records::{Measure, Organization};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "staffing-dashboard", version, about = "Staffing drilldown dashboard")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Workbook to load (overrides the configuration)
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    /// Sheet to read (defaults to `data`, then the first sheet)
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Organization
    #[arg(long, global = true)]
    org: Option<Organization>,

    /// Department view
    #[arg(long, global = true)]
    view: Option<ViewArg>,

    /// Builder mode (1 = skip-prune, 2 = fixed-slot)
    #[arg(long, global = true)]
    mode: Option<ModeArg>,

    /// Matrix A measure
    #[arg(long = "a", global = true)]
    matrix_a: Option<Measure>,

    /// Matrix B measure
    #[arg(long = "b", global = true)]
    matrix_b: Option<Measure>,

    /// Keep divisions without records for the organization visible
    #[arg(long, global = true)]
    show_empty_divisions: bool,

    /// Log file (overrides the configuration)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the drilldown table once
    Show {
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,

        /// Expand every node instead of divisions only
        #[arg(long)]
        expand_all: bool,

        /// Disable colours
        #[arg(long)]
        plain: bool,
    },
    /// Start an interactive shell
    Shell,
    /// Write the bundled sample records as a workbook
    Sample {
        /// Output path
        #[arg(default_value = "sample.xlsx")]
        output: PathBuf,
    },
}

impl Cli {
    fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(workbook) = &self.workbook {
            config.workbook = Some(workbook.clone());
        }
        if let Some(sheet) = &self.sheet {
            config.sheet = Some(sheet.clone());
        }
        if let Some(org) = self.org {
            config.organization = org;
        }
        if let Some(view) = self.view {
            config.department_view = view.into();
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(measure) = self.matrix_a {
            config.matrix_a = measure;
        }
        if let Some(measure) = self.matrix_b {
            config.matrix_b = measure;
        }
        if self.show_empty_divisions {
            config.show_empty_divisions = true;
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
        if self.verbose {
            config.logging.level = LevelFilter::Debug.to_string();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_logging(config.log_level()?, config.logging.file.as_deref())
        .map_err(anyhow::Error::msg)
        .context("initializing logging")?;

    match cli.command {
        Commands::Show {
            format,
            expand_all,
            plain,
        } => {
            let options = RenderOptions {
                plain,
                ..RenderOptions::default()
            };
            println!("{}", run_show(&config, format, expand_all, options)?);
        }
        Commands::Shell => {
            let session = open_session(&config)?;
            let mut dashboard = Dashboard::new(session, config);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            run_shell(&mut dashboard, stdin.lock(), &mut stdout)?;
        }
        Commands::Sample { output } => {
            let count = run_sample(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote {} records to {}", count, output.display());
        }
    }

    Ok(())
}
