//! FILENAME: app/src/shell.rs
// PURPOSE: Interactive drilldown shell. Reads `:command` lines, applies them
// to a session and re-renders.

use crate::cli::{parse_value, LayoutArg, ModeArg, OnOff, ViewArg};
use crate::config::DashboardConfig;
use crate::render::{render_json, render_text, RenderOptions};
use crate::logging::get_log_path;
use crate::{log_debug, log_error};
use drilldown_engine::{BuilderMode, ColumnLayout, DepartmentView, DrilldownSession};
use records::{Measure, Organization};
use std::io::{self, BufRead, Write};
use thiserror::Error;

pub const PROMPT: &str = "dashboard> ";

const HELP: &str = "\
Commands:
  :show               Re-render the table
  :toggle <row>       Expand or collapse the numbered row
  :expand <id>        Expand a node by id (e.g. U:Production/Upper1)
  :collapse <id>      Collapse a node by id
  :expand-all         Expand every node
  :collapse-all       Collapse every node
  :reset              Back to divisions only
  :org <VJ|JJ|QD>     Switch organization
  :view <prod|nonprod>  Switch department view
  :mode <1|2>         Switch builder (1 skip-prune, 2 fixed-slot)
  :layout <grouped|interleaved>  Arrange job columns
  :empty <on|off>     Show divisions without records (skip-prune only)
  :a <measure>        Set Matrix A (targetHeadcount, actualHeadcountPrimary, actualHeadcountSecondary)
  :b <measure>        Set Matrix B
  :json               Print the current view as JSON
  :help               Show this help
  :quit               Exit";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    #[error("Unknown command: {0} (try :help)")]
    UnknownCommand(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("Invalid argument for {command}: {message}")]
    InvalidArgument {
        command: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Show,
    Toggle(usize),
    Expand(String),
    Collapse(String),
    ExpandAll,
    CollapseAll,
    Reset,
    Org(Organization),
    View(DepartmentView),
    Mode(BuilderMode),
    Layout(ColumnLayout),
    ShowEmpty(bool),
    MatrixA(Measure),
    MatrixB(Measure),
    Json,
    Help,
    Quit,
}

fn invalid(command: &'static str, message: impl ToString) -> ShellError {
    ShellError::InvalidArgument {
        command,
        message: message.to_string(),
    }
}

impl ShellCommand {
    /// Parses one input line. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<ShellCommand>, ShellError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };
        let arg = |command: &'static str| {
            if rest.is_empty() {
                Err(ShellError::MissingArgument(command))
            } else {
                Ok(rest)
            }
        };

        let command = match name {
            ":show" | ":s" => ShellCommand::Show,
            ":toggle" | ":t" => {
                let row = arg(":toggle")?;
                let number: usize = row.parse().map_err(|_| invalid(":toggle", "row must be a number"))?;
                if number == 0 {
                    return Err(invalid(":toggle", "rows are numbered from 1"));
                }
                ShellCommand::Toggle(number)
            }
            ":expand" => ShellCommand::Expand(arg(":expand")?.to_string()),
            ":collapse" => ShellCommand::Collapse(arg(":collapse")?.to_string()),
            ":expand-all" => ShellCommand::ExpandAll,
            ":collapse-all" => ShellCommand::CollapseAll,
            ":reset" => ShellCommand::Reset,
            ":org" => ShellCommand::Org(arg(":org")?.parse::<Organization>().map_err(|e| invalid(":org", e))?),
            ":view" => {
                let view: ViewArg = parse_value(arg(":view")?).map_err(|e| invalid(":view", e))?;
                ShellCommand::View(view.into())
            }
            ":mode" => {
                let mode: ModeArg = parse_value(arg(":mode")?).map_err(|e| invalid(":mode", e))?;
                ShellCommand::Mode(mode.into())
            }
            ":layout" => {
                let layout: LayoutArg = parse_value(arg(":layout")?).map_err(|e| invalid(":layout", e))?;
                ShellCommand::Layout(layout.into())
            }
            ":empty" => {
                let show: OnOff = parse_value(arg(":empty")?).map_err(|e| invalid(":empty", e))?;
                ShellCommand::ShowEmpty(show.into())
            }
            ":a" => ShellCommand::MatrixA(arg(":a")?.parse::<Measure>().map_err(|e| invalid(":a", e))?),
            ":b" => ShellCommand::MatrixB(arg(":b")?.parse::<Measure>().map_err(|e| invalid(":b", e))?),
            ":json" => ShellCommand::Json,
            ":help" | ":h" => ShellCommand::Help,
            ":quit" | ":exit" | ":q" => ShellCommand::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// What the shell does after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellOutcome {
    Render,
    Print(String),
    Quit,
}

/// A session plus the configuration it was opened with.
pub struct Dashboard {
    session: DrilldownSession,
    config: DashboardConfig,
    options: RenderOptions,
}

impl Dashboard {
    pub fn new(session: DrilldownSession, config: DashboardConfig) -> Self {
        Dashboard {
            session,
            config,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session(&self) -> &DrilldownSession {
        &self.session
    }

    pub fn render(&mut self) -> String {
        let view = self.session.render();
        render_text(&view, self.options)
    }

    fn switch_view(&mut self, view: DepartmentView) {
        let mut filter = self.session.definition().filter.clone();
        filter.department_view = view;
        self.session.set_filter(filter);
        self.session.set_job_titles(self.config.job_titles(view));
    }

    fn set_node(&mut self, id: &str, expanded: bool) -> ShellOutcome {
        if self.session.set_expanded(id, expanded) {
            ShellOutcome::Render
        } else {
            ShellOutcome::Print(format!("No expandable node '{}'", id))
        }
    }

    pub fn apply(&mut self, command: ShellCommand) -> ShellOutcome {
        log_debug!("SHELL", "apply {:?}", command);
        match command {
            ShellCommand::Show => ShellOutcome::Render,
            ShellCommand::Toggle(number) => match self.session.toggle_row(number - 1) {
                Some(_) => ShellOutcome::Render,
                None => ShellOutcome::Print(format!("Row {} cannot be expanded", number)),
            },
            ShellCommand::Expand(id) => self.set_node(&id, true),
            ShellCommand::Collapse(id) => self.set_node(&id, false),
            ShellCommand::ExpandAll => {
                self.session.expand_all();
                ShellOutcome::Render
            }
            ShellCommand::CollapseAll => {
                self.session.collapse_all();
                ShellOutcome::Render
            }
            ShellCommand::Reset => {
                self.session.reset_expand_state();
                ShellOutcome::Render
            }
            ShellCommand::Org(organization) => {
                let mut filter = self.session.definition().filter.clone();
                filter.organization = organization;
                self.session.set_filter(filter);
                ShellOutcome::Render
            }
            ShellCommand::View(view) => {
                self.switch_view(view);
                ShellOutcome::Render
            }
            ShellCommand::Mode(mode) => {
                self.session.set_mode(mode);
                ShellOutcome::Render
            }
            ShellCommand::Layout(layout) => {
                self.session.set_layout(layout);
                ShellOutcome::Render
            }
            ShellCommand::ShowEmpty(show) => {
                self.session.set_show_empty_divisions(show);
                ShellOutcome::Render
            }
            ShellCommand::MatrixA(measure) => {
                let b = self.session.definition().matrix_b;
                self.session.set_matrices(measure, b);
                ShellOutcome::Render
            }
            ShellCommand::MatrixB(measure) => {
                let a = self.session.definition().matrix_a;
                self.session.set_matrices(a, measure);
                ShellOutcome::Render
            }
            ShellCommand::Json => {
                let view = self.session.render();
                match render_json(&view) {
                    Ok(json) => ShellOutcome::Print(json),
                    Err(e) => {
                        log_error!("SHELL", "rendering JSON failed: {}", e);
                        ShellOutcome::Print(format!("Error: {}", e))
                    }
                }
            }
            ShellCommand::Help => ShellOutcome::Print(HELP.to_string()),
            ShellCommand::Quit => ShellOutcome::Quit,
        }
    }
}

/// Runs the shell until `:quit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(
    dashboard: &mut Dashboard,
    input: R,
    output: &mut W,
) -> io::Result<()> {
    writeln!(output, "Staffing Drilldown Shell")?;
    if let Some(path) = get_log_path() {
        writeln!(output, "Logging to {}", path.display())?;
    }
    writeln!(output, "Type :help for commands. :quit to exit.\n")?;
    writeln!(output, "{}", dashboard.render())?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "Error: {}", e)?;
                continue;
            }
        };

        match dashboard.apply(command) {
            ShellOutcome::Render => writeln!(output, "{}", dashboard.render())?,
            ShellOutcome::Print(text) => writeln!(output, "{}", text)?,
            ShellOutcome::Quit => break,
        }
    }

    writeln!(output, "Bye!")?;
    Ok(())
}
