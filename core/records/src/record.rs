//! FILENAME: core/records/src/record.rs
//! PURPOSE: The validated flat record and the raw-row normalization that
//! produces it.
//! CONTEXT: Optional hierarchy fields are stored trimmed and are `None` when
//! blank. Measures keep their "absent" state; they only default to zero when
//! a builder accumulates them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cell::{format_number_key, CellValue, RawRow};
use crate::error::RecordError;
use crate::measure::{Measure, MeasureTotals};

/// Worksheet header names.
pub mod columns {
    pub const ORGANIZATION: &str = "corp";
    pub const DIVISION: &str = "Department";
    pub const TEAM: &str = "Team";
    pub const PROCESS: &str = "Process";
    pub const FACTORY: &str = "Factory";
    pub const PLANT: &str = "Plant";
    pub const LINE: &str = "Line";
    pub const JOB_TITLE: &str = "JobTitle";
    pub const TARGET_HEADCOUNT: &str = "ToBeTargetTO";
    pub const ACTUAL_HEADCOUNT_PRIMARY: &str = "AsIsTO";
    pub const ACTUAL_HEADCOUNT_SECONDARY: &str = "AsIsPO";

    /// Column order used when writing a data sheet.
    pub const ALL: [&str; 11] = [
        ORGANIZATION,
        DIVISION,
        TEAM,
        PROCESS,
        FACTORY,
        PLANT,
        LINE,
        JOB_TITLE,
        TARGET_HEADCOUNT,
        ACTUAL_HEADCOUNT_PRIMARY,
        ACTUAL_HEADCOUNT_SECONDARY,
    ];

    /// Columns a data sheet must carry to be loadable.
    pub const REQUIRED: [&str; 2] = [ORGANIZATION, DIVISION];
}

/// Top-level partition key. Not part of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Organization {
    #[default]
    #[serde(rename = "VJ")]
    Vj,
    #[serde(rename = "JJ")]
    Jj,
    #[serde(rename = "QD")]
    Qd,
}

impl Organization {
    pub const ALL: [Organization; 3] = [Organization::Vj, Organization::Jj, Organization::Qd];

    pub fn code(self) -> &'static str {
        match self {
            Organization::Vj => "VJ",
            Organization::Jj => "JJ",
            Organization::Qd => "QD",
        }
    }

    /// Case-insensitive lookup of a trimmed organization code.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Organization::ALL
            .into_iter()
            .find(|o| o.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Organization {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Organization::from_code(s).ok_or_else(|| RecordError::InvalidOrganizationCode(s.to_string()))
    }
}

/// One row of source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub organization: Organization,
    /// Required; a blank division makes the record invisible to the builders.
    pub division: String,
    pub team: Option<String>,
    pub process: Option<String>,
    pub factory: Option<String>,
    pub plant: Option<String>,
    /// Numeric in the source, kept as its trimmed path-key string.
    pub line: Option<String>,
    /// Trimmed; an absent job title is the empty string.
    pub job_title: String,
    pub target_headcount: Option<f64>,
    pub actual_headcount_primary: Option<f64>,
    pub actual_headcount_secondary: Option<f64>,
}

fn label(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl FlatRecord {
    pub fn new(organization: Organization, division: &str) -> Self {
        FlatRecord {
            organization,
            division: division.trim().to_string(),
            team: None,
            process: None,
            factory: None,
            plant: None,
            line: None,
            job_title: String::new(),
            target_headcount: None,
            actual_headcount_primary: None,
            actual_headcount_secondary: None,
        }
    }

    pub fn with_team(mut self, team: &str) -> Self {
        self.team = label(team);
        self
    }

    pub fn with_process(mut self, process: &str) -> Self {
        self.process = label(process);
        self
    }

    pub fn with_factory(mut self, factory: &str) -> Self {
        self.factory = label(factory);
        self
    }

    pub fn with_plant(mut self, plant: &str) -> Self {
        self.plant = label(plant);
        self
    }

    pub fn with_line(mut self, line: f64) -> Self {
        self.line = Some(format_number_key(line));
        self
    }

    pub fn with_line_label(mut self, line: &str) -> Self {
        self.line = label(line);
        self
    }

    pub fn with_job_title(mut self, job_title: &str) -> Self {
        self.job_title = job_title.trim().to_string();
        self
    }

    pub fn with_measures(mut self, target: f64, primary: f64, secondary: f64) -> Self {
        self.target_headcount = Some(target);
        self.actual_headcount_primary = Some(primary);
        self.actual_headcount_secondary = Some(secondary);
        self
    }

    pub fn has_division(&self) -> bool {
        !self.division.trim().is_empty()
    }

    /// The measure value, with absent values read as zero.
    pub fn measure(&self, measure: Measure) -> f64 {
        let value = match measure {
            Measure::TargetHeadcount => self.target_headcount,
            Measure::ActualHeadcountPrimary => self.actual_headcount_primary,
            Measure::ActualHeadcountSecondary => self.actual_headcount_secondary,
        };
        value.unwrap_or(0.0)
    }

    pub fn totals(&self) -> MeasureTotals {
        MeasureTotals::new(
            self.measure(Measure::TargetHeadcount),
            self.measure(Measure::ActualHeadcountPrimary),
            self.measure(Measure::ActualHeadcountSecondary),
        )
    }
}

fn cell<'a>(row: &'a RawRow, column: &str) -> &'a CellValue {
    row.get(column).unwrap_or(&CellValue::Empty)
}

/// Normalizes one header-keyed row. `sheet_row` is the 1-based row number
/// used in error messages.
pub fn normalize_row(row: &RawRow, sheet_row: usize) -> Result<FlatRecord, RecordError> {
    let code = cell(row, columns::ORGANIZATION).trimmed();
    let organization = Organization::from_code(&code).ok_or(RecordError::UnknownOrganization {
        row: sheet_row,
        value: code,
    })?;

    let line_cell = cell(row, columns::LINE);
    let line = match line_cell.as_number() {
        Some(n) => Some(format_number_key(n)),
        None => line_cell.as_label(),
    };

    Ok(FlatRecord {
        organization,
        division: cell(row, columns::DIVISION).trimmed(),
        team: cell(row, columns::TEAM).as_label(),
        process: cell(row, columns::PROCESS).as_label(),
        factory: cell(row, columns::FACTORY).as_label(),
        plant: cell(row, columns::PLANT).as_label(),
        line,
        job_title: cell(row, columns::JOB_TITLE).trimmed(),
        target_headcount: cell(row, columns::TARGET_HEADCOUNT).as_number(),
        actual_headcount_primary: cell(row, columns::ACTUAL_HEADCOUNT_PRIMARY).as_number(),
        actual_headcount_secondary: cell(row, columns::ACTUAL_HEADCOUNT_SECONDARY).as_number(),
    })
}

/// Normalizes a block of rows whose first row sits at `first_sheet_row`.
/// Fails on the first row with an unknown organization.
pub fn normalize_rows(rows: &[RawRow], first_sheet_row: usize) -> Result<Vec<FlatRecord>, RecordError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| normalize_row(row, first_sheet_row + i))
        .collect()
}
