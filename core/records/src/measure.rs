//! FILENAME: core/records/src/measure.rs
//! PURPOSE: The three headcount measures and their per-node accumulator.
//! CONTEXT: Measures are addressed either by the typed `Measure` enum or by
//! their string identifier. Identifiers are the camelCase keys used in
//! configuration; the workbook column names are accepted as aliases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::error::MeasureError;

/// One of the three numeric measures carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Measure {
    /// Target headcount ("To-be Target TO").
    #[serde(alias = "ToBeTargetTO")]
    TargetHeadcount,
    /// Actual headcount ("As-is TO").
    #[serde(alias = "AsIsTO")]
    ActualHeadcountPrimary,
    /// Second actual headcount ("As-is PO").
    #[serde(alias = "AsIsPO")]
    ActualHeadcountSecondary,
}

impl Measure {
    pub const ALL: [Measure; 3] = [
        Measure::TargetHeadcount,
        Measure::ActualHeadcountPrimary,
        Measure::ActualHeadcountSecondary,
    ];

    /// The configuration identifier.
    pub fn key(self) -> &'static str {
        match self {
            Measure::TargetHeadcount => "targetHeadcount",
            Measure::ActualHeadcountPrimary => "actualHeadcountPrimary",
            Measure::ActualHeadcountSecondary => "actualHeadcountSecondary",
        }
    }

    /// The workbook column header.
    pub fn column_name(self) -> &'static str {
        match self {
            Measure::TargetHeadcount => "ToBeTargetTO",
            Measure::ActualHeadcountPrimary => "AsIsTO",
            Measure::ActualHeadcountSecondary => "AsIsPO",
        }
    }

    /// Human readable name used in table headers.
    pub fn display_name(self) -> &'static str {
        match self {
            Measure::TargetHeadcount => "To-be Target TO",
            Measure::ActualHeadcountPrimary => "As-is TO",
            Measure::ActualHeadcountSecondary => "As-is PO",
        }
    }

    /// Resolves an identifier or column alias. Unknown keys are `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Measure::ALL
            .into_iter()
            .find(|m| m.key() == key || m.column_name() == key)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Measure {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::from_key(s).ok_or_else(|| MeasureError::Unknown(s.to_string()))
    }
}

/// Sums of the three measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureTotals {
    pub target_headcount: f64,
    pub actual_headcount_primary: f64,
    pub actual_headcount_secondary: f64,
}

impl MeasureTotals {
    pub const ZERO: MeasureTotals = MeasureTotals {
        target_headcount: 0.0,
        actual_headcount_primary: 0.0,
        actual_headcount_secondary: 0.0,
    };

    pub fn new(target: f64, primary: f64, secondary: f64) -> Self {
        MeasureTotals {
            target_headcount: target,
            actual_headcount_primary: primary,
            actual_headcount_secondary: secondary,
        }
    }

    pub fn get(&self, measure: Measure) -> f64 {
        match measure {
            Measure::TargetHeadcount => self.target_headcount,
            Measure::ActualHeadcountPrimary => self.actual_headcount_primary,
            Measure::ActualHeadcountSecondary => self.actual_headcount_secondary,
        }
    }

    /// Sum across all three measures (used by pruning).
    pub fn sum(&self) -> f64 {
        self.target_headcount + self.actual_headcount_primary + self.actual_headcount_secondary
    }
}

impl AddAssign for MeasureTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.target_headcount += rhs.target_headcount;
        self.actual_headcount_primary += rhs.actual_headcount_primary;
        self.actual_headcount_secondary += rhs.actual_headcount_secondary;
    }
}

impl Add for MeasureTotals {
    type Output = MeasureTotals;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}
