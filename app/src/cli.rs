//! FILENAME: app/src/cli.rs
// PURPOSE: Argument value types shared by the command line and the shell.

use clap::ValueEnum;
use drilldown_engine::{BuilderMode, ColumnLayout, DepartmentView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    #[value(alias = "production")]
    Prod,
    #[value(aliases = ["non-production", "non_production"])]
    Nonprod,
}

impl From<ViewArg> for DepartmentView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Prod => DepartmentView::Production,
            ViewArg::Nonprod => DepartmentView::NonProduction,
        }
    }
}

/// View mode 1 is skip-and-prune, view mode 2 is fixed-slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    #[value(name = "skip-prune", alias = "1")]
    SkipPrune,
    #[value(name = "fixed-slot", alias = "2")]
    FixedSlot,
}

impl From<ModeArg> for BuilderMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::SkipPrune => BuilderMode::SkipAndPrune,
            ModeArg::FixedSlot => BuilderMode::FixedSlot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Grouped,
    Interleaved,
}

impl From<LayoutArg> for ColumnLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Grouped => ColumnLayout::Grouped,
            LayoutArg::Interleaved => ColumnLayout::Interleaved,
        }
    }
}

/// Switch argument for shell toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnOff {
    #[value(aliases = ["true", "yes"])]
    On,
    #[value(aliases = ["false", "no"])]
    Off,
}

impl From<OnOff> for bool {
    fn from(value: OnOff) -> Self {
        value == OnOff::On
    }
}

/// Case-insensitive parse of any `ValueEnum`, aliases included.
pub fn parse_value<T: ValueEnum>(input: &str) -> Result<T, String> {
    T::from_str(input.trim(), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_domain_values() {
        assert_eq!(DepartmentView::from(parse_value::<ViewArg>("Production").unwrap()), DepartmentView::Production);
        assert_eq!(DepartmentView::from(parse_value::<ViewArg>("non-production").unwrap()), DepartmentView::NonProduction);
        assert_eq!(BuilderMode::from(parse_value::<ModeArg>("2").unwrap()), BuilderMode::FixedSlot);
        assert_eq!(BuilderMode::from(parse_value::<ModeArg>("skip-prune").unwrap()), BuilderMode::SkipAndPrune);
        assert!(parse_value::<ModeArg>("3").is_err());
        assert_eq!(ColumnLayout::from(parse_value::<LayoutArg>("Interleaved").unwrap()), ColumnLayout::Interleaved);
        assert!(bool::from(parse_value::<OnOff>("yes").unwrap()));
        assert!(!bool::from(parse_value::<OnOff>("off").unwrap()));
    }
}
