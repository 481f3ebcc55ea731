//! FILENAME: app/src/render.rs
// PURPOSE: Terminal and JSON rendering of a drilldown view.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use drilldown_engine::{BalanceSign, DrilldownView, ViewColumn, ViewColumnType, ViewRow};

/// Header of the row-number column used by `:toggle`.
pub const ROW_NUMBER_HEADER: &str = "#";

/// Inserts `,` every three integer digits.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result = format!("-{}", result);
    }
    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }
    result
}

/// Grouped thousands, at most three decimals, no trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.3}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    add_thousands_separator(text)
}

/// Options for table rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit colours and bold even when stdout is not a terminal.
    pub force_styling: bool,
    /// Suppress styling entirely.
    pub plain: bool,
}

fn header_cell(column: &ViewColumn) -> Cell {
    let text = match &column.group {
        Some(group) => format!("{}\n{}", group, column.header),
        None => column.header.clone(),
    };
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Center)
}

fn label_text(row: &ViewRow) -> String {
    let marker = match (row.is_expandable, row.is_expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    format!("{}{}{}", "  ".repeat(row.indent_level as usize), marker, row.label)
}

fn value_cell(column: &ViewColumn, row: &ViewRow) -> Cell {
    let value = column.value(row).unwrap_or(0.0);
    let mut cell = Cell::new(format_number(value)).set_alignment(CellAlignment::Right);
    if column.is_balance() {
        cell = match BalanceSign::of(value) {
            BalanceSign::Surplus => cell.fg(Color::Green),
            BalanceSign::Shortage => cell.fg(Color::Red),
            BalanceSign::Even => cell,
        };
    }
    if matches!(column.column_type, ViewColumnType::Total { .. }) || row.is_total() {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

fn row_cells(view: &DrilldownView, row: &ViewRow, number: Option<usize>) -> Vec<Cell> {
    let mut cells = vec![Cell::new(number.map(|n| n.to_string()).unwrap_or_default())];
    for column in &view.columns {
        let cell = match column.column_type {
            ViewColumnType::Hierarchy => {
                let cell = Cell::new(label_text(row));
                if row.level == 0 || row.is_total() {
                    cell.add_attribute(Attribute::Bold)
                } else {
                    cell
                }
            }
            _ => value_cell(column, row),
        };
        cells.push(cell);
    }
    cells
}

/// Builds the table. Node rows are numbered from 1; the TOTAL row is last
/// and unnumbered.
pub fn render_table(view: &DrilldownView, options: RenderOptions) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if options.plain {
        table.force_no_tty();
    } else if options.force_styling {
        table.enforce_styling();
    }

    let mut header = vec![Cell::new(ROW_NUMBER_HEADER).add_attribute(Attribute::Bold)];
    header.extend(view.columns.iter().map(header_cell));
    table.set_header(header);

    for (idx, row) in view.rows.iter().enumerate() {
        table.add_row(row_cells(view, row, Some(idx + 1)));
    }
    table.add_row(row_cells(view, &view.total, None));
    table
}

/// The table followed by a one-line summary.
pub fn render_text(view: &DrilldownView, options: RenderOptions) -> String {
    let mut text = render_table(view, options).to_string();
    text.push('\n');
    text.push_str(&format!(
        "{} row(s), A = {}, B = {}",
        view.rows.len(),
        view.matrix_a.display_name(),
        view.matrix_b.display_name()
    ));
    if view.skipped_records > 0 {
        text.push_str(&format!(", {} record(s) without division skipped", view.skipped_records));
    }
    text
}

pub fn render_json(view: &DrilldownView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}
