//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{PersistenceError, DATA_SHEET_NAME};
use records::{columns, FlatRecord, Measure};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

fn write_label(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> Result<(), PersistenceError> {
    if let Some(text) = value.filter(|t| !t.trim().is_empty()) {
        worksheet.write_string(row, col, text)?;
    }
    Ok(())
}

/// Writes records as a `data` sheet with the standard header row. Lines
/// that read as numbers are written as numbers.
pub fn save_records_xlsx(records: &[FlatRecord], path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(DATA_SHEET_NAME)?;

    let header = Format::new().set_bold();
    for (col, name) in columns::ALL.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        worksheet.write_string(row, 0, record.organization.code())?;
        write_label(worksheet, row, 1, Some(&record.division))?;
        write_label(worksheet, row, 2, record.team.as_deref())?;
        write_label(worksheet, row, 3, record.process.as_deref())?;
        write_label(worksheet, row, 4, record.factory.as_deref())?;
        write_label(worksheet, row, 5, record.plant.as_deref())?;
        if let Some(line) = record.line.as_deref() {
            match line.parse::<f64>() {
                Ok(n) if n.is_finite() => {
                    worksheet.write_number(row, 6, n)?;
                }
                _ => write_label(worksheet, row, 6, Some(line))?,
            }
        }
        write_label(worksheet, row, 7, Some(&record.job_title))?;

        let measures = [
            (8, record.target_headcount),
            (9, record.actual_headcount_primary),
            (10, record.actual_headcount_secondary),
        ];
        for (col, value) in measures {
            if let Some(n) = value {
                worksheet.write_number(row, col, n)?;
            }
        }
    }

    worksheet.set_column_width(1, 16)?;
    worksheet.set_column_width(7, 14)?;
    for measure in Measure::ALL {
        if let Some(col) = columns::ALL.iter().position(|c| *c == measure.column_name()) {
            worksheet.set_column_width(col as u16, 14)?;
        }
    }

    xlsx.save(path)?;
    log::info!(
        target: "persistence",
        "wrote {} records to {}",
        records.len(),
        path.display()
    );
    Ok(())
}
