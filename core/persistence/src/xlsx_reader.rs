//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::{PersistenceError, DATA_SHEET_NAME};
use calamine::{open_workbook, Data, Reader, Xlsx};
use records::{columns, normalize_row, CellValue, FlatRecord, RawRow};
use std::path::Path;

/// Header-keyed rows of one worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// 1-based sheet row of each entry in `rows`.
    pub row_numbers: Vec<usize>,
}

/// Records loaded from a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecords {
    pub sheet_name: String,
    pub records: Vec<FlatRecord>,
    /// Rows that normalized with a blank division. The builders skip them.
    pub blank_divisions: usize,
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => {
            log::warn!(target: "persistence", "error cell read as empty: {:?}", e);
            CellValue::Empty
        }
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Picks the requested sheet, else `data`, else the first sheet.
fn select_sheet(sheet_names: &[String], requested: Option<&str>) -> Result<String, PersistenceError> {
    if let Some(name) = requested {
        return sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| PersistenceError::SheetNotFound(name.to_string()));
    }
    sheet_names
        .iter()
        .find(|s| s.as_str() == DATA_SHEET_NAME)
        .or_else(|| sheet_names.first())
        .cloned()
        .ok_or_else(|| PersistenceError::InvalidFormat("Workbook contains no sheets".to_string()))
}

/// Reads one worksheet. The first row of the used range is the header row;
/// rows whose cells are all blank are skipped.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<SheetData, PersistenceError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let name = select_sheet(&sheet_names, sheet)?;
    let range = workbook.worksheet_range(&name)?;

    let header_row = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(cells) => cells.iter().map(|c| convert_cell(c).trimmed()).collect(),
        None => {
            return Err(PersistenceError::InvalidFormat(format!(
                "Sheet '{}' is empty",
                name
            )))
        }
    };

    for required in columns::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(PersistenceError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    let mut row_numbers = Vec::new();
    for (offset, cells) in rows_iter.enumerate() {
        let row: RawRow = headers
            .iter()
            .zip(cells.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), convert_cell(cell)))
            .collect();
        if row.values().all(CellValue::is_blank) {
            continue;
        }
        rows.push(row);
        row_numbers.push(header_row + offset + 1);
    }

    Ok(SheetData {
        name,
        headers,
        rows,
        row_numbers,
    })
}

/// Loads and normalizes the records of a workbook. Any row with an unknown
/// organization fails the whole load.
pub fn load_records(path: &Path, sheet: Option<&str>) -> Result<LoadedRecords, PersistenceError> {
    let data = read_sheet(path, sheet)?;
    let records = data
        .rows
        .iter()
        .zip(&data.row_numbers)
        .map(|(row, &number)| normalize_row(row, number))
        .collect::<Result<Vec<_>, _>>()?;
    let blank_divisions = records.iter().filter(|r| !r.has_division()).count();

    log::info!(
        target: "persistence",
        "loaded {} records from sheet '{}' of {} ({} without division)",
        records.len(),
        data.name,
        path.display(),
        blank_divisions
    );

    Ok(LoadedRecords {
        sheet_name: data.name,
        records,
        blank_divisions,
    })
}
