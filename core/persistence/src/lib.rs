//! FILENAME: core/persistence/src/lib.rs
//! Staffing Workbook Persistence
//!
//! Loads flat staffing records from the `data` sheet of an XLSX workbook and
//! writes record sets back out in the same layout.

mod error;
mod xlsx_reader;
mod xlsx_writer;

pub use error::PersistenceError;
pub use xlsx_reader::{load_records, read_sheet, LoadedRecords, SheetData};
pub use xlsx_writer::save_records_xlsx;

/// Sheet read by default. Workbooks without it fall back to their first
/// sheet.
pub const DATA_SHEET_NAME: &str = "data";

#[cfg(test)]
mod tests {
    use super::*;
    use records::{sample_records, FlatRecord, Organization, RecordError};
    use rust_xlsxwriter::Workbook as XlsxWorkbook;
    use tempfile::tempdir;

    #[test]
    fn sample_records_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.xlsx");
        let mut records = sample_records();
        records.push(
            FlatRecord::new(Organization::Qd, "Quality")
                .with_factory("North")
                .with_line_label("L-7")
                .with_job_title("HOT"),
        );

        save_records_xlsx(&records, &path).unwrap();
        let loaded = load_records(&path, None).unwrap();

        assert_eq!(loaded.sheet_name, DATA_SHEET_NAME);
        assert_eq!(loaded.blank_divisions, 0);
        assert_eq!(loaded.records, records);
    }

    #[test]
    fn falls_back_to_first_sheet_and_skips_blank_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.xlsx");

        let mut xlsx = XlsxWorkbook::new();
        let sheet = xlsx.add_worksheet();
        sheet.set_name("export").unwrap();
        for (col, name) in ["corp", "Department", "JobTitle", "ToBeTargetTO"].iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_string(1, 0, "jj").unwrap();
        sheet.write_string(1, 1, "Production").unwrap();
        sheet.write_string(1, 2, "TL").unwrap();
        sheet.write_string(1, 3, " 4 ").unwrap();
        sheet.write_string(3, 0, "VJ").unwrap();
        xlsx.save(&path).unwrap();

        let data = read_sheet(&path, None).unwrap();
        assert_eq!(data.name, "export");
        assert_eq!(data.row_numbers, vec![2, 4]);

        let loaded = load_records(&path, None).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].organization, Organization::Jj);
        assert_eq!(loaded.records[0].target_headcount, Some(4.0));
        assert_eq!(loaded.blank_divisions, 1);
    }

    #[test]
    fn unknown_organization_fails_the_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.xlsx");

        let mut xlsx = XlsxWorkbook::new();
        let sheet = xlsx.add_worksheet();
        sheet.write_string(0, 0, "corp").unwrap();
        sheet.write_string(0, 1, "Department").unwrap();
        sheet.write_string(1, 0, "VJ").unwrap();
        sheet.write_string(1, 1, "Production").unwrap();
        sheet.write_string(2, 0, "ZZ").unwrap();
        sheet.write_string(2, 1, "Production").unwrap();
        xlsx.save(&path).unwrap();

        match load_records(&path, None) {
            Err(PersistenceError::Record(RecordError::UnknownOrganization { row, value })) => {
                assert_eq!(row, 3);
                assert_eq!(value, "ZZ");
            }
            other => panic!("expected unknown organization, got {:?}", other),
        }
    }

    #[test]
    fn missing_columns_and_sheets_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nocorp.xlsx");

        let mut xlsx = XlsxWorkbook::new();
        let sheet = xlsx.add_worksheet();
        sheet.write_string(0, 0, "Department").unwrap();
        sheet.write_string(1, 0, "Production").unwrap();
        xlsx.save(&path).unwrap();

        assert!(matches!(
            load_records(&path, None),
            Err(PersistenceError::MissingColumn(ref c)) if c == "corp"
        ));
        assert!(matches!(
            load_records(&path, Some("data")),
            Err(PersistenceError::SheetNotFound(_))
        ));
    }
}
