//! Admin exports of the filtered record set
//!
//! CSV and PDF share one fixed column layout. Both exports cover every
//! filtered record, not just the visible page.

use chrono::SecondsFormat;
use cpoll_common::ResponseRecord;
use thiserror::Error;

pub mod csv;
pub mod pdf;

pub const CSV_FILENAME: &str = "polling-responses.csv";
pub const PDF_FILENAME: &str = "polling-responses.pdf";

/// Export column headers, in order
pub const COLUMNS: [&str; 16] = [
    "Serial",
    "ID",
    "Created At",
    "Language",
    "Name",
    "State",
    "LGA",
    "Ward",
    "Age",
    "Gender",
    "Knows Romeo",
    "Knows Muyideen",
    "Knows Abdulrasheed",
    "Heard Savewell",
    "Residence",
    "Phone",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("PDF export failed: {0}")]
    Pdf(String),
}

/// Cell text for one exported row; absent id/timestamp/phone are blank
pub fn row_cells(serial: usize, record: &ResponseRecord) -> [String; 16] {
    [
        serial.to_string(),
        record.id.map(|id| id.to_string()).unwrap_or_default(),
        record
            .created_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default(),
        record.language.clone(),
        record.name.clone(),
        record.state.clone(),
        record.lga.clone(),
        record.ward.clone(),
        record.age.clone(),
        record.gender.clone(),
        record.knows_romeo.clone(),
        record.knows_muyideen.clone(),
        record.knows_abdulrasheed.clone(),
        record.heard_savewell.clone(),
        record.residence.clone(),
        record.phone.clone().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_row_cells_blank_optionals() {
        let mut record = crate::dashboard::filter::tests::record("Ada", "Osun", "1 Oja Rd");
        let cells = row_cells(7, &record);
        assert_eq!(cells[0], "7");
        assert_eq!(cells[1], "");
        assert_eq!(cells[2], "");
        assert_eq!(cells[15], "");

        record.id = Some(42);
        record.created_at = Some(chrono::Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());
        record.phone = Some("08012345678".to_string());
        let cells = row_cells(1, &record);
        assert_eq!(cells[1], "42");
        assert_eq!(cells[2], "2026-03-01T09:30:00Z");
        assert_eq!(cells[4], "Ada");
        assert_eq!(cells[14], "1 Oja Rd");
        assert_eq!(cells[15], "08012345678");
    }
}
