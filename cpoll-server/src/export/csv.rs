//! CSV export

use cpoll_common::ResponseRecord;

use super::{row_cells, ExportError, COLUMNS};

/// Header row plus one row per record; serials start at 1
pub fn render_csv(records: &[&ResponseRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;

    for (index, record) in records.iter().enumerate() {
        writer.write_record(row_cells(index + 1, record))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::filter::tests::record;

    #[test]
    fn test_header_and_rows() {
        let a = record("Ada", "Osun", "12 Main St, Osogbo");
        let b = record("Bola \"BJ\"", "Oyo", "45 Side Rd");
        let bytes = render_csv(&[&a, &b]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut reader = ::csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());

        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][14], "12 Main St, Osogbo");
        assert_eq!(&rows[1][0], "2");
        assert_eq!(&rows[1][4], "Bola \"BJ\"");
    }

    #[test]
    fn test_empty_set_has_header_only() {
        let text = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Serial,ID,Created At"));
    }
}
