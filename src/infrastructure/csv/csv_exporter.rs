// ============================================================
// CSV EXPORTER
// ============================================================
// Write normalized records (or an empty template) back out as CSV

use csv::{Writer, WriterBuilder};
use std::io::Write;
use std::path::Path;

use crate::domain::error::{AppError, Result};
use crate::domain::product::{CanonicalField, CleanedValue, NormalizedRecord};

/// CSV writer for normalized product records
pub struct CsvExporter;

impl CsvExporter {
    /// Export records to a file, header row first. Returns the number of records written.
    pub fn export_file(path: &Path, records: &[NormalizedRecord]) -> Result<usize> {
        let writer = WriterBuilder::new().from_path(path).map_err(|e| {
            AppError::IoError(format!("Failed to create {}: {}", path.display(), e))
        })?;
        Self::write_records(writer, records)
    }

    /// Export records to any writer
    pub fn export<W: Write>(out: W, records: &[NormalizedRecord]) -> Result<usize> {
        Self::write_records(WriterBuilder::new().from_writer(out), records)
    }

    /// Write a header-only file listing the canonical fields
    pub fn write_template(path: &Path) -> Result<()> {
        let writer = WriterBuilder::new().from_path(path).map_err(|e| {
            AppError::IoError(format!("Failed to create {}: {}", path.display(), e))
        })?;
        Self::write_records(writer, &[]).map(|_| ())
    }

    fn write_records<W: Write>(mut writer: Writer<W>, records: &[NormalizedRecord]) -> Result<usize> {
        writer
            .write_record(CanonicalField::ALL.iter().map(|f| f.as_str()))
            .map_err(|e| AppError::IoError(format!("Failed to write CSV header: {}", e)))?;

        for record in records {
            let cells = CanonicalField::ALL.iter().map(|f| format_cell(record.get(*f)));
            writer
                .write_record(cells)
                .map_err(|e| AppError::IoError(format!("Failed to write CSV record: {}", e)))?;
        }

        writer
            .flush()
            .map_err(|e| AppError::IoError(format!("Failed to flush CSV output: {}", e)))?;

        Ok(records.len())
    }
}

fn format_cell(value: Option<CleanedValue>) -> String {
    match value {
        Some(CleanedValue::Text(s)) => s,
        Some(CleanedValue::Number(n)) => n.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> NormalizedRecord {
        NormalizedRecord {
            fnsku: Some("X001ABCDEF".into()),
            name: Some("Widget, Deluxe".into()),
            price: Some(19.99),
            quantity: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let mut out = Vec::new();
        let written = CsvExporter::export(&mut out, &[widget()]).unwrap();
        assert_eq!(written, 1);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("fnsku,asin,lpn,upc,name,price,category,quantity,brand")
        );
        assert_eq!(
            lines.next(),
            Some(r#"X001ABCDEF,,,,"Widget, Deluxe",19.99,,10,"#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_template_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.csv");
        CsvExporter::write_template(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "fnsku,asin,lpn,upc,name,price,category,quantity,brand\n");
    }
}
