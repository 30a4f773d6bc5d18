// ============================================================
// CSV PARSER
// ============================================================
// Split product files into header and data rows, one physical line per row.
// Quoted fields may contain commas but not line breaks.

use std::path::Path;

use super::FileReader;
use crate::domain::error::{AppError, Result};
use crate::domain::product::{CsvDocument, RawRow};

/// Line-oriented CSV parser for product import files
pub struct CsvParser {
    reader: FileReader,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            reader: FileReader::default(),
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific reader (fallback encoding)
    pub fn with_reader(mut self, reader: FileReader) -> Self {
        self.reader = reader;
        self
    }

    /// Read and parse a CSV file
    pub fn parse_file(&self, path: &Path) -> Result<CsvDocument> {
        let content = self.reader.read(path)?;
        self.parse_content(&content)
    }

    /// Parse CSV content from string.
    /// The first line is the header row; blank data lines are dropped.
    pub fn parse_content(&self, content: &str) -> Result<CsvDocument> {
        let mut lines = content.lines().enumerate();

        let headers = match lines.next() {
            Some((_, first)) if !first.trim().is_empty() => parse_line(first),
            _ => {
                return Err(AppError::ValidationError(
                    "CSV content has no header row".to_string(),
                ))
            }
        };

        let rows = lines
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| RawRow::new(idx + 1, parse_line(line)))
            .collect();

        Ok(CsvDocument { headers, rows })
    }
}

/// Split one line into trimmed fields.
///
/// Double quotes delimit a field that may contain commas; `""` inside a quoted
/// field yields one `"`. A quote left open at end of line closes the field there.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
