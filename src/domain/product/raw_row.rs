// ============================================================
// RAW ROWS
// ============================================================
// Parsed but uncleaned CSV content

use serde::{Deserialize, Serialize};

/// One data line split into trimmed cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based line number in the source file
    pub line: usize,

    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// Header row plus the non-blank data rows of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl CsvDocument {
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }
}
