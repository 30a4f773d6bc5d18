// ============================================================
// PRODUCT IMPORT DOMAIN LAYER
// ============================================================
// Core types and value objects for bulk product import
// No I/O, no async

mod canonical_field;
mod column_mapping;
mod import_summary;
mod normalized_record;
mod raw_row;

pub use canonical_field::{CanonicalField, ValueKind};
pub use column_mapping::ColumnMapping;
pub use import_summary::{BatchReceipt, BatchReport, ImportSummary, RowTally};
pub use normalized_record::{CleanedValue, NormalizedRecord, RowOutcome};
pub use raw_row::{CsvDocument, RawRow};
