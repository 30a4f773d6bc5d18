// ============================================================
// IMPORT SUMMARY
// ============================================================
// Counters and per-batch reports for one import run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ColumnMapping;

/// What a sink reports back for one accepted batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    pub succeeded: usize,
    pub failed: usize,
}

/// Outcome of one submitted batch, with running totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// 1-based batch number
    pub batch: usize,
    pub size: usize,
    pub succeeded: usize,
    pub failed: usize,

    /// Transport error or timeout, when the whole batch failed
    pub error: Option<String>,

    pub cumulative_succeeded: usize,
    pub cumulative_failed: usize,
}

/// Row classification counts, before anything is submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTally {
    /// Non-blank data lines seen
    pub data_rows: usize,
    pub importable: usize,
    /// Lines whose cell count differs from the header count
    pub parse_errors: usize,
    /// Records without any identifier
    pub validation_errors: usize,
}

impl RowTally {
    pub fn skipped(&self) -> usize {
        self.parse_errors + self.validation_errors
    }
}

/// Final result of one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub run_id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows: RowTally,

    /// Records the sink accepted
    pub imported: usize,

    /// Records lost to batch failures
    pub failed: usize,

    /// Records never submitted because the run was cancelled
    pub cancelled: usize,

    pub batches: Vec<BatchReport>,
    pub mapping: ColumnMapping,
}

impl ImportSummary {
    pub fn skipped(&self) -> usize {
        self.rows.skipped()
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled > 0
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import {} ({})", self.run_id, self.source)?;
        writeln!(f, "  Data rows read:                 {}", self.rows.data_rows)?;
        writeln!(f, "  Imported:                       {}", self.imported)?;
        writeln!(f, "  Skipped (total):                {}", self.skipped())?;
        writeln!(f, "    malformed row:                {}", self.rows.parse_errors)?;
        writeln!(f, "    missing identifier:           {}", self.rows.validation_errors)?;
        writeln!(f, "  Failed in transport:            {}", self.failed)?;
        if self.was_cancelled() {
            writeln!(f, "  Cancelled before submission:    {}", self.cancelled)?;
        }
        writeln!(f, "  Batches submitted:              {}", self.batches.len())?;
        for report in self.batches.iter().filter(|b| b.error.is_some()) {
            writeln!(
                f,
                "    batch {} ({} records) failed: {}",
                report.batch,
                report.size,
                report.error.as_deref().unwrap_or_default()
            )?;
        }
        let elapsed = self.finished_at - self.started_at;
        write!(f, "  Duration:                       {} ms", elapsed.num_milliseconds())
    }
}
