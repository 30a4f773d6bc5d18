// ============================================================
// BATCH IMPORTER
// ============================================================
// Submit importable records to a sink in fixed-size batches.
// Batches run strictly one after another; a failed batch is counted
// and the run moves on. No retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::domain::product::{BatchReport, NormalizedRecord};
use crate::infrastructure::sinks::ProductSink;

/// Cooperative stop flag, checked before each batch
#[derive(Debug, Clone, Default)]
pub struct ImportCancellation {
    flag: Arc<AtomicBool>,
}

impl ImportCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Totals of one batched submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRunOutcome {
    pub reports: Vec<BatchReport>,
    pub imported: usize,
    pub failed: usize,
    pub cancelled: usize,
}

pub struct BatchImporter<'a> {
    sink: &'a dyn ProductSink,
    batch_size: usize,
    batch_timeout: Duration,
    cancellation: ImportCancellation,
}

impl<'a> BatchImporter<'a> {
    pub fn new(sink: &'a dyn ProductSink, batch_size: usize, batch_timeout: Duration) -> Self {
        Self {
            sink,
            batch_size: batch_size.max(1),
            batch_timeout,
            cancellation: ImportCancellation::default(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: ImportCancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Submit all records. Never fails: transport errors and timeouts become failure counts.
    pub async fn run(&self, records: &[NormalizedRecord]) -> BatchRunOutcome {
        let mut outcome = BatchRunOutcome::default();
        let total_batches = records.len().div_ceil(self.batch_size);

        for (idx, batch) in records.chunks(self.batch_size).enumerate() {
            if self.cancellation.is_cancelled() {
                outcome.cancelled = records.len() - idx * self.batch_size;
                warn!(
                    batch = idx + 1,
                    remaining_records = outcome.cancelled,
                    "Import cancelled, remaining batches not submitted"
                );
                break;
            }

            let report = self.submit(idx + 1, batch, &outcome).await;
            outcome.imported += report.succeeded;
            outcome.failed += report.failed;

            info!(
                sink = self.sink.name(),
                batch = report.batch,
                of = total_batches,
                records = report.size,
                succeeded = report.succeeded,
                failed = report.failed,
                total_succeeded = report.cumulative_succeeded,
                total_failed = report.cumulative_failed,
                "Batch processed"
            );
            outcome.reports.push(report);
        }

        outcome
    }

    async fn submit(
        &self,
        number: usize,
        batch: &[NormalizedRecord],
        so_far: &BatchRunOutcome,
    ) -> BatchReport {
        let size = batch.len();

        let (succeeded, error) =
            match timeout(self.batch_timeout, self.sink.submit_batch(batch)).await {
                Ok(Ok(receipt)) => (receipt.succeeded.min(size), None),
                Ok(Err(e)) => (0, Some(e.to_string())),
                Err(_) => (
                    0,
                    Some(format!(
                        "timed out after {} ms",
                        self.batch_timeout.as_millis()
                    )),
                ),
            };
        let failed = size - succeeded;

        if let Some(error) = &error {
            warn!(batch = number, records = size, error = %error, "Batch failed");
        }

        BatchReport {
            batch: number,
            size,
            succeeded,
            failed,
            error,
            cumulative_succeeded: so_far.imported + succeeded,
            cumulative_failed: so_far.failed + failed,
        }
    }
}
