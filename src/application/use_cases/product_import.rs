// ============================================================
// PRODUCT IMPORT USE CASE
// ============================================================
// Orchestrate one import: read file, map columns, normalize, submit, summarize

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::use_cases::batch_importer::{BatchImporter, ImportCancellation};
use crate::application::use_cases::header_matcher::detect_mapping;
use crate::application::use_cases::row_normalizer::{NormalizedRows, RowNormalizer};
use crate::domain::error::{AppError, Result};
use crate::domain::import_config::ImportConfig;
use crate::domain::product::{CanonicalField, ColumnMapping, CsvDocument, ImportSummary};
use crate::infrastructure::csv::{CsvParser, FileReader};
use crate::infrastructure::sinks::ProductSink;

/// Operator correction applied to the detected mapping before commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEdit {
    Assign(CanonicalField, String),
    Clear(CanonicalField),
}

impl MappingEdit {
    pub fn apply(&self, mapping: &mut ColumnMapping) -> Result<()> {
        match self {
            MappingEdit::Assign(field, header) => mapping.assign(*field, header),
            MappingEdit::Clear(field) => {
                mapping.clear(*field);
                Ok(())
            }
        }
    }
}

/// Parses `field=Header` (assign) or a bare `field` (clear)
impl FromStr for MappingEdit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let field_of = |name: &str| {
            CanonicalField::from_str(name).map_err(AppError::ValidationError)
        };

        match s.split_once('=') {
            Some((field, header)) if !header.trim().is_empty() => {
                Ok(MappingEdit::Assign(field_of(field)?, header.trim().to_string()))
            }
            Some((field, _)) => Ok(MappingEdit::Clear(field_of(field)?)),
            None => Ok(MappingEdit::Clear(field_of(s)?)),
        }
    }
}

/// A file that has been read and mapped, not yet committed
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub run_id: Uuid,
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub document: CsvDocument,
    pub mapping: ColumnMapping,
}

impl PreparedImport {
    pub fn normalize(&self) -> NormalizedRows {
        RowNormalizer::new(&self.mapping).normalize_all(&self.document.rows)
    }
}

/// Bulk product import use case
pub struct ProductImportUseCase {
    config: ImportConfig,
    parser: CsvParser,
}

impl ProductImportUseCase {
    pub fn new(config: ImportConfig) -> Result<Self> {
        let reader = FileReader::with_fallback(&config.fallback_encoding)?;
        Ok(Self {
            config,
            parser: CsvParser::new().with_reader(reader),
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Read a file, detect its mapping and apply operator edits.
    /// An unreadable file aborts here, before anything is submitted.
    pub fn prepare(&self, path: &Path, edits: &[MappingEdit]) -> Result<PreparedImport> {
        let document = self.parser.parse_file(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::prepare_document(source, document, edits)
    }

    /// Same as `prepare`, for content already in memory
    pub fn prepare_content(
        &self,
        source: &str,
        content: &str,
        edits: &[MappingEdit],
    ) -> Result<PreparedImport> {
        let document = self.parser.parse_content(content)?;
        Self::prepare_document(source.to_string(), document, edits)
    }

    fn prepare_document(
        source: String,
        document: CsvDocument,
        edits: &[MappingEdit],
    ) -> Result<PreparedImport> {
        let mut mapping = detect_mapping(&document.headers);
        for edit in edits {
            edit.apply(&mut mapping)?;
        }

        if !mapping.has_identifier() {
            warn!(
                source = %source,
                "No fnsku, asin or lpn column mapped; every row will be rejected"
            );
        }

        Ok(PreparedImport {
            run_id: Uuid::new_v4(),
            source,
            started_at: Utc::now(),
            document,
            mapping,
        })
    }

    /// Normalize and submit a prepared file. Per-row and per-batch failures are counted.
    pub async fn commit(
        &self,
        prepared: PreparedImport,
        sink: &dyn ProductSink,
        cancellation: ImportCancellation,
    ) -> ImportSummary {
        info!(
            run_id = %prepared.run_id,
            source = %prepared.source,
            data_rows = prepared.document.rows.len(),
            sink = sink.name(),
            "Import started"
        );

        let normalized = prepared.normalize();
        for rejected in normalized.rejected.iter().take(20) {
            tracing::debug!(outcome = ?rejected, "Row skipped");
        }

        let outcome = BatchImporter::new(sink, self.config.batch_size, self.config.batch_timeout())
            .with_cancellation(cancellation)
            .run(&normalized.records)
            .await;

        let summary = ImportSummary {
            run_id: prepared.run_id,
            source: prepared.source,
            started_at: prepared.started_at,
            finished_at: Utc::now(),
            rows: normalized.tally,
            imported: outcome.imported,
            failed: outcome.failed,
            cancelled: outcome.cancelled,
            batches: outcome.reports,
            mapping: prepared.mapping,
        };

        info!(
            run_id = %summary.run_id,
            imported = summary.imported,
            skipped = summary.skipped(),
            parse_errors = summary.rows.parse_errors,
            validation_errors = summary.rows.validation_errors,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Import finished"
        );

        summary
    }

    /// Prepare and commit in one go
    pub async fn import_file(
        &self,
        path: &Path,
        edits: &[MappingEdit],
        sink: &dyn ProductSink,
        cancellation: ImportCancellation,
    ) -> Result<ImportSummary> {
        let prepared = self.prepare(path, edits)?;
        Ok(self.commit(prepared, sink, cancellation).await)
    }
}
