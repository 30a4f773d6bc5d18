use std::path::Path;

use tracing::{error, info, warn};

use crate::application::{ImportCancellation, MappingEdit, PreparedImport, ProductImportUseCase};
use crate::domain::error::{AppError, Result};
use crate::domain::import_config::ImportConfig;
use crate::domain::product::ImportSummary;
use crate::infrastructure::csv::CsvExporter;
use crate::infrastructure::db::sqlite::SqliteProductRepository;
use crate::infrastructure::sinks::build_sink;

use super::{CliCommand, USAGE};

/// Shared state for command handlers
pub struct CliState {
    pub config: ImportConfig,
    pub import_use_case: ProductImportUseCase,
}

impl CliState {
    pub fn new(config: ImportConfig) -> Result<Self> {
        let import_use_case = ProductImportUseCase::new(config.clone())?;
        Ok(Self {
            config,
            import_use_case,
        })
    }
}

pub async fn execute(state: &CliState, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Mapping { file, edits } => show_mapping(state, &file, &edits),
        CliCommand::Preview { file, edits, rows } => preview(state, &file, &edits, rows),
        CliCommand::Import {
            file,
            edits,
            export,
        } => import(state, &file, &edits, export.as_deref()).await.map(|_| ()),
        CliCommand::Export {
            file,
            output,
            edits,
        } => export(state, &file, &output, &edits),
        CliCommand::Template { output } => {
            CsvExporter::write_template(&output)?;
            println!("Template written to {}", output.display());
            Ok(())
        }
        CliCommand::List { limit, offset } => list(state, limit, offset).await,
    }
}

fn print_mapping(prepared: &PreparedImport) {
    println!(
        "{} ({} columns, {} data rows)",
        prepared.source,
        prepared.mapping.headers().len(),
        prepared.document.rows.len()
    );
    print!("{}", prepared.mapping);

    for (header, fields) in prepared.mapping.shared_headers() {
        let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
        println!("  note: '{}' feeds {}", header, names.join(", "));
    }
    if !prepared.mapping.has_identifier() {
        println!("  warning: no fnsku, asin or lpn column; every row will be skipped");
    }
}

fn show_mapping(state: &CliState, file: &Path, edits: &[MappingEdit]) -> Result<()> {
    let prepared = state.import_use_case.prepare(file, edits)?;
    print_mapping(&prepared);
    Ok(())
}

fn preview(state: &CliState, file: &Path, edits: &[MappingEdit], rows: usize) -> Result<()> {
    let prepared = state.import_use_case.prepare(file, edits)?;
    let normalized = prepared.normalize();
    print_mapping(&prepared);

    let sample: Vec<_> = normalized.records.iter().take(rows).collect();
    let json = serde_json::to_string_pretty(&sample)
        .map_err(|e| AppError::Internal(format!("Failed to serialize preview: {}", e)))?;
    println!("{}", json);

    println!(
        "{} importable, {} malformed, {} missing identifier",
        normalized.tally.importable, normalized.tally.parse_errors, normalized.tally.validation_errors
    );
    Ok(())
}

async fn import(
    state: &CliState,
    file: &Path,
    edits: &[MappingEdit],
    export_to: Option<&Path>,
) -> Result<ImportSummary> {
    let prepared = state.import_use_case.prepare(file, edits)?;

    if let Some(path) = export_to {
        let count = CsvExporter::export_file(path, &prepared.normalize().records)?;
        info!(path = %path.display(), records = count, "Exported normalized rows");
    }

    let sink = build_sink(&state.config).await?;

    let cancellation = ImportCancellation::new();
    let on_interrupt = cancellation.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current batch");
            on_interrupt.cancel();
        }
    });

    let summary = state
        .import_use_case
        .commit(prepared, sink.as_ref(), cancellation)
        .await;
    interrupt.abort();

    println!("{}", summary);
    if summary.failed > 0 {
        error!(failed = summary.failed, "Some batches were not persisted");
    }
    Ok(summary)
}

fn export(state: &CliState, file: &Path, output: &Path, edits: &[MappingEdit]) -> Result<()> {
    let prepared = state.import_use_case.prepare(file, edits)?;
    let normalized = prepared.normalize();
    let count = CsvExporter::export_file(output, &normalized.records)?;
    println!(
        "{} records written to {} ({} rows skipped)",
        count,
        output.display(),
        normalized.tally.skipped()
    );
    Ok(())
}

async fn list(state: &CliState, limit: i64, offset: i64) -> Result<()> {
    let repo = SqliteProductRepository::init(&state.config.database_url).await?;
    let total = repo.count_products().await?;
    let products = repo.list_products(limit, offset).await?;

    println!("{} products stored, showing {}", total, products.len());
    for product in products {
        let record = &product.record;
        println!(
            "{:>6}  {:<24} {:<40} {:>10} {:>8}  {}",
            product.id,
            product.identity_key,
            record.name.as_deref().unwrap_or("-"),
            record.price.map(|p| format!("{:.2}", p)).unwrap_or_else(|| "-".into()),
            record.quantity.map(|q| q.to_string()).unwrap_or_else(|| "-".into()),
            product.updated_at
        );
    }
    Ok(())
}
