pub mod supabase;

use crate::domain::error::Result;
use crate::domain::import_config::{ImportConfig, SinkKind};
use crate::domain::product::{BatchReceipt, NormalizedRecord};
use crate::infrastructure::db::sqlite::SqliteProductRepository;
use async_trait::async_trait;
use supabase::SupabaseProductSink;

/// Persistence backend receiving importable records in batches
#[async_trait]
pub trait ProductSink: Send + Sync {
    fn name(&self) -> &str;

    /// Persist one batch. `Err` means the whole batch was lost.
    async fn submit_batch(&self, records: &[NormalizedRecord]) -> Result<BatchReceipt>;
}

/// Build the sink selected by configuration
pub async fn build_sink(config: &ImportConfig) -> Result<Box<dyn ProductSink>> {
    match config.sink {
        SinkKind::Sqlite => Ok(Box::new(
            SqliteProductRepository::init(&config.database_url).await?,
        )),
        SinkKind::Supabase => Ok(Box::new(SupabaseProductSink::new(
            &config.supabase,
            config.batch_timeout(),
        )?)),
    }
}
