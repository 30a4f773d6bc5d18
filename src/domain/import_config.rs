// ============================================================
// IMPORT CONFIGURATION
// ============================================================
// Tunables for one import run and the persistence target

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::domain::error::{AppError, Result};

/// Records per batch sent to the persistence backend
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Where importable records are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Local SQLite database (`database_url`)
    #[default]
    Sqlite,

    /// Hosted Supabase project, through its REST endpoint
    Supabase,
}

/// Configuration for an import run
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ImportConfig {
    /// Records per batch (default: 1000)
    #[validate(range(min = 1, max = 10000))]
    pub batch_size: usize,

    /// Per-batch timeout in seconds; an expired batch counts as failed (default: 30)
    #[validate(range(min = 1))]
    pub batch_timeout_secs: u64,

    /// Encoding label used when the file is not valid UTF-8 (default: windows-1252)
    #[validate(length(min = 1))]
    pub fallback_encoding: String,

    pub sink: SinkKind,

    /// SQLite connection string (default: sqlite://inventory.db)
    #[validate(length(min = 1))]
    pub database_url: String,

    #[validate(nested)]
    pub supabase: SupabaseConfig,
}

/// Hosted backend settings, used when `sink = "supabase"`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SupabaseConfig {
    /// Project URL, e.g. https://abcd.supabase.co
    #[validate(url)]
    pub url: Option<String>,

    pub api_key: Option<String>,

    /// Target table (default: products)
    #[validate(length(min = 1))]
    pub table: String,

    /// Column used to resolve upsert conflicts (default: fnsku)
    #[validate(length(min = 1))]
    pub on_conflict: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_timeout_secs: 30,
            fallback_encoding: "windows-1252".to_string(),
            sink: SinkKind::default(),
            database_url: "sqlite://inventory.db".to_string(),
            supabase: SupabaseConfig::default(),
        }
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: "products".to_string(),
            on_conflict: "fnsku".to_string(),
        }
    }
}

impl ImportConfig {
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    /// Validate field ranges and sink-specific requirements
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid import config: {}", e)))?;

        if self.sink == SinkKind::Supabase {
            if self.supabase.url.is_none() {
                return Err(AppError::ConfigError(
                    "supabase.url is required when sink = \"supabase\"".to_string(),
                ));
            }
            if self.supabase.api_key.as_deref().map_or(true, str::is_empty) {
                return Err(AppError::ConfigError(
                    "supabase.api_key is required when sink = \"supabase\"".to_string(),
                ));
            }
        }

        Ok(())
    }
}
