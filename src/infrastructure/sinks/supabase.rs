use super::ProductSink;
use crate::domain::error::{AppError, Result};
use crate::domain::import_config::SupabaseConfig;
use crate::domain::product::{BatchReceipt, NormalizedRecord};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";

/// Bulk upsert into a hosted Supabase table through its REST endpoint
pub struct SupabaseProductSink {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl SupabaseProductSink {
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> Result<Self> {
        let base_url = config.url.as_deref().ok_or_else(|| {
            AppError::ConfigError("supabase.url is not configured".to_string())
        })?;
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::ConfigError("supabase.api_key is not configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: Self::endpoint(base_url, &config.table, &config.on_conflict)?,
            api_key,
        })
    }

    /// `{base}/rest/v1/{table}?on_conflict={column}`
    fn endpoint(base_url: &str, table: &str, on_conflict: &str) -> Result<Url> {
        let trimmed = base_url.trim();
        let base = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        };

        let mut url = Url::parse(&base)
            .and_then(|u| u.join(&format!("rest/v1/{}", table.trim())))
            .map_err(|e| AppError::ConfigError(format!("Invalid supabase url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("on_conflict", on_conflict.trim());

        Ok(url)
    }
}

#[async_trait]
impl ProductSink for SupabaseProductSink {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn submit_batch(&self, records: &[NormalizedRecord]) -> Result<BatchReceipt> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", UPSERT_PREFERENCE)
            .json(records)
            .send()
            .await
            .map_err(|e| AppError::TransportError(format!("Batch request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TransportError(format!(
                "Supabase rejected batch ({}): {}",
                status, body
            )));
        }

        Ok(BatchReceipt {
            succeeded: records.len(),
            failed: 0,
        })
    }
}
