//! Signature database refresh.
//!
//! One attempt per call: download `bases.cav`, replace the local copy, then
//! stamp today's date into the freshness marker. A failed download leaves
//! both the bundle and the marker as they were.

use chrono::Local;
use reqwest::Client;
use std::io;
use std::path::PathBuf;

use comodo_core::constants::MARKER_DATE_FORMAT;
use comodo_core::freshness::write_atomically;
use comodo_core::{ComodoConfig, FreshnessTracker, ScanError, ScanResult};

/// Result of a best-effort signature update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Bundle replaced and marker set to `date`
    Updated { date: String },
    /// Nothing changed on disk
    Skipped { reason: String },
}

#[derive(Clone, Debug)]
pub struct UpdateManager {
    http_client: Client,
    signature_url: String,
    bases_path: PathBuf,
    freshness: FreshnessTracker,
}

impl UpdateManager {
    pub fn new(config: &ComodoConfig) -> ScanResult<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                ScanError::Config(format!("failed to create HTTP client for updates: {}", e))
            })?;

        Ok(Self::with_client(
            http_client,
            config.signature_url.clone(),
            config.bases_path.clone(),
            config.freshness_tracker(),
        ))
    }

    pub fn with_client(
        http_client: Client,
        signature_url: String,
        bases_path: PathBuf,
        freshness: FreshnessTracker,
    ) -> Self {
        Self {
            http_client,
            signature_url,
            bases_path,
            freshness,
        }
    }

    /// Refresh the signature bundle.
    ///
    /// Download and bundle-write problems are logged and reported as
    /// [`UpdateOutcome::Skipped`]. Only a failure to write the marker after
    /// the new bundle is in place is returned as an error.
    #[tracing::instrument(skip(self), fields(url = %self.signature_url))]
    pub async fn update(&self) -> ScanResult<UpdateOutcome> {
        tracing::info!("Updating Comodo signatures");

        let bundle = match self.fetch_bundle().await {
            Ok(bundle) => bundle,
            Err(e) => {
                tracing::warn!(error = %e, "Signature download failed, marker left unchanged");
                return Ok(UpdateOutcome::Skipped {
                    reason: e.to_string(),
                });
            }
        };

        let bases_path = self.bases_path.clone();
        let size = bundle.len();
        let written = tokio::task::spawn_blocking(move || write_atomically(&bases_path, &bundle))
            .await
            .map_err(|e| ScanError::UpdateWrite {
                path: self.bases_path.clone(),
                source: io::Error::other(e),
            })
            .and_then(|result| result);
        if let Err(e) = written {
            tracing::error!(
                error = %e,
                path = %self.bases_path.display(),
                "Unable to store signature bundle, marker left unchanged"
            );
            return Ok(UpdateOutcome::Skipped {
                reason: e.to_string(),
            });
        }
        tracing::info!(bytes = size, path = %self.bases_path.display(), "Signature bundle stored");

        let date = Local::now().format(MARKER_DATE_FORMAT).to_string();
        self.freshness.record_update(&date)?;
        Ok(UpdateOutcome::Updated { date })
    }

    async fn fetch_bundle(&self) -> ScanResult<Vec<u8>> {
        let response = self
            .http_client
            .get(&self.signature_url)
            .send()
            .await
            .map_err(|e| ScanError::UpdateFetch(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::UpdateFetch(format!("server returned {}", status)));
        }

        let bundle = response
            .bytes()
            .await
            .map_err(|e| ScanError::UpdateFetch(format!("failed to read body: {}", e)))?;
        if bundle.is_empty() {
            return Err(ScanError::UpdateFetch("empty signature bundle".to_string()));
        }
        Ok(bundle.to_vec())
    }
}
