use crate::constants::ENGINE_CONTRACT_VERSION;
use crate::error::ScanResult;
use crate::freshness::FreshnessTracker;
use crate::models::{ScanReport, ScanVerdict};

/// Builds the one [`ScanReport`] of an invocation from a parsed verdict.
#[derive(Debug, Clone)]
pub struct ResultAssembler {
    engine_version: String,
    freshness: FreshnessTracker,
}

impl ResultAssembler {
    pub fn new(freshness: FreshnessTracker) -> Self {
        Self::with_engine_version(freshness, ENGINE_CONTRACT_VERSION)
    }

    pub fn with_engine_version(
        freshness: FreshnessTracker,
        engine_version: impl Into<String>,
    ) -> Self {
        Self {
            engine_version: engine_version.into(),
            freshness,
        }
    }

    /// Clean verdicts get the signature freshness date. Infected verdicts
    /// leave `updated` empty and do not touch the marker.
    pub fn assemble(&self, verdict: ScanVerdict) -> ScanResult<ScanReport> {
        let updated_at = if verdict.is_infected() {
            String::new()
        } else {
            self.freshness.resolve()?
        };

        Ok(ScanReport::new(
            verdict.is_infected(),
            verdict.label().to_string(),
            self.engine_version.clone(),
            updated_at,
        ))
    }
}
