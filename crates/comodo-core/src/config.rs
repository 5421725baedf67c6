//! Configuration module
//!
//! Install locations, network settings and build metadata. Values come from
//! the environment (and a `.env` file when present) with the Malice image
//! layout as defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;
use crate::error::{ScanError, ScanResult};
use crate::freshness::FreshnessTracker;

/// Version and build time injected by the build (`COMODO_VERSION`,
/// `COMODO_BUILD_TIME`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub build_time: String,
}

impl BuildInfo {
    pub fn new(version: impl Into<String>, build_time: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            build_time: build_time.into(),
        }
    }

    /// Values captured when this crate was compiled.
    pub fn from_build_env() -> Self {
        let version = option_env!("COMODO_VERSION")
            .filter(|v| !v.is_empty())
            .unwrap_or(env!("CARGO_PKG_VERSION"));
        let build_time = option_env!("COMODO_BUILD_TIME")
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_BUILD_TIME);
        Self::new(version, build_time)
    }

    /// `"<version>, BuildTime: <build time>"`, as shown by `--version`.
    pub fn version_string(&self) -> String {
        format!("{}, BuildTime: {}", self.version, self.build_time)
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::from_build_env()
    }
}

#[derive(Clone, Debug)]
pub struct ComodoConfig {
    pub scanner_path: PathBuf,
    pub signature_url: String,
    pub bases_path: PathBuf,
    pub marker_path: PathBuf,
    /// Timeout for the signature download and the webhook POST
    pub http_timeout: Duration,
    /// Upper bound for one engine run; `None` waits for the engine to exit
    pub scan_timeout: Option<Duration>,
    pub webhook_endpoint: Option<String>,
    pub webhook_proxy: Option<String>,
    pub build: BuildInfo,
}

impl Default for ComodoConfig {
    fn default() -> Self {
        Self {
            scanner_path: PathBuf::from(DEFAULT_SCANNER_PATH),
            signature_url: DEFAULT_SIGNATURE_URL.to_string(),
            bases_path: PathBuf::from(DEFAULT_BASES_PATH),
            marker_path: PathBuf::from(DEFAULT_MARKER_PATH),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            scan_timeout: None,
            webhook_endpoint: None,
            webhook_proxy: None,
            build: BuildInfo::from_build_env(),
        }
    }
}

impl ComodoConfig {
    pub fn from_env() -> ScanResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> ScanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let http_timeout = match var(ENV_HTTP_TIMEOUT) {
            Some(raw) => Duration::from_secs(parse_secs(ENV_HTTP_TIMEOUT, &raw)?),
            None => defaults.http_timeout,
        };
        let scan_timeout = var(ENV_SCAN_TIMEOUT)
            .map(|raw| parse_secs(ENV_SCAN_TIMEOUT, &raw).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            scanner_path: var(ENV_SCANNER_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.scanner_path),
            signature_url: var(ENV_SIGNATURE_URL).unwrap_or(defaults.signature_url),
            bases_path: var(ENV_BASES_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.bases_path),
            marker_path: var(ENV_MARKER_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.marker_path),
            http_timeout,
            scan_timeout,
            webhook_endpoint: var(ENV_ENDPOINT),
            webhook_proxy: var(ENV_PROXY),
            build: defaults.build,
        })
    }

    pub fn freshness_tracker(&self) -> FreshnessTracker {
        FreshnessTracker::new(&self.marker_path, &self.build.build_time)
    }
}

fn parse_secs(key: &str, raw: &str) -> ScanResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ScanError::Config(format!(
            "{} must be a positive number of seconds, got {:?}",
            key, raw
        ))),
    }
}
