//! Error types module
//!
//! Every failure the adapter can hit is a `ScanError` variant. Components only
//! return them; the binary decides whether a variant stops the process and
//! which exit status it maps to.

use std::io;
use std::path::PathBuf;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warning level - for best-effort steps that were skipped
    Warn,
    /// Error level - for failures that end the invocation
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Invalid input {}: {reason}", .path.display())]
    Input { path: PathBuf, reason: String },

    #[error("Scanner invocation failed: {0}")]
    Invocation(String),

    #[error("Scanner reported a detection but no threat name could be extracted from {line:?}")]
    ParseInconsistency { line: String },

    #[error("Signature update fetch failed: {0}")]
    UpdateFetch(String),

    #[error("Failed to write {}: {source}", .path.display())]
    UpdateWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Report delivery failed: {0}")]
    ReportDelivery(String),

    #[error("Failed to read freshness marker {}: {source}", .path.display())]
    Freshness {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed update timestamp {0:?}, expected YYYYMMDDHHmm")]
    MalformedTimestamp(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;

impl ScanError {
    /// Whether this error must stop the invocation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UpdateFetch(_) | Self::ReportDelivery(_))
    }

    /// Process exit status for fatal errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ParseInconsistency { .. } => 2,
            _ => 1,
        }
    }

    /// Machine-readable error code (e.g., "PARSE_INCONSISTENCY")
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Input { .. } => "INPUT_ERROR",
            Self::Invocation(_) => "INVOCATION_ERROR",
            Self::ParseInconsistency { .. } => "PARSE_INCONSISTENCY",
            Self::UpdateFetch(_) => "UPDATE_FETCH_ERROR",
            Self::UpdateWrite { .. } => "UPDATE_WRITE_ERROR",
            Self::ReportDelivery(_) => "REPORT_DELIVERY_ERROR",
            Self::Freshness { .. } => "FRESHNESS_ERROR",
            Self::MalformedTimestamp(_) => "MALFORMED_TIMESTAMP",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    pub fn log_level(&self) -> LogLevel {
        if self.is_fatal() {
            LogLevel::Error
        } else {
            LogLevel::Warn
        }
    }
}
