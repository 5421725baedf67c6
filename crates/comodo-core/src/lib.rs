//! Comodo Core Library
//!
//! This crate turns the free-form text printed by Comodo's `cmdscan` into a
//! typed verdict, tracks how fresh the signature database is, and assembles
//! the report that the CLI prints or posts to a Malice webhook.

pub mod assembler;
pub mod config;
pub mod constants;
pub mod error;
pub mod freshness;
pub mod models;
pub mod parser;

// Re-export commonly used types
pub use assembler::ResultAssembler;
pub use config::{BuildInfo, ComodoConfig};
pub use error::{LogLevel, ScanError, ScanResult};
pub use freshness::{normalize_timestamp, FreshnessTracker};
pub use models::{ComodoEnvelope, ScanReport, ScanVerdict};
pub use parser::OutputParser;
