//! Data models for the scan adapter
//!
//! `verdict` holds what the parser derived from the engine output, `report`
//! holds the externally visible, serialized result.

mod report;
mod verdict;

pub use report::{ComodoEnvelope, ScanReport};
pub use verdict::ScanVerdict;
