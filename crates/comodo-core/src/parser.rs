//! Parser for `cmdscan -v` output.
//!
//! The engine prints a banner, at most one detection line for the single
//! scanned file, then a summary footer:
//!
//! ```text
//! -----== Scan Start ==-----
//! /malware/EICAR ---> Found Virus, Malware Name is Malware
//! -----== Scan End ==-----
//! Number of Scanned Files: 1
//! Number of Found Viruses: 1
//! ```
//!
//! Only line index 1 is inspected. Output for several paths, or with extra
//! banner lines, is not supported.

use crate::constants::{DETECTION_LINE_INDEX, DETECTION_MARKER, LABEL_SEPARATOR};
use crate::error::{ScanError, ScanResult};
use crate::models::ScanVerdict;

/// Stateless translator from raw scanner text to a [`ScanVerdict`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputParser;

impl OutputParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the output of a single-file scan.
    ///
    /// Output with fewer than two lines carries no detection signal and is
    /// clean. A detection line without a usable threat name is an error,
    /// never a clean verdict.
    pub fn parse(&self, raw_output: &str) -> ScanResult<ScanVerdict> {
        let line = match raw_output.split('\n').nth(DETECTION_LINE_INDEX) {
            Some(line) if !line.is_empty() => line,
            _ => return Ok(ScanVerdict::clean()),
        };

        if !line.contains(DETECTION_MARKER) {
            return Ok(ScanVerdict::clean());
        }

        let verdict = extract_threat_label(line).and_then(ScanVerdict::infected);
        match verdict {
            Some(verdict) => {
                tracing::debug!(label = %verdict.label(), "Detection line parsed");
                Ok(verdict)
            }
            None => Err(ScanError::ParseInconsistency {
                line: line.to_string(),
            }),
        }
    }
}

/// Everything after the first `"is"` on the line.
///
/// Known limitation: a scanned path containing `is` (`/tmp/this.exe`) makes
/// the split land inside the path.
fn extract_threat_label(line: &str) -> Option<&str> {
    line.split_once(LABEL_SEPARATOR).map(|(_, label)| label.trim())
}
