//! Signature freshness marker.
//!
//! The marker is a small plain-text file holding the date of the last
//! successful signature update. The update command is its only writer; the
//! scan path only reads it.

use chrono::NaiveDateTime;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::constants::MARKER_DATE_FORMAT;
use crate::error::{ScanError, ScanResult};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

/// Reads and writes the persisted "last signature update" marker.
#[derive(Debug, Clone)]
pub struct FreshnessTracker {
    marker_path: PathBuf,
    build_time: String,
}

impl FreshnessTracker {
    /// `build_time` is returned by [`resolve`](Self::resolve) while no marker
    /// exists yet.
    pub fn new(marker_path: impl Into<PathBuf>, build_time: impl Into<String>) -> Self {
        Self {
            marker_path: marker_path.into(),
            build_time: build_time.into(),
        }
    }

    /// Marker contents verbatim, or the build time when there is no marker.
    pub fn resolve(&self) -> ScanResult<String> {
        match fs::read_to_string(&self.marker_path) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    marker = %self.marker_path.display(),
                    build_time = %self.build_time,
                    "No freshness marker, using build time"
                );
                Ok(self.build_time.clone())
            }
            Err(source) => Err(ScanError::Freshness {
                path: self.marker_path.clone(),
                source,
            }),
        }
    }

    /// Replace the marker with `date`.
    ///
    /// The new contents go to a temporary file in the marker's directory that
    /// is then renamed over the marker, so readers see either the old or the
    /// new date.
    pub fn record_update(&self, date: &str) -> ScanResult<()> {
        write_atomically(&self.marker_path, date.as_bytes())?;
        tracing::info!(marker = %self.marker_path.display(), date, "Freshness marker updated");
        Ok(())
    }
}

/// Write `contents` to `path` through a same-directory temp file and rename.
pub fn write_atomically(path: &Path, contents: &[u8]) -> ScanResult<()> {
    let to_write_error = |source: io::Error| ScanError::UpdateWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(to_write_error)?;
    file.write_all(contents).map_err(to_write_error)?;
    file.as_file().sync_all().map_err(to_write_error)?;
    file.persist(path).map_err(|e| to_write_error(e.error))?;
    Ok(())
}

/// Reduce a `YYYYMMDDHHmm` timestamp to its `YYYYMMDD` date.
///
/// A single space between date and time (`YYYYMMDD HHmm`) is accepted.
/// Anything else is rejected instead of producing a garbled date.
pub fn normalize_timestamp(raw: &str) -> ScanResult<String> {
    let malformed = || ScanError::MalformedTimestamp(raw.to_string());

    let trimmed = raw.trim();
    let compact = match trimmed.split_once(' ') {
        None => trimmed.to_string(),
        Some((date, time)) if date.len() == 8 && time.len() == 4 => format!("{date}{time}"),
        Some(_) => return Err(malformed()),
    };
    if compact.len() != 12 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let parsed =
        NaiveDateTime::parse_from_str(&compact, TIMESTAMP_FORMAT).map_err(|_| malformed())?;
    Ok(parsed.format(MARKER_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_without_marker_returns_build_time() {
        let dir = TempDir::new().unwrap();
        let tracker = FreshnessTracker::new(dir.path().join("UPDATED"), "20230101");
        assert_eq!(tracker.resolve().unwrap(), "20230101");
    }

    #[test]
    fn test_resolve_returns_marker_verbatim() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("UPDATED");
        fs::write(&marker, "20240615\n").unwrap();

        let tracker = FreshnessTracker::new(&marker, "20230101");
        assert_eq!(tracker.resolve().unwrap(), "20240615\n");
    }

    #[test]
    fn test_resolve_unreadable_marker_is_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the marker file should be cannot be read as text
        let tracker = FreshnessTracker::new(dir.path(), "20230101");
        assert!(matches!(
            tracker.resolve(),
            Err(ScanError::Freshness { .. })
        ));
    }

    #[test]
    fn test_record_update_overwrites_marker() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("UPDATED");
        fs::write(&marker, "20200101").unwrap();

        let tracker = FreshnessTracker::new(&marker, "unknown");
        tracker.record_update("20261019").unwrap();

        assert_eq!(tracker.resolve().unwrap(), "20261019");
        // Only the marker remains, no stray temp files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_record_update_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let tracker = FreshnessTracker::new(dir.path().join("missing/UPDATED"), "unknown");
        assert!(matches!(
            tracker.record_update("20261019"),
            Err(ScanError::UpdateWrite { .. })
        ));
    }

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(normalize_timestamp("202310191530").unwrap(), "20231019");
        assert_eq!(normalize_timestamp("20231019 1530").unwrap(), "20231019");
        assert_eq!(normalize_timestamp(" 202401010000\n").unwrap(), "20240101");
    }

    #[test]
    fn test_normalize_timestamp_rejects_malformed() {
        for raw in [
            "",
            "20231019",
            "2023-10-19 15:30",
            "202313011200",
            "20231019abcd",
            "2023 10 19 15 30",
            "20231019   1530",
            "2023101 91530",
        ] {
            assert!(
                matches!(normalize_timestamp(raw), Err(ScanError::MalformedTimestamp(_))),
                "{raw:?} should be rejected"
            );
        }
    }
}
