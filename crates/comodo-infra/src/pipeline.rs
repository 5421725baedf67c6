//! One scan, end to end: run the engine, parse its output, assemble the report.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use comodo_core::{OutputParser, ResultAssembler, ScanError, ScanReport, ScanResult};

use crate::invoker::ScanInvoker;

/// Resolve `path` to an absolute path of an existing regular file.
pub fn resolve_target(path: &Path) -> ScanResult<PathBuf> {
    let input_error = |reason: String| ScanError::Input {
        path: path.to_path_buf(),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(input_error("no file path given".to_string()));
    }

    let absolute = std::path::absolute(path).map_err(|e| input_error(e.to_string()))?;
    match absolute.metadata() {
        Ok(metadata) if metadata.is_file() => Ok(absolute),
        Ok(_) => Err(input_error("not a regular file".to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(input_error("file does not exist".to_string()))
        }
        Err(e) => Err(input_error(e.to_string())),
    }
}

pub struct ScanPipeline<I> {
    invoker: I,
    parser: OutputParser,
    assembler: ResultAssembler,
}

impl<I: ScanInvoker> ScanPipeline<I> {
    pub fn new(invoker: I, assembler: ResultAssembler) -> Self {
        Self {
            invoker,
            parser: OutputParser::new(),
            assembler,
        }
    }

    /// Scan one already-resolved file.
    #[tracing::instrument(skip_all, fields(file = %target.display()))]
    pub async fn run(&self, target: &Path) -> ScanResult<ScanReport> {
        let start = Instant::now();

        let raw_output = self.invoker.invoke(target).await?;
        let verdict = self.parser.parse(&raw_output)?;
        let report = self.assembler.assemble(verdict)?;

        if report.infected() {
            tracing::warn!(
                duration_ms = start.elapsed().as_millis(),
                virus = %report.label(),
                "File scan detected virus"
            );
        } else {
            tracing::info!(
                duration_ms = start.elapsed().as_millis(),
                updated = %report.updated_at(),
                "File scan completed: clean"
            );
        }
        Ok(report)
    }
}
