//! Runs the Comodo command-line scanner.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;

use comodo_core::{ComodoConfig, ScanError, ScanResult};

/// Produces the raw text output of one engine run against one file.
#[async_trait]
pub trait ScanInvoker: Send + Sync {
    async fn invoke(&self, target: &Path) -> ScanResult<String>;
}

/// `cmdscan -vs <target>`
#[derive(Clone, Debug)]
pub struct CmdScanInvoker {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl CmdScanInvoker {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kill the engine if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_config(config: &ComodoConfig) -> Self {
        let invoker = Self::new(&config.scanner_path);
        match config.scan_timeout {
            Some(timeout) => invoker.with_timeout(timeout),
            None => invoker,
        }
    }
}

#[async_trait]
impl ScanInvoker for CmdScanInvoker {
    async fn invoke(&self, target: &Path) -> ScanResult<String> {
        let start = Instant::now();
        tracing::debug!(
            binary = %self.binary.display(),
            target = %target.display(),
            "Starting Comodo scan"
        );

        let mut command = Command::new(&self.binary);
        command.arg("-vs").arg(target).kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    ScanError::Invocation(format!(
                        "{} did not finish within {:?}",
                        self.binary.display(),
                        limit
                    ))
                })?,
            None => command.output().await,
        }
        .map_err(|e| {
            ScanError::Invocation(format!("failed to run {}: {}", self.binary.display(), e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        // cmdscan may exit non-zero on detections; only a failure without
        // any output is an invocation error.
        if stdout.is_empty() && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::Invocation(format!(
                "{} exited with {} and no output: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            exit_status = %output.status,
            "Comodo scan completed"
        );
        Ok(stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    // Scripts are written and executed from a single test so no other test
    // thread can fork while one of them is still open for writing.
    #[tokio::test]
    async fn test_cmdscan_invocation() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("sample.bin");
        fs::write(&target, b"data").unwrap();

        // Arguments are passed as `-vs <target>`
        let echo = write_script(
            &dir,
            "echo_args",
            "echo '-----== Scan Start ==-----'\necho \"$1 $2 ---> Not Virus\"",
        );
        let output = CmdScanInvoker::new(&echo).invoke(&target).await.unwrap();
        assert_eq!(
            output,
            format!(
                "-----== Scan Start ==-----\n-vs {} ---> Not Virus\n",
                target.display()
            )
        );

        // Non-zero exit with output is still a usable result
        let detect = write_script(
            &dir,
            "detect",
            "echo banner\necho \"$2 ---> Found Virus, Malware Name is Malware\"\nexit 1",
        );
        let output = CmdScanInvoker::new(&detect).invoke(&target).await.unwrap();
        assert!(output.contains("Found Virus"));

        // Non-zero exit without output is an invocation error
        let broken = write_script(&dir, "broken", "echo 'license expired' >&2\nexit 3");
        match CmdScanInvoker::new(&broken).invoke(&target).await {
            Err(ScanError::Invocation(msg)) => assert!(msg.contains("license expired")),
            other => panic!("expected invocation error, got {:?}", other),
        }

        // Silent success parses as clean later on
        let silent = write_script(&dir, "silent", "exit 0");
        assert_eq!(CmdScanInvoker::new(&silent).invoke(&target).await.unwrap(), "");

        // Runaway engine is killed after the timeout
        let slow = write_script(&dir, "slow", "sleep 5");
        let result = CmdScanInvoker::new(&slow)
            .with_timeout(Duration::from_millis(200))
            .invoke(&target)
            .await;
        assert!(matches!(result, Err(ScanError::Invocation(_))));

        // Missing binary cannot be spawned
        let result = CmdScanInvoker::new(dir.path().join("missing"))
            .invoke(&target)
            .await;
        assert!(matches!(result, Err(ScanError::Invocation(_))));
    }
}
