//! Thin wrapper around the `snapper` binary.
//!
//! Only read-only subcommands are run here: `list` feeds identifier
//! validation and `status` feeds the comparison engine.

use std::path::PathBuf;
use std::process::Command;

use crate::diff::DiffSource;
use crate::error::{Error, Result};
use crate::snapshot::{self, SnapshotListing, SnapshotSource};

pub struct Snapper {
    bin: PathBuf,
    config: String,
}

impl Snapper {
    pub fn new(bin: impl Into<PathBuf>, config: impl Into<String>) -> Self {
        Snapper {
            bin: bin.into(),
            config: config.into(),
        }
    }

    pub fn available(&self) -> bool {
        Command::new(&self.bin)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Fails with a readable message when `snapper --version` cannot be run.
    pub fn ensure_available(&self) -> Result<()> {
        if self.available() {
            return Ok(());
        }
        tracing::warn!(bin = %self.bin.display(), "snapper not runnable");
        Err(Error::SourceUnavailable {
            what: self.bin.display().to_string(),
            reason: "snapper is not installed or not runnable".to_string(),
        })
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let what = format!("{} {}", self.bin.display(), args.join(" "));
        tracing::debug!(command = %what, "running snapper");

        let output = Command::new(&self.bin)
            .args(args)
            .output()
            .map_err(|e| Error::io(what.clone(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::SourceUnavailable {
                what,
                reason: format!("exited with {}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SnapshotSource for Snapper {
    fn snapshots(&self) -> Result<SnapshotListing> {
        let out = self.run(&["--iso", "--config", &self.config, "list"])?;
        snapshot::parse_list(&out)
    }
}

impl DiffSource for Snapper {
    fn status_lines(&self, base: u32, target: u32) -> Result<Vec<String>> {
        let range = format!("{base}..{target}");
        let out = self.run(&["--config", &self.config, "status", &range])?;
        Ok(out.lines().map(str::to_string).collect())
    }
}
