//! The staging root: one hidden, timestamp-named directory per run that receives every copy.
//!
//! Layout: `<staging>/<volume id>/<path relative to the volume root>`.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};

use crate::FileCandidate;
use crate::engine::tools::path_relative_to;
use crate::error::SweepError;
use crate::utils::config::STAGING_TIMESTAMP_FORMAT;

/// Wall-clock source for naming the staging root.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Directory name for a run started at `now`. Dot-prefixed on Unix, where that is what hides it.
pub fn staging_dir_name(now: NaiveDateTime) -> String {
    let stamp = now.format(STAGING_TIMESTAMP_FORMAT).to_string();
    if cfg!(windows) {
        stamp
    } else {
        format!(".{stamp}")
    }
}

#[derive(Clone, Debug)]
pub struct StagingRoot {
    path: PathBuf,
}

impl StagingRoot {
    /// Create `<parent>/<timestamp>` and mark it hidden. Reuses the directory if a run in the same
    /// second already created it.
    pub fn create(parent: &Path, clock: &dyn Clock) -> Result<Self> {
        let path = parent.join(staging_dir_name(clock.now()));
        std::fs::create_dir_all(&path)
            .with_context(|| format!("create staging root {}", path.display()))?;
        mark_hidden(&path);
        log::info!("Staging root: {}", path.display());
        Ok(Self { path })
    }

    /// Use an existing directory as the staging root.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where `candidate` lands: its volume-root prefix replaced by `<staging>/<volume id>`.
    pub fn destination_for(&self, candidate: &FileCandidate) -> Result<PathBuf, SweepError> {
        let rel = path_relative_to(&candidate.path, &candidate.volume.root).ok_or_else(|| {
            SweepError::OutsideVolume {
                path: candidate.path.clone(),
                root: candidate.volume.root.clone(),
            }
        })?;
        Ok(self.path.join(candidate.volume.id()).join(rel))
    }
}

#[cfg(windows)]
fn mark_hidden(path: &Path) {
    match std::process::Command::new("attrib")
        .arg("+h")
        .arg(path)
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(status) => log::warn!("attrib +h {} exited with {}", path.display(), status),
        Err(e) => log::warn!("could not hide {}: {}", path.display(), e),
    }
}

#[cfg(not(windows))]
fn mark_hidden(_path: &Path) {}
