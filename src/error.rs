//! Per-item pipeline errors. None of these stop the pipeline; they are logged and counted.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("cannot list {}: {source}", path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} vanished before it could be copied", path.display())]
    Vanished { path: PathBuf },

    #[error("{} is not under its volume root {}", path.display(), root.display())]
    OutsideVolume { path: PathBuf, root: PathBuf },

    #[error("destination {} already exists", dest.display())]
    DestinationExists { dest: PathBuf },

    #[error("copy {} -> {} failed: {source}", src.display(), dest.display())]
    Copy {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SweepError {
    /// Classify a copy-time I/O error: a missing source means the candidate vanished.
    pub(crate) fn from_copy(src: PathBuf, dest: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound if !src.exists() => SweepError::Vanished { path: src },
            io::ErrorKind::AlreadyExists => SweepError::DestinationExists { dest },
            _ => SweepError::Copy { src, dest, source },
        }
    }

    pub fn is_vanished(&self) -> bool {
        matches!(self, SweepError::Vanished { .. })
    }

    pub fn is_collision(&self) -> bool {
        matches!(self, SweepError::DestinationExists { .. })
    }
}
