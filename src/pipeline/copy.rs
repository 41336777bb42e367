//! Replicator: drains the transfer queue into the staging root, one file at a time.
//!
//! Every per-file error is logged, counted and skipped; nothing is retried or requeued.

use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::SweepError;
use crate::staging::StagingRoot;
use crate::utils::config::COPY_BUFFER_SIZE;
use crate::{FileCandidate, ReplicateStats};

use super::cancel::CancelToken;
use super::queue::{Poll, QueueConsumer};

/// Callback invoked after each successful copy with the number of files copied (1).
pub type OnCopied = Box<dyn Fn(usize) + Send>;

pub struct Replicator {
    staging: StagingRoot,
    cancel: CancelToken,
    poll_interval: Duration,
    on_copied: Option<OnCopied>,
}

impl Replicator {
    pub fn new(staging: StagingRoot, cancel: CancelToken, poll_interval: Duration) -> Self {
        Self {
            staging,
            cancel,
            poll_interval,
            on_copied: None,
        }
    }

    pub fn with_progress(mut self, on_copied: Option<OnCopied>) -> Self {
        self.on_copied = on_copied;
        self
    }

    /// Copy candidates in FIFO order until the queue is drained after discovery finished, or
    /// until cancellation.
    pub fn run(&self, queue: QueueConsumer) -> ReplicateStats {
        let mut stats = ReplicateStats::default();
        loop {
            if self.cancel.is_cancelled() {
                stats.cancelled = true;
                debug!("Copy worker cancelled with {} candidates still queued", queue.len());
                break;
            }
            match queue.poll(self.poll_interval) {
                Poll::Ready(candidate) => self.replicate_one(&candidate, &mut stats),
                Poll::Idle => continue,
                Poll::Drained => break,
            }
        }
        debug!(
            "Copy worker finished: {} copied, {} vanished, {} collisions, {} failed",
            stats.copied,
            stats.vanished,
            stats.collisions,
            stats.failures.len()
        );
        stats
    }

    fn replicate_one(&self, candidate: &FileCandidate, stats: &mut ReplicateStats) {
        match self.copy_candidate(candidate) {
            Ok(bytes) => {
                stats.copied += 1;
                stats.bytes += bytes;
                if let Some(ref f) = self.on_copied {
                    f(1);
                }
            }
            Err(e) => {
                debug!("Skipping: {}", e);
                if e.is_vanished() {
                    stats.vanished += 1;
                } else if e.is_collision() {
                    stats.collisions += 1;
                } else {
                    stats.failures.push((candidate.path.clone(), e.to_string()));
                }
            }
        }
    }

    fn copy_candidate(&self, candidate: &FileCandidate) -> Result<u64, SweepError> {
        if !candidate.path.is_file() {
            return Err(SweepError::Vanished {
                path: candidate.path.clone(),
            });
        }
        let dest = self.staging.destination_for(candidate)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SweepError::from_copy(candidate.path.clone(), dest.clone(), e)
            })?;
        }
        copy_file_no_overwrite(&candidate.path, &dest)
            .map_err(|e| SweepError::from_copy(candidate.path.clone(), dest.clone(), e))
    }
}

/// Copy `src` to a new file at `dest`; fails with `AlreadyExists` rather than overwrite.
/// A partially written destination is removed. Source mtime is carried over best-effort.
pub fn copy_file_no_overwrite(src: &Path, dest: &Path) -> io::Result<u64> {
    let source = File::open(src)?;
    let modified = source.metadata().and_then(|m| m.modified()).ok();
    let dest_file = OpenOptions::new().write(true).create_new(true).open(dest)?;

    let written: io::Result<u64> = (|| {
        let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, source);
        let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dest_file);
        let n = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if let Some(t) = modified
            && let Err(e) = file.set_modified(t)
        {
            debug!("Failed to preserve mtime on {}: {}", dest.display(), e);
        }
        Ok(n)
    })();

    if written.is_err() {
        let _ = fs::remove_file(dest);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_copy_preserves_content() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("a.jpg");
        let dest = temp.path().join("b.jpg");
        fs::write(&src, b"jpeg bytes").unwrap();

        let n = copy_file_no_overwrite(&src, &dest).unwrap();
        assert_eq!(n, 10);
        assert_eq!(fs::read(&dest).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn test_copy_refuses_existing_destination() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("a.jpg");
        let dest = temp.path().join("b.jpg");
        fs::write(&src, b"new").unwrap();
        fs::write(&dest, b"old").unwrap();

        let err = copy_file_no_overwrite(&src, &dest).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_copy_missing_source_creates_nothing() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("b.jpg");
        assert!(copy_file_no_overwrite(&temp.path().join("missing.jpg"), &dest).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_cancelled_replicator_leaves_queue_untouched() {
        use crate::pipeline::queue::transfer_queue;
        use crate::{VolumeKind, VolumeRoot};
        use std::sync::Arc;

        let temp = tempdir().unwrap();
        let vol = temp.path().join("vol");
        let stage = temp.path().join("stage");
        fs::create_dir_all(&vol).unwrap();
        fs::create_dir_all(&stage).unwrap();
        let volume = Arc::new(VolumeRoot::new(&vol, VolumeKind::Fixed));

        let (producer, consumer) = transfer_queue();
        for name in ["a.jpg", "b.jpg", "c.jpg"] {
            let path = vol.join(name);
            fs::write(&path, b"data").unwrap();
            assert!(producer.push(FileCandidate {
                path,
                size: 4,
                volume: Arc::clone(&volume),
            }));
        }
        producer.finish();

        let cancel = CancelToken::new();
        cancel.cancel();
        let replicator =
            Replicator::new(StagingRoot::at(&stage), cancel, Duration::from_millis(5));
        let stats = replicator.run(consumer);

        assert!(stats.cancelled);
        assert_eq!(stats.copied, 0);
        assert_eq!(fs::read_dir(&stage).unwrap().count(), 0);
    }

    #[test]
    fn test_copy_carries_mtime() {
        let temp = tempdir().unwrap();
        let src = temp.path().join("a.jpg");
        let dest = temp.path().join("b.jpg");
        fs::write(&src, b"x").unwrap();
        let old = std::time::SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_modified(old)
            .unwrap();

        copy_file_no_overwrite(&src, &dest).unwrap();
        assert_eq!(fs::metadata(&dest).unwrap().modified().unwrap(), old);
    }
}
