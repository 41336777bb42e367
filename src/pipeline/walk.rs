//! Discoverer: one depth-first pass over each volume, pushing matching files onto the queue.
//!
//! The walk keeps an explicit stack of pending directories, so nesting depth is bounded by heap,
//! not by the call stack. Directories come off the stack in listing order, which gives the same
//! pre-order as a recursive walk: a directory's files are queued before anything below it.

use log::debug;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::tools::{glob_match, is_skipped_dir};
use crate::error::SweepError;
use crate::{DiscoverStats, FileCandidate, PatternSet, VolumeRoot};

use super::cancel::CancelToken;
use super::queue::QueueProducer;

/// One volume to walk and the subtrees inside it that must not be entered.
#[derive(Clone, Debug)]
pub struct VolumeWalk {
    pub volume: Arc<VolumeRoot>,
    pub skip_dirs: Vec<PathBuf>,
}

impl VolumeWalk {
    pub fn new(volume: VolumeRoot, skip_dirs: Vec<PathBuf>) -> Self {
        Self {
            volume: Arc::new(volume),
            skip_dirs,
        }
    }
}

/// A file seen in a directory listing.
struct ListedFile {
    path: PathBuf,
    name: String,
    size: u64,
}

/// Immediate children of one directory, in listing order.
#[derive(Default)]
struct DirListing {
    files: Vec<ListedFile>,
    /// Subdirectories with their device id where the platform has one.
    dirs: Vec<(PathBuf, Option<u64>)>,
}

enum Flow {
    Continue,
    Stop,
}

pub struct Discoverer {
    patterns: PatternSet,
    min_size: u64,
    cancel: CancelToken,
}

impl Discoverer {
    pub fn new(patterns: PatternSet, min_size: u64, cancel: CancelToken) -> Self {
        Self {
            patterns,
            min_size,
            cancel,
        }
    }

    /// Walk every volume once, then finish `producer` (discovery done) whether or not the pass
    /// was cancelled.
    pub fn discover(&self, walks: &[VolumeWalk], producer: QueueProducer) -> DiscoverStats {
        let mut stats = DiscoverStats::default();
        for walk in walks {
            if self.cancel.is_cancelled() {
                break;
            }
            debug!("Discovering on {}", walk.volume.root.display());
            stats.volumes += 1;
            if let Flow::Stop = self.walk_volume(walk, &producer, &mut stats) {
                break;
            }
        }
        stats.cancelled = self.cancel.is_cancelled();
        debug!(
            "Discovery finished: {} candidates in {} directories{}",
            stats.candidates,
            stats.directories,
            if stats.cancelled { " (cancelled)" } else { "" }
        );
        producer.finish();
        stats
    }

    fn walk_volume(
        &self,
        walk: &VolumeWalk,
        producer: &QueueProducer,
        stats: &mut DiscoverStats,
    ) -> Flow {
        let root = &walk.volume.root;
        let root_dev = fs::metadata(root).ok().as_ref().and_then(device_id);
        let mut pending: Vec<PathBuf> = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            if self.cancel.is_cancelled() {
                return Flow::Stop;
            }
            stats.directories += 1;
            let listing = match list_dir(&dir, stats) {
                Ok(listing) => listing,
                Err(e) => {
                    record_skip(stats, dir, &e);
                    continue;
                }
            };
            if let Flow::Stop = self.enqueue_matches(&walk.volume, &listing.files, producer, stats)
            {
                return Flow::Stop;
            }
            for (sub, dev) in listing.dirs.into_iter().rev() {
                if is_skipped_dir(&sub, &walk.skip_dirs) {
                    debug!("Not entering {}", sub.display());
                    continue;
                }
                if root_dev.is_some() && dev != root_dev {
                    debug!("Not crossing into another filesystem at {}", sub.display());
                    continue;
                }
                pending.push(sub);
            }
        }
        Flow::Continue
    }

    /// Queue this directory's files in pattern order, then listing order. A file matched by
    /// several patterns is queued once.
    fn enqueue_matches(
        &self,
        volume: &Arc<VolumeRoot>,
        files: &[ListedFile],
        producer: &QueueProducer,
        stats: &mut DiscoverStats,
    ) -> Flow {
        let mut taken = vec![false; files.len()];
        for pattern in self.patterns.iter() {
            if self.cancel.is_cancelled() {
                return Flow::Stop;
            }
            for (i, file) in files.iter().enumerate() {
                if taken[i] || !glob_match(pattern, &file.name) {
                    continue;
                }
                taken[i] = true;
                if file.size <= self.min_size {
                    continue;
                }
                let candidate = FileCandidate {
                    path: file.path.clone(),
                    size: file.size,
                    volume: Arc::clone(volume),
                };
                if !producer.push(candidate) {
                    debug!("Copy worker is gone; stopping discovery");
                    return Flow::Stop;
                }
                stats.candidates += 1;
                stats.candidate_bytes += file.size;
            }
        }
        Flow::Continue
    }
}

/// List `dir` once. Entries that cannot be stat'ed are recorded and left out; symlinks are
/// neither followed nor copied.
fn list_dir(dir: &Path, stats: &mut DiscoverStats) -> Result<DirListing, SweepError> {
    let entries = fs::read_dir(dir).map_err(|source| SweepError::Enumerate {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut listing = DirListing::default();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(source) => {
                let e = SweepError::Enumerate {
                    path: dir.to_path_buf(),
                    source,
                };
                record_skip(stats, dir.to_path_buf(), &e);
                continue;
            }
        };
        let path = entry.path();
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(source) => {
                let e = SweepError::Enumerate {
                    path: path.clone(),
                    source,
                };
                record_skip(stats, path, &e);
                continue;
            }
        };
        let file_type = meta.file_type();
        if file_type.is_dir() {
            listing.dirs.push((path, device_id(&meta)));
        } else if file_type.is_file() {
            listing.files.push(ListedFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: meta.len(),
                path,
            });
        }
    }
    Ok(listing)
}

fn record_skip(stats: &mut DiscoverStats, path: PathBuf, err: &SweepError) {
    debug!("Skipping: {}", err);
    stats.skipped.push((path, err.to_string()));
}

#[cfg(unix)]
fn device_id(meta: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(meta.dev())
}

#[cfg(not(unix))]
fn device_id(_meta: &Metadata) -> Option<u64> {
    None
}
