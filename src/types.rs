//! Public and internal types for the volsweep API and pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::engine::tools::glob_match;
use crate::utils::config::DEFAULT_POLL_INTERVAL_MS;

/// How a storage volume is attached. Only fixed and removable volumes are swept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKind {
    Fixed,
    Removable,
    /// Network, virtual or otherwise unsupported filesystems.
    Other,
}

/// Root of one storage volume (a drive letter on Windows, a mount point elsewhere).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeRoot {
    pub root: PathBuf,
    pub kind: VolumeKind,
}

impl VolumeRoot {
    pub fn new(root: impl Into<PathBuf>, kind: VolumeKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    pub fn is_sweepable(&self) -> bool {
        matches!(self.kind, VolumeKind::Fixed | VolumeKind::Removable)
    }

    /// Name of this volume's subtree under the staging root.
    ///
    /// `D:\` → `D`, `D:\Photos` → `D_Photos`, `/` → `root`, `/media/usb` → `media_usb`.
    pub fn id(&self) -> String {
        let raw = self.root.to_string_lossy();
        let mut chars = raw.chars();
        if let (Some(letter), Some(':')) = (chars.next(), chars.next())
            && letter.is_ascii_alphabetic()
        {
            let drive = letter.to_ascii_uppercase().to_string();
            let rest = sanitize(chars.as_str());
            return if rest.is_empty() {
                drive
            } else {
                format!("{drive}_{rest}")
            };
        }
        let rest = sanitize(&raw);
        if rest.is_empty() {
            return "root".to_string();
        }
        rest
    }

    /// Root comparison; ignores case and slash direction on Windows only.
    pub fn same_root(&self, other: &VolumeRoot) -> bool {
        roots_equal(&self.root, &other.root)
    }
}

fn sanitize(s: &str) -> String {
    s.trim_matches(['/', '\\']).replace(['/', '\\', ':'], "_")
}

/// Comparable form of a path: trailing separators dropped; on Windows also lowercased with
/// forward slashes. Elsewhere paths compare byte-for-byte.
pub(crate) fn normalized_path(p: &Path) -> String {
    let raw = p.to_string_lossy();
    let s = if cfg!(windows) {
        raw.replace('\\', "/").to_lowercase()
    } else {
        raw.into_owned()
    };
    let trimmed = s.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn roots_equal(a: &Path, b: &Path) -> bool {
    normalized_path(a) == normalized_path(b)
}

/// A discovered file waiting to be copied. Existence is re-checked at copy time.
#[derive(Clone, Debug)]
pub struct FileCandidate {
    pub path: PathBuf,
    /// Size in bytes at discovery time.
    pub size: u64,
    pub volume: Arc<VolumeRoot>,
}

/// Ordered, immutable list of file name patterns (`*.jpg`, `IMG_????.png`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<String>,
}

impl PatternSet {
    /// Build from patterns in order, dropping empty and whitespace-only entries.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Split a delimited list such as `*.jpg;*.png`.
    pub fn parse(list: &str, delimiter: char) -> Self {
        Self::new(list.split(delimiter))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if any pattern matches `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.iter().any(|p| glob_match(p, name))
    }
}

/// Run statistics from the discovery pass.
#[derive(Clone, Debug, Default)]
pub struct DiscoverStats {
    pub volumes: usize,
    pub directories: usize,
    pub candidates: usize,
    pub candidate_bytes: u64,
    /// Directories or entries that could not be read, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    pub cancelled: bool,
}

/// Run statistics from the copy loop.
#[derive(Clone, Debug, Default)]
pub struct ReplicateStats {
    pub copied: usize,
    pub bytes: u64,
    /// Candidates gone before their copy started.
    pub vanished: usize,
    /// Candidates whose destination already existed.
    pub collisions: usize,
    pub failures: Vec<(PathBuf, String)>,
    pub cancelled: bool,
}

/// Outcome of one sweep.
#[derive(Clone, Debug, Default)]
pub struct SweepReport {
    /// None for dry runs and excluded hosts.
    pub staging_root: Option<PathBuf>,
    pub discover: DiscoverStats,
    pub replicate: ReplicateStats,
    /// Set when the host is in the ignore list and nothing ran.
    pub host_excluded: bool,
}

impl SweepReport {
    pub fn cancelled(&self) -> bool {
        self.discover.cancelled || self.replicate.cancelled
    }
}

/// Full options, resolved from defaults, `volsweep.toml` and CLI flags.
#[derive(Clone, Debug)]
pub struct Opts {
    pub patterns: PatternSet,
    /// Files must be strictly larger than this to be copied (bytes).
    pub min_size: u64,
    /// Host names on which the sweep must not start.
    pub ignored_hosts: Vec<String>,
    /// When non-empty, sweep these directories instead of enumerating volumes.
    pub roots: Vec<PathBuf>,
    /// Parent for the staging root. When None, the root of the working directory's volume.
    pub staging_parent: Option<PathBuf>,
    /// Longest the copy worker waits on an empty queue before re-checking cancellation.
    pub poll_interval: Duration,
    pub verbose: bool,
    /// Show a counter of copied files.
    pub progress: bool,
    /// Discover and list candidates; create nothing.
    pub dry_run: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            patterns: PatternSet::default(),
            min_size: 0,
            ignored_hosts: Vec::new(),
            roots: Vec::new(),
            staging_parent: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            verbose: false,
            progress: false,
            dry_run: false,
        }
    }
}
