//! Load `volsweep.toml` and resolve the final [`Opts`].
//!
//! Precedence: built-in defaults < settings file < CLI flags. Missing or invalid size/pattern
//! settings are startup errors; nothing is silently defaulted.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::config::{HOST_DELIMITER, PATTERN_DELIMITER};
use crate::{Opts, PatternSet};

#[derive(Debug, Default, Deserialize)]
pub struct SweepToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    min_size: Option<i64>,
    extensions: Option<ListSetting>,
    ignored_computers: Option<ListSetting>,
    staging_parent: Option<String>,
    poll_interval_ms: Option<u64>,
    verbose: Option<bool>,
    progress: Option<bool>,
}

/// A list written either as one delimited string or as a TOML array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListSetting {
    Delimited(String),
    List(Vec<String>),
}

impl ListSetting {
    fn items(&self, delimiter: char) -> Vec<String> {
        match self {
            ListSetting::Delimited(s) => s.split(delimiter).map(str::to_string).collect(),
            ListSetting::List(v) => v.clone(),
        }
    }
}

/// Read the settings file at `path`.
///
/// A missing file is `Ok(None)` unless `required` (an explicit `--config`). A file that exists
/// but does not parse is always an error.
pub fn load_sweep_toml(path: &Path, required: bool) -> Result<Option<SweepToml>> {
    if !path.exists() {
        if required {
            bail!("settings file {} does not exist", path.display());
        }
        return Ok(None);
    }
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let parsed = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(parsed))
}

/// Settings gathered from all sources before validation. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct OptsDraft {
    pub min_size: Option<i64>,
    pub patterns: Option<PatternSet>,
    pub ignored_hosts: Option<Vec<String>>,
    pub roots: Vec<PathBuf>,
    pub staging_parent: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
    pub verbose: Option<bool>,
    pub progress: Option<bool>,
    pub dry_run: bool,
}

/// Overwrite draft field from file when present.
macro_rules! apply_file_opt {
    ($section:expr, $draft:expr, $field:ident) => {
        if let Some(v) = $section.$field {
            $draft.$field = Some(v);
        }
    };
}

/// Apply file settings to the draft (only fields present in the file). Call before CLI flags.
pub fn apply_file_to_draft(file: &SweepToml, draft: &mut OptsDraft) {
    let s = &file.settings;
    apply_file_opt!(s, draft, min_size);
    apply_file_opt!(s, draft, poll_interval_ms);
    apply_file_opt!(s, draft, verbose);
    apply_file_opt!(s, draft, progress);
    if let Some(ref list) = s.extensions {
        draft.patterns = Some(PatternSet::new(list.items(PATTERN_DELIMITER)));
    }
    if let Some(ref list) = s.ignored_computers {
        draft.ignored_hosts = Some(parse_host_list(&list.items(HOST_DELIMITER)));
    }
    if let Some(ref p) = s.staging_parent {
        draft.staging_parent = Some(PathBuf::from(p));
    }
}

/// Trim host names and drop empty entries.
pub fn parse_host_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|h| h.as_ref().trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

impl OptsDraft {
    /// Validate and produce the final options.
    pub fn build(self) -> Result<Opts> {
        let min_size = match self.min_size {
            None => bail!("min_size is not set (settings file [settings].min_size or --min-size)"),
            Some(n) if n < 0 => bail!("min_size must be non-negative, got {n}"),
            Some(n) => n as u64,
        };
        let patterns = match self.patterns {
            Some(p) if !p.is_empty() => p,
            _ => bail!(
                "no file patterns configured (settings file [settings].extensions or --extensions)"
            ),
        };
        let defaults = Opts::default();
        let poll_interval = match self.poll_interval_ms {
            Some(0) => bail!("poll_interval_ms must be greater than zero"),
            Some(ms) => Duration::from_millis(ms),
            None => defaults.poll_interval,
        };
        Ok(Opts {
            patterns,
            min_size,
            ignored_hosts: self.ignored_hosts.unwrap_or_default(),
            roots: self.roots,
            staging_parent: self.staging_parent,
            poll_interval,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            progress: self.progress.unwrap_or(defaults.progress),
            dry_run: self.dry_run,
        })
    }
}
