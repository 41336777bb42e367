//! Pipeline context: the injected collaborators for a run, the resolved sweep plan, and the
//! worker handles.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use crate::staging::{Clock, SystemClock};
use crate::utils::current_host_name;
use crate::volumes::{
    StaticVolumes, SystemVolumes, VolumeSource, select_sweep_targets, skip_dirs_for,
    volume_for_path,
};
use crate::{DiscoverStats, Opts, ReplicateStats, VolumeRoot};

use super::cancel::CancelToken;
use super::walk::VolumeWalk;

/// Everything a sweep reads from the outside world. [`SweepEnv::system`] wires the real
/// sources; tests substitute fixed volumes, clock and host name.
pub struct SweepEnv {
    pub volumes: Box<dyn VolumeSource>,
    pub clock: Box<dyn Clock>,
    pub host_name: Option<String>,
    /// Working directory; its volume is never swept and receives the staging root.
    pub cwd: PathBuf,
    pub cancel: CancelToken,
}

impl SweepEnv {
    pub fn system(cancel: CancelToken) -> Result<Self> {
        Ok(Self {
            volumes: Box::new(SystemVolumes),
            clock: Box::new(SystemClock),
            host_name: current_host_name(),
            cwd: std::env::current_dir().context("read current directory")?,
            cancel,
        })
    }
}

/// Volumes resolved for one run.
#[derive(Clone, Debug)]
pub struct SweepPlan {
    /// Every volume known on the system (used to stop walks at nested mounts).
    pub all_volumes: Vec<VolumeRoot>,
    pub own_volume: Option<VolumeRoot>,
    pub targets: Vec<VolumeRoot>,
    /// Directory the staging root is created in.
    pub staging_parent: PathBuf,
}

impl SweepPlan {
    /// Enumerate volumes, find the working directory's volume and choose what to sweep.
    pub fn resolve(opts: &Opts, env: &SweepEnv) -> Result<Self> {
        let all_volumes = env.volumes.volumes().context("enumerate volumes")?;
        let own_volume = volume_for_path(&env.cwd, &all_volumes).cloned();

        let targets = if opts.roots.is_empty() {
            select_sweep_targets(&all_volumes, own_volume.as_ref())
        } else {
            let explicit = StaticVolumes::from_roots(&opts.roots).volumes()?;
            select_sweep_targets(&explicit, own_volume.as_ref())
        };

        let staging_parent = match (&opts.staging_parent, &own_volume) {
            (Some(p), _) => p.clone(),
            (None, Some(v)) => v.root.clone(),
            (None, None) => filesystem_root(&env.cwd),
        };

        Ok(Self {
            all_volumes,
            own_volume,
            targets,
            staging_parent,
        })
    }

    /// One walk per target; each stops at other volumes' roots and at `extra_skip`.
    pub fn walks(&self, extra_skip: &[PathBuf]) -> Vec<VolumeWalk> {
        self.targets
            .iter()
            .map(|t| VolumeWalk::new(t.clone(), skip_dirs_for(t, &self.all_volumes, extra_skip)))
            .collect()
    }
}

fn filesystem_root(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

/// Handles for the two workers; join with [`super::shutdown_pipeline_handles`].
pub struct PipelineHandles {
    pub discover_handle: JoinHandle<DiscoverStats>,
    pub replicate_handle: JoinHandle<ReplicateStats>,
}
