use anyhow::{Context, Result};
use log::{debug, info};
use std::thread;

use crate::staging::StagingRoot;
use crate::utils::is_host_ignored;
use crate::{DiscoverStats, FileCandidate, Opts, ReplicateStats, SweepReport};

use super::context::{PipelineHandles, SweepEnv, SweepPlan};
use super::copy::{OnCopied, Replicator};
use super::queue::{Poll, transfer_queue};
use super::walk::{Discoverer, VolumeWalk};

/// Start the discovery and copy workers, connected by a fresh transfer queue.
pub fn spawn_pipeline(
    discoverer: Discoverer,
    walks: Vec<VolumeWalk>,
    replicator: Replicator,
) -> Result<PipelineHandles> {
    let (producer, consumer) = transfer_queue();

    let discover_handle = thread::Builder::new()
        .name("volsweep-discover".into())
        .spawn(move || discoverer.discover(&walks, producer))
        .context("spawn discovery thread")?;

    let replicate_handle = thread::Builder::new()
        .name("volsweep-copy".into())
        .spawn(move || replicator.run(consumer))
        .context("spawn copy thread")?;

    Ok(PipelineHandles {
        discover_handle,
        replicate_handle,
    })
}

/// Wait for both workers. The copy worker exits on its own once discovery is done and the queue
/// is drained, or at its next checkpoint after cancellation.
pub fn shutdown_pipeline_handles(
    handles: PipelineHandles,
) -> Result<(DiscoverStats, ReplicateStats)> {
    let replicate = handles
        .replicate_handle
        .join()
        .map_err(|_| anyhow::anyhow!("copy thread panicked"))?;
    let discover = handles
        .discover_handle
        .join()
        .map_err(|_| anyhow::anyhow!("discovery thread panicked"))?;
    Ok((discover, replicate))
}

/// True (and logged) when this host must not be swept.
fn host_excluded(opts: &Opts, env: &SweepEnv) -> bool {
    match env.host_name.as_deref() {
        Some(host) if is_host_ignored(host, &opts.ignored_hosts) => {
            info!("Host {} is in the ignore list; not sweeping", host);
            true
        }
        _ => false,
    }
}

/// Run one full sweep: host check, volume plan, staging root, then discovery and copy until
/// done or cancelled. Nothing is created on an ignored host.
pub fn run_sweep(opts: &Opts, env: &SweepEnv, on_copied: Option<OnCopied>) -> Result<SweepReport> {
    if host_excluded(opts, env) {
        return Ok(SweepReport {
            host_excluded: true,
            ..Default::default()
        });
    }

    let plan = SweepPlan::resolve(opts, env)?;
    debug!(
        "Own volume: {:?}; sweeping {} volume(s)",
        plan.own_volume.as_ref().map(|v| v.root.display().to_string()),
        plan.targets.len()
    );

    let staging = StagingRoot::create(&plan.staging_parent, env.clock.as_ref())?;
    let walks = plan.walks(&[staging.path().to_path_buf()]);
    let staging_path = staging.path().to_path_buf();

    let discoverer = Discoverer::new(opts.patterns.clone(), opts.min_size, env.cancel.clone());
    let replicator = Replicator::new(staging, env.cancel.clone(), opts.poll_interval)
        .with_progress(on_copied);

    let handles = spawn_pipeline(discoverer, walks, replicator)?;
    let (discover, replicate) = shutdown_pipeline_handles(handles)?;

    Ok(SweepReport {
        staging_root: Some(staging_path),
        discover,
        replicate,
        host_excluded: false,
    })
}

/// Discovery only: walk on a worker thread and collect every candidate in queue order. No
/// staging root is created and nothing is copied.
pub fn collect_candidates(
    opts: &Opts,
    env: &SweepEnv,
) -> Result<(Vec<FileCandidate>, DiscoverStats)> {
    if host_excluded(opts, env) {
        return Ok((Vec::new(), DiscoverStats::default()));
    }
    let plan = SweepPlan::resolve(opts, env)?;
    let walks = plan.walks(&[]);
    let discoverer = Discoverer::new(opts.patterns.clone(), opts.min_size, env.cancel.clone());
    let (producer, consumer) = transfer_queue();

    let discover_handle = thread::Builder::new()
        .name("volsweep-discover".into())
        .spawn(move || discoverer.discover(&walks, producer))
        .context("spawn discovery thread")?;

    let mut candidates = Vec::new();
    loop {
        if env.cancel.is_cancelled() {
            break;
        }
        match consumer.poll(opts.poll_interval) {
            Poll::Ready(c) => candidates.push(c),
            Poll::Idle => continue,
            Poll::Drained => break,
        }
    }
    drop(consumer);

    let stats = discover_handle
        .join()
        .map_err(|_| anyhow::anyhow!("discovery thread panicked"))?;
    Ok((candidates, stats))
}
