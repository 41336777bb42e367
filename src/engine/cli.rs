//! CLI command handler: resolve settings, wire Ctrl+C to cancellation, run the sweep.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;

use crate::engine::arg_parser::Cli;
use crate::engine::progress::{copy_counter, finish_counter};
use crate::pipeline::{CancelToken, SweepEnv, log_sweep_summary};
use crate::utils::config::{HOST_DELIMITER, PATTERN_DELIMITER};
use crate::utils::settings::parse_host_list;
use crate::utils::{OptsDraft, apply_file_to_draft, load_sweep_toml, setup_logging};
use crate::{Opts, PatternSet, list_candidates, sweep};

/// Defaults < settings file < CLI flags, then validate.
pub fn resolve_opts(cli: &Cli) -> Result<Opts> {
    let mut draft = OptsDraft::default();
    let (config_path, required) = cli.config_path();
    if let Some(file) = load_sweep_toml(&config_path, required)? {
        apply_file_to_draft(&file, &mut draft);
    }
    if let Some(n) = cli.min_size {
        draft.min_size = Some(n);
    }
    if let Some(ref list) = cli.extensions {
        draft.patterns = Some(PatternSet::parse(list, PATTERN_DELIMITER));
    }
    if let Some(ref list) = cli.ignored_computers {
        let hosts: Vec<&str> = list.split(HOST_DELIMITER).collect();
        draft.ignored_hosts = Some(parse_host_list(&hosts));
    }
    if let Some(ms) = cli.poll_interval_ms {
        draft.poll_interval_ms = Some(ms);
    }
    if let Some(v) = cli.verbose {
        draft.verbose = Some(v);
    }
    if let Some(p) = cli.progress {
        draft.progress = Some(p);
    }
    if cli.staging_parent.is_some() {
        draft.staging_parent = cli.staging_parent.clone();
    }
    draft.roots = cli.roots.clone();
    draft.dry_run = cli.dry_run;
    draft.build()
}

/// Where settings came from, logged once the logger is up.
fn settings_file_note(path: &Path) -> String {
    if path.is_file() {
        format!("Settings loaded from {}", path.display())
    } else {
        format!("No settings file at {}", path.display())
    }
}

/// Run a sweep (or a dry run). Ctrl+C / SIGTERM cancel cooperatively and this waits for both
/// workers before returning.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = resolve_opts(cli).context("invalid settings")?;
    setup_logging(opts.verbose);
    debug!("{}", settings_file_note(&cli.config_path().0));

    let cancel = CancelToken::new();
    let cancel_handler = cancel.clone();
    ctrlc::set_handler(move || {
        cancel_handler.cancel();
    })
    .context("set Ctrl+C handler")?;

    let env = SweepEnv::system(cancel)?;

    if opts.dry_run {
        warn!("DRY RUN: NOTHING WILL BE COPIED.");
        let (candidates, stats) = list_candidates(&opts, &env)?;
        for c in &candidates {
            info!("{} ({} bytes)", c.path.display(), c.size);
        }
        info!(
            "{} candidate(s) in {} directories on {} volume(s)",
            candidates.len(),
            stats.directories,
            stats.volumes
        );
        return Ok(());
    }

    let (bar, on_copied) = copy_counter(opts.progress);
    let report = sweep(&opts, &env, on_copied)?;
    finish_counter(&bar);
    log_sweep_summary(&report, opts.verbose);
    Ok(())
}
