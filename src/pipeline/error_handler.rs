use log::{info, warn};

use crate::SweepReport;

/// Log the outcome of a sweep. Skipped paths and failed copies are summarised as warnings;
/// with `verbose` each one is listed.
pub fn log_sweep_summary(report: &SweepReport, verbose: bool) {
    if report.host_excluded {
        return;
    }
    let d = &report.discover;
    let r = &report.replicate;
    info!(
        "Discovered {} candidate(s) ({} bytes) in {} directories on {} volume(s)",
        d.candidates, d.candidate_bytes, d.directories, d.volumes
    );
    if let Some(ref staging) = report.staging_root {
        info!(
            "Copied {} file(s) ({} bytes) into {}",
            r.copied,
            r.bytes,
            staging.display()
        );
    }
    if r.vanished > 0 {
        info!("{} candidate(s) vanished before they could be copied", r.vanished);
    }
    if r.collisions > 0 {
        warn!("{} candidate(s) already existed in the staging root", r.collisions);
    }
    if !d.skipped.is_empty() {
        warn!(
            "Skipped {} paths due to permission errors or access issues",
            d.skipped.len()
        );
        if verbose {
            for (p, reason) in &d.skipped {
                eprintln!("  skipped: {} ({})", p.display(), reason);
            }
        }
    }
    if !r.failures.is_empty() {
        warn!("Failed to copy {} file(s)", r.failures.len());
        if verbose {
            for (p, reason) in &r.failures {
                eprintln!("  failed: {} ({})", p.display(), reason);
            }
        }
    }
    if report.cancelled() {
        warn!("Sweep cancelled; the staging root holds a partial copy");
    }
}
