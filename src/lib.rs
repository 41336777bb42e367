//! Volsweep: find files matching name patterns on every other attached volume and copy them into
//! a hidden, timestamped staging directory.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod staging;
pub mod types;
pub mod utils;
pub mod volumes;

/// Re-export types for API
pub use types::*;

pub use error::SweepError;
pub use pipeline::{CancelToken, OnCopied, SweepEnv};

use log::debug;

/// Result alias used by public volsweep API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: run one sweep with `opts` against `env` and return the report.
///
/// - **`env`**: use [`SweepEnv::system`] for the real volumes, clock and host name; build one by
///   hand to sweep fixed roots (see [`volumes::StaticVolumes`]).
/// - **`on_copied`**: called on the copy thread after each copied file. Keep it fast.
///
/// Cancel with `env.cancel`; the call still waits for both workers and returns a report whose
/// [`SweepReport::cancelled`] is set.
///
/// ```ignore
/// let opts = volsweep::Opts {
///     patterns: volsweep::PatternSet::parse("*.jpg;*.png", ';'),
///     min_size: 1024,
///     ..Default::default()
/// };
/// let env = volsweep::SweepEnv::system(volsweep::CancelToken::new())?;
/// let report = volsweep::sweep(&opts, &env, None)?;
/// ```
pub fn sweep(opts: &Opts, env: &SweepEnv, on_copied: Option<OnCopied>) -> Result<SweepReport> {
    log_config(opts);
    pipeline::run_sweep(opts, env, on_copied)
}

/// Dry run: discover with `opts` and return the candidates in copy order. Nothing is created.
pub fn list_candidates(
    opts: &Opts,
    env: &SweepEnv,
) -> Result<(Vec<FileCandidate>, DiscoverStats)> {
    log_config(opts);
    pipeline::collect_candidates(opts, env)
}

fn log_config(opts: &Opts) {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);
}
