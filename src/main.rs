//! Volsweep CLI: sweep attached volumes into a staging directory; use --dry-run to only list.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use volsweep::engine::arg_parser::Cli;
use volsweep::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
