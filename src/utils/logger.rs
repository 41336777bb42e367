//! env_logger setup: dependencies at warn, this crate at info (debug when verbose).

use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

fn level_tag(level: Level) -> Option<ColoredString> {
    match level {
        Level::Error => Some("ERROR".red()),
        Level::Warn => Some("WARN".yellow()),
        Level::Debug => Some("debug".dimmed()),
        Level::Trace => Some("trace".dimmed()),
        Level::Info => None,
    }
}

/// Install the global logger. `RUST_LOG` still overrides. Safe to call more than once
/// (later calls are ignored), so library callers and tests can share it.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let line = match level_tag(record.level()) {
                Some(tag) if record.level() <= Level::Warn => {
                    let target = record.target().white();
                    format!("[{} {} {}] {}", name, tag, target, record.args())
                }
                Some(tag) => format!("[{} {}] {}", name, tag, record.args()),
                None => format!("[{}] {}", name, record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
