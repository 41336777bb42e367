pub mod config;
pub mod host;
pub mod logger;
pub mod settings;

pub use config::*;
pub use host::{current_host_name, is_host_ignored};
pub use logger::setup_logging;
pub use settings::{OptsDraft, SweepToml, apply_file_to_draft, load_sweep_toml};
