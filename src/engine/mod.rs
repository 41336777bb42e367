//! Engine module: CLI surface, progress display and path utilities

pub mod arg_parser;
pub mod cli;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{handle_run, resolve_opts};
pub use tools::{glob_match, is_skipped_dir, path_relative_to};
