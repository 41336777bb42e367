//! Application configuration constants.
//! Delimiters, defaults and tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!("{pkg}.toml"),
            }
        })
    }

    /// Settings file looked up in the working directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Settings lists ----

/// Separator for the file pattern list (`*.jpg;*.png`).
pub const PATTERN_DELIMITER: char = ';';

/// Separator for the ignored host list (`OFFICE-PC|LAPTOP`).
pub const HOST_DELIMITER: char = '|';

// ---- Staging ----

/// chrono format of the staging directory name: `YYYY_MM_DD_HH_mm_ss`.
pub const STAGING_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

// ---- Copy loop ----

/// Default wait on an empty queue before the copy worker re-checks cancellation (ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Buffer size for file copies (128 KB).
pub const COPY_BUFFER_SIZE: usize = 128 * 1024;
