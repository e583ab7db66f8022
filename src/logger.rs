//! Logger setup shared by every subcommand.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Environment variable overriding the log filter, e.g. `CODEBASE_LOG=trace`.
pub const LOG_ENV: &str = "CODEBASE_LOG";

/// Initializes `env_logger` with `Debug` level when verbose, `Info` otherwise.
/// Other crates only log warnings unless `CODEBASE_LOG` says otherwise.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("codebase_kit", level)
        .filter_module("codebase", level)
        .parse_env(Env::new().filter(LOG_ENV))
        .format_timestamp(None)
        .format_target(verbose)
        .init();
}
