//! Logger setup
//!
//! Lines go to stderr as `[LEVEL] message`. The calling backend only shows
//! them to humans, it never parses them.

use log::LevelFilter;
use std::io::Write;

/// Map the `-v`/`-q` flags to a level filter
pub fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    match (verbose, quiet) {
        (0, true) => LevelFilter::Error,
        (0, false) => LevelFilter::Info,
        (1, _) => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger; `RUST_LOG` overrides the flag-derived level
pub fn init(verbose: u8, quiet: bool) {
    env_logger::Builder::new()
        .filter_level(level_filter(verbose, quiet))
        .parse_env(env_logger::Env::default())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
