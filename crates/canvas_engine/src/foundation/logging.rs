//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with an explicit filter such as `"info"`
/// or `"canvas_engine=debug"`.
///
/// Returns an error if a logger has already been installed.
pub fn init_with_level(filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::new()
        .parse_filters(filter)
        .try_init()
}
