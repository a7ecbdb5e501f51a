use env_logger::Builder;
use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging exactly once per test binary.
///
/// Defaults to `Error` to keep test output quiet; set the `LOG_LEVEL`
/// environment variable (error/warn/info/debug/trace) to see more.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let level_filter = match std::env::var("LOG_LEVEL").as_deref() {
            Ok("warn") => LevelFilter::Warn,
            Ok("info") => LevelFilter::Info,
            Ok("debug") => LevelFilter::Debug,
            Ok("trace") => LevelFilter::Trace,
            _ => LevelFilter::Error,
        };

        Builder::from_default_env()
            .filter_level(level_filter)
            .is_test(true)
            .init();
    });
}
