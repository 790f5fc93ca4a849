use log::LevelFilter;

/// Environment variable read by [`init`] for `env_logger` style filters.
pub const LOG_ENV: &str = "NUMKERNEL_LOG";

/// Install an `env_logger` logger filtered by `NUMKERNEL_LOG`, falling back
/// to `default_filter` (e.g. `"warn,numkernel=info"`).
///
/// Returns `false` if a global logger was already installed.
pub fn init(default_filter: &str) -> bool {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or(LOG_ENV, default_filter))
        .try_init()
        .is_ok()
}

/// Logger for tests: output is captured by the test harness.
pub fn init_for_tests() {
    let _ = env_logger::Builder::default()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}
