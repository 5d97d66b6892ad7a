use tracing_subscriber::{fmt, EnvFilter};

use crate::config::TestConfig;

/// Install the global subscriber using the configured level.
///
/// `RUST_LOG` wins over `LOG_LEVEL` when set. Safe to call more than once;
/// only the first call installs anything.
pub fn init(config: &TestConfig) {
    init_with_level(&config.log_level);
}

pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
