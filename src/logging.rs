use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global subscriber. Cloud logs go through a collector that stamps its own
/// time, so only local runs print timestamps and targets.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_new(config.log_level.to_lowercase())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_local() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .compact()
            .init();
    }
}
