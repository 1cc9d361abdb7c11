//! Logging initialization
//!
//! One entry point installs the tracing subscriber for the process. `RUST_LOG`
//! always wins over the profile's default filter.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output at debug level
    Development,
    /// JSON lines at info level
    Production,
    /// Captured by the test harness, never panics if a subscriber exists
    Test,
}

impl Profile {
    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development | Profile::Test => "order_lifecycle=debug",
            Profile::Production => "order_lifecycle=info",
        }
    }
}

static INIT_ONCE: Once = Once::new();

pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));

        // try_init: another subscriber may already own the global slot
        let _ = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init(),
            Profile::Test => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_test_writer()
                .try_init(),
        };
    });
}
