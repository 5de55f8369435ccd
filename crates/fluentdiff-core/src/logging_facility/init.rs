//! Logging initialization

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output, debug level (cycle and depth events visible)
    Development,
    /// JSON structured output, info level
    Production,
    /// Bare registry; tests attach their own capture layer
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Install the global tracing subscriber for `profile`.
///
/// Only the first call has any effect. `RUST_LOG` overrides the default
/// filter in the Development and Production profiles.
///
/// ```
/// use fluentdiff_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("fluentdiff_core=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("fluentdiff_core=info")),
                )
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_distinct() {
        assert_ne!(Profile::Development, Profile::Production);
        assert_ne!(Profile::Production, Profile::Test);
    }
}
