//! Tracing subscriber setup.

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber (only once).
///
/// `RUST_LOG` wins over `config.level` when set. A subscriber installed
/// elsewhere first is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.to_ascii_lowercase()));

        let registry = tracing_subscriber::registry().with(filter);
        let result = if config.json {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
                .try_init()
        } else {
            registry.with(tracing_subscriber::fmt::layer()).try_init()
        };

        if let Err(e) = result {
            eprintln!("tracing subscriber already installed: {}", e);
        }
    });
}
