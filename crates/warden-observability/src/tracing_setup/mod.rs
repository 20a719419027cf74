//! Tracing setup: subscriber initialisation plus structured event helpers.

pub mod events;

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use warden_core::config::ObservabilityConfig;

/// Environment variable holding the log filter, e.g. `WARDEN_LOG=warden_ledger=debug,info`.
pub const LOG_ENV_VAR: &str = "WARDEN_LOG";

static INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// `WARDEN_LOG` wins over `config.log_level`. Idempotent: only the first call
/// installs a subscriber, and an already-installed global subscriber (from a
/// test harness or an embedding host) is left in place.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        install(filter, config.json);
    });
}

/// Initialize tracing with an explicit filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    INIT.call_once(|| install(EnvFilter::new(filter), true));
}

fn install(filter: EnvFilter, json: bool) {
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("global subscriber already installed, keeping it");
    }
}
