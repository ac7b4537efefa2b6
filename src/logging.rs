//! # Tracing Module
//!
//! Environment-aware console logging using the tracing ecosystem.
//!
//! The batch groups only emit events through `tracing` macros and never install a
//! subscriber themselves. Binaries, benchmarks and tests that want to see those events
//! call [`init_console_logging`] once; later calls are no-ops, and an already installed
//! global subscriber is left in place.
//!
//! Level selection, highest priority first:
//!
//! 1. `LOG_LEVEL`
//! 2. `RUST_LOG`
//! 3. Environment default (`BATCH_GROUP_ENV`/`APP_ENV`): `production` logs at `info`,
//!    everything else at `debug`

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::loader::detect_environment;

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a console `fmt` subscriber filtered by the resolved log level
pub fn init_console_logging() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let log_level = resolve_log_level(&environment, explicit_log_level());

        let use_ansi = std::io::stdout().is_terminal();

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_level(true)
            .with_ansi(use_ansi)
            .with_filter(EnvFilter::new(&log_level));

        let subscriber = tracing_subscriber::registry().with(console_layer);

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        } else {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                ansi_colors = use_ansi,
                "Console logging initialized"
            );
        }
    });
}

fn explicit_log_level() -> Option<String> {
    std::env::var("LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
}

/// Pick the filter directive for an environment, honouring an explicit override
fn resolve_log_level(environment: &str, explicit: Option<String>) -> String {
    if let Some(level) = explicit {
        return level.to_lowercase();
    }

    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}
