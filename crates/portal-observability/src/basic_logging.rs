use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::default_filter;

/// Console-only logging, used when observability is disabled.
///
/// - **Log Level**: `LOG_LEVEL` (default: "info"), or a full `RUST_LOG` filter
/// - **Format**: compact, with module paths, file and line
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_filter(env_filter);

    // try_init: tests and the CLI may already have a subscriber installed
    let _ = tracing_subscriber::registry().with(console_layer).try_init();

    eprintln!("ℹ️  Observability disabled - console logging only");
}
