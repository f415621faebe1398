//! Logging utilities for slotbook.
//!
//! Every crate logs through `tracing`; this module installs the subscriber once at
//! startup.

use slotbook_config::LoggingConfig;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging from configuration.
///
/// With `directory` set, a daily rolling `slotbook.log` is written there in addition to
/// stdout. The returned guard flushes that file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_from_config(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = filter_for(&config.level);

    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "slotbook.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let result = tracing_subscriber::registry()
                .with(stdout_layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .try_init();
            if result.is_ok() {
                info!(
                    "Logging initialized at level {} (file output in {})",
                    config.level, directory
                );
            }
            Some(guard)
        }
        None => {
            let result = tracing_subscriber::registry()
                .with(stdout_layer())
                .with(filter)
                .try_init();
            if result.is_ok() {
                info!("Logging initialized at level: {}", config.level);
            }
            None
        }
    }
}

fn stdout_layer<S>() -> fmt::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
}

fn filter_for(level: &str) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("slotbook={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        // unknown level names fall back to RUST_LOG alone
        Err(_) => filter,
    }
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so it can be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => tracing::error!("{}: {}", error_context, e),
    }
    result
}
