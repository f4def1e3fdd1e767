#![deny(missing_docs)]
//! Shared logging utilities for the tradescrape workspace.
//!
//! The `scrape_*` macros log through the `log` facade under one target,
//! [`LOG_TARGET`], so an application can raise or silence extraction logs
//! without touching its own. Installing a logger is left to the application;
//! tests use [`initialize_for_tests`].

/// Target attached to every record logged through the `scrape_*` macros.
pub const LOG_TARGET: &str = "tradescrape";

/// Logs a trace-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! scrape_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! scrape_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! scrape_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! scrape_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under [`LOG_TARGET`].
#[macro_export]
macro_rules! scrape_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::LOG_TARGET, $($arg)*);
    }};
}

/// Terminal logger for tests: debug level in debug builds, info otherwise.
///
/// A no-op when a logger is already installed, so every test may call it.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str(LOG_TARGET)
        .set_target_level(log::LevelFilter::Off)
        .build();

    let _ = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto);
}
