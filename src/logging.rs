//! Diagnostic logging, independent of the user-facing `Output` channel.
//!
//! `Output` (see [`crate::output`]) is the curated, always-on channel a user
//! sees. This module wires up `env_logger` so `RUST_LOG` can pull detailed
//! `gix`/transport diagnostics out of a stuck or misbehaving clone without
//! cluttering normal output. `-v`/`-q` only control the default filter level
//! when `RUST_LOG` isn't set; an explicit `RUST_LOG` always wins.
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

static LOG_LEVEL: OnceLock<LogLevel> = OnceLock::new();
static ENV_LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// Initialize both the legacy user-facing level used by the `log_*!` macros
/// and the `env_logger` backend used by `gix` and this crate's `log::debug!`
/// call sites.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LogLevel::Debug
    } else if quiet {
        LogLevel::Warning
    } else {
        LogLevel::Info
    };
    LOG_LEVEL.set(level).ok();

    ENV_LOGGER_INIT.get_or_init(|| {
        let default_filter = if verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .format_timestamp(None)
            .init();
    });
}

pub fn get_log_level() -> LogLevel {
    *LOG_LEVEL.get().unwrap_or(&LogLevel::Info)
}

pub fn log(level: LogLevel, message: &str) {
    if level <= get_log_level() {
        match level {
            LogLevel::Error => eprintln!("Error: {}", message),
            LogLevel::Warning => eprintln!("Warning: {}", message),
            LogLevel::Info => println!("{}", message),
            LogLevel::Debug => println!("Debug: {}", message),
        }
    }
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::LogLevel::Error, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::LogLevel::Warning, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::LogLevel::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::LogLevel::Debug, &format!($($arg)*))
    };
}
