//! Diagnostic logging for the CLI.
//!
//! Everything goes to stderr; stdout carries only the response envelope.

use client_core::error::FizzyError;

use std::io::stderr;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, debug, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";
const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Quiet unless something is wrong.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Level with `--verbose`; includes request tracing.
pub const VERBOSE_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    }
}

/// Install the stderr logger.
///
/// Safe to call more than once: later calls log a warning and return `Ok`
/// without touching the installed dispatch.
///
/// # Errors
///
/// Returns an error if another global logger was already installed.
pub fn initialize(verbose: bool) -> Result<(), FizzyError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let level = level_for(verbose);
    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(level);
        if result.is_ok() {
            debug!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

#[track_caller]
fn initialize_internal(level: LevelFilter) -> Result<(), FizzyError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    Dispatch::new()
        .level(level)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
            ))
        })
        .chain(stderr())
        .apply()
        .map_err(|e| FizzyError::general(format!("Failed to initialize logger: {e}")))
}
