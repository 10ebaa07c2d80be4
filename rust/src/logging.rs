//! Verbosity-gated logging macros for the schedule calculator.
//!
//! Events go through `tracing`, so the host application decides where they end
//! up. Nothing is emitted below the requested verbosity:
//! - 0: SILENT (only cycle warnings, which are never gated)
//! - 1: SUMMARY (one line per schedule: task count, project end)
//! - 2: STEPS (per-task placement during the forward pass)
//! - 3: TRACE (per-edge candidate dates, ordering internals)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_STEPS: u8 = 2;
pub const VERBOSITY_TRACE: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at STEPS level (verbosity >= 2).
///
/// Used for: task placement, rollup spans.
#[macro_export]
macro_rules! log_steps {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_STEPS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at TRACE level (verbosity >= 3).
#[macro_export]
macro_rules! log_trace {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_TRACE {
            ::tracing::trace!($($arg)*);
        }
    };
}
