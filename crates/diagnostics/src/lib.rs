//! Diagnostics for the shopgen workspace
//!
//! Lightweight, configurable logging shared by the generator library and the
//! command line.
//!
//! Usage:
//! - Set SHOPGEN_LOG=off (default) - no logs
//! - Set SHOPGEN_LOG=info - build steps and the final summary
//! - Set SHOPGEN_LOG=debug - every row skipped and every file written

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable that selects the log level.
pub const LOG_ENV: &str = "SHOPGEN_LOG";

static INIT: Once = Once::new();

/// Minimum level for a `SHOPGEN_LOG` value, `None` meaning logging is off.
///
/// Unknown values map to `Info`; the caller reports them.
fn level_for(value: &str) -> Option<emit::Level> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" | "" => None,
        "debug" => Some(emit::Level::Debug),
        "warn" => Some(emit::Level::Warn),
        "error" => Some(emit::Level::Error),
        _ => Some(emit::Level::Info),
    }
}

fn is_known(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "off" | "" | "debug" | "info" | "warn" | "error"
    )
}

/// Initialize diagnostics based on the SHOPGEN_LOG environment variable
///
/// Call once at startup. Later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let Some(level) = level_for(&value) else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if !is_known(&value) {
            // Bootstrap warning, shown before any structured event
            eprintln!("Warning: Unknown {} value '{}', using 'info'", LOG_ENV, value);
        }

        // The runtime lives for the whole process.
        std::mem::forget(rt);
    });
}

/// Log build steps users want to see in normal usage.
///
/// Examples: "Loaded 12 products", "Wrote 31 pages"
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (rows skipped, files written).
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log conditions that don't stop the build but should be noted.
///
/// Examples: "Assets directory missing, nothing copied"
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that abort the build.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Short form of [`log_info!`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Short form of [`log_debug!`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Short form of [`log_warn!`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Short form of [`log_error!`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
