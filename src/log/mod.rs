//! Logging for the simulator and its driver. Logging is about the behavior of a run (which point
//! of a sweep is executing, how long it took, which generator a trial was given) and is not to be
//! confused with _reports_, the CSV output of a sweep.
//!
//! This module (re)exports the five logging macros `error!`, `warn!`, `info!`, `debug!` and
//! `trace!`:
//!
//! ```rust
//! use netsis::log::info;
//!
//! pub fn do_a_thing() {
//!     info!("A thing is being done.");
//! }
//! ```
//!
//! Logging is _disabled_ by default. It is controlled with `enable_logging()`,
//! `disable_logging()` and `set_log_level(level)`, or from the command line with
//! `--log-level <level>`. Per-module levels can be set with `set_module_filter()` and removed
//! with `remove_module_filter()`:
//!
//! ```rust
//! use netsis::log::{set_log_level, set_module_filter, LevelFilter};
//!
//! set_log_level(LevelFilter::Debug);
//! // Show every point of a sweep but not every trial.
//! set_module_filter("netsis::monte_carlo", LevelFilter::Info);
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};
use std::collections::hash_map::Entry;

use crate::hashing::HashMap;
#[cfg(feature = "logging")]
use log4rs::Handle;
use std::sync::LazyLock;
use std::sync::{Mutex, MutexGuard};

// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;
// Default module specific filters
const DEFAULT_MODULE_FILTERS: [(&str, LevelFilter); 1] = [
    // One message per trial generator is noise at `trace`.
    ("netsis::random", LevelFilter::Debug),
];

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// The maximum level for log messages from one module path (e.g. `"netsis::sweep"`).
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    module: String,
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Tracks the global and per-module level filters and holds the handle to the installed logger.
/// Loggers are installed process-wide, so there is a single instance behind a mutex and the
/// public API consists of free functions.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// The level for modules without their own filter. `LevelFilter::Off` disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: HashMap<String, ModuleLogConfiguration>,

    #[cfg(feature = "logging")]
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        let module_configurations = DEFAULT_MODULE_FILTERS
            .map(|(module, level)| (module.to_string(), (module, level).into()))
            .into_iter()
            .collect();
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations,

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    fn set_module_filter(&mut self, module: &str, level: LevelFilter) {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().level == level {
                    return;
                }
                entry.get_mut().level = level;
            }
            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        self.set_config();
    }

    fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

/// Enables all log messages. Equivalent to `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A global filter level of `LevelFilter::Off` disables logging.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    get_log_configuration().set_module_filter(module_path, level_filter);
}

/// Removes the level filter of the given module path; the global level applies to it again.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}
