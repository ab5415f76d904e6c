use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

use crate::log::{LogConfiguration, ModuleLogConfiguration};

// Wall clock with milliseconds, so that consecutive sweep points can be told apart
const LOG_PATTERN: &str = "{d(%H:%M:%S%.3f)} {h({l:<5})} {M} - {m}{n}";
const APPENDER_NAME: &str = "stderr";

impl From<&ModuleLogConfiguration> for Logger {
    fn from(module_config: &ModuleLogConfiguration) -> Self {
        Logger::builder().build(module_config.module.clone(), module_config.level)
    }
}

/// Writes to stderr, keeping stdout free for the run summary.
fn stderr_appender() -> Appender {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .target(Target::Stderr)
        .build();
    Appender::builder().build(APPENDER_NAME, Box::new(console))
}

impl LogConfiguration {
    /// The `log4rs` configuration for the current filters. Module loggers are added in module
    /// order.
    pub(in crate::log) fn to_log4rs_config(&self) -> Result<Config, ConfigErrors> {
        let mut modules: Vec<&ModuleLogConfiguration> =
            self.module_configurations.values().collect();
        modules.sort_by(|a, b| a.module.cmp(&b.module));

        let root = Root::builder()
            .appender(APPENDER_NAME)
            .build(self.global_log_level);
        Config::builder()
            .appender(stderr_appender())
            .loggers(modules.into_iter().map(Logger::from))
            .build(root)
    }

    /// Installs the global logger on first use and reconfigures it afterwards. If the
    /// configuration cannot be built, or another logger already owns the process, only the
    /// global maximum level is updated.
    pub(in crate::log) fn set_config(&mut self) {
        let config = match self.to_log4rs_config() {
            Ok(config) => config,
            Err(errors) => {
                eprintln!("failed to configure logging: {errors}");
                log::set_max_level(self.global_log_level);
                return;
            }
        };

        if let Some(handle) = &self.root_handle {
            handle.set_config(config);
        } else if let Ok(handle) = log4rs::init_config(config) {
            self.root_handle = Some(handle);
        } else {
            log::set_max_level(self.global_log_level);
        }
    }
}
