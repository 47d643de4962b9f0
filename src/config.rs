use std::sync::Arc;

use crate::{
    BasicLogger, CustomLogger, LaunchDarklyProvider, LdClient, LogLevel, Logger, Result,
    SafeLogger,
};

/// Configuration for [`LaunchDarklyProvider`].
#[derive(Debug)]
pub struct ProviderConfig {
    logger: Option<CustomLogger>,
    log_level: LogLevel,
}

impl ProviderConfig {
    /// Create a default configuration: the provider logs through the `log` crate at the info
    /// level.
    ///
    /// ```
    /// # use launchdarkly_openfeature_provider::ProviderConfig;
    /// ProviderConfig::new();
    /// ```
    pub fn new() -> Self {
        ProviderConfig {
            logger: None,
            log_level: BasicLogger::DEFAULT_LEVEL,
        }
    }

    /// Send the provider's diagnostics to an application logger.
    ///
    /// The logger must handle all four levels, otherwise [`ProviderConfig::to_provider`] fails.
    /// If a handler panics, the message is written to the default logger instead.
    ///
    /// ```
    /// # use launchdarkly_openfeature_provider::{CustomLogger, ProviderConfig};
    /// let config = ProviderConfig::new().logger(
    ///     CustomLogger::new()
    ///         .error(|message| eprintln!("{message}"))
    ///         .warn(|message| eprintln!("{message}"))
    ///         .info(|message| println!("{message}"))
    ///         .debug(|message| println!("{message}")),
    /// );
    /// ```
    pub fn logger(mut self, logger: CustomLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Minimum level of the default logger. Does not filter messages sent to a custom
    /// [`logger`](ProviderConfig::logger).
    pub fn log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Create a new [`LaunchDarklyProvider`] using this configuration.
    pub fn to_provider<C: LdClient>(self, client: C) -> Result<LaunchDarklyProvider<C>> {
        LaunchDarklyProvider::new(client, self)
    }

    pub(crate) fn build_logger(self) -> Result<Arc<dyn Logger>> {
        let basic: Arc<dyn Logger> = Arc::new(BasicLogger::new(self.log_level));
        match self.logger {
            Some(logger) => Ok(Arc::new(SafeLogger::new(logger, basic)?)),
            None => Ok(basic),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{CustomLogger, Error, LogLevel};

    use super::ProviderConfig;

    #[test]
    fn builds_default_logger() {
        assert!(ProviderConfig::new().build_logger().is_ok());
    }

    #[test]
    fn rejects_incomplete_logger() {
        let config = ProviderConfig::new()
            .log_level(LogLevel::Debug)
            .logger(CustomLogger::new().error(|_| {}).warn(|_| {}).info(|_| {}));

        assert_eq!(
            config.build_logger().err(),
            Some(Error::InvalidLogger {
                level: LogLevel::Debug
            })
        );
    }
}
