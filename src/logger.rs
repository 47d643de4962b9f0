use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

/// Fixed tag prepended to every line written by [`BasicLogger`].
pub const SOURCE_TAG: &str = "[LaunchDarkly]";

/// Log target used for records forwarded to the `log` crate.
pub(crate) const LOG_TARGET: &str = "launchdarkly";

/// Severity of a log message, ordered from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors.
    Error,
    /// Warnings.
    Warn,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl LogLevel {
    /// All levels a logger is required to handle.
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Lowercase name of the level, as used in formatted lines.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for log::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// A logger with four severity-leveled operations.
///
/// Implementations are expected not to panic. Loggers supplied by the application are wrapped into
/// a [`SafeLogger`](crate::SafeLogger), which enforces that.
pub trait Logger: Send + Sync {
    /// Log a message at the error level.
    fn error(&self, message: &str);
    /// Log a message at the warn level.
    fn warn(&self, message: &str);
    /// Log a message at the info level.
    fn info(&self, message: &str);
    /// Log a message at the debug level.
    fn debug(&self, message: &str);

    /// Log a message at the given level.
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => self.error(message),
            LogLevel::Warn => self.warn(message),
            LogLevel::Info => self.info(message),
            LogLevel::Debug => self.debug(message),
        }
    }
}

/// A single-argument logging callback.
pub type LogFn = Box<dyn Fn(&str) + Send + Sync>;

/// An application-supplied logger, assembled one level at a time.
///
/// Nothing here checks that every level has a handler; that is done by
/// [`SafeLogger::new`](crate::SafeLogger::new) when the provider is built.
///
/// ```
/// # use launchdarkly_openfeature_provider::CustomLogger;
/// let logger = CustomLogger::new()
///     .error(|message| eprintln!("error: {message}"))
///     .warn(|message| eprintln!("warn: {message}"))
///     .info(|message| println!("info: {message}"))
///     .debug(|message| println!("debug: {message}"));
/// ```
#[derive(Default)]
pub struct CustomLogger {
    handlers: HashMap<LogLevel, LogFn>,
}

impl CustomLogger {
    /// Create a logger with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the handler for `level`, replacing any previous one.
    pub fn on(mut self, level: LogLevel, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.handlers.insert(level, Box::new(handler));
        self
    }

    /// Set the error handler.
    pub fn error(self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on(LogLevel::Error, handler)
    }

    /// Set the warn handler.
    pub fn warn(self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on(LogLevel::Warn, handler)
    }

    /// Set the info handler.
    pub fn info(self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on(LogLevel::Info, handler)
    }

    /// Set the debug handler.
    pub fn debug(self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on(LogLevel::Debug, handler)
    }

    /// Return the handler for `level`, if one was provided.
    pub fn handler(&self, level: LogLevel) -> Option<&LogFn> {
        self.handlers.get(&level)
    }

    pub(crate) fn into_handlers(self) -> HashMap<LogLevel, LogFn> {
        self.handlers
    }
}

impl fmt::Debug for CustomLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut levels = self.handlers.keys().copied().collect::<Vec<_>>();
        levels.sort();
        f.debug_struct("CustomLogger")
            .field("levels", &levels)
            .finish()
    }
}

enum Destination {
    Log,
    Custom(LogFn),
}

/// The provider's own logger.
///
/// Messages below the configured level are dropped. Every line is tagged with [`SOURCE_TAG`]. By
/// default lines go to the [`log`](https://docs.rs/log/latest/log/) crate under the
/// `"launchdarkly"` target; [`BasicLogger::with_destination`] redirects them to a closure instead,
/// which receives `"<level>: [LaunchDarkly] <message>"`.
pub struct BasicLogger {
    level: LogLevel,
    destination: Destination,
}

impl BasicLogger {
    /// Default minimum level.
    pub const DEFAULT_LEVEL: LogLevel = LogLevel::Info;

    /// Create a logger that forwards to the `log` crate.
    pub fn new(level: LogLevel) -> Self {
        BasicLogger {
            level,
            destination: Destination::Log,
        }
    }

    /// Create a logger that passes formatted lines to `destination`.
    pub fn with_destination(
        level: LogLevel,
        destination: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        BasicLogger {
            level,
            destination: Destination::Custom(Box::new(destination)),
        }
    }

    /// Minimum level that gets written.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn write(&self, level: LogLevel, message: &str) {
        if level > self.level {
            return;
        }
        match &self.destination {
            Destination::Log => {
                let level = log::Level::from(level);
                log::log!(target: LOG_TARGET, level, "{} {}", SOURCE_TAG, message);
            }
            Destination::Custom(destination) => {
                destination(&format!("{}: {} {}", level, SOURCE_TAG, message));
            }
        }
    }
}

impl Default for BasicLogger {
    fn default() -> Self {
        BasicLogger::new(BasicLogger::DEFAULT_LEVEL)
    }
}

impl fmt::Debug for BasicLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let destination = match self.destination {
            Destination::Log => "log",
            Destination::Custom(_) => "custom",
        };
        f.debug_struct("BasicLogger")
            .field("level", &self.level)
            .field("destination", &destination)
            .finish()
    }
}

impl Logger for BasicLogger {
    fn error(&self, message: &str) {
        self.write(LogLevel::Error, message);
    }

    fn warn(&self, message: &str) {
        self.write(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.write(LogLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.write(LogLevel::Debug, message);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{BasicLogger, CustomLogger, LogLevel, Logger};

    fn recording_logger(level: LogLevel) -> (BasicLogger, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let logger = BasicLogger::with_destination(level, move |line| {
            sink.lock().unwrap().push(line.to_owned());
        });
        (logger, lines)
    }

    #[test]
    fn basic_logger_prefixes_lines() {
        let (logger, lines) = recording_logger(LogLevel::Debug);

        logger.error("a");
        logger.debug("b");

        assert_eq!(
            *lines.lock().unwrap(),
            vec!["error: [LaunchDarkly] a", "debug: [LaunchDarkly] b"]
        );
    }

    #[test]
    fn basic_logger_filters_by_level() {
        let (logger, lines) = recording_logger(LogLevel::Warn);

        logger.debug("dropped");
        logger.info("dropped");
        logger.warn("kept");
        logger.error("kept too");

        assert_eq!(
            *lines.lock().unwrap(),
            vec!["warn: [LaunchDarkly] kept", "error: [LaunchDarkly] kept too"]
        );
    }

    #[test]
    fn default_level_is_info() {
        assert_eq!(BasicLogger::default().level(), LogLevel::Info);
    }

    #[test]
    fn log_dispatches_on_level() {
        let (logger, lines) = recording_logger(LogLevel::Debug);

        for level in LogLevel::ALL {
            logger.log(level, "x");
        }

        assert_eq!(
            *lines.lock().unwrap(),
            vec![
                "error: [LaunchDarkly] x",
                "warn: [LaunchDarkly] x",
                "info: [LaunchDarkly] x",
                "debug: [LaunchDarkly] x",
            ]
        );
    }

    #[test]
    fn custom_logger_tracks_provided_levels() {
        let logger = CustomLogger::new().warn(|_| {}).on(LogLevel::Debug, |_| {});

        assert!(logger.handler(LogLevel::Warn).is_some());
        assert!(logger.handler(LogLevel::Debug).is_some());
        assert!(logger.handler(LogLevel::Error).is_none());
        assert!(logger.handler(LogLevel::Info).is_none());
        assert_eq!(
            format!("{:?}", logger),
            "CustomLogger { levels: [Warn, Debug] }"
        );
    }
}
