//! A logger wrapper that never lets an application-supplied logger crash evaluation.
//!
//! The application may pass in any [`CustomLogger`], and nothing guarantees its handlers behave. A
//! panic escaping from a handler would unwind through flag evaluation (or through whatever the
//! provider was doing when it logged), so every call is guarded and falls back to a known-good
//! logger. Handlers missing altogether are rejected up front, when the provider is built.
use std::{
    collections::HashMap,
    fmt,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use crate::{CustomLogger, Error, LogFn, LogLevel, Logger, Result};

/// Wraps a [`CustomLogger`] and reroutes its failures to a fallback [`Logger`].
pub struct SafeLogger {
    handlers: HashMap<LogLevel, LogFn>,
    fallback: Arc<dyn Logger>,
}

impl SafeLogger {
    /// Wrap `logger`, using `fallback` whenever one of its handlers panics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLogger`] if `logger` has no handler for one of the
    /// [four levels](LogLevel::ALL). This is the only point where the provider reports a failure to
    /// the application: a logger that cannot log would break every later diagnostic.
    pub fn new(logger: CustomLogger, fallback: Arc<dyn Logger>) -> Result<SafeLogger> {
        if let Some(level) = LogLevel::ALL
            .into_iter()
            .find(|level| logger.handler(*level).is_none())
        {
            return Err(Error::InvalidLogger { level });
        }

        Ok(SafeLogger {
            handlers: logger.into_handlers(),
            fallback,
        })
    }

    fn write(&self, level: LogLevel, message: &str) {
        let delivered = self.handlers.get(&level).is_some_and(|handler| {
            catch_unwind(AssertUnwindSafe(|| handler(message))).is_ok()
        });
        if !delivered {
            self.fallback.log(level, message);
        }
    }
}

impl fmt::Debug for SafeLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeLogger").finish_non_exhaustive()
    }
}

impl Logger for SafeLogger {
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
