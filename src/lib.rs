//! An OpenFeature provider backed by the LaunchDarkly client.
//!
//! # Overview
//!
//! [`LaunchDarklyProvider`] implements the provider side of the generic flag-evaluation contract
//! ([`FeatureProvider`]) on top of any client implementing [`LdClient`]. For every evaluation it:
//! 1. translates the caller's [`EvaluationContext`] into the client's [`Identity`], accepting the
//!    identity under either `targetingKey` or the legacy `key` attribute;
//! 2. awaits [`LdClient::identify`] with that identity;
//! 3. calls [`LdClient::variation_detail`];
//! 4. converts the client's [`EvaluationDetail`] into [`ResolutionDetails`].
//!
//! The client does not guarantee that a flag serves a value of the type the caller asked for, so
//! the provider checks the served value against the type of the default value. A mismatch is
//! reported as [`ErrorCode::TypeMismatch`] with the default value.
//!
//! # Error Handling
//!
//! Evaluation never returns an error. Client errors are mapped onto [`ErrorCode`] and reported in
//! [`ResolutionDetails`] along with the caller's default value.
//!
//! The only [`Error`] is returned when building the provider with a [`CustomLogger`] that does not
//! handle all four log levels.
//!
//! # Logging
//!
//! By default the provider logs through the [`log`](https://docs.rs/log/latest/log/) crate under
//! the `"launchdarkly"` target, with every message tagged `[LaunchDarkly]`. An application logger
//! can be supplied with [`ProviderConfig::logger`]; it is wrapped into a [`SafeLogger`], so a
//! panicking handler never interrupts evaluation.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod client;
mod config;
mod context;
mod error;
mod logger;
mod provider;
mod resolution;
mod safe_logger;

pub use client::{EvaluationDetail, LdClient, Reason};
pub use config::ProviderConfig;
pub use context::{translate_context, EvaluationContext, Identity, LEGACY_KEY, TARGETING_KEY};
pub use error::{BackendError, Error, Result};
pub use logger::{BasicLogger, CustomLogger, LogFn, LogLevel, Logger, SOURCE_TAG};
pub use provider::{
    EvaluationOptions, FeatureProvider, LaunchDarklyProvider, ProviderMetadata, PROVIDER_NAME,
};
pub use resolution::{
    translate_result, ErrorCode, FlagValue, ResolutionDetails, ValueKind, ERROR_REASON,
};
pub use safe_logger::SafeLogger;
