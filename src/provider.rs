use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    context::translate_context, logger::LOG_TARGET, resolution::translate_result,
    EvaluationContext, FlagValue, LdClient, Logger, ProviderConfig, ResolutionDetails, Result,
};

/// Name reported in [`ProviderMetadata`].
pub const PROVIDER_NAME: &str = "launchdarkly-openfeature-provider";

/// Static information about a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Provider name.
    pub name: String,
}

/// Per-call options passed down by the evaluation API.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationOptions {
    /// Hints for hooks run by the evaluation API. Providers do not interpret them.
    pub hook_hints: HashMap<String, Value>,
}

/// The provider side of the generic flag-evaluation contract.
///
/// Providers implement the four `*_details` methods. The `*_value` methods return only the
/// evaluated value.
#[async_trait]
pub trait FeatureProvider: Send + Sync {
    /// Information about the provider.
    fn metadata(&self) -> &ProviderMetadata;

    /// Evaluate a boolean flag.
    async fn evaluate_boolean_details(
        &self,
        flag_key: &str,
        default_value: bool,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<bool>;

    /// Evaluate a string flag.
    async fn evaluate_string_details(
        &self,
        flag_key: &str,
        default_value: String,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<String>;

    /// Evaluate a number flag.
    async fn evaluate_number_details(
        &self,
        flag_key: &str,
        default_value: f64,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<f64>;

    /// Evaluate a structured (JSON object or array) flag.
    async fn evaluate_structured_details(
        &self,
        flag_key: &str,
        default_value: Value,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<Value>;

    /// Evaluate a boolean flag, returning only its value.
    async fn evaluate_boolean_value(
        &self,
        flag_key: &str,
        default_value: bool,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> bool {
        self.evaluate_boolean_details(flag_key, default_value, context, options)
            .await
            .value
    }

    /// Evaluate a string flag, returning only its value.
    async fn evaluate_string_value(
        &self,
        flag_key: &str,
        default_value: String,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> String {
        self.evaluate_string_details(flag_key, default_value, context, options)
            .await
            .value
    }

    /// Evaluate a number flag, returning only its value.
    async fn evaluate_number_value(
        &self,
        flag_key: &str,
        default_value: f64,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> f64 {
        self.evaluate_number_details(flag_key, default_value, context, options)
            .await
            .value
    }

    /// Evaluate a structured flag, returning only its value.
    async fn evaluate_structured_value(
        &self,
        flag_key: &str,
        default_value: Value,
        context: &EvaluationContext,
        options: Option<&EvaluationOptions>,
    ) -> Value {
        self.evaluate_structured_details(flag_key, default_value, context, options)
            .await
            .value
    }
}

/// A [`FeatureProvider`] backed by a LaunchDarkly client.
///
/// Every evaluation identifies the context with the client, waits for that to complete, then asks
/// the client for a detailed evaluation. The provider keeps no state between calls.
///
/// Evaluation never fails: client errors and values of the wrong type are reported in
/// [`ResolutionDetails`] together with the caller's default value.
pub struct LaunchDarklyProvider<C> {
    client: C,
    logger: Arc<dyn Logger>,
    metadata: ProviderMetadata,
}

impl<C: LdClient> LaunchDarklyProvider<C> {
    /// Create a provider for `client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLogger`](crate::Error::InvalidLogger) if the configured logger does
    /// not handle all levels.
    pub fn new(client: C, config: ProviderConfig) -> Result<Self> {
        Ok(LaunchDarklyProvider {
            client,
            logger: config.build_logger()?,
            metadata: ProviderMetadata {
                name: PROVIDER_NAME.to_owned(),
            },
        })
    }

    /// The wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    async fn evaluate<T: FlagValue + Send>(
        &self,
        flag_key: &str,
        default_value: T,
        context: &EvaluationContext,
    ) -> ResolutionDetails<T> {
        let identity = translate_context(&*self.logger, context);

        if let Err(err) = self.client.identify(identity).await {
            self.logger.warn(&format!(
                "Failed to identify the context before evaluating '{flag_key}': {err}"
            ));
        }

        let detail = self
            .client
            .variation_detail(flag_key, default_value.to_value());
        let details = translate_result(flag_key, default_value, detail);

        log::trace!(target: LOG_TARGET,
                    flag_key,
                    reason:serde = details.reason,
                    variant:serde = details.variant,
                    error_code:serde = details.error_code;
                    "evaluated a flag");

        details
    }
}

impl<C> fmt::Debug for LaunchDarklyProvider<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchDarklyProvider")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: LdClient> FeatureProvider for LaunchDarklyProvider<C> {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    async fn evaluate_boolean_details(
        &self,
        flag_key: &str,
        default_value: bool,
        context: &EvaluationContext,
        _options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<bool> {
        self.evaluate(flag_key, default_value, context).await
    }

    async fn evaluate_string_details(
        &self,
        flag_key: &str,
        default_value: String,
        context: &EvaluationContext,
        _options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<String> {
        self.evaluate(flag_key, default_value, context).await
    }

    async fn evaluate_number_details(
        &self,
        flag_key: &str,
        default_value: f64,
        context: &EvaluationContext,
        _options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<f64> {
        self.evaluate(flag_key, default_value, context).await
    }

    async fn evaluate_structured_details(
        &self,
        flag_key: &str,
        default_value: Value,
        context: &EvaluationContext,
        _options: Option<&EvaluationOptions>,
    ) -> ResolutionDetails<Value> {
        self.evaluate(flag_key, default_value, context).await
    }
}
