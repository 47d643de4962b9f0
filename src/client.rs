//! Boundary with the LaunchDarkly client.
//!
//! The client owns connection management, the flag store, and flag-rule evaluation. The provider
//! only needs two of its operations, captured by [`LdClient`].
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BackendError, Identity};

/// The subset of the LaunchDarkly client used by the provider.
#[async_trait]
pub trait LdClient: Send + Sync {
    /// Associate subsequent evaluations with `identity`.
    async fn identify(&self, identity: Identity) -> Result<(), BackendError>;

    /// Evaluate `flag_key` for the current identity, returning the value with its metadata.
    ///
    /// `default_value` is what the client serves when it cannot evaluate the flag.
    fn variation_detail(&self, flag_key: &str, default_value: Value) -> EvaluationDetail;
}

/// Result of a detailed evaluation, as returned by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationDetail {
    /// Served value. Its type is whatever the flag was configured with.
    pub value: Value,
    /// Index of the served variation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_index: Option<usize>,
    /// Why the value was served.
    pub reason: Reason,
}

impl EvaluationDetail {
    /// Detail with no variation index.
    pub fn new(value: impl Into<Value>, reason: Reason) -> Self {
        EvaluationDetail {
            value: value.into(),
            variation_index: None,
            reason,
        }
    }

    /// Set the variation index.
    pub fn with_variation_index(mut self, variation_index: usize) -> Self {
        self.variation_index = Some(variation_index);
        self
    }
}

/// Why the client served a particular value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// The flag is off.
    Off,
    /// No targets or rules matched.
    Fallthrough,
    /// The context was individually targeted.
    TargetMatch,
    /// A targeting rule matched.
    #[serde(rename_all = "camelCase")]
    RuleMatch {
        /// Position of the rule.
        rule_index: usize,
        /// Rule identifier, if it has one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rule_id: Option<String>,
    },
    /// A prerequisite flag did not return the required variation.
    #[serde(rename_all = "camelCase")]
    PrerequisiteFailed {
        /// Key of the failed prerequisite.
        prerequisite_key: String,
    },
    /// The flag could not be evaluated.
    #[serde(rename_all = "camelCase")]
    Error {
        /// Error sub-kind such as `FLAG_NOT_FOUND`. Left open: the client may report kinds the
        /// provider does not know about.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_kind: Option<String>,
    },
}

impl Reason {
    /// Reason kind as spelled by the client, e.g. `"RULE_MATCH"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Reason::Off => "OFF",
            Reason::Fallthrough => "FALLTHROUGH",
            Reason::TargetMatch => "TARGET_MATCH",
            Reason::RuleMatch { .. } => "RULE_MATCH",
            Reason::PrerequisiteFailed { .. } => "PREREQUISITE_FAILED",
            Reason::Error { .. } => "ERROR",
        }
    }

    /// Error reason with the given sub-kind.
    pub fn error(error_kind: impl Into<String>) -> Self {
        Reason::Error {
            error_kind: Some(error_kind.into()),
        }
    }
}
