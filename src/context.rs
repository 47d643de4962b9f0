use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Logger;

/// Caller-supplied attributes describing the subject of an evaluation.
///
/// The subject's identity is read from `targetingKey`, or from the legacy `key` attribute.
///
/// # Examples
/// ```
/// # use launchdarkly_openfeature_provider::EvaluationContext;
/// let context = [
///     ("targetingKey".to_owned(), "user-1".into()),
///     ("plan".to_owned(), "enterprise".into()),
/// ]
/// .into_iter()
/// .collect::<EvaluationContext>();
/// ```
pub type EvaluationContext = HashMap<String, Value>;

/// Attribute holding the identity in the generic evaluation context.
pub const TARGETING_KEY: &str = "targetingKey";
/// Legacy attribute accepted in place of [`TARGETING_KEY`].
pub const LEGACY_KEY: &str = "key";

pub(crate) const BOTH_KEYS_MESSAGE: &str = "The EvaluationContext contained both a 'targetingKey' \
     and a 'key' attribute. The 'key' attribute will be discarded.";
pub(crate) const MISSING_KEY_MESSAGE: &str = "The EvaluationContext must contain either a \
     'targetingKey' or a 'key' and the type must be a string.";

/// Identity passed to the LaunchDarkly client, built fresh for every evaluation.
///
/// Serializes as a flat object: `targetingKey` (omitted when unresolved) next to the remaining
/// attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Resolved identity. `None` if the context had no usable key.
    #[serde(rename = "targetingKey", default, skip_serializing_if = "Option::is_none")]
    pub targeting_key: Option<String>,
    /// All other attributes of the context.
    #[serde(flatten)]
    pub attributes: HashMap<String, Value>,
}

/// Build the client's [`Identity`] from an evaluation context.
///
/// `targetingKey` wins over `key`; when both are present `key` is dropped with a warning. A
/// missing or non-string identity is also reported as a warning and leaves
/// [`Identity::targeting_key`] unset. Translation itself never fails.
pub fn translate_context(logger: &dyn Logger, context: &EvaluationContext) -> Identity {
    let targeting_key = context.get(TARGETING_KEY);
    let legacy_key = context.get(LEGACY_KEY);

    if targeting_key.is_some() && legacy_key.is_some() {
        logger.warn(BOTH_KEYS_MESSAGE);
    }

    let resolved = match targeting_key.or(legacy_key) {
        Some(Value::String(key)) => Some(key.clone()),
        _ => {
            logger.warn(MISSING_KEY_MESSAGE);
            None
        }
    };

    let attributes = context
        .iter()
        .filter(|(name, _)| name.as_str() != TARGETING_KEY && name.as_str() != LEGACY_KEY)
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    Identity {
        targeting_key: resolved,
        attributes,
    }
}
