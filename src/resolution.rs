use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EvaluationDetail, Reason};

/// Reason reported when evaluation failed.
pub const ERROR_REASON: &str = "ERROR";

/// Error codes of the generic evaluation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The provider (or its client) is not ready to evaluate flags.
    ProviderNotReady,
    /// The flag does not exist.
    FlagNotFound,
    /// The flag configuration could not be parsed.
    ParseError,
    /// The flag value does not have the requested type.
    TypeMismatch,
    /// The evaluation context has no identity.
    TargetingKeyMissing,
    /// The evaluation context is malformed.
    InvalidContext,
    /// Any other error.
    General,
}

impl ErrorCode {
    /// Map a LaunchDarkly error kind. Unknown or absent kinds map to [`ErrorCode::General`].
    pub fn from_error_kind(error_kind: Option<&str>) -> ErrorCode {
        match error_kind {
            Some("CLIENT_NOT_READY") => ErrorCode::ProviderNotReady,
            Some("MALFORMED_FLAG") => ErrorCode::ParseError,
            Some("FLAG_NOT_FOUND") => ErrorCode::FlagNotFound,
            Some("USER_NOT_SPECIFIED") => ErrorCode::TargetingKeyMissing,
            _ => ErrorCode::General,
        }
    }

    /// Code as spelled by the generic contract, e.g. `"TYPE_MISMATCH"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ProviderNotReady => "PROVIDER_NOT_READY",
            ErrorCode::FlagNotFound => "FLAG_NOT_FOUND",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::TargetingKeyMissing => "TARGETING_KEY_MISSING",
            ErrorCode::InvalidContext => "INVALID_CONTEXT",
            ErrorCode::General => "GENERAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a flag evaluation in the shape of the generic contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDetails<T> {
    /// Key of the evaluated flag.
    pub flag_key: String,
    /// Evaluated value, or the caller's default if evaluation failed.
    pub value: T,
    /// Stringified variation index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Reason kind reported by the client, or [`ERROR_REASON`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Set only when `reason` is [`ERROR_REASON`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
    /// Human-readable detail for some errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl<T> ResolutionDetails<T> {
    /// Return `true` if evaluation failed and `value` is the caller's default.
    pub fn is_error(&self) -> bool {
        self.error_code.is_some()
    }

    /// Map `ResolutionDetails.value` using the `f` function.
    pub fn map<T2, F: FnOnce(T) -> T2>(self, f: F) -> ResolutionDetails<T2> {
        ResolutionDetails {
            flag_key: self.flag_key,
            value: f(self.value),
            variant: self.variant,
            reason: self.reason,
            error_code: self.error_code,
            error_message: self.error_message,
        }
    }
}

/// Type category of a flag value.
///
/// Anything that is not a boolean, string, or number (objects, arrays, and null) is
/// [`ValueKind::Structured`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// `true` or `false`.
    Boolean,
    /// A string.
    String,
    /// A number.
    Number,
    /// Object, array, or null.
    Structured,
}

impl ValueKind {
    /// Kind of a JSON value.
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Bool(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Null | Value::Array(_) | Value::Object(_) => ValueKind::Structured,
        }
    }
}

/// A type a flag can be evaluated as.
///
/// The expected [`ValueKind`] of an evaluation is taken from the default value, so a structured
/// evaluation accepts any non-scalar JSON value.
pub trait FlagValue: Sized {
    /// Convert to the representation passed to the client.
    fn to_value(&self) -> Value;

    /// Convert a client value back. Returns `None` if `value` does not have this type.
    fn from_value(value: Value) -> Option<Self>;

    /// Kind a served value must have to be accepted in place of `self`.
    fn kind(&self) -> ValueKind {
        ValueKind::of(&self.to_value())
    }
}

impl FlagValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FlagValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FlagValue for f64 {
    fn to_value(&self) -> Value {
        // Non-finite numbers have no JSON representation and become null.
        Value::from(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Number
    }
}

impl FlagValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

/// Convert the client's [`EvaluationDetail`] into [`ResolutionDetails`], checking the served value
/// against the type of `default_value`.
///
/// If the client reported an error, or served a value of the wrong type, the result carries
/// `default_value` with an error code. The variant is reported in every case.
pub fn translate_result<T: FlagValue>(
    flag_key: &str,
    default_value: T,
    detail: EvaluationDetail,
) -> ResolutionDetails<T> {
    let EvaluationDetail {
        value,
        variation_index,
        reason,
    } = detail;

    let mut details = ResolutionDetails {
        flag_key: flag_key.to_owned(),
        value: default_value,
        variant: variation_index.map(|index| index.to_string()),
        reason: Some(ERROR_REASON.to_owned()),
        error_code: None,
        error_message: None,
    };

    if let Reason::Error { error_kind } = &reason {
        let error_code = ErrorCode::from_error_kind(error_kind.as_deref());
        if error_code == ErrorCode::General {
            details.error_message = error_kind
                .as_ref()
                .map(|kind| format!("unrecognized error kind: {kind}"));
        }
        details.error_code = Some(error_code);
        return details;
    }

    let expected = details.value.kind();
    let served = if ValueKind::of(&value) == expected {
        T::from_value(value)
    } else {
        None
    };

    match served {
        Some(value) => {
            details.value = value;
            details.reason = Some(reason.kind().to_owned());
        }
        None => {
            details.error_code = Some(ErrorCode::TypeMismatch);
        }
    }
    details
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::{EvaluationDetail, Reason};

    use super::{translate_result, ErrorCode, ResolutionDetails, ValueKind};

    const FLAG_KEY: &str = "a-key";

    fn type_mismatch<T>(value: T) -> ResolutionDetails<T> {
        ResolutionDetails {
            flag_key: FLAG_KEY.to_owned(),
            value,
            variant: None,
            reason: Some("ERROR".to_owned()),
            error_code: Some(ErrorCode::TypeMismatch),
            error_message: None,
        }
    }

    fn served<T>(value: T, reason: &str) -> ResolutionDetails<T> {
        ResolutionDetails {
            flag_key: FLAG_KEY.to_owned(),
            value,
            variant: None,
            reason: Some(reason.to_owned()),
            error_code: None,
            error_message: None,
        }
    }

    #[test]
    fn value_kinds() {
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&json!("s")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Structured);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Structured);
        assert_eq!(ValueKind::of(&Value::Null), ValueKind::Structured);
    }

    #[test]
    fn boolean_values() {
        let ok = translate_result(FLAG_KEY, false, EvaluationDetail::new(true, Reason::Off));
        assert_eq!(ok, served(true, "OFF"));

        let bad = translate_result(FLAG_KEY, false, EvaluationDetail::new("badness", Reason::Off));
        assert_eq!(bad, type_mismatch(false));
    }

    #[test]
    fn string_values() {
        let ok = translate_result(
            FLAG_KEY,
            "default".to_owned(),
            EvaluationDetail::new("good", Reason::Fallthrough),
        );
        assert_eq!(ok, served("good".to_owned(), "FALLTHROUGH"));

        let bad = translate_result(
            FLAG_KEY,
            "default".to_owned(),
            EvaluationDetail::new(true, Reason::Off),
        );
        assert_eq!(bad, type_mismatch("default".to_owned()));
    }

    #[test]
    fn number_values() {
        let ok = translate_result(FLAG_KEY, 0.0, EvaluationDetail::new(17, Reason::TargetMatch));
        assert_eq!(ok, served(17.0, "TARGET_MATCH"));

        let bad = translate_result(FLAG_KEY, 0.0, EvaluationDetail::new(true, Reason::Off));
        assert_eq!(bad, type_mismatch(0.0));
    }

    #[test]
    fn structured_values() {
        let reason = Reason::RuleMatch {
            rule_index: 0,
            rule_id: None,
        };
        let ok = translate_result(
            FLAG_KEY,
            json!({}),
            EvaluationDetail::new(json!({"some": "value"}), reason),
        );
        assert_eq!(ok, served(json!({"some": "value"}), "RULE_MATCH"));

        let list = translate_result(
            FLAG_KEY,
            json!({}),
            EvaluationDetail::new(json!(["a"]), Reason::Off),
        );
        assert_eq!(list, served(json!(["a"]), "OFF"));

        let bad = translate_result(FLAG_KEY, json!({}), EvaluationDetail::new(22, Reason::Off));
        assert_eq!(bad, type_mismatch(json!({})));
    }

    #[test]
    fn maps_client_errors() {
        let cases = [
            (Some("CLIENT_NOT_READY"), ErrorCode::ProviderNotReady),
            (Some("MALFORMED_FLAG"), ErrorCode::ParseError),
            (Some("FLAG_NOT_FOUND"), ErrorCode::FlagNotFound),
            (Some("USER_NOT_SPECIFIED"), ErrorCode::TargetingKeyMissing),
            (Some("UNSPECIFIED"), ErrorCode::General),
            (None, ErrorCode::General),
        ];

        for (error_kind, expected) in cases {
            let detail = EvaluationDetail::new(
                json!({"yes": "no"}),
                Reason::Error {
                    error_kind: error_kind.map(str::to_owned),
                },
            );
            let result = translate_result(FLAG_KEY, json!({}), detail);

            assert_eq!(result.value, json!({}), "{error_kind:?}");
            assert_eq!(result.reason.as_deref(), Some("ERROR"), "{error_kind:?}");
            assert_eq!(result.error_code, Some(expected), "{error_kind:?}");
        }
    }

    #[test]
    fn names_unrecognized_error_kind() {
        let detail = EvaluationDetail::new(true, Reason::error("UNSPECIFIED"));
        let result = translate_result(FLAG_KEY, false, detail);
        assert_eq!(
            result.error_message.as_deref(),
            Some("unrecognized error kind: UNSPECIFIED")
        );

        let detail = EvaluationDetail::new(true, Reason::error("FLAG_NOT_FOUND"));
        let result = translate_result(FLAG_KEY, false, detail);
        assert_eq!(result.error_message, None);
    }

    #[test]
    fn includes_variant() {
        let detail =
            EvaluationDetail::new(json!({"yes": "no"}), Reason::Off).with_variation_index(22);
        let result = translate_result(FLAG_KEY, json!({}), detail);
        assert_eq!(
            result,
            ResolutionDetails {
                variant: Some("22".to_owned()),
                ..served(json!({"yes": "no"}), "OFF")
            }
        );

        let detail = EvaluationDetail::new("badness", Reason::Off).with_variation_index(3);
        let result = translate_result(FLAG_KEY, false, detail);
        assert_eq!(result.variant.as_deref(), Some("3"));
        assert_eq!(result.error_code, Some(ErrorCode::TypeMismatch));

        let detail = EvaluationDetail::new(true, Reason::error("FLAG_NOT_FOUND"))
            .with_variation_index(0);
        let result = translate_result(FLAG_KEY, false, detail);
        assert_eq!(result.variant.as_deref(), Some("0"));
    }

    #[test]
    fn serializes_like_the_contract() {
        let detail = EvaluationDetail::new("badness", Reason::Off);
        let result = translate_result(FLAG_KEY, false, detail);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "flagKey": FLAG_KEY,
                "value": false,
                "reason": "ERROR",
                "errorCode": "TYPE_MISMATCH",
            })
        );
    }
}
