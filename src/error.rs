//! Error types for schema construction and configuration parsing.

use bracecfg_tokenizer::TokenizeError;

/// Errors raised while flattening a schema description.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema description must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("invalid field name '{key}' under '{prefix}'")]
    InvalidKey { prefix: String, key: String },

    #[error("field '{path}' has unsupported default of type {found}")]
    UnsupportedDefault { path: String, found: &'static str },

    #[error("field '{path}' has no default and no type hint")]
    MissingTypeHint { path: String },

    #[error("field '{path}' has invalid type hint {hint}")]
    InvalidTypeHint { path: String, hint: String },

    #[error("field '{path}' has invalid default key {hint}")]
    InvalidDefaultKey { path: String, hint: String },

    #[error("schema JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while parsing a configuration string.
///
/// Parsing is all-or-nothing: when any of these is returned, no config was
/// produced or modified.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error("malformed entry '{entry}': {reason}")]
    MalformedEntry { entry: String, reason: String },
}

impl ParseError {
    pub(crate) fn malformed_entry(entry: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            entry: entry.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error comes from unbalanced braces.
    pub fn is_malformed_group(&self) -> bool {
        matches!(self, ParseError::Tokenize(e) if e.is_malformed_group())
    }

    /// Whether this error comes from an entry with a bad shape.
    pub fn is_malformed_entry(&self) -> bool {
        matches!(self, ParseError::MalformedEntry { .. })
    }
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_error_classification() {
        let group: ParseError = TokenizeError::UnclosedGroup { unclosed: 1 }.into();
        assert!(group.is_malformed_group());
        assert!(!group.is_malformed_entry());

        let entry = ParseError::malformed_entry("=1", "entry has no key");
        assert!(entry.is_malformed_entry());
        assert!(!entry.is_malformed_group());
        assert_eq!(entry.to_string(), "malformed entry '=1': entry has no key");
    }

    #[test]
    fn test_depth_error_is_not_group_error() {
        let err: ParseError = TokenizeError::DepthExceeded { limit: 2 }.into();
        assert!(!err.is_malformed_group());
        assert_eq!(err.to_string(), "nesting exceeds maximum depth of 2");
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
