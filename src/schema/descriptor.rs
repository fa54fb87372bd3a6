//! Field descriptors and scalar values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::convert::{coerce_bool, coerce_number, RawValue};

/// Declared kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Boolean,
    Number,
    String,
    /// A container whose children are fields of their own.
    Object,
}

impl FieldKind {
    /// Parse a type hint name.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint {
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    /// Coerce a raw value to this kind. Objects hold no scalar.
    pub fn coerce(self, raw: RawValue<'_>) -> Option<Scalar> {
        match (self, raw) {
            (Self::Object, _) => None,
            (Self::Boolean, RawValue::Flag) => Some(Scalar::Bool(true)),
            (Self::Boolean, RawValue::Text(text)) => Some(Scalar::Bool(coerce_bool(text))),
            (Self::Number, RawValue::Flag) => Some(Scalar::Number(1.0)),
            (Self::Number, RawValue::Text(text)) => Some(Scalar::Number(coerce_number(text))),
            (Self::String, RawValue::Flag) => Some(Scalar::String("true".to_string())),
            (Self::String, RawValue::Text(text)) => Some(Scalar::String(text.to_string())),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Number => write!(f, "number"),
            Self::String => write!(f, "string"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// A coerced configuration value.
///
/// Numbers that failed to parse are `NaN`, which never equals anything,
/// itself included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Boolean,
            Self::Number(_) => FieldKind::Number,
            Self::String(_) => FieldKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to JSON. `NaN` and infinities become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

/// Description of one dotted schema path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub kind: FieldKind,

    /// Default value; absent for objects and for type-hinted fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Scalar>,

    /// Child that receives values assigned directly to an object path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sub_key: Option<String>,
}

impl FieldDescriptor {
    pub fn with_default(default: Scalar) -> Self {
        Self {
            kind: default.kind(),
            default: Some(default),
            default_sub_key: None,
        }
    }

    pub fn without_default(kind: FieldKind) -> Self {
        Self {
            kind,
            default: None,
            default_sub_key: None,
        }
    }

    pub fn object(default_sub_key: Option<String>) -> Self {
        Self {
            kind: FieldKind::Object,
            default: None,
            default_sub_key,
        }
    }

    pub fn is_object(&self) -> bool {
        self.kind == FieldKind::Object
    }
}
