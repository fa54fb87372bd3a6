//! Configuration schema
//!
//! A schema is built from a nested description (JSON) and flattened into a map
//! from dotted path to [`FieldDescriptor`]:
//! - scalar leaf: default value, its type is the field kind
//! - object leaf: nested container, its keys become `parent.child` paths
//! - `null` leaf: no default, kind taken from `_<key>TypeHint`
//! - `_<key>DefaultKey`: the child of object `<key>` that receives values
//!   assigned to `<key>` directly
//!
//! Keys starting with `_` are hints and never fields.

mod convert;
mod descriptor;

pub use convert::{coerce_bool, coerce_number, RawValue};
pub use descriptor::{FieldDescriptor, FieldKind, Scalar};

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_type_name, SchemaError};

/// Prefix marking hint keys.
pub const HINT_MARKER: char = '_';

/// Suffix of the hint naming a field's kind when it has no default.
pub const TYPE_HINT_SUFFIX: &str = "TypeHint";

/// Suffix of the hint naming an object's default sub-key.
pub const DEFAULT_KEY_SUFFIX: &str = "DefaultKey";

/// Flattened schema: dotted path to field descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl Schema {
    /// Build a schema from a nested description.
    pub fn from_description(description: &Value) -> Result<Self, SchemaError> {
        let root = description.as_object().ok_or(SchemaError::NotAnObject {
            found: json_type_name(description),
        })?;

        let mut fields = BTreeMap::new();
        flatten(root, "", &mut fields)?;

        Ok(Self { fields })
    }

    /// Build a schema from JSON description text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        let description: Value = serde_json::from_str(text)?;
        Self::from_description(&description)
    }

    pub fn get(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// All paths and descriptors, sorted by path.
    pub fn paths(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(path, field)| (path.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Coerce a raw value to the kind declared at `path`.
    ///
    /// Returns `None` for unknown paths and object paths.
    pub fn convert(&self, path: &str, raw: RawValue<'_>) -> Option<Scalar> {
        self.get(path)?.kind.coerce(raw)
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let description = Value::deserialize(deserializer)?;
        Self::from_description(&description).map_err(serde::de::Error::custom)
    }
}

fn flatten(
    map: &Map<String, Value>,
    prefix: &str,
    fields: &mut BTreeMap<String, FieldDescriptor>,
) -> Result<(), SchemaError> {
    for (key, value) in map {
        if key.starts_with(HINT_MARKER) {
            continue;
        }
        if key.is_empty() || key.contains('.') {
            return Err(SchemaError::InvalidKey {
                prefix: prefix.trim_end_matches('.').to_string(),
                key: key.clone(),
            });
        }

        let path = format!("{}{}", prefix, key);

        let field = match value {
            Value::Object(children) => {
                flatten(children, &format!("{}.", path), fields)?;
                let default_sub_key = default_key_hint(map, key, children, &path)?;
                FieldDescriptor::object(default_sub_key)
            }
            Value::Null => FieldDescriptor::without_default(type_hint(map, key, &path)?),
            Value::Bool(b) => FieldDescriptor::with_default(Scalar::Bool(*b)),
            Value::Number(n) => {
                let number = n.as_f64().ok_or_else(|| SchemaError::UnsupportedDefault {
                    path: path.clone(),
                    found: "number",
                })?;
                FieldDescriptor::with_default(Scalar::Number(number))
            }
            Value::String(s) => FieldDescriptor::with_default(Scalar::String(s.clone())),
            Value::Array(_) => {
                return Err(SchemaError::UnsupportedDefault {
                    path,
                    found: "array",
                })
            }
        };

        fields.insert(path, field);
    }

    Ok(())
}

fn hint<'a>(map: &'a Map<String, Value>, key: &str, suffix: &str) -> Option<&'a Value> {
    map.get(&format!("{}{}{}", HINT_MARKER, key, suffix))
}

fn type_hint(map: &Map<String, Value>, key: &str, path: &str) -> Result<FieldKind, SchemaError> {
    let hint = hint(map, key, TYPE_HINT_SUFFIX).ok_or_else(|| SchemaError::MissingTypeHint {
        path: path.to_string(),
    })?;

    hint.as_str()
        .and_then(FieldKind::from_hint)
        .ok_or_else(|| SchemaError::InvalidTypeHint {
            path: path.to_string(),
            hint: hint.to_string(),
        })
}

/// The default sub-key must name a field of the object itself.
fn default_key_hint(
    map: &Map<String, Value>,
    key: &str,
    children: &Map<String, Value>,
    path: &str,
) -> Result<Option<String>, SchemaError> {
    match hint(map, key, DEFAULT_KEY_SUFFIX) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(sub_key))
            if !sub_key.starts_with(HINT_MARKER) && children.contains_key(sub_key) =>
        {
            Ok(Some(sub_key.clone()))
        }
        Some(other) => Err(SchemaError::InvalidDefaultKey {
            path: path.to_string(),
            hint: other.to_string(),
        }),
    }
}
