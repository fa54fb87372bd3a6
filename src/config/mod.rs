//! Schema-backed configuration
//!
//! A [`Config`] starts from every default in its [`Schema`] and is then
//! populated from configuration strings:
//! - [`Config::parse`] applies one string with plain `set` semantics
//! - [`Config::layer`] applies further strings with override semantics, so the
//!   first source to change a value wins
//!
//! Paths are dotted (`server.tls.enabled`). Paths the schema does not know are
//! ignored everywhere.

mod options;
mod resolve;
mod tree;

pub use options::ParseOptions;
pub use resolve::normalize_key;
pub use tree::{Node, Table};

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::error::ParseError;
use crate::schema::{FieldKind, RawValue, Scalar, Schema};
use resolve::{resolve_entries, Assign};

/// A configuration tree validated against a shared schema.
#[derive(Debug, Clone)]
pub struct Config {
    schema: Arc<Schema>,
    root: Table,
    unparsed: String,
}

impl Config {
    /// A config holding only schema defaults.
    pub fn defaults(schema: Arc<Schema>) -> Self {
        let root = tree::from_defaults(&schema);
        Self {
            schema,
            root,
            unparsed: String::new(),
        }
    }

    /// Parse `raw` against `schema` with default options.
    pub fn parse(schema: Arc<Schema>, raw: &str) -> Result<Self, ParseError> {
        Self::parse_with(schema, raw, &ParseOptions::default())
    }

    /// Parse `raw` against `schema`.
    pub fn parse_with(
        schema: Arc<Schema>,
        raw: &str,
        options: &ParseOptions,
    ) -> Result<Self, ParseError> {
        let tokenized = options.tokenizer().tokenize(raw)?;

        let mut config = Self::defaults(schema);
        resolve_entries(&mut config, &tokenized.entries, "", Assign::Set)?;
        config.unparsed = tokenized.unparsed;

        Ok(config)
    }

    /// Apply another configuration string with override semantics.
    ///
    /// Only values still at their schema default are changed. On error the
    /// config is left untouched. Returns the string's unparsed tail.
    pub fn layer(&mut self, raw: &str) -> Result<String, ParseError> {
        self.layer_with(raw, &ParseOptions::default())
    }

    pub fn layer_with(&mut self, raw: &str, options: &ParseOptions) -> Result<String, ParseError> {
        let tokenized = options.tokenizer().tokenize(raw)?;

        let mut staged = self.clone();
        resolve_entries(&mut staged, &tokenized.entries, "", Assign::Override)?;
        self.root = staged.root;

        Ok(tokenized.unparsed)
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Text after the grammar boundary of the parsed string.
    pub fn unparsed(&self) -> &str {
        &self.unparsed
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    /// Get the node at `path`. `None` if the schema does not know the path.
    pub fn get(&self, path: &str) -> Option<&Node> {
        if !self.schema.contains(path) {
            return None;
        }
        tree::lookup(&self.root, path)
    }

    /// Get the scalar at `path`, if set.
    pub fn get_scalar(&self, path: &str) -> Option<&Scalar> {
        self.get(path)?.as_scalar()
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get_scalar(path)?.as_bool()
    }

    pub fn get_number(&self, path: &str) -> Option<f64> {
        self.get_scalar(path)?.as_number()
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_scalar(path)?.as_str()
    }

    /// Coerce `raw` through the schema and write it at `path`.
    ///
    /// Values for an object path go to its default sub-key. Returns whether
    /// anything was written; unknown paths and objects without a default
    /// sub-key are left alone.
    pub fn set<'a>(&mut self, path: &str, raw: impl Into<RawValue<'a>>) -> bool {
        match self.value_target(path) {
            Some(target) => self.write(&target, raw.into()),
            None => false,
        }
    }

    /// Whether `path` still holds its schema default.
    ///
    /// An object path answers for its default sub-key field. False for
    /// unknown paths and objects without a default sub-key.
    pub fn is_default(&self, path: &str) -> bool {
        self.value_target(path)
            .is_some_and(|target| self.holds_default(&target))
    }

    /// [`set`](Self::set), but only if [`is_default`](Self::is_default)
    /// holds for `path`.
    pub fn override_value<'a>(&mut self, path: &str, raw: impl Into<RawValue<'a>>) -> bool {
        let Some(target) = self.value_target(path) else {
            return false;
        };
        if !self.holds_default(&target) {
            return false;
        }
        self.write(&target, raw.into())
    }

    fn holds_default(&self, target: &str) -> bool {
        let Some(field) = self.schema.get(target) else {
            return false;
        };
        match tree::lookup(&self.root, target) {
            Some(Node::Leaf(value)) => *value == field.default,
            _ => false,
        }
    }

    /// Follow default sub-keys from `path` to the scalar field receiving its
    /// values.
    fn value_target(&self, path: &str) -> Option<String> {
        let mut target = path.to_string();
        loop {
            let Some(field) = self.schema.get(&target) else {
                debug!(path = %target, "ignoring unknown key");
                return None;
            };
            if field.kind != FieldKind::Object {
                return Some(target);
            }
            match &field.default_sub_key {
                Some(sub_key) => target = format!("{}.{}", target, sub_key),
                None => {
                    debug!(path = %target, "ignoring value for object without default key");
                    return None;
                }
            }
        }
    }

    fn write(&mut self, path: &str, raw: RawValue<'_>) -> bool {
        let Some(value) = self.schema.convert(path, raw) else {
            return false;
        };
        match tree::lookup_mut(&mut self.root, path) {
            Some(Node::Leaf(slot)) => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Render the tree as JSON. Fields with no value are left out.
    pub fn to_json(&self) -> Value {
        Value::Object(tree::table_to_json(&self.root))
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::from_description(&json!({
                "verbose": false,
                "maxRetries": 3,
                "name": "app",
                "a": { "b": 0, "c": { "d": 0 } },
                "mode": { "type": "slow", "level": 1 },
                "_modeDefaultKey": "type",
                "plain": { "x": "y" },
                "token": null,
                "_tokenTypeHint": "string"
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = Config::defaults(schema());
        assert_eq!(config.get_bool("verbose"), Some(false));
        assert_eq!(config.get_number("maxRetries"), Some(3.0));
        assert_eq!(config.get_str("mode.type"), Some("slow"));
        assert!(config.get("a.c").unwrap().as_table().is_some());
        assert_eq!(config.get("token"), Some(&Node::Leaf(None)));
        assert_eq!(config.unparsed(), "");
    }

    #[test]
    fn test_nested_assignment() {
        let config = Config::parse(schema(), "a={b=1;c={d=2}}").unwrap();
        assert_eq!(config.get_number("a.b"), Some(1.0));
        assert_eq!(config.get_number("a.c.d"), Some(2.0));
        assert!(config.get("b").is_none());
        assert!(config.get("c").is_none());
        assert!(config.get("d").is_none());
    }

    #[test]
    fn test_flag() {
        let config = Config::parse(schema(), "verbose").unwrap();
        assert_eq!(config.get_bool("verbose"), Some(true));
    }

    #[test]
    fn test_default_sub_key_shorthand() {
        let config = Config::parse(schema(), "mode=fast").unwrap();
        assert_eq!(config.get_str("mode.type"), Some("fast"));
        assert_eq!(config.get_number("mode.level"), Some(1.0));
    }

    #[test]
    fn test_object_without_default_key_ignores_value() {
        let config = Config::parse(schema(), "plain=z").unwrap();
        assert_eq!(config.get_str("plain.x"), Some("y"));
    }

    #[test]
    fn test_dash_normalization() {
        let config = Config::parse(schema(), "max-retries=7").unwrap();
        assert_eq!(config.get_number("maxRetries"), Some(7.0));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = Config::parse(schema(), "nope=1;a={zzz=2};other").unwrap();
        assert!(config.get("nope").is_none());
        assert!(config.get("a.zzz").is_none());
        assert_eq!(config.get_number("a.b"), Some(0.0));
    }

    #[test]
    fn test_non_numeric_is_nan() {
        let config = Config::parse(schema(), "maxRetries=lots").unwrap();
        assert!(config.get_number("maxRetries").unwrap().is_nan());
        assert!(!config.is_default("maxRetries"));
    }

    #[test]
    fn test_unparsed_tail() {
        let config = Config::parse(schema(), "name=x -v file.txt").unwrap();
        assert_eq!(config.get_str("name"), Some("x"));
        assert_eq!(config.unparsed(), "-v file.txt");
    }

    #[test]
    fn test_malformed_group() {
        let err = Config::parse(schema(), "a={b=1").unwrap_err();
        assert!(err.is_malformed_group());
    }

    #[test]
    fn test_malformed_entries() {
        for input in ["=1", "a=b=c", "a={b=1}x", "{b=1}", "a:{b}={c}"] {
            let err = Config::parse(schema(), input).unwrap_err();
            assert!(err.is_malformed_entry(), "{input} gave {err}");
        }
    }

    #[test]
    fn test_assignment_without_value_is_flag() {
        let config = Config::parse(schema(), "verbose=").unwrap();
        assert_eq!(config.get_bool("verbose"), Some(true));
    }

    #[test]
    fn test_depth_option() {
        let options = ParseOptions { max_depth: 1 };
        assert!(Config::parse_with(schema(), "a={b=1}", &options).is_ok());
        assert!(Config::parse_with(schema(), "a={c={d=1}}", &options).is_err());
    }

    #[test]
    fn test_set() {
        let mut config = Config::defaults(schema());
        assert!(config.set("name", "other"));
        assert_eq!(config.get_str("name"), Some("other"));

        assert!(config.set("verbose", RawValue::Flag));
        assert_eq!(config.get_bool("verbose"), Some(true));

        assert!(config.set("mode", "fast"));
        assert_eq!(config.get_str("mode.type"), Some("fast"));

        assert!(!config.set("plain", "x"));
        assert!(!config.set("missing", "x"));
    }

    #[test]
    fn test_set_hinted_field() {
        let mut config = Config::defaults(schema());
        assert!(config.is_default("token"));
        config.set("token", "abc");
        assert_eq!(config.get_str("token"), Some("abc"));
        assert!(!config.is_default("token"));
    }

    #[test]
    fn test_is_default() {
        let mut config = Config::defaults(schema());
        assert!(config.is_default("maxRetries"));
        config.set("maxRetries", "5");
        assert!(!config.is_default("maxRetries"));
        config.set("maxRetries", "3");
        assert!(config.is_default("maxRetries"));

        assert!(!config.is_default("missing"));
        assert!(!config.is_default("plain"));

        assert!(config.is_default("mode"));
        config.set("mode.type", "fast");
        assert!(!config.is_default("mode"));
    }

    #[test]
    fn test_override_value() {
        let mut config = Config::parse(schema(), "name=cli").unwrap();

        assert!(!config.override_value("name", "file"));
        assert_eq!(config.get_str("name"), Some("cli"));

        assert!(config.override_value("maxRetries", "9"));
        assert_eq!(config.get_number("maxRetries"), Some(9.0));
    }

    #[test]
    fn test_layer() {
        let mut config = Config::parse(schema(), "name=cli;a={b=1}").unwrap();
        let tail = config.layer("name=file;a={b=2;c={d=3}};verbose -rest").unwrap();

        assert_eq!(tail, "-rest");
        assert_eq!(config.get_str("name"), Some("cli"));
        assert_eq!(config.get_number("a.b"), Some(1.0));
        assert_eq!(config.get_number("a.c.d"), Some(3.0));
        assert_eq!(config.get_bool("verbose"), Some(true));
        assert_eq!(config.unparsed(), "");
    }

    #[test]
    fn test_failed_layer_leaves_config_untouched() {
        let mut config = Config::parse(schema(), "name=cli").unwrap();
        let err = config.layer("maxRetries=5;=oops").unwrap_err();
        assert!(err.is_malformed_entry());
        assert_eq!(config.get_number("maxRetries"), Some(3.0));
    }

    #[test]
    fn test_to_json() {
        let config = Config::parse(schema(), "a={b=1};mode=fast;maxRetries=x").unwrap();
        let json = config.to_json();
        assert_eq!(json["a"]["b"], json!(1.0));
        assert_eq!(json["mode"]["type"], "fast");
        assert!(json["maxRetries"].is_null());
        assert!(json.get("token").is_none());
        assert_eq!(serde_json::to_value(&config).unwrap(), json);
    }

    #[test]
    fn test_schema_shared() {
        let schema = schema();
        let first = Config::parse(Arc::clone(&schema), "name=a").unwrap();
        let second = Config::parse(Arc::clone(&schema), "name=b").unwrap();
        assert!(Arc::ptr_eq(first.schema(), second.schema()));
        assert_eq!(first.get_str("name"), Some("a"));
        assert_eq!(second.get_str("name"), Some("b"));
    }
}
