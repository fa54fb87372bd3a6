//! Test fixtures shared by the integration suites.
//!
//! - `schema.json`: a schema exercising nesting, default keys and type hints
//! - `grammar_corpus/corpus.json`: input strings with expected values or errors

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bracecfg::{Config, Schema};

/// Path to the schema fixture
pub fn schema_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/schema.json")
}

/// Path to the grammar corpus fixture
pub fn grammar_corpus_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/grammar_corpus/corpus.json")
}

/// Load the schema fixture
pub fn load_schema() -> Arc<Schema> {
    let text = std::fs::read_to_string(schema_path()).expect("Failed to read schema fixture");
    Arc::new(Schema::from_json_str(&text).expect("Failed to parse schema fixture"))
}

/// Grammar test case from corpus.json
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GrammarTestCase {
    pub id: String,
    pub description: String,
    pub input: String,
    pub expected: GrammarExpectation,
}

/// Expected parse result
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GrammarExpectation {
    /// Expected values by dotted path
    #[serde(default)]
    pub values: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub unparsed: Option<String>,
    /// "malformed_group" or "malformed_entry"
    #[serde(default)]
    pub error: Option<String>,
}

/// Full grammar corpus
#[derive(Debug, Clone, serde::Deserialize)]
pub struct GrammarCorpus {
    pub schema_version: u32,
    pub description: String,
    pub test_cases: Vec<GrammarTestCase>,
}

impl GrammarCorpus {
    /// Load corpus from the fixture file
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(grammar_corpus_path())?;
        let corpus: GrammarCorpus = serde_json::from_str(&content)?;
        Ok(corpus)
    }
}

/// Assert that `path` holds `expected`, comparing numbers as f64.
pub fn assert_value(config: &Config, path: &str, expected: &serde_json::Value, case: &str) {
    let actual = config
        .get_scalar(path)
        .unwrap_or_else(|| panic!("[{}] no value at {}", case, path));

    match expected {
        serde_json::Value::Number(n) => assert_eq!(
            actual.as_number(),
            n.as_f64(),
            "[{}] value at {}",
            case,
            path
        ),
        serde_json::Value::Bool(b) => {
            assert_eq!(actual.as_bool(), Some(*b), "[{}] value at {}", case, path)
        }
        serde_json::Value::String(s) => {
            assert_eq!(actual.as_str(), Some(s.as_str()), "[{}] value at {}", case, path)
        }
        other => panic!("[{}] unsupported expectation {}", case, other),
    }
}
