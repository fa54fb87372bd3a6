//! Parser options.

use bracecfg_tokenizer::{Tokenizer, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// Options controlling how configuration strings are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum group nesting depth (default: 64).
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub(crate) fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new().with_max_depth(self.max_depth)
    }
}
