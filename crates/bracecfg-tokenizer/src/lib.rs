//! Tokenizer for the bracecfg configuration grammar.
//!
//! Turns a raw configuration string such as `a=1;b={c=2;d}` into a tree of
//! entries, and separates off any trailing text that starts with a dash
//! after whitespace (`a=1 -v file` leaves `-v file` unparsed).
//!
//! The pipeline runs in stages, each exposed on its own:
//! 1. [`split_boundary`] - grammar input vs. unparsed tail
//! 2. [`lex`] - flat token stream
//! 3. [`fold_escapes`] - `\X` becomes the literal `X`
//! 4. [`merge_literals`] - adjacent literals concatenate
//! 5. [`extract_groups`] - brace pairs fold into groups
//! 6. [`form_entries`] - separators split entries, recursively

mod entry;
mod error;
mod lexer;
mod tree;

pub use entry::{form_entries, render, Element, Entry};
pub use error::TokenizeError;
pub use lexer::{lex, split_boundary, Token, TokenKind};
pub use tree::{extract_groups, fold_escapes, merge_literals, Node};

use serde::Serialize;
use tracing::debug;

/// Default limit on group nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Result of tokenizing one configuration string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tokenized {
    /// Top-level entries.
    pub entries: Vec<Entry>,
    /// Trailing text that is not part of the grammar.
    pub unparsed: String,
}

/// Tokenizer with a configurable nesting limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    max_depth: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum group nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Run the full pipeline over `raw`.
    pub fn tokenize(&self, raw: &str) -> Result<Tokenized, TokenizeError> {
        let (input, unparsed) = split_boundary(raw);

        let tokens = merge_literals(fold_escapes(lex(input)));
        let nodes = extract_groups(tokens, self.max_depth)?;
        let entries = form_entries(nodes);

        debug!(
            entries = entries.len(),
            unparsed_len = unparsed.len(),
            "tokenized configuration string"
        );

        Ok(Tokenized {
            entries,
            unparsed: unparsed.to_string(),
        })
    }
}

/// Tokenize `raw` with the default nesting limit.
pub fn tokenize(raw: &str) -> Result<Tokenized, TokenizeError> {
    Tokenizer::default().tokenize(raw)
}
