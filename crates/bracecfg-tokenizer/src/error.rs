//! Error types for the tokenizer.

/// Structural errors found while folding braces into groups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// One or more `{` were never closed.
    #[error("malformed group: {unclosed} unclosed '{{'")]
    UnclosedGroup { unclosed: usize },

    /// A `}` appeared with no open group to close.
    #[error("malformed group: '}}' at token {index} has no matching '{{'")]
    UnopenedGroup { index: usize },

    /// Groups nest deeper than the tokenizer allows.
    #[error("nesting exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}

impl TokenizeError {
    /// Whether this error comes from unbalanced braces.
    pub fn is_malformed_group(&self) -> bool {
        matches!(
            self,
            TokenizeError::UnclosedGroup { .. } | TokenizeError::UnopenedGroup { .. }
        )
    }
}
