//! Token stream passes: escape folding, literal merging and group extraction.

use serde::{Deserialize, Serialize};

use crate::error::TokenizeError;
use crate::lexer::{Token, TokenKind};

/// A token, or a brace-delimited group of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Node {
    Token(Token),
    Group(Vec<Node>),
}

/// Replace every escape token with a literal holding the escaped character.
pub fn fold_escapes(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| match token.kind {
            TokenKind::Escape => {
                let escaped = token.text.strip_prefix('\\').unwrap_or(token.text.as_str());
                Token::literal(escaped)
            }
            _ => token,
        })
        .collect()
}

/// Concatenate adjacent literals so that literal runs are maximal.
pub fn merge_literals(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match merged.last_mut() {
            Some(last) if last.is_literal() && token.is_literal() => {
                last.text.push_str(&token.text);
            }
            _ => merged.push(token),
        }
    }

    merged
}

/// Fold matching brace pairs into group nodes, innermost first.
///
/// Every `}` closes the most recently opened `{`, so groups come out properly
/// nested. The brace tokens themselves are dropped.
pub fn extract_groups(tokens: Vec<Token>, max_depth: usize) -> Result<Vec<Node>, TokenizeError> {
    let mut current: Vec<Node> = Vec::new();
    let mut parents: Vec<Vec<Node>> = Vec::new();

    for (index, token) in tokens.into_iter().enumerate() {
        match token.kind {
            TokenKind::StartGroup => {
                if parents.len() >= max_depth {
                    return Err(TokenizeError::DepthExceeded { limit: max_depth });
                }
                parents.push(std::mem::take(&mut current));
            }
            TokenKind::StopGroup => {
                let parent = parents
                    .pop()
                    .ok_or(TokenizeError::UnopenedGroup { index })?;
                let group = std::mem::replace(&mut current, parent);
                current.push(Node::Group(group));
            }
            _ => current.push(Node::Token(token)),
        }
    }

    if !parents.is_empty() {
        return Err(TokenizeError::UnclosedGroup {
            unclosed: parents.len(),
        });
    }

    Ok(current)
}
