//! Entry formation and rendering.
//!
//! An entry is the `key[=value]` unit between separators. Groups become nested
//! entry lists, so the whole input turns into a tree of entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexer::TokenKind;
use crate::tree::Node;

/// One element of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Element {
    Literal(String),
    Assignment,
    Group(Vec<Entry>),
}

/// A `key[=value]` unit.
///
/// Well-formed entries hold a literal key, optionally followed by an
/// assignment and a literal or group value. The tokenizer does not enforce
/// this shape; callers that resolve entries decide how to treat anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub elements: Vec<Element>,
}

impl Entry {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// The key text, if the entry starts with a literal.
    pub fn key(&self) -> Option<&str> {
        match self.elements.first() {
            Some(Element::Literal(text)) => Some(text),
            _ => None,
        }
    }

    /// The value element, if present.
    pub fn value(&self) -> Option<&Element> {
        self.elements.get(2)
    }
}

/// Split nodes on separators into entries, recursing into groups.
///
/// Empty spans (leading, trailing or consecutive separators) produce no entry.
pub fn form_entries(nodes: Vec<Node>) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut span: Vec<Element> = Vec::new();

    for node in nodes {
        let element = match node {
            Node::Token(token) => match token.kind {
                TokenKind::Separator => {
                    if !span.is_empty() {
                        entries.push(Entry::new(std::mem::take(&mut span)));
                    }
                    continue;
                }
                TokenKind::Assignment => Element::Assignment,
                _ => Element::Literal(token.text),
            },
            Node::Group(children) => Element::Group(form_entries(children)),
        };
        span.push(element);
    }

    if !span.is_empty() {
        entries.push(Entry::new(span));
    }

    entries
}

/// Render an entry list back to grammar text.
pub fn render(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(Entry::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            match element {
                Element::Literal(text) => write_escaped(f, text)?,
                Element::Assignment => f.write_str("=")?,
                Element::Group(entries) => write!(f, "{{{}}}", render(entries))?,
            }
        }
        Ok(())
    }
}

/// Write literal text so that lexing it again yields the same literal.
///
/// Structural characters and backslashes are always escaped. Whitespace at
/// either edge is escaped because the lexer would otherwise strip it next to a
/// structural token, and a dash after whitespace (or at the start) is escaped
/// so it cannot be taken for the grammar boundary.
fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let leading = text.len() - text.trim_start().len();
    let trailing = text.trim_end().len();
    let mut previous: Option<char> = None;

    for (i, c) in text.char_indices() {
        let at_edge = i < leading || i >= trailing;
        let needs_escape = match c {
            '=' | ':' | '{' | '}' | ';' | '\\' => true,
            '-' => previous.map_or(true, char::is_whitespace),
            c if c.is_whitespace() => at_edge,
            _ => false,
        };
        if needs_escape {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
        previous = Some(c);
    }

    Ok(())
}
