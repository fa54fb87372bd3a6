//! Lexer for the configuration grammar.
//!
//! Separates the grammar input from any trailing text and turns it into a
//! flat token stream. Structural patterns are tried in a fixed priority order
//! at every position; anything that matches none of them accumulates into a
//! literal run.

use serde::{Deserialize, Serialize};

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// `=` or `:`.
    Assignment,
    /// `{`.
    StartGroup,
    /// `}`.
    StopGroup,
    /// `;`.
    Separator,
    /// `\` followed by one character.
    Escape,
    /// Any run of non-structural text.
    Literal,
}

/// A lexed token and the text it consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Literal, text)
    }

    pub fn is_literal(&self) -> bool {
        self.kind == TokenKind::Literal
    }
}

/// Returns the number of bytes a pattern consumes at the start of its input.
type Matcher = fn(&str) -> Option<usize>;

/// Structural patterns in priority order.
const MATCHERS: [(TokenKind, Matcher); 5] = [
    (TokenKind::Assignment, match_assignment),
    (TokenKind::StartGroup, match_start_group),
    (TokenKind::StopGroup, match_stop_group),
    (TokenKind::Separator, match_separator),
    (TokenKind::Escape, match_escape),
];

/// Split raw input into grammar input and the unparsed tail.
///
/// The boundary is the first `-` that sits at the very start of the input or
/// right after whitespace. The whitespace run before the dash belongs to
/// neither side; the tail starts at the dash itself.
pub fn split_boundary(raw: &str) -> (&str, &str) {
    let mut whitespace_start: Option<usize> = None;

    for (i, c) in raw.char_indices() {
        if c == '-' {
            if i == 0 {
                return ("", raw);
            }
            if let Some(start) = whitespace_start {
                return (&raw[..start], &raw[i..]);
            }
        }

        if c.is_whitespace() {
            whitespace_start.get_or_insert(i);
        } else {
            whitespace_start = None;
        }
    }

    (raw, "")
}

/// Lex grammar input into a flat token stream.
pub fn lex(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];

        match match_structural(rest) {
            Some((kind, len)) => {
                if literal_start < pos {
                    tokens.push(Token::literal(&input[literal_start..pos]));
                }
                tokens.push(Token::new(kind, &rest[..len]));
                pos += len;
                literal_start = pos;
            }
            None => {
                // Every position in a whitespace run pads up to the same
                // character, so one miss covers the whole run.
                let run = rest.len() - rest.trim_start().len();
                pos += if run > 0 {
                    run
                } else {
                    rest.chars().next().map_or(1, char::len_utf8)
                };
            }
        }
    }

    if literal_start < input.len() {
        tokens.push(Token::literal(&input[literal_start..]));
    }

    tokens
}

/// First structural pattern matching at the start of `input`.
fn match_structural(input: &str) -> Option<(TokenKind, usize)> {
    MATCHERS
        .iter()
        .find_map(|(kind, matcher)| matcher(input).map(|len| (*kind, len)))
}

/// A single structural character with optional whitespace on both sides.
fn padded(input: &str, structural: &[char]) -> Option<usize> {
    let trimmed = input.trim_start();
    let leading = input.len() - trimmed.len();

    let mut chars = trimmed.chars();
    let c = chars.next().filter(|c| structural.contains(c))?;

    let rest = chars.as_str();
    let trailing = rest.len() - rest.trim_start().len();

    Some(leading + c.len_utf8() + trailing)
}

fn match_assignment(input: &str) -> Option<usize> {
    padded(input, &['=', ':'])
}

fn match_start_group(input: &str) -> Option<usize> {
    padded(input, &['{'])
}

fn match_stop_group(input: &str) -> Option<usize> {
    padded(input, &['}'])
}

fn match_separator(input: &str) -> Option<usize> {
    padded(input, &[';'])
}

/// `\` followed by any character, line breaks included.
fn match_escape(input: &str) -> Option<usize> {
    let escaped = input.strip_prefix('\\')?.chars().next()?;
    Some(1 + escaped.len_utf8())
}
