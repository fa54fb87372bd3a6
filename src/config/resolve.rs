//! Entry resolution: applying a tokenized entry tree to a config.

use bracecfg_tokenizer::{Element, Entry};
use tracing::trace;

use super::Config;
use crate::error::ParseError;
use crate::schema::RawValue;

/// How resolved values are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assign {
    /// Always write.
    Set,
    /// Write only over values still at their default.
    Override,
}

/// Convert dash-case to camelCase: every `-x` becomes `X`.
///
/// A trailing dash is kept as is.
pub fn normalize_key(key: &str) -> String {
    let mut normalized = String::with_capacity(key.len());
    let mut chars = key.chars();

    while let Some(c) = chars.next() {
        if c != '-' {
            normalized.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => normalized.extend(next.to_uppercase()),
            None => normalized.push('-'),
        }
    }

    normalized
}

pub(crate) fn resolve_entries(
    config: &mut Config,
    entries: &[Entry],
    prefix: &str,
    assign: Assign,
) -> Result<(), ParseError> {
    for entry in entries {
        resolve_entry(config, entry, prefix, assign)?;
    }
    Ok(())
}

fn resolve_entry(
    config: &mut Config,
    entry: &Entry,
    prefix: &str,
    assign: Assign,
) -> Result<(), ParseError> {
    let key = entry
        .key()
        .map(normalize_key)
        .ok_or_else(|| ParseError::malformed_entry(entry, "entry must start with a key"))?;
    if key.is_empty() {
        return Err(ParseError::malformed_entry(entry, "entry key is empty"));
    }

    match entry.elements.get(1) {
        None | Some(Element::Assignment) => {}
        Some(_) => {
            return Err(ParseError::malformed_entry(entry, "expected assignment after key"));
        }
    }
    if entry.elements.len() > 3 {
        return Err(ParseError::malformed_entry(entry, "unexpected text after value"));
    }

    let path = format!("{}{}", prefix, key);
    trace!(path = %path, "resolving entry");

    match entry.value() {
        None => write(config, &path, RawValue::Flag, assign),
        Some(Element::Literal(text)) => write(config, &path, RawValue::Text(text), assign),
        Some(Element::Group(children)) => {
            resolve_entries(config, children, &format!("{}.", path), assign)?
        }
        Some(Element::Assignment) => {
            return Err(ParseError::malformed_entry(entry, "unexpected assignment"));
        }
    }

    Ok(())
}

fn write(config: &mut Config, path: &str, raw: RawValue<'_>, assign: Assign) {
    match assign {
        Assign::Set => {
            config.set(path, raw);
        }
        Assign::Override => {
            config.override_value(path, raw);
        }
    }
}
