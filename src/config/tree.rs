//! Nested value tree backing a [`Config`](super::Config).

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::schema::{Scalar, Schema};

/// Children of a table node, keyed by path segment.
pub type Table = BTreeMap<String, Node>;

/// A node in the config tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A scalar field. Empty when the field has no default and was never set.
    Leaf(Option<Scalar>),
    /// An object field.
    Table(Table),
}

impl Node {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Leaf(value) => value.as_ref(),
            Node::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Node::Table(table) => Some(table),
            Node::Leaf(_) => None,
        }
    }

    /// Render as JSON. Empty leaves are left out of their table.
    pub fn to_json(&self) -> Value {
        match self {
            Node::Leaf(value) => value.as_ref().map_or(Value::Null, Scalar::to_json),
            Node::Table(table) => Value::Object(table_to_json(table)),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

pub(crate) fn table_to_json(table: &Table) -> Map<String, Value> {
    table
        .iter()
        .filter(|(_, node)| !matches!(node, Node::Leaf(None)))
        .map(|(key, node)| (key.clone(), node.to_json()))
        .collect()
}

/// Build a tree with every schema default in place.
pub(crate) fn from_defaults(schema: &Schema) -> Table {
    let mut root = Table::new();

    for (path, field) in schema.paths() {
        let node = if field.is_object() {
            Node::Table(Table::new())
        } else {
            Node::Leaf(field.default.clone())
        };
        insert(&mut root, path, node);
    }

    root
}

/// Insert `node` at `path`, creating intermediate tables.
///
/// An existing table at `path` is kept, so objects can be inserted before or
/// after their children.
fn insert(root: &mut Table, path: &str, node: Node) {
    let (parent_path, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (Some(parent), key),
        None => (None, path),
    };

    let mut table = root;
    for segment in parent_path.into_iter().flat_map(|p| p.split('.')) {
        let child = table
            .entry(segment.to_string())
            .or_insert_with(|| Node::Table(Table::new()));
        table = match child {
            Node::Table(inner) => inner,
            Node::Leaf(_) => return,
        };
    }

    let keep_existing =
        matches!(node, Node::Table(_)) && matches!(table.get(key), Some(Node::Table(_)));
    if !keep_existing {
        table.insert(key.to_string(), node);
    }
}

pub(crate) fn lookup<'a>(root: &'a Table, path: &str) -> Option<&'a Node> {
    let mut segments = path.split('.');
    let mut node = root.get(segments.next()?)?;
    for segment in segments {
        node = node.as_table()?.get(segment)?;
    }
    Some(node)
}

pub(crate) fn lookup_mut<'a>(root: &'a mut Table, path: &str) -> Option<&'a mut Node> {
    let mut segments = path.split('.');
    let mut node = root.get_mut(segments.next()?)?;
    for segment in segments {
        node = match node {
            Node::Table(table) => table.get_mut(segment)?,
            Node::Leaf(_) => return None,
        };
    }
    Some(node)
}
