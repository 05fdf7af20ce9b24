use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

// ===== MESSAGE TYPES =====

/// Node id the client uses when reporting route changes.
pub const ROUTE_NODE_ID: &str = "__route__";

/// Event name carried by route changes.
pub const NAVIGATE_EVENT: &str = "navigate";

/// Client→server frame. Server→client frames are bare `UINode` trees.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientEvent {
    pub event: String,
    pub node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ClientEvent {
    pub fn new(node_id: impl Into<String>, event: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            event: event.into(),
            node_id: node_id.into(),
            value,
        }
    }

    pub fn navigate(path: impl Into<String>) -> Self {
        Self::new(ROUTE_NODE_ID, NAVIGATE_EVENT, Some(Value::String(path.into())))
    }
}

/// Metadata reported after a file went through the upload side channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileDescriptor {
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
}

// ===== NODE MODEL =====

/// One element of the server-described UI tree.
///
/// Every inbound frame carries a complete tree; nodes never outlive the frame
/// they arrived in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UINode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub props: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<UINode>,
}

impl UINode {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            props: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn with_props(mut self, props: Value) -> Self {
        if let Value::Object(map) = props {
            self.props = map;
        }
        self
    }

    pub fn with_children(mut self, children: Vec<UINode>) -> Self {
        self.children = children;
        self
    }

    /// Parses one inbound frame.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ===== TREE UTILITIES =====

/// Depth-first, document-order lookup.
pub fn find_node<'a>(tree: &'a UINode, id: &str) -> Option<&'a UINode> {
    if tree.id == id {
        return Some(tree);
    }
    tree.children.iter().find_map(|child| find_node(child, id))
}

pub fn count_nodes(tree: &UINode) -> usize {
    1 + tree.children.iter().map(count_nodes).sum::<usize>()
}

/// Ids that occur more than once, in order of their second occurrence.
pub fn duplicate_ids(tree: &UINode) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    collect_duplicates(tree, &mut seen, &mut duplicates);
    duplicates
}

fn collect_duplicates<'a>(
    node: &'a UINode,
    seen: &mut HashSet<&'a str>,
    duplicates: &mut Vec<String>,
) {
    if !seen.insert(node.id.as_str()) && !duplicates.contains(&node.id) {
        duplicates.push(node.id.clone());
    }
    for child in &node.children {
        collect_duplicates(child, seen, duplicates);
    }
}
