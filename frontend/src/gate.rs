//! Per-node event switches read from `props.events`.
//!
//! A closed gate never changes how a widget looks; it only suppresses the
//! outbound frame.

use indexmap::IndexSet;
use serde_json::Value;
use shared::UINode;

/// Only a JSON `true` opens the gate.
pub fn is_enabled(node: &UINode, event: &str) -> bool {
    node.props
        .get("events")
        .and_then(Value::as_object)
        .and_then(|events| events.get(event))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Snapshot of the open events of one node, taken at render time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventGate {
    open: IndexSet<String>,
}

impl EventGate {
    pub fn from_node(node: &UINode) -> Self {
        let open = node
            .props
            .get("events")
            .and_then(Value::as_object)
            .map(|events| {
                events
                    .iter()
                    .filter(|(_, flag)| flag.as_bool() == Some(true))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default();
        Self { open }
    }

    pub fn is_open(&self, event: &str) -> bool {
        self.open.contains(event)
    }

    pub fn open_events(&self) -> impl Iterator<Item = &str> {
        self.open.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
