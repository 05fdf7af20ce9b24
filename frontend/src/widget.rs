use crate::gate::EventGate;
use serde_json::Value;
use shared::{ClientEvent, FileDescriptor, UINode};
use std::fmt;
use std::sync::Arc;

pub use crate::components::WidgetKind;

// ===== EVENT OUTLET =====

/// Destination of the events a widget is allowed to forward.
pub trait EventSink: Send + Sync + 'static {
    fn send_event(&self, event: ClientEvent);
}

/// Sink for offline rendering; every event is discarded.
#[derive(Clone, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn send_event(&self, event: ClientEvent) {
        log::debug!("No channel attached, dropping {} for {}", event.event, event.node_id);
    }
}

impl EventSink for tokio::sync::mpsc::UnboundedSender<ClientEvent> {
    fn send_event(&self, event: ClientEvent) {
        let _ = self.send(event);
    }
}

/// Shared handle to the sink of one render pass.
#[derive(Clone)]
pub struct Outlet(Arc<dyn EventSink>);

impl Outlet {
    pub fn new(sink: impl EventSink) -> Self {
        Self(Arc::new(sink))
    }

    pub fn detached() -> Self {
        Self::new(NullSink)
    }

    pub fn send(&self, event: ClientEvent) {
        self.0.send_event(event);
    }
}

impl fmt::Debug for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Outlet")
    }
}

// ===== INTERACTIONS =====

/// User actions a rendered widget can receive.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Click,
    Input(String),
    SetNumber(f64),
    SetRange { min: f64, max: f64 },
    Toggle,
    Choose(usize),
    EditCell { row: usize, col: usize, value: Value },
    Submit,
    Close,
    Upload(FileDescriptor),
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Click => "click",
            Interaction::Input(_) => "input",
            Interaction::SetNumber(_) => "set",
            Interaction::SetRange { .. } => "range",
            Interaction::Toggle => "toggle",
            Interaction::Choose(_) => "choose",
            Interaction::EditCell { .. } => "edit",
            Interaction::Submit => "submit",
            Interaction::Close => "close",
            Interaction::Upload(_) => "upload",
        }
    }
}

/// What a component decided to do with an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    Emit {
        event: &'static str,
        value: Option<Value>,
    },
    /// Widget-local state changed; nothing leaves the client.
    Local,
    /// The input was not meaningful (bad number, index out of range).
    Ignored,
    Unsupported,
}

impl Reaction {
    pub fn emit(event: &'static str) -> Self {
        Reaction::Emit { event, value: None }
    }

    pub fn emit_value(event: &'static str, value: Value) -> Self {
        Reaction::Emit {
            event,
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Sent(ClientEvent),
    /// The event was produced but its gate is closed.
    Gated { event: &'static str },
    Local,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InteractError {
    #[error("no tree has been received yet")]
    NoTree,
    #[error("no widget is bound to node id '{0}'")]
    UnknownNode(String),
    #[error("{tag} '{node_id}' does not support '{interaction}'")]
    Unsupported {
        node_id: String,
        tag: String,
        interaction: &'static str,
    },
}

// ===== WIDGET TREE =====

/// A rendered node: normalized props, local state and the children that are
/// currently visible.
#[derive(Debug, Clone)]
pub struct Widget {
    node_id: String,
    kind: WidgetKind,
    children: Vec<Widget>,
    gate: EventGate,
    outlet: Outlet,
}

impl Widget {
    pub fn new(node: &UINode, kind: WidgetKind, children: Vec<Widget>, outlet: Outlet) -> Self {
        Self {
            node_id: node.id.clone(),
            kind,
            children,
            gate: EventGate::from_node(node),
            outlet,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    pub fn children(&self) -> &[Widget] {
        &self.children
    }

    pub fn gate(&self) -> &EventGate {
        &self.gate
    }

    /// Document-order lookup by node id.
    pub fn find(&self, node_id: &str) -> Option<&Widget> {
        if self.node_id == node_id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(node_id))
    }

    pub fn find_mut(&mut self, node_id: &str) -> Option<&mut Widget> {
        if self.node_id == node_id {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(node_id))
    }

    /// Ids of every rendered widget in document order.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        ids.push(&self.node_id);
        for child in &self.children {
            child.collect_ids(ids);
        }
    }

    /// Runs the interaction through the component and, when it produces an
    /// event, through the gate. At most one frame is sent.
    pub fn interact(&mut self, interaction: Interaction) -> Result<Outcome, InteractError> {
        let name = interaction.name();
        match self.kind.react(interaction) {
            Reaction::Emit { event, value } => {
                if !self.gate.is_open(event) {
                    log::debug!("Event '{}' on '{}' is gated off", event, self.node_id);
                    return Ok(Outcome::Gated { event });
                }
                let message = ClientEvent::new(self.node_id.clone(), event, value);
                self.outlet.send(message.clone());
                self.kind.on_sent(event);
                Ok(Outcome::Sent(message))
            }
            Reaction::Local => Ok(Outcome::Local),
            Reaction::Ignored => Ok(Outcome::Ignored),
            Reaction::Unsupported => Err(InteractError::Unsupported {
                node_id: self.node_id.clone(),
                tag: self.kind.tag().to_string(),
                interaction: name,
            }),
        }
    }

    pub fn outline(&self, show_events: bool) -> Outline<'_> {
        Outline {
            widget: self,
            show_events,
        }
    }
}

/// Structural equality: the outlet is not part of a widget's identity.
impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id
            && self.kind == other.kind
            && self.gate == other.gate
            && self.children == other.children
    }
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.outline(true), f)
    }
}

/// Indented text rendering of a widget tree, one widget per line.
pub struct Outline<'a> {
    widget: &'a Widget,
    show_events: bool,
}

impl Outline<'_> {
    fn write_widget(&self, f: &mut fmt::Formatter<'_>, widget: &Widget, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match widget.kind() {
            WidgetKind::Unknown(unknown) => write!(f, "Unknown: {} #{}", unknown.tag, widget.node_id)?,
            kind => {
                write!(f, "{} #{}", kind.tag(), widget.node_id)?;
                let summary = kind.describe();
                if !summary.is_empty() {
                    write!(f, " {summary}")?;
                }
            }
        }
        if self.show_events && !widget.gate.is_empty() {
            let events: Vec<&str> = widget.gate.open_events().collect();
            write!(f, " [{}]", events.join(", "))?;
        }
        writeln!(f)?;
        for child in &widget.children {
            self.write_widget(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_widget(f, self.widget, 0)
    }
}
