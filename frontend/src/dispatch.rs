//! Type-tag dispatch from `UINode` to [`Widget`].
//!
//! Every tag maps to a handler that decodes the node's props into a typed
//! component record and renders the visible children through the same engine.
//! Tags without a handler render an `Unknown` placeholder.

use crate::components::{self, Unknown};
use crate::props::Props;
use crate::widget::{Interaction, Outlet, Reaction, Widget, WidgetKind};
use shared::UINode;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

/// Typed record of one node type: decoder, child policy and interaction logic.
pub trait Component: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    const TAG: &'static str;

    /// Never fails; every missing or mistyped prop has a default.
    fn decode(props: &Props<'_>) -> Self;

    /// Children rendered for a node with `count` children. Leaves render none.
    fn visible_children(&self, _count: usize) -> Range<usize> {
        0..0
    }

    fn react(&mut self, _interaction: Interaction) -> Reaction {
        Reaction::Unsupported
    }

    /// Called after an emitted event actually left through the outlet.
    fn on_sent(&mut self, _event: &str) {}

    /// One-line summary used by the text outline.
    fn describe(&self) -> String {
        String::new()
    }
}

pub trait NodeHandler: Send + Sync + 'static {
    fn tag(&self) -> &'static str;
    fn render(&self, node: &UINode, engine: &DispatchEngine, outlet: &Outlet) -> Widget;
}

struct ComponentHandler<C>(PhantomData<fn() -> C>);

impl<C> NodeHandler for ComponentHandler<C>
where
    C: Component + Into<WidgetKind>,
{
    fn tag(&self) -> &'static str {
        C::TAG
    }

    fn render(&self, node: &UINode, engine: &DispatchEngine, outlet: &Outlet) -> Widget {
        let component = C::decode(&Props::of(node));
        let visible = component.visible_children(node.children.len());
        let children = node
            .children
            .get(visible)
            .unwrap_or_default()
            .iter()
            .map(|child| engine.render(child, outlet))
            .collect();
        Widget::new(node, component.into(), children, outlet.clone())
    }
}

pub struct DispatchEngine {
    handlers: HashMap<&'static str, Box<dyn NodeHandler>>,
}

impl DispatchEngine {
    /// Engine with every built-in node type registered.
    pub fn new() -> Self {
        let mut engine = Self::empty();
        components::register_builtin(&mut engine);
        engine
    }

    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C>(&mut self)
    where
        C: Component + Into<WidgetKind>,
    {
        self.register_handler(Box::new(ComponentHandler::<C>(PhantomData)));
    }

    /// Replaces any handler previously registered for the same tag.
    pub fn register_handler(&mut self, handler: Box<dyn NodeHandler>) {
        if self.handlers.insert(handler.tag(), handler).is_some() {
            log::debug!("Replaced node handler registration");
        }
    }

    pub fn handles(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.handlers.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Total over all tags; never panics on malformed props.
    pub fn render(&self, node: &UINode, outlet: &Outlet) -> Widget {
        match self.handlers.get(node.kind.as_str()) {
            Some(handler) => handler.render(node, self, outlet),
            None => {
                log::debug!("No handler for node type '{}' (node '{}')", node.kind, node.id);
                let unknown = Unknown {
                    tag: node.kind.clone(),
                };
                Widget::new(node, WidgetKind::Unknown(unknown), Vec::new(), outlet.clone())
            }
        }
    }
}

impl Default for DispatchEngine {
    fn default() -> Self {
        Self::new()
    }
}
