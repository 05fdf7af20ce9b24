//! Root controller: owns the latest tree and the widgets rendered from it.

use crate::dispatch::DispatchEngine;
use crate::widget::{InteractError, Interaction, Outcome, Outlet, Widget};
use shared::{UINode, count_nodes, duplicate_ids};
use std::fmt;

/// What the root shows right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    /// No tree has arrived yet.
    Connecting,
    Ready(&'a Widget),
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Connecting => writeln!(f, "Connecting..."),
            View::Ready(root) => fmt::Display::fmt(root, f),
        }
    }
}

pub struct App {
    engine: DispatchEngine,
    outlet: Outlet,
    current_tree: Option<UINode>,
    root: Option<Widget>,
}

impl App {
    pub fn new(outlet: Outlet) -> Self {
        Self::with_engine(DispatchEngine::new(), outlet)
    }

    pub fn with_engine(engine: DispatchEngine, outlet: Outlet) -> Self {
        Self {
            engine,
            outlet,
            current_tree: None,
            root: None,
        }
    }

    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    /// Replaces the whole tree and re-renders from the root. Widget-local
    /// state from the previous tree does not survive.
    pub fn apply_tree(&mut self, tree: UINode) {
        let duplicates = duplicate_ids(&tree);
        if !duplicates.is_empty() {
            log::warn!(
                "Tree '{}' repeats node ids {:?}; interactions go to the first match",
                tree.id,
                duplicates
            );
        }
        log::debug!("Applying tree '{}' with {} nodes", tree.id, count_nodes(&tree));

        self.root = Some(self.engine.render(&tree, &self.outlet));
        self.current_tree = Some(tree);
    }

    pub fn current_tree(&self) -> Option<&UINode> {
        self.current_tree.as_ref()
    }

    pub fn root(&self) -> Option<&Widget> {
        self.root.as_ref()
    }

    pub fn view(&self) -> View<'_> {
        match &self.root {
            Some(root) => View::Ready(root),
            None => View::Connecting,
        }
    }

    /// Routes an interaction to the widget bound to `node_id` in the current
    /// view. Hidden children (inactive tabs, closed expanders) are not bound.
    pub fn interact(&mut self, node_id: &str, interaction: Interaction) -> Result<Outcome, InteractError> {
        let root = self.root.as_mut().ok_or(InteractError::NoTree)?;
        let widget = root
            .find_mut(node_id)
            .ok_or_else(|| InteractError::UnknownNode(node_id.to_string()))?;
        widget.interact(interaction)
    }
}
