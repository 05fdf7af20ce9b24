//! Containers whose visible children or open state are owned by the server.
//! They never switch locally; a change is requested through an event.

use crate::dispatch::Component;
use crate::props::{Props, number_value};
use crate::widget::{Interaction, Reaction};
use serde_json::Value;
use std::ops::Range;

/// Shows only the child at `active_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabs {
    pub labels: Vec<String>,
    pub active_index: usize,
}

impl Component for Tabs {
    const TAG: &'static str = "Tabs";

    fn decode(props: &Props<'_>) -> Self {
        let count = props.child_count();
        let given = props.string_list("labels");
        let labels = (0..count)
            .map(|index| {
                given
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("Tab {}", index + 1))
            })
            .collect();
        let active_index = props
            .f64("activeIndex")
            .map(|index| index.round().max(0.0) as usize)
            .unwrap_or(0)
            .min(count.saturating_sub(1));
        Self {
            labels,
            active_index,
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        if self.active_index < count {
            self.active_index..self.active_index + 1
        } else {
            0..0
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Choose(index) if index < self.labels.len() => {
                Reaction::emit_value("change", number_value(index as f64))
            }
            Interaction::Choose(_) => Reaction::Ignored,
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        let labels: Vec<String> = self
            .labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                if index == self.active_index {
                    format!("[{label}]")
                } else {
                    label.clone()
                }
            })
            .collect();
        labels.join(" | ")
    }
}

/// Wraps its children and turns a submit into a `submit` event.
#[derive(Debug, Clone, PartialEq)]
pub struct Form;

impl Component for Form {
    const TAG: &'static str = "Form";

    fn decode(_props: &Props<'_>) -> Self {
        Form
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Submit => Reaction::emit("submit"),
            _ => Reaction::Unsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expander {
    pub title: String,
    pub open: bool,
}

impl Component for Expander {
    const TAG: &'static str = "Expander";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            title: props.string_or("title", ""),
            open: props.bool_or("open", false),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        if self.open { 0..count } else { 0..0 }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Toggle => Reaction::emit_value("toggle", Value::Bool(!self.open)),
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        let marker = if self.open { "▾" } else { "▸" };
        format!("{marker} {:?}", self.title)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub title: String,
    pub open: bool,
}

impl Component for Modal {
    const TAG: &'static str = "Modal";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            title: props.string_or("title", ""),
            open: props.bool_or("open", false),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        if self.open { 0..count } else { 0..0 }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Close => Reaction::emit("close"),
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        let state = if self.open { "open" } else { "closed" };
        format!("{:?} ({state})", self.title)
    }
}

/// Application frame with a collapsible sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct AppShell {
    pub title: String,
    pub collapsed: bool,
}

impl Component for AppShell {
    const TAG: &'static str = "AppShell";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            title: props.string_or("title", ""),
            collapsed: props.bool_or("collapsed", false),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Toggle => Reaction::emit_value("toggle", Value::Bool(!self.collapsed)),
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        let sidebar = if self.collapsed { "collapsed" } else { "expanded" };
        format!("{:?} sidebar={sidebar}", self.title)
    }
}
