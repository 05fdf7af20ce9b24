//! Pure layout containers: every child is rendered, in order.

use crate::dispatch::Component;
use crate::props::{Props, format_number, number};
use std::ops::Range;

/// Breakpoints from narrowest to widest.
const BREAKPOINTS: [&str; 6] = ["base", "sm", "md", "lg", "xl", "2xl"];

const DEFAULT_GRID_COLUMNS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct VStack {
    pub gap: f64,
    pub align: String,
    pub justify: String,
}

impl Component for VStack {
    const TAG: &'static str = "VStack";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            gap: props.f64_or("gap", 8.0).max(0.0),
            align: props.string_or("align", "start"),
            justify: props.string_or("justify", "start"),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn describe(&self) -> String {
        format!("gap={} align={} justify={}", format_number(self.gap), self.align, self.justify)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HStack {
    pub gap: f64,
    pub align: String,
    pub justify: String,
}

impl Component for HStack {
    const TAG: &'static str = "HStack";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            gap: props.f64_or("gap", 8.0).max(0.0),
            align: props.string_or("align", "center"),
            justify: props.string_or("justify", "start"),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn describe(&self) -> String {
        format!("gap={} align={} justify={}", format_number(self.gap), self.align, self.justify)
    }
}

/// Fixed column template. A responsive `columns` map collapses to the count of
/// its widest breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub columns: usize,
    pub gap: f64,
}

impl Component for Grid {
    const TAG: &'static str = "Grid";

    fn decode(props: &Props<'_>) -> Self {
        let columns = match props.get("columns") {
            Some(serde_json::Value::Object(by_breakpoint)) => BREAKPOINTS
                .iter()
                .rev()
                .find_map(|breakpoint| by_breakpoint.get(*breakpoint).and_then(number)),
            Some(value) => number(value),
            None => None,
        };
        Self {
            columns: columns
                .map(|count| count.round().max(1.0) as usize)
                .unwrap_or(DEFAULT_GRID_COLUMNS),
            gap: props.f64_or("gap", 8.0).max(0.0),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn describe(&self) -> String {
        format!("columns={} gap={}", self.columns, format_number(self.gap))
    }
}

/// Side-by-side columns with one flex weight per child.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    pub weights: Vec<f64>,
    pub gap: f64,
}

impl Columns {
    /// Share of the row given to column `index`.
    pub fn fraction(&self, index: usize) -> Option<f64> {
        let total: f64 = self.weights.iter().sum();
        self.weights.get(index).map(|weight| weight / total)
    }
}

impl Component for Columns {
    const TAG: &'static str = "Columns";

    fn decode(props: &Props<'_>) -> Self {
        let count = props.child_count();
        let weights: Option<Vec<f64>> = props
            .array("weights")
            .iter()
            .map(|weight| number(weight).filter(|weight| *weight > 0.0))
            .collect();
        let weights = match weights {
            Some(weights) if weights.len() == count => weights,
            _ => vec![1.0; count],
        };
        Self {
            weights,
            gap: props.f64_or("gap", 16.0).max(0.0),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn describe(&self) -> String {
        let weights: Vec<String> = self.weights.iter().copied().map(format_number).collect();
        format!("weights={} gap={}", weights.join(":"), format_number(self.gap))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Component for Card {
    const TAG: &'static str = "Card";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            title: props.text("title"),
            subtitle: props.text("subtitle"),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn describe(&self) -> String {
        match (&self.title, &self.subtitle) {
            (Some(title), Some(subtitle)) => format!("{title:?} / {subtitle:?}"),
            (Some(title), None) => format!("{title:?}"),
            (None, Some(subtitle)) => format!("/ {subtitle:?}"),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

/// Scope that switches the palette for its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub accent: Option<String>,
}

impl Component for Theme {
    const TAG: &'static str = "Theme";

    fn decode(props: &Props<'_>) -> Self {
        let mode = match props.str("mode") {
            Some(mode) if mode.eq_ignore_ascii_case("dark") => ThemeMode::Dark,
            _ => ThemeMode::Light,
        };
        Self {
            mode,
            accent: props.text("accent"),
        }
    }

    fn visible_children(&self, count: usize) -> Range<usize> {
        0..count
    }

    fn describe(&self) -> String {
        let mode = match self.mode {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        match &self.accent {
            Some(accent) => format!("mode={mode} accent={accent}"),
            None => format!("mode={mode}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchEngine;
    use crate::widget::{Outlet, WidgetKind};
    use serde_json::json;
    use shared::UINode;

    fn columns_widget(weights: serde_json::Value, children: usize) -> Columns {
        let node = UINode::new("cols", "Columns")
            .with_props(json!({"weights": weights}))
            .with_children((0..children).map(|i| UINode::new(format!("c{i}"), "Text")).collect());
        Columns::decode(&Props::of(&node))
    }

    #[test]
    fn test_columns_weight_mismatch_is_uniform() {
        let columns = columns_widget(json!([1]), 2);
        assert_eq!(columns.weights, vec![1.0, 1.0]);
        assert_eq!(columns.fraction(0), Some(0.5));
        assert_eq!(columns.fraction(1), Some(0.5));
    }

    #[test]
    fn test_columns_matching_weights_kept() {
        let columns = columns_widget(json!([2, "1"]), 2);
        assert_eq!(columns.weights, vec![2.0, 1.0]);
    }

    #[test]
    fn test_columns_invalid_weight_is_uniform() {
        assert_eq!(columns_widget(json!([2, 0]), 2).weights, vec![1.0, 1.0]);
        assert_eq!(columns_widget(json!([2, "x"]), 2).weights, vec![1.0, 1.0]);
    }

    #[test]
    fn test_columns_render_both_children() {
        let engine = DispatchEngine::new();
        let node = UINode::new("cols", "Columns")
            .with_props(json!({"weights": [1]}))
            .with_children(vec![UINode::new("a", "Text"), UINode::new("b", "Text")]);

        let widget = engine.render(&node, &Outlet::detached());
        assert_eq!(widget.node_ids(), vec!["cols", "a", "b"]);
        match widget.kind() {
            WidgetKind::Columns(columns) => assert_eq!(columns.fraction(0), columns.fraction(1)),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_grid_uses_widest_breakpoint() {
        let node = UINode::new("g", "Grid").with_props(json!({"columns": {"base": 1, "md": 2, "lg": 4}}));
        assert_eq!(Grid::decode(&Props::of(&node)).columns, 4);

        let node = UINode::new("g", "Grid").with_props(json!({"columns": 3}));
        assert_eq!(Grid::decode(&Props::of(&node)).columns, 3);

        let node = UINode::new("g", "Grid").with_props(json!({"columns": 0}));
        assert_eq!(Grid::decode(&Props::of(&node)).columns, 1);

        assert_eq!(Grid::decode(&Props::empty()).columns, DEFAULT_GRID_COLUMNS);
    }

    #[test]
    fn test_stack_defaults() {
        let vstack = VStack::decode(&Props::empty());
        assert_eq!((vstack.gap, vstack.align.as_str()), (8.0, "start"));

        let hstack = HStack::decode(&Props::empty());
        assert_eq!((hstack.gap, hstack.align.as_str()), (8.0, "center"));
    }

    #[test]
    fn test_theme_mode() {
        let node = UINode::new("t", "Theme").with_props(json!({"mode": "Dark"}));
        assert_eq!(Theme::decode(&Props::of(&node)).mode, ThemeMode::Dark);
        assert_eq!(Theme::decode(&Props::empty()).mode, ThemeMode::Light);
    }
}
