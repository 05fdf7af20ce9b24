//! Choice controls over a list of options.

use crate::dispatch::Component;
use crate::props::{Props, display_text, scalar_text};
use crate::widget::{Interaction, Reaction};
use serde_json::Value;

/// One choice. A bare scalar option is its own label and value.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

impl SelectOption {
    fn parse(item: &Value) -> Option<Self> {
        match item {
            Value::Object(fields) => {
                let value = fields.get("value").filter(|value| !value.is_null()).cloned();
                let label = fields.get("label").and_then(scalar_text);
                match (label, value) {
                    (Some(label), Some(value)) => Some(Self { label, value }),
                    (Some(label), None) => Some(Self {
                        value: Value::String(label.clone()),
                        label,
                    }),
                    (None, Some(value)) => Some(Self {
                        label: display_text(&value),
                        value,
                    }),
                    (None, None) => None,
                }
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(Self {
                label: display_text(item),
                value: item.clone(),
            }),
            _ => None,
        }
    }
}

/// Options in server order; malformed entries are skipped.
pub fn parse_options(props: &Props<'_>) -> Vec<SelectOption> {
    props
        .array("options")
        .iter()
        .filter_map(SelectOption::parse)
        .collect()
}

fn choose_value(options: &[SelectOption], interaction: Interaction) -> Reaction {
    match interaction {
        Interaction::Choose(index) => match options.get(index) {
            Some(option) => Reaction::emit_value("change", option.value.clone()),
            None => Reaction::Ignored,
        },
        _ => Reaction::Unsupported,
    }
}

fn describe_choices(options: &[SelectOption], is_selected: impl Fn(&Value) -> bool) -> String {
    let labels: Vec<String> = options
        .iter()
        .map(|option| {
            if is_selected(&option.value) {
                format!("*{}", option.label)
            } else {
                option.label.clone()
            }
        })
        .collect();
    labels.join(" | ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub options: Vec<SelectOption>,
    pub value: Option<Value>,
    pub placeholder: String,
}

impl Component for Select {
    const TAG: &'static str = "Select";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            options: parse_options(props),
            value: props.get("value").cloned(),
            placeholder: props.string_or("placeholder", ""),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        choose_value(&self.options, interaction)
    }

    fn describe(&self) -> String {
        let choices = describe_choices(&self.options, |value| self.value.as_ref() == Some(value));
        if self.value.is_none() && !self.placeholder.is_empty() {
            format!("({:?}) {choices}", self.placeholder)
        } else {
            choices
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelect {
    pub options: Vec<SelectOption>,
    pub selected: Vec<Value>,
}

impl MultiSelect {
    pub fn is_selected(&self, value: &Value) -> bool {
        self.selected.contains(value)
    }
}

impl Component for MultiSelect {
    const TAG: &'static str = "MultiSelect";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            options: parse_options(props),
            selected: props
                .array("value")
                .iter()
                .filter(|value| !value.is_null())
                .cloned()
                .collect(),
        }
    }

    /// Emits the whole selection with the chosen option flipped, in option
    /// order.
    fn react(&mut self, interaction: Interaction) -> Reaction {
        let index = match interaction {
            Interaction::Choose(index) => index,
            _ => return Reaction::Unsupported,
        };
        let Some(chosen) = self.options.get(index) else {
            return Reaction::Ignored;
        };
        let selection: Vec<Value> = self
            .options
            .iter()
            .filter(|option| {
                let selected = self.is_selected(&option.value);
                if option.value == chosen.value { !selected } else { selected }
            })
            .map(|option| option.value.clone())
            .collect();
        Reaction::emit_value("change", Value::Array(selection))
    }

    fn describe(&self) -> String {
        describe_choices(&self.options, |value| self.is_selected(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Radio {
    pub options: Vec<SelectOption>,
    pub value: Option<Value>,
}

impl Component for Radio {
    const TAG: &'static str = "Radio";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            options: parse_options(props),
            value: props.get("value").cloned(),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        choose_value(&self.options, interaction)
    }

    fn describe(&self) -> String {
        describe_choices(&self.options, |value| self.value.as_ref() == Some(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub label: String,
    pub path: String,
}

impl NavItem {
    fn parse(item: &Value) -> Option<Self> {
        if let Some(path) = scalar_text(item) {
            return Some(Self {
                label: path.clone(),
                path,
            });
        }
        let fields = item.as_object()?;
        let path = fields.get("path").and_then(scalar_text)?;
        let label = fields
            .get("label")
            .and_then(scalar_text)
            .unwrap_or_else(|| path.clone());
        Some(Self { label, path })
    }
}

/// Route menu. Choosing an item asks the server to switch pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub items: Vec<NavItem>,
    pub active: Option<String>,
}

impl Component for Navigation {
    const TAG: &'static str = "Navigation";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            items: props
                .array("items")
                .iter()
                .filter_map(NavItem::parse)
                .collect(),
            active: props.text("active"),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Choose(index) => match self.items.get(index) {
                Some(item) => Reaction::emit_value("navigate", Value::String(item.path.clone())),
                None => Reaction::Ignored,
            },
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        let items: Vec<String> = self
            .items
            .iter()
            .map(|item| {
                if self.active.as_deref() == Some(item.path.as_str()) {
                    format!("*{} ({})", item.label, item.path)
                } else {
                    format!("{} ({})", item.label, item.path)
                }
            })
            .collect();
        items.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchEngine;
    use crate::widget::{Outcome, Outlet};
    use serde_json::json;
    use shared::{ClientEvent, UINode};
    use tokio::sync::mpsc;

    fn decode<C: Component>(props: Value) -> C {
        let node = UINode::new("n", C::TAG).with_props(props);
        C::decode(&Props::of(&node))
    }

    #[test]
    fn test_options_accept_strings_and_objects() {
        let select = decode::<Select>(json!({"options": [
            "red",
            {"label": "Green", "value": "g"},
            {"label": "Blue"},
            {"value": 3},
            null,
            {}
        ]}));
        let labels: Vec<&str> = select.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["red", "Green", "Blue", "3"]);
        assert_eq!(select.options[1].value, json!("g"));
        assert_eq!(select.options[3].value, json!(3));
    }

    #[test]
    fn test_select_choose_emits_option_value() {
        let engine = DispatchEngine::new();
        let (sender, mut sent) = mpsc::unbounded_channel();
        let node = UINode::new("sel", "Select").with_props(json!({
            "options": [{"label": "One", "value": 1}, {"label": "Two", "value": 2}],
            "events": {"change": true}
        }));
        let mut widget = engine.render(&node, &Outlet::new(sender));

        assert_eq!(
            widget.interact(Interaction::Choose(1)).unwrap(),
            Outcome::Sent(ClientEvent::new("sel", "change", Some(json!(2))))
        );
        assert_eq!(widget.interact(Interaction::Choose(5)).unwrap(), Outcome::Ignored);
        assert_eq!(sent.try_recv().unwrap().value, Some(json!(2)));
        assert!(sent.try_recv().is_err());
    }

    #[test]
    fn test_multi_select_toggles_in_option_order() {
        let mut multi = decode::<MultiSelect>(json!({
            "options": ["a", "b", "c"],
            "value": ["c"]
        }));
        assert_eq!(
            multi.react(Interaction::Choose(0)),
            Reaction::emit_value("change", json!(["a", "c"]))
        );
        assert_eq!(
            multi.react(Interaction::Choose(2)),
            Reaction::emit_value("change", json!([]))
        );
        assert_eq!(multi.selected, vec![json!("c")]);
    }

    #[test]
    fn test_radio_choice() {
        let mut radio = decode::<Radio>(json!({"options": ["S", "M", "L"], "value": "M"}));
        assert_eq!(radio.describe(), "S | *M | L");
        assert_eq!(
            radio.react(Interaction::Choose(2)),
            Reaction::emit_value("change", json!("L"))
        );
    }

    #[test]
    fn test_navigation_emits_path() {
        let mut nav = decode::<Navigation>(json!({
            "items": [{"label": "Home", "path": "home"}, "settings", {"label": "broken"}],
            "active": "home"
        }));
        assert_eq!(nav.items.len(), 2);
        assert_eq!(nav.items[1].label, "settings");
        assert_eq!(
            nav.react(Interaction::Choose(1)),
            Reaction::emit_value("navigate", json!("settings"))
        );
        assert_eq!(nav.react(Interaction::Choose(2)), Reaction::Ignored);
        assert!(nav.describe().starts_with("*Home (home)"));
    }
}
