//! Value controls. They never hold the value locally: every edit becomes a
//! `change` request and the next tree carries the accepted value.

use crate::dispatch::Component;
use crate::props::{Props, format_number, number, number_value, parse_number};
use crate::widget::{Interaction, Reaction};
use serde_json::{Value, json};

/// Number of fractional digits in the shortest spelling of `number`.
fn decimals(number: f64) -> usize {
    let spelled = format!("{number}");
    spelled
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}

/// Rounds to `places` decimals; left as is when the scale overflows.
fn round_to(number: f64, places: usize) -> f64 {
    let scale = 10f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    let scaled = number * scale;
    if !scale.is_finite() || !scaled.is_finite() {
        return number;
    }
    scaled.round() / scale
}

/// `min`, `max` and `step` of a range control. `max` is raised to `min` and a
/// non-positive step falls back to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Bounds {
    fn decode(props: &Props<'_>) -> Self {
        let min = props.f64_or("min", 0.0);
        let max = props.f64_or("max", 100.0).max(min);
        let step = props.f64("step").filter(|step| *step > 0.0).unwrap_or(1.0);
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Both ends clamped, lower end first.
    pub fn ordered(&self, a: f64, b: f64) -> (f64, f64) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Nearest step position counted from `min`, then clamped.
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        let places = decimals(self.step).max(decimals(self.min));
        self.clamp(round_to(self.min + steps * self.step, places))
    }
}

fn change_text(text: String) -> Reaction {
    Reaction::emit_value("change", Value::String(text))
}

fn text_input(interaction: Interaction) -> Reaction {
    match interaction {
        Interaction::Input(text) => change_text(text),
        _ => Reaction::Unsupported,
    }
}

fn click(interaction: Interaction) -> Reaction {
    match interaction {
        Interaction::Click => Reaction::emit("click"),
        _ => Reaction::Unsupported,
    }
}

fn toggle(checked: bool, interaction: Interaction) -> Reaction {
    match interaction {
        Interaction::Toggle => Reaction::emit_value("change", Value::Bool(!checked)),
        _ => Reaction::Unsupported,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub variant: String,
}

impl Component for Button {
    const TAG: &'static str = "Button";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            label: props.string_or("label", ""),
            variant: props.string_or("variant", "primary"),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        click(interaction)
    }

    fn describe(&self) -> String {
        format!("{:?} ({})", self.label, self.variant)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Component for Link {
    const TAG: &'static str = "Link";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            label: props.string_or("label", ""),
            href: props.string_or("href", ""),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        click(interaction)
    }

    fn describe(&self) -> String {
        format!("{:?} -> {}", self.label, self.href)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputText {
    pub value: String,
    pub placeholder: String,
}

impl Component for InputText {
    const TAG: &'static str = "InputText";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            value: props.string_or("value", ""),
            placeholder: props.string_or("placeholder", ""),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        text_input(interaction)
    }

    fn describe(&self) -> String {
        if self.value.is_empty() && !self.placeholder.is_empty() {
            format!("({:?})", self.placeholder)
        } else {
            format!("{:?}", self.value)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextArea {
    pub value: String,
    pub placeholder: String,
    pub rows: usize,
}

impl Component for TextArea {
    const TAG: &'static str = "TextArea";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            value: props.string_or("value", ""),
            placeholder: props.string_or("placeholder", ""),
            rows: props.f64_or("rows", 3.0).round().max(1.0) as usize,
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        text_input(interaction)
    }

    fn describe(&self) -> String {
        format!("{:?} rows={}", self.value, self.rows)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberInput {
    pub value: f64,
    pub step: f64,
}

impl Component for NumberInput {
    const TAG: &'static str = "NumberInput";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            value: props.f64_or("value", 0.0),
            step: props.f64("step").filter(|step| *step > 0.0).unwrap_or(1.0),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        let typed = match interaction {
            Interaction::Input(text) => parse_number(&text),
            Interaction::SetNumber(value) => Some(value).filter(|value| value.is_finite()),
            _ => return Reaction::Unsupported,
        };
        match typed {
            Some(value) => Reaction::emit_value("change", number_value(value)),
            None => Reaction::Ignored,
        }
    }

    fn describe(&self) -> String {
        format!("{} step={}", format_number(self.value), format_number(self.step))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub bounds: Bounds,
    /// Always within the bounds.
    pub value: f64,
}

impl Component for Slider {
    const TAG: &'static str = "Slider";

    fn decode(props: &Props<'_>) -> Self {
        let bounds = Bounds::decode(props);
        Self {
            value: bounds.clamp(props.f64_or("value", bounds.min)),
            bounds,
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::SetNumber(value) if value.is_finite() => {
                Reaction::emit_value("change", number_value(self.bounds.snap(value)))
            }
            Interaction::SetNumber(_) => Reaction::Ignored,
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} in [{}, {}] step={}",
            format_number(self.value),
            format_number(self.bounds.min),
            format_number(self.bounds.max),
            format_number(self.bounds.step)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeSlider {
    pub bounds: Bounds,
    /// Ordered, both ends within the bounds.
    pub low: f64,
    pub high: f64,
}

impl Component for RangeSlider {
    const TAG: &'static str = "RangeSlider";

    fn decode(props: &Props<'_>) -> Self {
        let bounds = Bounds::decode(props);
        let (low, high) = match props.array("value") {
            [low, high, ..] => (
                number(low).unwrap_or(bounds.min),
                number(high).unwrap_or(bounds.max),
            ),
            _ => (bounds.min, bounds.max),
        };
        let (low, high) = bounds.ordered(low, high);
        Self { bounds, low, high }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::SetRange { min, max } if min.is_finite() && max.is_finite() => {
                let (low, high) = self.bounds.ordered(min, max);
                Reaction::emit_value(
                    "change",
                    json!({"min": number_value(low), "max": number_value(high)}),
                )
            }
            Interaction::SetRange { .. } => Reaction::Ignored,
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        format!(
            "[{}, {}] in [{}, {}]",
            format_number(self.low),
            format_number(self.high),
            format_number(self.bounds.min),
            format_number(self.bounds.max)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Checkbox {
    pub label: String,
    pub checked: bool,
}

impl Component for Checkbox {
    const TAG: &'static str = "Checkbox";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            label: props.string_or("label", ""),
            checked: props.bool_or("checked", false),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        toggle(self.checked, interaction)
    }

    fn describe(&self) -> String {
        let mark = if self.checked { "[x]" } else { "[ ]" };
        format!("{mark} {:?}", self.label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub label: String,
    pub checked: bool,
}

impl Component for Switch {
    const TAG: &'static str = "Switch";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            label: props.string_or("label", ""),
            checked: props.bool_or("checked", false),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        toggle(self.checked, interaction)
    }

    fn describe(&self) -> String {
        let state = if self.checked { "on" } else { "off" };
        format!("({state}) {:?}", self.label)
    }
}

/// Date as the server spells it; no calendar validation happens here.
#[derive(Debug, Clone, PartialEq)]
pub struct DateInput {
    pub value: String,
}

impl Component for DateInput {
    const TAG: &'static str = "DateInput";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            value: props.string_or("value", ""),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        text_input(interaction)
    }

    fn describe(&self) -> String {
        format!("{:?}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorPicker {
    pub value: String,
}

impl Component for ColorPicker {
    const TAG: &'static str = "ColorPicker";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            value: props.string_or("value", "#000000"),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        text_input(interaction)
    }

    fn describe(&self) -> String {
        self.value.clone()
    }
}
