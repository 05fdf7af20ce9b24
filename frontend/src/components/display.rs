//! Read-only leaves. None of these react to interactions.

use crate::dispatch::Component;
use crate::props::{Props, display_text, format_number};
use serde_json::{Map, Value};

/// Icon names with a built-in glyph; anything else renders as a blank square.
pub const KNOWN_ICONS: [&str; 7] = [
    "home",
    "chart",
    "widgets",
    "chat",
    "settings",
    "arrow-left",
    "arrow-right",
];

/// Summaries longer than this are cut in the outline.
const SUMMARY_LIMIT: usize = 48;

fn excerpt(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let mut short: String = first_line.chars().take(SUMMARY_LIMIT).collect();
    if short.len() < text.len() {
        short.push('…');
    }
    format!("{short:?}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
}

impl Component for Text {
    const TAG: &'static str = "Text";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            text: props.string_or("text", ""),
        }
    }

    fn describe(&self) -> String {
        format!("{:?}", self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub text: String,
    /// Always within `1..=6`.
    pub level: u8,
}

impl Component for Heading {
    const TAG: &'static str = "Heading";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            text: props.string_or("text", ""),
            level: props.f64_or("level", 1.0).round().clamp(1.0, 6.0) as u8,
        }
    }

    fn describe(&self) -> String {
        format!("h{} {:?}", self.level, self.text)
    }
}

/// Markdown source, rendered by whatever surface displays the widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Markdown {
    pub content: String,
}

impl Component for Markdown {
    const TAG: &'static str = "Markdown";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            content: props.string_or("content", ""),
        }
    }

    fn describe(&self) -> String {
        excerpt(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub code: String,
    pub language: Option<String>,
}

impl Component for Code {
    const TAG: &'static str = "Code";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            code: props.string_or("code", ""),
            language: props.text("language"),
        }
    }

    fn describe(&self) -> String {
        let lines = self.code.lines().count();
        match &self.language {
            Some(language) => format!("{language}, {lines} lines"),
            None => format!("{lines} lines"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Json {
    pub data: Value,
}

impl Json {
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| self.data.to_string())
    }
}

impl Component for Json {
    const TAG: &'static str = "Json";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            data: props.get("data").cloned().unwrap_or(Value::Null),
        }
    }

    fn describe(&self) -> String {
        excerpt(&self.data.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub width: Option<f64>,
}

impl Component for Image {
    const TAG: &'static str = "Image";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            src: props.string_or("src", ""),
            alt: props.string_or("alt", ""),
            width: props.f64("width").filter(|width| *width > 0.0),
        }
    }

    fn describe(&self) -> String {
        match self.width {
            Some(width) => format!("{} ({:?}) width={}", self.src, self.alt, format_number(width)),
            None => format!("{} ({:?})", self.src, self.alt),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Divider;

impl Component for Divider {
    const TAG: &'static str = "Divider";

    fn decode(_props: &Props<'_>) -> Self {
        Divider
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spacer {
    pub size: f64,
}

impl Component for Spacer {
    const TAG: &'static str = "Spacer";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            size: props.f64_or("size", 16.0).max(0.0),
        }
    }

    fn describe(&self) -> String {
        format!("size={}", format_number(self.size))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub text: String,
    pub tone: String,
}

impl Component for Badge {
    const TAG: &'static str = "Badge";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            text: props.string_or("text", ""),
            tone: props.string_or("tone", "neutral"),
        }
    }

    fn describe(&self) -> String {
        format!("{:?} tone={}", self.text, self.tone)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Success,
    Warning,
    Error,
}

impl AlertKind {
    fn parse(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            Some("success") => AlertKind::Success,
            Some("warning") => AlertKind::Warning,
            Some("error") => AlertKind::Error,
            _ => AlertKind::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Success => "success",
            AlertKind::Warning => "warning",
            AlertKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: Option<String>,
    pub message: String,
    pub kind: AlertKind,
}

impl Component for Alert {
    const TAG: &'static str = "Alert";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            title: props.text("title"),
            message: props.string_or("message", ""),
            kind: AlertKind::parse(props.str("kind")),
        }
    }

    fn describe(&self) -> String {
        match &self.title {
            Some(title) => format!("{}: {title:?} {:?}", self.kind.as_str(), self.message),
            None => format!("{}: {:?}", self.kind.as_str(), self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Percentage within `0..=100`.
    pub value: f64,
    pub label: Option<String>,
}

impl Component for Progress {
    const TAG: &'static str = "Progress";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            value: props.f64_or("value", 0.0).clamp(0.0, 100.0),
            label: props.text("label"),
        }
    }

    fn describe(&self) -> String {
        match &self.label {
            Some(label) => format!("{}% {label:?}", format_number(self.value)),
            None => format!("{}%", format_number(self.value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spinner {
    pub label: Option<String>,
}

impl Component for Spinner {
    const TAG: &'static str = "Spinner";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            label: props.text("label"),
        }
    }

    fn describe(&self) -> String {
        self.label
            .as_ref()
            .map(|label| format!("{label:?}"))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

impl Component for Metric {
    const TAG: &'static str = "Metric";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            label: props.string_or("label", ""),
            value: props.get("value").map(display_text).unwrap_or_default(),
            delta: props.get("delta").map(display_text),
        }
    }

    fn describe(&self) -> String {
        match &self.delta {
            Some(delta) => format!("{}: {} ({delta})", self.label, self.value),
            None => format!("{}: {}", self.label, self.value),
        }
    }
}

/// Chart description handed through untouched to the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: String,
    pub params: Map<String, Value>,
}

impl Component for Chart {
    const TAG: &'static str = "Chart";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            kind: props.string_or("kind", "line"),
            params: props.object("params").cloned().unwrap_or_default(),
        }
    }

    fn describe(&self) -> String {
        let mut keys: Vec<&str> = self.params.keys().map(String::as_str).collect();
        keys.sort_unstable();
        format!("{} {{{}}}", self.kind, keys.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub name: String,
    pub size: f64,
}

impl Icon {
    pub fn is_known(&self) -> bool {
        KNOWN_ICONS.contains(&self.name.as_str())
    }
}

impl Component for Icon {
    const TAG: &'static str = "Icon";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            name: props.string_or("name", ""),
            size: props.f64("size").filter(|size| *size > 0.0).unwrap_or(16.0),
        }
    }

    fn describe(&self) -> String {
        let known = if self.is_known() { "" } else { " (blank)" };
        format!("{}{known} size={}", self.name, format_number(self.size))
    }
}
