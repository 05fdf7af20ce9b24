//! Built-in node types.
//!
//! Each tag has a typed record implementing [`Component`]; `WidgetKind` is the
//! closed set of those records.

pub mod containers;
pub mod data;
pub mod display;
pub mod inputs;
pub mod layout;
pub mod panels;
pub mod selection;

use crate::dispatch::{Component, DispatchEngine};
use crate::widget::{Interaction, Reaction};

/// Placeholder for tags without a registered handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Unknown {
    pub tag: String,
}

macro_rules! widget_kinds {
    ($($variant:ident => $component:ty),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum WidgetKind {
            $($variant($component),)*
            Unknown(Unknown),
        }

        $(
            impl From<$component> for WidgetKind {
                fn from(component: $component) -> Self {
                    WidgetKind::$variant(component)
                }
            }
        )*

        impl WidgetKind {
            pub fn tag(&self) -> &str {
                match self {
                    $(WidgetKind::$variant(_) => <$component as Component>::TAG,)*
                    WidgetKind::Unknown(unknown) => &unknown.tag,
                }
            }

            pub fn describe(&self) -> String {
                match self {
                    $(WidgetKind::$variant(component) => component.describe(),)*
                    WidgetKind::Unknown(unknown) => format!("Unknown: {}", unknown.tag),
                }
            }

            pub(crate) fn react(&mut self, interaction: Interaction) -> Reaction {
                match self {
                    $(WidgetKind::$variant(component) => component.react(interaction),)*
                    WidgetKind::Unknown(_) => Reaction::Unsupported,
                }
            }

            pub(crate) fn on_sent(&mut self, event: &str) {
                match self {
                    $(WidgetKind::$variant(component) => component.on_sent(event),)*
                    WidgetKind::Unknown(_) => {}
                }
            }
        }

        pub(crate) fn register_builtin(engine: &mut DispatchEngine) {
            $(engine.register::<$component>();)*
        }
    };
}

widget_kinds! {
    VStack => layout::VStack,
    HStack => layout::HStack,
    Grid => layout::Grid,
    Columns => layout::Columns,
    Card => layout::Card,
    Theme => layout::Theme,
    Tabs => containers::Tabs,
    Form => containers::Form,
    Expander => containers::Expander,
    Modal => containers::Modal,
    AppShell => containers::AppShell,
    Text => display::Text,
    Heading => display::Heading,
    Markdown => display::Markdown,
    Code => display::Code,
    Json => display::Json,
    Image => display::Image,
    Divider => display::Divider,
    Spacer => display::Spacer,
    Badge => display::Badge,
    Alert => display::Alert,
    Progress => display::Progress,
    Spinner => display::Spinner,
    Metric => display::Metric,
    Chart => display::Chart,
    Icon => display::Icon,
    Button => inputs::Button,
    Link => inputs::Link,
    InputText => inputs::InputText,
    TextArea => inputs::TextArea,
    NumberInput => inputs::NumberInput,
    Slider => inputs::Slider,
    RangeSlider => inputs::RangeSlider,
    Checkbox => inputs::Checkbox,
    Switch => inputs::Switch,
    DateInput => inputs::DateInput,
    ColorPicker => inputs::ColorPicker,
    Select => selection::Select,
    MultiSelect => selection::MultiSelect,
    Radio => selection::Radio,
    Navigation => selection::Navigation,
    DataTable => data::DataTable,
    DataEditor => data::DataEditor,
    Chat => panels::Chat,
    CommandPalette => panels::CommandPalette,
    FileUpload => panels::FileUpload,
}
