//! Composite widgets that keep a little local state (a chat draft, a palette
//! query) or talk to the upload side channel.

use crate::dispatch::Component;
use crate::props::{Props, scalar_text};
use crate::widget::{Interaction, Reaction};
use serde_json::{Value, json};
use shared::FileDescriptor;

// ===== CHAT =====

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn parse(item: &Value) -> Option<Self> {
        let fields = item.as_object()?;
        Some(Self {
            role: fields
                .get("role")
                .and_then(Value::as_str)
                .unwrap_or("user")
                .to_string(),
            content: fields.get("content").and_then(scalar_text)?,
        })
    }
}

/// Transcript plus a draft that lives only in this widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Chat {
    pub messages: Vec<ChatMessage>,
    pub placeholder: String,
    pub draft: String,
}

impl Component for Chat {
    const TAG: &'static str = "Chat";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            messages: props
                .array("messages")
                .iter()
                .filter_map(ChatMessage::parse)
                .collect(),
            placeholder: props.string_or("placeholder", ""),
            draft: String::new(),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Input(text) => {
                self.draft = text;
                Reaction::Local
            }
            Interaction::Submit => {
                let message = self.draft.trim();
                if message.is_empty() {
                    Reaction::Ignored
                } else {
                    Reaction::emit_value("send", Value::String(message.to_string()))
                }
            }
            _ => Reaction::Unsupported,
        }
    }

    fn on_sent(&mut self, event: &str) {
        if event == "send" {
            self.draft.clear();
        }
    }

    fn describe(&self) -> String {
        let mut summary = format!("{} messages", self.messages.len());
        if let Some(last) = self.messages.last() {
            summary.push_str(&format!(", last {}: {:?}", last.role, last.content));
        }
        if !self.draft.is_empty() {
            summary.push_str(&format!(", draft {:?}", self.draft));
        }
        summary
    }
}

// ===== COMMAND PALETTE =====

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: String,
    pub label: String,
}

impl Command {
    fn parse(item: &Value) -> Option<Self> {
        if let Some(id) = scalar_text(item) {
            return Some(Self {
                label: id.clone(),
                id,
            });
        }
        let fields = item.as_object()?;
        let id = fields.get("id").and_then(scalar_text)?;
        let label = fields
            .get("label")
            .and_then(scalar_text)
            .unwrap_or_else(|| id.clone());
        Some(Self { id, label })
    }

    fn matches(&self, query: &str) -> bool {
        self.label.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Searchable command list. The query is local; the open flag is the server's.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandPalette {
    pub open: bool,
    pub commands: Vec<Command>,
    pub placeholder: String,
    pub query: String,
}

impl CommandPalette {
    /// Commands whose label contains the query, ignoring case.
    pub fn filtered(&self) -> Vec<&Command> {
        let query = self.query.trim();
        self.commands
            .iter()
            .filter(|command| command.matches(query))
            .collect()
    }
}

impl Component for CommandPalette {
    const TAG: &'static str = "CommandPalette";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            open: props.bool_or("open", false),
            commands: props
                .array("commands")
                .iter()
                .filter_map(Command::parse)
                .collect(),
            placeholder: props.string_or("placeholder", ""),
            query: String::new(),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Close => Reaction::emit("close"),
            Interaction::Input(_) | Interaction::Choose(_) if !self.open => Reaction::Ignored,
            Interaction::Input(text) => {
                self.query = text;
                Reaction::Local
            }
            Interaction::Choose(index) => match self.filtered().get(index) {
                Some(command) => Reaction::emit_value("select", Value::String(command.id.clone())),
                None => Reaction::Ignored,
            },
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        if !self.open {
            return format!("closed, {} commands", self.commands.len());
        }
        let labels: Vec<&str> = self
            .filtered()
            .into_iter()
            .map(|command| command.label.as_str())
            .collect();
        format!("query {:?}: {}", self.query, labels.join(" | "))
    }
}

// ===== FILE UPLOAD =====

#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub label: String,
    /// Comma-separated patterns: `.ext`, `type/*` or an exact MIME type.
    pub accept: Option<String>,
    pub multiple: bool,
}

impl FileUpload {
    pub fn accepts(&self, file: &FileDescriptor) -> bool {
        let Some(accept) = self.accept.as_deref() else {
            return true;
        };
        let patterns: Vec<String> = accept
            .split(',')
            .map(|pattern| pattern.trim().to_ascii_lowercase())
            .filter(|pattern| !pattern.is_empty())
            .collect();
        if patterns.is_empty() {
            return true;
        }
        let filename = file.filename.to_ascii_lowercase();
        let mime = file.mime.to_ascii_lowercase();
        patterns.iter().any(|pattern| {
            if pattern.starts_with('.') {
                filename.ends_with(pattern.as_str())
            } else if let Some(family) = pattern.strip_suffix("/*") {
                mime.split_once('/').is_some_and(|(kind, _)| kind == family)
            } else {
                mime == *pattern
            }
        })
    }
}

impl Component for FileUpload {
    const TAG: &'static str = "FileUpload";

    fn decode(props: &Props<'_>) -> Self {
        Self {
            label: props.string_or("label", "Upload"),
            accept: props.text("accept"),
            multiple: props.bool_or("multiple", false),
        }
    }

    fn react(&mut self, interaction: Interaction) -> Reaction {
        match interaction {
            Interaction::Upload(file) if self.accepts(&file) => Reaction::emit_value(
                "uploaded",
                json!({"filename": file.filename, "size": file.size, "type": file.mime}),
            ),
            Interaction::Upload(file) => {
                log::debug!("'{}' rejected by accept filter {:?}", file.filename, self.accept);
                Reaction::Ignored
            }
            _ => Reaction::Unsupported,
        }
    }

    fn describe(&self) -> String {
        let mut summary = format!("{:?}", self.label);
        if let Some(accept) = &self.accept {
            summary.push_str(&format!(" accept={accept}"));
        }
        if self.multiple {
            summary.push_str(" multiple");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchEngine;
    use crate::widget::{Outcome, Outlet};
    use shared::{ClientEvent, UINode};
    use tokio::sync::mpsc;

    fn decode<C: Component>(props: Value) -> C {
        let node = UINode::new("n", C::TAG).with_props(props);
        C::decode(&Props::of(&node))
    }

    fn descriptor(filename: &str, mime: &str) -> FileDescriptor {
        FileDescriptor {
            filename: filename.to_string(),
            size: 10,
            mime: mime.to_string(),
        }
    }

    #[test]
    fn test_chat_draft_is_local_until_send() {
        let engine = DispatchEngine::new();
        let (sender, mut sent) = mpsc::unbounded_channel();
        let node = UINode::new("chat", "Chat").with_props(json!({
            "messages": [{"role": "assistant", "content": "Hi"}, {"role": "user"}],
            "events": {"send": true}
        }));
        let mut widget = engine.render(&node, &Outlet::new(sender));

        assert_eq!(widget.interact(Interaction::Input("  hello ".into())).unwrap(), Outcome::Local);
        assert!(sent.try_recv().is_err());

        let outcome = widget.interact(Interaction::Submit).unwrap();
        assert_eq!(outcome, Outcome::Sent(ClientEvent::new("chat", "send", Some(json!("hello")))));
        assert_eq!(sent.try_recv().unwrap().value, Some(json!("hello")));

        match widget.kind() {
            crate::widget::WidgetKind::Chat(chat) => {
                assert!(chat.draft.is_empty());
                assert_eq!(chat.messages.len(), 1);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(widget.interact(Interaction::Submit).unwrap(), Outcome::Ignored);
    }

    #[test]
    fn test_gated_chat_keeps_draft() {
        let mut chat = decode::<Chat>(json!({}));
        chat.react(Interaction::Input("later".into()));
        assert_eq!(
            chat.react(Interaction::Submit),
            Reaction::emit_value("send", json!("later"))
        );
        assert_eq!(chat.draft, "later");
    }

    #[test]
    fn test_command_palette_filters_case_insensitively() {
        let mut palette = decode::<CommandPalette>(json!({
            "open": true,
            "commands": ["Open File", {"id": "save", "label": "Save All"}, {"label": "no id"}]
        }));
        assert_eq!(palette.commands.len(), 2);

        assert_eq!(palette.react(Interaction::Input("SAVE".into())), Reaction::Local);
        assert_eq!(palette.filtered().len(), 1);
        assert_eq!(
            palette.react(Interaction::Choose(0)),
            Reaction::emit_value("select", json!("save"))
        );
        assert_eq!(palette.react(Interaction::Choose(1)), Reaction::Ignored);
        assert_eq!(palette.react(Interaction::Close), Reaction::emit("close"));
    }

    #[test]
    fn test_closed_palette_ignores_typing() {
        let mut palette = decode::<CommandPalette>(json!({"commands": ["a"]}));
        assert_eq!(palette.react(Interaction::Input("a".into())), Reaction::Ignored);
        assert_eq!(palette.react(Interaction::Choose(0)), Reaction::Ignored);
        assert!(palette.query.is_empty());
    }

    #[test]
    fn test_file_upload_accept_patterns() {
        let upload = decode::<FileUpload>(json!({"accept": ".CSV, image/*, application/json"}));
        assert!(upload.accepts(&descriptor("data.csv", "text/csv")));
        assert!(upload.accepts(&descriptor("photo.PNG", "image/png")));
        assert!(upload.accepts(&descriptor("x", "application/json")));
        assert!(!upload.accepts(&descriptor("notes.txt", "text/plain")));

        assert!(decode::<FileUpload>(json!({})).accepts(&descriptor("any", "a/b")));
    }

    #[test]
    fn test_file_upload_emits_metadata() {
        let mut upload = decode::<FileUpload>(json!({"accept": ".csv"}));
        assert_eq!(
            upload.react(Interaction::Upload(descriptor("a.csv", "text/csv"))),
            Reaction::emit_value("uploaded", json!({"filename": "a.csv", "size": 10, "type": "text/csv"}))
        );
        assert_eq!(
            upload.react(Interaction::Upload(descriptor("a.txt", "text/plain"))),
            Reaction::Ignored
        );
        assert_eq!(upload.label, "Upload");
    }
}
