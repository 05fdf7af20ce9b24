//! Line commands typed into a running session.

use anyhow::{Context, Result, bail};
use frontend::Interaction;
use serde_json::Value;
use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  show                              print the current view
  click <id>                        press a button or link
  input <id> <text...>              type text (inputs, chat draft, palette query)
  set <id> <number>                 set a slider or number input
  range <id> <low> <high>           set a range slider
  toggle <id>                       flip a checkbox, switch, expander or sidebar
  choose <id> <index>               pick an option, tab, item or command
  edit <id> <row> <col> <value>     edit a data editor cell (JSON or text)
  submit <id>                       submit a form or send a chat draft
  close <id>                        close a modal or command palette
  upload <id> <path>                upload a file through a file upload widget
  navigate <path>                   switch to another page
  help                              show this help
  quit                              end the session";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Show,
    Interact {
        node_id: String,
        interaction: Interaction,
    },
    Upload {
        node_id: String,
        path: PathBuf,
    },
    Navigate(String),
    Help,
    Quit,
}

/// Splits off the first whitespace-delimited word.
fn next_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim_start())),
        None => Some((text, "")),
    }
}

fn required<'a>(rest: &'a str, what: &str, usage: &str) -> Result<(&'a str, &'a str)> {
    next_word(rest).with_context(|| format!("missing {what}; usage: {usage}"))
}

fn number(word: &str) -> Result<f64> {
    word.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .with_context(|| format!("'{word}' is not a number"))
}

fn index(word: &str) -> Result<usize> {
    word.parse::<usize>()
        .with_context(|| format!("'{word}' is not an index"))
}

/// `None` for a blank line.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>> {
    let Some((name, rest)) = next_word(line) else {
        return Ok(None);
    };

    let interact = |node_id: &str, interaction| ConsoleCommand::Interact {
        node_id: node_id.to_string(),
        interaction,
    };

    let command = match name {
        "show" => ConsoleCommand::Show,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        "click" | "toggle" | "submit" | "close" => {
            let (node_id, _) = required(rest, "node id", &format!("{name} <id>"))?;
            let interaction = match name {
                "click" => Interaction::Click,
                "toggle" => Interaction::Toggle,
                "submit" => Interaction::Submit,
                _ => Interaction::Close,
            };
            interact(node_id, interaction)
        }
        "input" => {
            let (node_id, text) = required(rest, "node id", "input <id> <text...>")?;
            interact(node_id, Interaction::Input(text.to_string()))
        }
        "set" => {
            let usage = "set <id> <number>";
            let (node_id, rest) = required(rest, "node id", usage)?;
            let (value, _) = required(rest, "number", usage)?;
            interact(node_id, Interaction::SetNumber(number(value)?))
        }
        "range" => {
            let usage = "range <id> <low> <high>";
            let (node_id, rest) = required(rest, "node id", usage)?;
            let (low, rest) = required(rest, "low end", usage)?;
            let (high, _) = required(rest, "high end", usage)?;
            interact(
                node_id,
                Interaction::SetRange {
                    min: number(low)?,
                    max: number(high)?,
                },
            )
        }
        "choose" => {
            let usage = "choose <id> <index>";
            let (node_id, rest) = required(rest, "node id", usage)?;
            let (choice, _) = required(rest, "index", usage)?;
            interact(node_id, Interaction::Choose(index(choice)?))
        }
        "edit" => {
            let usage = "edit <id> <row> <col> <value>";
            let (node_id, rest) = required(rest, "node id", usage)?;
            let (row, rest) = required(rest, "row", usage)?;
            let (col, value) = required(rest, "column", usage)?;
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
            interact(
                node_id,
                Interaction::EditCell {
                    row: index(row)?,
                    col: index(col)?,
                    value,
                },
            )
        }
        "upload" => {
            let usage = "upload <id> <path>";
            let (node_id, path) = required(rest, "node id", usage)?;
            if path.is_empty() {
                bail!("missing file path; usage: {usage}");
            }
            ConsoleCommand::Upload {
                node_id: node_id.to_string(),
                path: PathBuf::from(path),
            }
        }
        "navigate" => {
            let (path, _) = required(rest, "path", "navigate <path>")?;
            ConsoleCommand::Navigate(path.to_string())
        }
        other => bail!("unknown command '{other}', type 'help'"),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn interaction(line: &str) -> (String, Interaction) {
        match parse(line).unwrap() {
            Some(ConsoleCommand::Interact { node_id, interaction }) => (node_id, interaction),
            other => panic!("expected an interaction, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_and_simple_commands() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("show").unwrap(), Some(ConsoleCommand::Show));
        assert_eq!(parse("exit").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(interaction("click b"), ("b".to_string(), Interaction::Click));
        assert_eq!(interaction("toggle  x "), ("x".to_string(), Interaction::Toggle));
    }

    #[test]
    fn test_input_keeps_inner_spaces() {
        assert_eq!(
            interaction("input chat hello   there"),
            ("chat".to_string(), Interaction::Input("hello   there".to_string()))
        );
        assert_eq!(interaction("input name").1, Interaction::Input(String::new()));
    }

    #[test]
    fn test_numeric_arguments() {
        assert_eq!(interaction("set s 7").1, Interaction::SetNumber(7.0));
        assert_eq!(
            interaction("range r 8 2").1,
            Interaction::SetRange { min: 8.0, max: 2.0 }
        );
        assert_eq!(interaction("choose tabs 2").1, Interaction::Choose(2));
        assert!(parse("set s seven").is_err());
        assert!(parse("choose tabs -1").is_err());
        assert!(parse("range r 1").is_err());
    }

    #[test]
    fn test_edit_value_json_or_text() {
        assert_eq!(
            interaction("edit grid 0 1 42").1,
            Interaction::EditCell { row: 0, col: 1, value: json!(42) }
        );
        assert_eq!(
            interaction("edit grid 1 0 green apple").1,
            Interaction::EditCell { row: 1, col: 0, value: json!("green apple") }
        );
    }

    #[test]
    fn test_upload_and_navigate() {
        assert_eq!(
            parse("upload files /tmp/a b.csv").unwrap(),
            Some(ConsoleCommand::Upload {
                node_id: "files".to_string(),
                path: PathBuf::from("/tmp/a b.csv"),
            })
        );
        assert!(parse("upload files").is_err());
        assert_eq!(
            parse("navigate settings").unwrap(),
            Some(ConsoleCommand::Navigate("settings".to_string()))
        );
    }

    #[test]
    fn test_unknown_command() {
        let error = parse("dance b").unwrap_err();
        assert!(error.to_string().contains("unknown command 'dance'"));
        assert!(parse("click").is_err());
    }
}
