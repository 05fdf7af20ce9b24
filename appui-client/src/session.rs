//! The interactive session: one task owns the `App` and serializes tree
//! updates with console commands.

use crate::console::{self, ConsoleCommand};
use anyhow::{Context, Result};
use frontend::upload::{http_client, read_file, upload_file};
use frontend::{
    App, ConnectionAdapter, InteractError, Interaction, Outcome, Outlet, View, WidgetKind,
    socket_url,
};
use shared::UINode;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub origin: String,
    pub page_path: String,
    pub upload_path: String,
    pub show_events: bool,
}

fn print_view(app: &App, show_events: bool) {
    match app.view() {
        View::Connecting => print!("{}", View::Connecting),
        View::Ready(root) => print!("{}", root.outline(show_events)),
    }
}

pub fn describe_outcome(outcome: &Outcome, show_events: bool) -> String {
    match outcome {
        Outcome::Sent(event) if show_events => match serde_json::to_string(event) {
            Ok(json) => format!("sent {json}"),
            Err(_) => format!("sent '{}'", event.event),
        },
        Outcome::Sent(event) => format!("sent '{}'", event.event),
        Outcome::Gated { event } => format!("'{event}' is not enabled for this node"),
        Outcome::Local => "updated".to_string(),
        Outcome::Ignored => "ignored".to_string(),
    }
}

/// Connects to the server and runs until `quit`, end of input, Ctrl-C or the
/// server closing the channel.
pub async fn run_session(options: SessionOptions) -> Result<()> {
    let url = socket_url(&options.origin, &options.page_path);
    log::info!("Connecting to {}", url);

    let (adapter, mut trees) = ConnectionAdapter::new(&url);
    let mut app = App::new(Outlet::new(adapter.channel().clone()));
    let http = http_client()?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    print_view(&app, options.show_events);

    loop {
        tokio::select! {
            tree = trees.recv() => match tree {
                Some(tree) => {
                    app.apply_tree(tree);
                    print_view(&app, options.show_events);
                }
                None => {
                    log::info!("Channel closed");
                    break;
                }
            },
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read console input")? else {
                    break;
                };
                match console::parse(&line) {
                    Ok(Some(command)) => {
                        if !handle_command(&mut app, &adapter, &http, &options, command).await {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{e}"),
                }
            }
            _ = &mut ctrl_c => {
                log::info!("Interrupted");
                break;
            }
        }
    }

    adapter.close();
    Ok(())
}

/// Returns `false` when the session should end.
async fn handle_command(
    app: &mut App,
    adapter: &ConnectionAdapter,
    http: &reqwest::Client,
    options: &SessionOptions,
    command: ConsoleCommand,
) -> bool {
    match command {
        ConsoleCommand::Show => print_view(app, options.show_events),
        ConsoleCommand::Help => println!("{}", console::HELP),
        ConsoleCommand::Quit => return false,
        ConsoleCommand::Navigate(path) => {
            adapter.navigate(&path);
            println!("navigating to {path}");
        }
        ConsoleCommand::Interact {
            node_id,
            interaction,
        } => report(app.interact(&node_id, interaction), options.show_events),
        ConsoleCommand::Upload { node_id, path } => {
            match upload(app, http, options, &node_id, &path).await {
                Ok(outcome) => println!("{}", describe_outcome(&outcome, options.show_events)),
                Err(e) => println!("upload failed: {e:#}"),
            }
        }
    }
    true
}

/// Posts the file only when `node_id` is a rendered FileUpload whose
/// `uploaded` event is open and whose accept filter takes the file.
async fn upload(
    app: &mut App,
    http: &reqwest::Client,
    options: &SessionOptions,
    node_id: &str,
    path: &Path,
) -> Result<Outcome> {
    let root = app.root().ok_or(InteractError::NoTree)?;
    let widget = root
        .find(node_id)
        .ok_or_else(|| InteractError::UnknownNode(node_id.to_string()))?;
    let WidgetKind::FileUpload(target) = widget.kind() else {
        return Err(InteractError::Unsupported {
            node_id: node_id.to_string(),
            tag: widget.tag().to_string(),
            interaction: "upload",
        }
        .into());
    };
    if !widget.gate().is_open("uploaded") {
        return Ok(Outcome::Gated { event: "uploaded" });
    }

    let file = read_file(path).await?;
    if !target.accepts(&file.descriptor) {
        log::debug!("'{}' rejected by accept filter {:?}", file.descriptor.filename, target.accept);
        return Ok(Outcome::Ignored);
    }

    let descriptor = upload_file(http, &options.origin, &options.upload_path, file).await?;
    Ok(app.interact(node_id, Interaction::Upload(descriptor))?)
}

fn report(result: Result<Outcome, InteractError>, show_events: bool) {
    match result {
        Ok(outcome) => println!("{}", describe_outcome(&outcome, show_events)),
        Err(e) => println!("{e}"),
    }
}

/// Renders a tree file once without a server and returns the outline.
pub fn render_file(path: &Path, show_events: bool) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tree file: {}", path.display()))?;
    let tree = UINode::from_json(&content)
        .with_context(|| format!("Failed to parse tree file: {}", path.display()))?;

    let mut app = App::new(Outlet::detached());
    app.apply_tree(tree);
    let outline = match app.view() {
        View::Ready(root) => root.outline(show_events).to_string(),
        View::Connecting => View::Connecting.to_string(),
    };
    Ok(outline)
}
