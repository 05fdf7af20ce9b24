use appui_client::{config, session};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "appui")]
#[command(about = "Terminal client for server-driven UI sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a UI server and drive the session from the console
    Run {
        #[arg(long, short, default_value = config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Server origin, e.g. http://127.0.0.1:8000 (overrides the config file)
        #[arg(long)]
        origin: Option<String>,

        /// Page to open (overrides the config file)
        #[arg(long)]
        path: Option<String>,

        /// Hide the open events of each widget in the outline
        #[arg(long)]
        hide_events: bool,
    },
    /// Render a tree JSON file once and print its outline
    Render {
        file: PathBuf,

        #[arg(long)]
        hide_events: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config: config_path,
            origin,
            path,
            hide_events,
        } => match config::load_config_or_default(&config_path) {
            Ok(file_config) => {
                let options = session::SessionOptions {
                    origin: origin.unwrap_or(file_config.server.origin),
                    page_path: path.unwrap_or(file_config.server.page_path),
                    upload_path: file_config.server.upload_path,
                    show_events: file_config.ui.show_events && !hide_events,
                };
                session::run_session(options).await
            }
            Err(e) => Err(e),
        },
        Commands::Render { file, hide_events } => {
            session::render_file(&file, !hide_events).map(|outline| print!("{outline}"))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(2);
    }
}
