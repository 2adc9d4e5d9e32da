use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tickle::{handler, tui, ui, App, ChatClient, Config};

#[derive(Parser)]
#[command(name = "tickle")]
#[command(about = "Chat with the Tickle task assistant from your terminal")]
#[command(version)]
struct Cli {
    /// Chat endpoint, overrides the config file
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Config file (default: <config dir>/tickle/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = Some(endpoint);
    }

    // Logs go to a file so they never draw over the UI
    init_logging(&config)?;

    let client = ChatClient::new(config.endpoint(), config.request_timeout())?;
    info!(endpoint = client.endpoint(), "starting tickle");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, App::new(client)).await;
    tui::restore()?;

    result
}

async fn run(terminal: &mut tui::Tui, mut app: App) -> Result<()> {
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event);
        }
        app.poll_pending().await;
    }

    info!(messages = app.conversation.messages().len(), "exiting");
    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let log_file = config.open_log_file()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tickle=info"));
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Ok(())
}
