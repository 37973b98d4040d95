use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use translite_config::Config;
use translite_translator::Mode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

pub mod controller;
pub mod events;
pub mod io;
pub mod state;
pub mod ui;


use self::controller::AppController;
use self::state::AppState;

/// Translate selected text through a chain of fallback servers
#[derive(Parser)]
#[command(name = "translite", version)]
struct Cli {
    /// Path to translator_config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Translate once and print the result
    Translate {
        /// Pin a server first (`auto`, `manual:<i>` or an index)
        #[arg(long)]
        mode: Option<Mode>,
        text: Vec<String>,
    },
    /// List configured servers
    Servers,
    /// Probe a server, or the primary when no index is given
    Test { index: Option<usize> },
    /// Interactive shell: each line is a selection, `:` lines are menu commands
    Console,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let filter = init_tracing(cli.debug);

    let config = Config::load(cli.config.as_deref());
    if config.enable_debug_output
        && !cli.debug
        && std::env::var_os("RUST_LOG").is_none()
        && let Err(e) = filter.reload(EnvFilter::new("debug"))
    {
        tracing::warn!("failed to enable debug output: {e}");
    }

    let state = Arc::new(AppState::new(config)?);

    match cli.command.unwrap_or(Command::Console) {
        Command::Translate { mode, text } => {
            let text = text.join(" ");
            let text = text.trim();
            if text.is_empty() {
                anyhow::bail!("nothing to translate");
            }
            if let Some(mode) = mode {
                state.resolver.set_mode(mode)?;
            }

            let outcome = state.resolver.translate(text).await;
            println!("{}", outcome.text);
            eprintln!("[{}]", outcome.source);
        }
        Command::Servers => {
            for endpoint in state.resolver.endpoints() {
                println!(
                    "{:<3} {:<18} {}",
                    endpoint.index, endpoint.display_name, endpoint.url
                );
            }
        }
        Command::Test { index } => {
            let index = index.unwrap_or(0);
            let ok = state.resolver.test_endpoint(index).await?;
            println!("{}", if ok { "reachable" } else { "unreachable" });
            if !ok {
                std::process::exit(1);
            }
        }
        Command::Console => {
            println!("Type text to translate, :servers, :use <i>, :auto, :test [i], :mode or :quit");
            AppController::new(state).run().await?;
        }
    }

    Ok(())
}

/// RUST_LOG wins; otherwise info, or debug when asked for
fn init_tracing(debug: bool) -> reload::Handle<EnvFilter, Registry> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(atty::is(atty::Stream::Stderr))
                .with_writer(std::io::stderr),
        )
        .init();

    handle
}
