// NEXUS Entry Point
// Text REPL over one session, with offline collaborators attached.

use anyhow::{Context, Result};
use clap::Parser;
use nexus_core::brain::{CommandPrecedence, Mode, ModeState};
use nexus_core::config::AppConfig;
use nexus_core::dispatcher::FAILURE_REPLY;
use nexus_core::handlers::{OfflineChat, OfflineGenerator, OfflineModeHandler};
use nexus_core::logging::{init_tracing, LogFormat};
use nexus_core::{Dispatcher, SessionHandle};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "nexus", version, about = "NEXUS assistant (text mode)")]
struct Args {
    /// Data directory (overrides NEXUS_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// mode-first or cross-first (overrides NEXUS_COMMAND_PRECEDENCE)
    #[arg(long)]
    precedence: Option<CommandPrecedence>,

    /// pretty, json or bunyan (overrides NEXUS_LOG_FORMAT)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(precedence) = args.precedence {
        config.command_precedence = precedence;
    }
    if let Some(format) = args.log_format {
        config.log_format = format;
    }

    init_tracing(config.log_format)?;

    let paths = config.data_paths();
    paths
        .init()
        .with_context(|| format!("failed to initialize data directory {:?}", paths.root()))?;

    let mut dispatcher = Dispatcher::new(
        ModeState::file(paths.mode_file()),
        Arc::new(OfflineChat::new(config.assistant_name.clone())),
        Arc::new(OfflineGenerator::with_output_dir(paths.projects_dir())),
    )
    .with_precedence(config.command_precedence);
    for mode in Mode::ALL.into_iter().filter(|m| *m != Mode::General) {
        dispatcher = dispatcher.with_handler(mode, Arc::new(OfflineModeHandler::new(mode)));
    }

    let session = SessionHandle::spawn(dispatcher);
    info!(session_id = session.id(), "{} ready", config.assistant_name);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    stdout
        .write_all(format!("{}> ", config.assistant_name).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.eq_ignore_ascii_case("quit") || text.eq_ignore_ascii_case("exit") {
            break;
        }
        if !text.is_empty() {
            match session.process(text).await {
                Ok(reply) => stdout.write_all(format!("{}\n", reply).as_bytes()).await?,
                Err(e) => {
                    error!("Session error: {}", e);
                    stdout.write_all(format!("{}\n", FAILURE_REPLY).as_bytes()).await?;
                }
            }
        }
        stdout
            .write_all(format!("{}> ", config.assistant_name).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    session.shutdown().await?;
    Ok(())
}
