use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use finchat_term::application::cli;
use finchat_term::application::cli::Invocation;
use finchat_term::application::commands;
use finchat_term::configuration::Config;
use finchat_term::configuration::ConfigKey;
use finchat_term::domain::services::SessionStore;
use finchat_term::infrastructure::clients::HttpAssistant;
use finchat_term::infrastructure::storage;
use tracing_appender::non_blocking::WorkerGuard;

mod chat_ui;

fn init_logging(log_level: &str) -> Result<WorkerGuard> {
    let data_dir = PathBuf::from(Config::get(ConfigKey::DataDir));
    fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::never(&data_dir, "finchat.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let level = log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();

    return Ok(guard);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse().await?;
    let mut stdout = io::stdout();

    match cli.invocation {
        Invocation::Completions(shell) => {
            commands::print_completions(shell, &mut stdout);
            return Ok(());
        }
        Invocation::ConfigDefault => return commands::print_default_config(&mut stdout),
        Invocation::ConfigPath => return commands::print_config_path(&mut stdout),
        _ => {}
    }

    // Flushes buffered log lines on drop.
    let _guard = init_logging(&cli.log_level)?;
    tracing::info!(invocation = ?cli.invocation, ephemeral = cli.ephemeral, "finchat starting");

    match cli.invocation {
        Invocation::Chat => chat_ui::run(storage::session_storage(cli.ephemeral)).await?,
        Invocation::Ask(question) => {
            let client = HttpAssistant::default();
            commands::ask(&client, &question, &mut stdout).await?;
        }
        Invocation::SessionsList => {
            let store = SessionStore::load(storage::session_storage(cli.ephemeral));
            commands::list_sessions(&store, &mut stdout)?;
        }
        Invocation::SessionsClear => {
            let mut store = SessionStore::load(storage::session_storage(cli.ephemeral));
            commands::clear_sessions(&mut store, &mut stdout)?;
        }
        Invocation::Completions(_) | Invocation::ConfigDefault | Invocation::ConfigPath => {}
    }

    return Ok(());
}
