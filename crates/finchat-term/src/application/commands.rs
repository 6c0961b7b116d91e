use std::io::Write;

use anyhow::Result;
use chrono::Local;
use clap_complete::Shell;

use super::cli;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AssistantClient;
use crate::domain::models::AssistantQuestion;
use crate::domain::services::SessionStore;

const TITLE_WIDTH: usize = 48;

/// Asks a single question and prints the answer followed by numbered sources.
/// Nothing is persisted.
pub async fn ask(
    client: &dyn AssistantClient,
    question: &str,
    out: &mut impl Write,
) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("Question is empty");
    }

    tracing::info!(chars = question.len(), "one-shot question");
    let answer = client
        .ask(AssistantQuestion {
            question: question.to_string(),
        })
        .await?;

    writeln!(out, "{}", answer.answer)?;
    if !answer.sources.is_empty() {
        writeln!(out)?;
        writeln!(out, "Sources:")?;
        for (idx, source) in answer.sources.iter().enumerate() {
            writeln!(out, "[{}] {source}", idx + 1)?;
        }
    }

    return Ok(());
}

pub fn list_sessions(store: &SessionStore, out: &mut impl Write) -> Result<()> {
    if store.sessions().is_empty() {
        writeln!(out, "No saved chats.")?;
        return Ok(());
    }

    for session in store.sessions() {
        writeln!(
            out,
            "{}  {}  {:>3} msgs  {}",
            session.id,
            session.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            session.messages.len(),
            session.title(TITLE_WIDTH)
        )?;
    }

    return Ok(());
}

pub fn clear_sessions(store: &mut SessionStore, out: &mut impl Write) -> Result<()> {
    let count = store.sessions().len();
    store.clear_all();
    writeln!(out, "Removed {count} saved chat(s).")?;

    return Ok(());
}

pub fn print_default_config(out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", Config::serialize_default(cli::build()))?;
    return Ok(());
}

pub fn print_config_path(out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", Config::get(ConfigKey::ConfigFile))?;
    return Ok(());
}

pub fn print_completions(shell: Shell, out: &mut impl Write) {
    let mut cmd = cli::build();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}
