use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::Shell;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// What the binary was asked to do, after configuration is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Chat,
    Ask(String),
    SessionsList,
    SessionsClear,
    ConfigDefault,
    ConfigPath,
    Completions(Shell),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub invocation: Invocation,
    pub log_level: String,
    pub ephemeral: bool,
}

fn arg_backend_url() -> Arg {
    return Arg::new(ConfigKey::BackendURL.to_string())
        .long(ConfigKey::BackendURL.to_string())
        .env("FINCHAT_BACKEND_URL")
        .num_args(1)
        .global(true)
        .help(format!(
            "Base URL of the assistant backend; questions are posted to <URL>/ask [default: {}]",
            Config::default(ConfigKey::BackendURL)
        ));
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .num_args(1)
        .global(true)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ));
}

fn arg_data_dir() -> Arg {
    return Arg::new(ConfigKey::DataDir.to_string())
        .long(ConfigKey::DataDir.to_string())
        .num_args(1)
        .global(true)
        .help(format!(
            "Directory holding saved chats and the log file [default: {}]",
            Config::default(ConfigKey::DataDir)
        ));
}

fn arg_typing_delay() -> Arg {
    return Arg::new(ConfigKey::TypingDelay.to_string())
        .long(ConfigKey::TypingDelay.to_string())
        .num_args(1)
        .global(true)
        .help(format!(
            "Milliseconds between revealed answer characters [default: {}]",
            Config::default(ConfigKey::TypingDelay)
        ));
}

fn arg_request_timeout() -> Arg {
    return Arg::new(ConfigKey::RequestTimeout.to_string())
        .long(ConfigKey::RequestTimeout.to_string())
        .num_args(1)
        .global(true)
        .help(format!(
            "Seconds to wait for the backend to answer [default: {}]",
            Config::default(ConfigKey::RequestTimeout)
        ));
}

fn arg_log_level() -> Arg {
    return Arg::new("log-level")
        .long("log-level")
        .num_args(1)
        .global(true)
        .value_parser(["error", "warn", "info", "debug", "trace"])
        .default_value("info")
        .help("Log level written to finchat.log in the data directory");
}

fn arg_ephemeral() -> Arg {
    return Arg::new("ephemeral")
        .long("ephemeral")
        .action(ArgAction::SetTrue)
        .global(true)
        .help("Keep chats in memory only for this run");
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Ask a single question and print the answer with its sources")
        .arg(
            Arg::new("question")
                .num_args(1..)
                .required(true)
                .help("Question to send"),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage saved chats")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List saved chats, newest first"))
        .subcommand(Command::new("clear").about("Delete every saved chat"));
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file helpers")
        .subcommand_required(true)
        .subcommand(Command::new("default").about("Print a default config.toml"))
        .subcommand(Command::new("path").about("Print the config file path in use"));
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generate shell completions")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .required(true)
                .value_parser(value_parser!(Shell))
                .help("Shell to generate completions for"),
        );
}

pub fn build() -> Command {
    return Command::new("finchat")
        .about("Chat with a financial-information assistant from your terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .arg(arg_backend_url())
        .arg(arg_config_file())
        .arg(arg_data_dir())
        .arg(arg_typing_delay())
        .arg(arg_request_timeout())
        .arg(arg_log_level())
        .arg(arg_ephemeral())
        .subcommand(subcommand_ask())
        .subcommand(subcommand_sessions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_completions());
}

fn invocation(matches: &ArgMatches) -> Invocation {
    match matches.subcommand() {
        Some(("ask", sub)) => {
            let question = sub
                .get_many::<String>("question")
                .map(|words| words.cloned().collect::<Vec<String>>().join(" "))
                .unwrap_or_default();
            return Invocation::Ask(question);
        }
        Some(("sessions", sub)) => match sub.subcommand_name() {
            Some("clear") => return Invocation::SessionsClear,
            _ => return Invocation::SessionsList,
        },
        Some(("config", sub)) => match sub.subcommand_name() {
            Some("path") => return Invocation::ConfigPath,
            _ => return Invocation::ConfigDefault,
        },
        Some(("completions", sub)) => {
            let shell = sub
                .get_one::<Shell>("shell")
                .copied()
                .unwrap_or(Shell::Bash);
            return Invocation::Completions(shell);
        }
        _ => return Invocation::Chat,
    }
}

fn leaf_matches(matches: &ArgMatches) -> Vec<&ArgMatches> {
    let mut all = vec![matches];
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        all.push(sub);
        current = sub;
    }
    return all;
}

/// Parses arguments from `args`, loads configuration, and reports what to run.
pub async fn parse_from<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build().try_get_matches_from(args)?;
    let all_matches = leaf_matches(&matches);

    Config::load(all_matches.clone()).await?;

    let mut log_level = "info".to_string();
    let mut ephemeral = false;
    for sub in all_matches {
        if let Ok(Some(level)) = sub.try_get_one::<String>("log-level") {
            log_level = level.to_string();
        }
        if let Ok(Some(flag)) = sub.try_get_one::<bool>("ephemeral") {
            ephemeral = ephemeral || *flag;
        }
    }

    return Ok(Cli {
        invocation: invocation(&matches),
        log_level,
        ephemeral,
    });
}

pub async fn parse() -> Result<Cli> {
    return parse_from(std::env::args_os()).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        build().debug_assert();
    }

    #[test]
    fn test_defaults_to_chat() {
        let matches = build().try_get_matches_from(["finchat"]).unwrap();
        assert_eq!(invocation(&matches), Invocation::Chat);
    }

    #[test]
    fn test_ask_joins_words() {
        let matches = build()
            .try_get_matches_from(["finchat", "ask", "What", "is", "APR?"])
            .unwrap();
        assert_eq!(invocation(&matches), Invocation::Ask("What is APR?".to_string()));
    }

    #[test]
    fn test_nested_subcommands() {
        let matches = build()
            .try_get_matches_from(["finchat", "sessions", "clear"])
            .unwrap();
        assert_eq!(invocation(&matches), Invocation::SessionsClear);

        let matches = build()
            .try_get_matches_from(["finchat", "config", "path"])
            .unwrap();
        assert_eq!(invocation(&matches), Invocation::ConfigPath);

        let matches = build()
            .try_get_matches_from(["finchat", "completions", "-s", "zsh"])
            .unwrap();
        assert_eq!(invocation(&matches), Invocation::Completions(Shell::Zsh));
    }

    #[test]
    fn test_sessions_requires_subcommand() {
        assert!(build()
            .try_get_matches_from(["finchat", "sessions"])
            .is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = build()
            .try_get_matches_from(["finchat", "ask", "hi", "--ephemeral", "--log-level", "debug"])
            .unwrap();
        let all = leaf_matches(&matches);
        assert_eq!(all.len(), 2);
        assert!(all[1].get_flag("ephemeral"));
        assert_eq!(
            all[1].get_one::<String>("log-level").map(String::as_str),
            Some("debug")
        );
    }
}
