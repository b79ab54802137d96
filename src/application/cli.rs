#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::help_text;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

pub fn log_path() -> path::PathBuf {
    return std::env::var("WIDGETCHAT_LOG_DIR")
        .map(path::PathBuf::from)
        .unwrap_or_else(|_| {
            return dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("widgetchat");
        })
        .join("debug.log");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for widgetchat")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running widgetchat with environment variable RUST_LOG=widgetchat")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_config(key: ConfigKey, env: &str, help: &str) -> Arg {
    let mut help = help.to_string();
    let default = Config::default(key);
    if !default.is_empty() {
        help = format!("{help} [default: {default}]");
    }

    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env.to_string())
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("widgetchat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("WIDGETCHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            arg_config(
                ConfigKey::Endpoint,
                "WIDGETCHAT_ENDPOINT",
                "Socket.io server URL hosting the assistant backend.",
            )
            .short('e'),
        )
        .arg(arg_config(
            ConfigKey::ReconnectionAttempts,
            "WIDGETCHAT_RECONNECTION_ATTEMPTS",
            "Reconnection attempts made after a connection fails or drops.",
        ))
        .arg(arg_config(
            ConfigKey::ReconnectionDelay,
            "WIDGETCHAT_RECONNECTION_DELAY",
            "Time to wait in milliseconds between reconnection attempts.",
        ))
        .arg(arg_config(
            ConfigKey::TypingTimeout,
            "WIDGETCHAT_TYPING_TIMEOUT",
            "Time in milliseconds without keystrokes before the assistant is told typing stopped.",
        ))
        .arg(arg_config(
            ConfigKey::DeleteSessionTimeout,
            "WIDGETCHAT_DELETE_SESSION_TIMEOUT",
            "Time to wait in milliseconds for the backend to delete a session before giving up.",
        ))
        .arg(arg_config(
            ConfigKey::AssistantId,
            "WIDGETCHAT_ASSISTANT_ID",
            "Name the assistant uses as the sender of typing notifications.",
        ))
        .arg(arg_config(
            ConfigKey::HostOrigin,
            "WIDGETCHAT_HOST_ORIGIN",
            "Origin of the embedding page allowed to exchange cross-frame messages.",
        ))
        .arg(arg_config(
            ConfigKey::MobileBreakpoint,
            "WIDGETCHAT_MOBILE_BREAKPOINT",
            "Widths in pixels at or below this value use the compact layout.",
        ))
        .arg(arg_config(
            ConfigKey::Greeting,
            "WIDGETCHAT_GREETING",
            "First assistant message shown in every new conversation.",
        ))
        .arg(arg_config(
            ConfigKey::QuickReplies,
            "WIDGETCHAT_QUICK_REPLIES",
            "Suggested first messages shown under the greeting, separated by ';'.",
        ));
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
