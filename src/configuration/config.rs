#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

const QUICK_REPLY_SEPARATOR: char = ';';

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    AssistantId,
    ConfigFile,
    DeleteSessionTimeout,
    Endpoint,
    Greeting,
    HostOrigin,
    MobileBreakpoint,
    QuickReplies,
    ReconnectionAttempts,
    ReconnectionDelay,
    TypingTimeout,
}

impl ConfigKey {
    pub fn is_numeric(&self) -> bool {
        return matches!(
            self,
            ConfigKey::DeleteSessionTimeout
                | ConfigKey::MobileBreakpoint
                | ConfigKey::ReconnectionAttempts
                | ConfigKey::ReconnectionDelay
                | ConfigKey::TypingTimeout
        );
    }
}

fn config_file_path() -> path::PathBuf {
    #[cfg(not(target_os = "macos"))]
    let config_dir = dirs::config_dir();
    #[cfg(target_os = "macos")]
    let config_dir = env::var("HOME")
        .ok()
        .map(|home| return path::PathBuf::from(home).join(".config"));

    return config_dir
        .unwrap_or_else(|| return env::temp_dir())
        .join("widgetchat/config.toml");
}

pub fn split_quick_replies(val: &str) -> Vec<String> {
    return val
        .split(QUICK_REPLY_SEPARATOR)
        .map(|reply| return reply.trim().to_string())
        .filter(|reply| return !reply.is_empty())
        .collect();
}

/// Stores a list of quick replies as one value. Entries can't contain the
/// separator, as they would come back split in two.
pub fn join_quick_replies(entries: &[&str]) -> Result<String> {
    if let Some(entry) = entries
        .iter()
        .find(|entry| return entry.contains(QUICK_REPLY_SEPARATOR))
    {
        bail!(format!(
            "Quick reply '{entry}' can't contain '{QUICK_REPLY_SEPARATOR}'"
        ));
    }

    return Ok(entries.join(&QUICK_REPLY_SEPARATOR.to_string()));
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    /// Reads a numeric key, falling back to its default when the stored value
    /// does not parse.
    pub fn get_u64(key: ConfigKey) -> u64 {
        let val = Config::get(key);
        if let Ok(res) = val.parse::<u64>() {
            return res;
        }

        tracing::warn!(key = key.to_string(), val, "invalid numeric config value");
        return Config::default(key).parse::<u64>().unwrap_or_default();
    }

    pub fn quick_replies() -> Vec<String> {
        return split_quick_replies(&Config::get(ConfigKey::QuickReplies));
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let config_path = config_file_path();

        let res = match key {
            ConfigKey::AssistantId => "assistant",
            ConfigKey::DeleteSessionTimeout => "1000",
            ConfigKey::Endpoint => "http://localhost:3000",
            ConfigKey::Greeting => "Hello! I'm your virtual assistant. How can I help you?",
            ConfigKey::HostOrigin => "",
            ConfigKey::MobileBreakpoint => "600",
            ConfigKey::QuickReplies => "I want to design a kitchen;I want to see kitchen options;I need help with purchase & installation",
            ConfigKey::ReconnectionAttempts => "5",
            ConfigKey::ReconnectionDelay => "1000",
            ConfigKey::TypingTimeout => "1000",

            // Special
            ConfigKey::ConfigFile => return config_path.to_string_lossy().to_string(),
        };

        return res.to_string();
    }

    fn validate(key: ConfigKey, val: &str) -> Result<()> {
        if key.is_numeric() && val.parse::<u64>().is_err() {
            bail!(format!(
                "Invalid value for '{key}': {val}\nExpected a non-negative integer"
            ));
        }

        return Ok(());
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Some(arg_config_file) =
                matches.get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for (name, _) in doc.iter() {
                if !cmd.get_arguments().any(|arg| return arg.get_long() == Some(name)) {
                    bail!(format!("config.toml has an unknown key '{name}'"));
                }
            }

            for key in ConfigKey::iter() {
                let Some(val) = doc.get(&key.to_string()) else {
                    continue;
                };

                if let Some(val_int) = val.as_integer() {
                    if val_int < 0 {
                        bail!(format!(
                            "config.toml has an invalid value for key '{key}': {val_int}"
                        ));
                    }
                    Config::set(key, &val_int.to_string());
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }
                    if Config::validate(key, val_str).is_err() {
                        bail!(format!(
                            "config.toml has an invalid value for key '{key}': {val_str}"
                        ));
                    }
                    Config::set(key, val_str);
                } else if let Some(arr) = val.as_array() {
                    if key != ConfigKey::QuickReplies {
                        bail!(format!("config.toml expects a single value for key '{key}'"));
                    }
                    let entries = arr
                        .iter()
                        .map(|e| return e.as_str())
                        .collect::<Option<Vec<&str>>>();
                    let Some(entries) = entries else {
                        bail!(format!("config.toml expects strings for key '{key}'"));
                    };
                    Config::set(key, &join_quick_replies(&entries)?);
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::validate(key, val)?;
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            endpoint = Config::get(ConfigKey::Endpoint),
            reconnection_attempts = Config::get(ConfigKey::ReconnectionAttempts),
            reconnection_delay = Config::get(ConfigKey::ReconnectionDelay),
            typing_timeout = Config::get(ConfigKey::TypingTimeout),
            assistant_id = Config::get(ConfigKey::AssistantId),
            host_origin = Config::get(ConfigKey::HostOrigin),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default()
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let default_val = Config::default(key);
                let val = if default_val.is_empty() {
                    format!("# {key} = \"\"")
                } else if key == ConfigKey::QuickReplies {
                    let replies = default_val
                        .split(QUICK_REPLY_SEPARATOR)
                        .map(|reply| return format!("\"{reply}\""))
                        .collect::<Vec<String>>()
                        .join(", ");
                    format!("{key} = [{replies}]")
                } else if key.is_numeric() {
                    format!("{key} = {default_val}")
                } else {
                    format!("{key} = \"{default_val}\"")
                };

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
