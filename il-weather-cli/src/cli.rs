use std::{fmt, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use il_weather_core::{
    Config, DirectoryClient, FileHistoryStore, HistoryStore, LookupSession, Settlement,
    WeatherFetcher, clear_confirmed, provider_from_config,
};
use inquire::{Confirm, InquireError, Password, Select};

use crate::format;

const CLEAR_PROMPT: &str = "האם אתה בטוח שברצונך למחוק את ההיסטוריה?";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "il-weather", version, about = "Current weather for Israeli settlements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// List known settlements.
    Settlements {
        /// Only show settlements whose English or Hebrew name contains this text.
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show weather for a settlement.
    Show {
        /// English key or Hebrew name of the settlement.
        settlement: String,
    },

    /// Choose a settlement from the list and show its weather.
    Pick,

    /// Show past lookups, newest first.
    History {
        #[command(subcommand)]
        action: Option<HistoryCommand>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Erase all past lookups.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

struct Choice<'a>(&'a Settlement);

impl fmt::Display for Choice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.display_name, self.0.resolver_key)
    }
}

fn history_store(config: &Config) -> anyhow::Result<FileHistoryStore> {
    Ok(FileHistoryStore::new(config.history_path()?))
}

/// Print the loading line, then the result panel.
async fn show_lookup(session: &mut LookupSession, key: &str) {
    print!("{}", format::format_state(session.begin(key)));
    print!("{}", format::format_state(session.finish().await));
}

/// Whether to erase the history: `--yes`, or the answer to `ask`.
fn confirm_clear<F>(yes: bool, ask: F) -> anyhow::Result<bool>
where
    F: FnOnce() -> Result<bool, InquireError>,
{
    if yes {
        return Ok(true);
    }
    ask().context("Failed to read confirmation")
}

async fn lookup_session(config: &Config) -> anyhow::Result<LookupSession> {
    let provider = provider_from_config(config)?;
    let history = Arc::new(history_store(config)?);
    let settlements = DirectoryClient::new(&config.directory).load_settlements().await;

    Ok(LookupSession::new(settlements, WeatherFetcher::new(provider, history)))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure { api_key } => {
                let api_key = match api_key {
                    Some(key) => key,
                    None => Password::new("WeatherAPI.com API key:")
                        .without_confirmation()
                        .prompt()
                        .context("Failed to read API key")?,
                };

                config.set_api_key(api_key.trim().to_string());
                config.save()?;
                println!("Saved configuration to {}", Config::config_file_path()?.display());
            }
            Command::Settlements { filter } => {
                let settlements = DirectoryClient::new(&config.directory).load_settlements().await;
                let shown: Vec<_> = match filter.as_deref().map(str::trim) {
                    Some(needle) if !needle.is_empty() => {
                        let needle_lower = needle.to_lowercase();
                        settlements
                            .into_iter()
                            .filter(|s| {
                                s.resolver_key.to_lowercase().contains(&needle_lower)
                                    || s.display_name.contains(needle)
                            })
                            .collect()
                    }
                    _ => settlements,
                };
                print!("{}", format::format_settlements(&shown));
            }
            Command::Show { settlement } => {
                let mut session = lookup_session(&config).await?;
                let key = session
                    .find(&settlement)
                    .map(|s| s.resolver_key.clone())
                    .unwrap_or_else(|| settlement.trim().to_string());

                show_lookup(&mut session, &key).await;
            }
            Command::Pick => {
                let mut session = lookup_session(&config).await?;
                let key = {
                    let choices: Vec<_> = session.settlements().iter().map(Choice).collect();
                    let picked = Select::new("בחר יישוב:", choices)
                        .with_page_size(15)
                        .prompt()
                        .context("No settlement selected")?;
                    picked.0.resolver_key.clone()
                };

                show_lookup(&mut session, &key).await;
            }
            Command::History { action: None } => {
                let store = history_store(&config)?;
                print!("{}", format::format_history(&store.read_all()));
            }
            Command::History { action: Some(HistoryCommand::Clear { yes }) } => {
                let store = history_store(&config)?;
                let confirmed = confirm_clear(yes, || {
                    Confirm::new(CLEAR_PROMPT).with_default(false).prompt()
                })?;
                let cleared = clear_confirmed(&store, || confirmed)?;

                if cleared {
                    println!("History cleared.");
                } else {
                    println!("History left unchanged.");
                }
            }
        }

        Ok(())
    }
}
