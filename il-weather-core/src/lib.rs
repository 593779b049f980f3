//! Core library for the `il-weather` CLI.
//!
//! This crate defines:
//! - The settlement directory (data.gov.il with a built-in fallback)
//! - Alias redirects for settlements the weather provider does not index
//! - Weather lookup with a single alias retry, and the lookup session state
//! - The persisted search history
//! - Configuration handling
//!
//! It is used by `il-weather-cli`, but can also be reused by other front ends.

pub mod alias;
pub mod collate;
pub mod config;
pub mod directory;
pub mod fetcher;
pub mod history;
pub mod model;
pub mod provider;
pub mod session;

pub use alias::resolve_weather_query_name;
pub use config::Config;
pub use directory::{DirectoryClient, fallback_settlements};
pub use fetcher::{WeatherFetcher, WeatherLookupError};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore, clear_confirmed};
pub use model::{HistoryEntry, LookupState, Settlement, WeatherRecord};
pub use provider::{ProviderError, WeatherProvider, provider_from_config};
pub use session::LookupSession;
