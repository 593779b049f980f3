use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use crate::{
    alias::resolve_weather_query_name,
    history::HistoryStore,
    model::{HistoryEntry, WeatherRecord},
    provider::{ProviderError, WeatherProvider},
};

pub const NOT_FOUND_MESSAGE: &str = "לא נמצא מזג אוויר לישוב זה";
pub const UNAVAILABLE_MESSAGE: &str = "שגיאה בטעינת מזג האוויר";

/// No usable weather for a settlement after both attempts.
#[derive(Debug, Error)]
pub enum WeatherLookupError {
    /// The provider answered both attempts with a non-success status.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound { key: String },

    /// An attempt failed without a status answer (transport or decoding).
    #[error("{}", UNAVAILABLE_MESSAGE)]
    Unavailable {
        key: String,
        #[source]
        source: ProviderError,
    },
}

impl WeatherLookupError {
    pub fn key(&self) -> &str {
        match self {
            WeatherLookupError::NotFound { key } | WeatherLookupError::Unavailable { key, .. } => key,
        }
    }
}

/// Looks up current weather for a settlement and records successful lookups.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    provider: Arc<dyn WeatherProvider>,
    history: Arc<dyn HistoryStore>,
}

impl WeatherFetcher {
    pub fn new(provider: Arc<dyn WeatherProvider>, history: Arc<dyn HistoryStore>) -> Self {
        Self { provider, history }
    }

    /// Query with `key` verbatim, then once more with its alias if the
    /// provider answered with a non-success status.
    ///
    /// On success the lookup is appended to the history under the original
    /// `key`, whichever name the provider answered to.
    pub async fn fetch_weather(
        &self,
        key: &str,
        display_name: &str,
    ) -> Result<WeatherRecord, WeatherLookupError> {
        let record = match self.provider.current(key).await {
            Ok(record) => record,
            Err(first) if !first.is_status() => {
                tracing::warn!(key, error = %first, "no weather for settlement");
                return Err(WeatherLookupError::Unavailable { key: key.to_string(), source: first });
            }
            Err(first) => {
                let alias = resolve_weather_query_name(key);
                tracing::debug!(key, alias, error = %first, "first attempt failed, retrying with alias");

                self.provider.current(alias).await.map_err(|err| {
                    tracing::warn!(key, alias, error = %err, "no weather for settlement");
                    if err.is_status() {
                        WeatherLookupError::NotFound { key: key.to_string() }
                    } else {
                        WeatherLookupError::Unavailable { key: key.to_string(), source: err }
                    }
                })?
            }
        };

        let entry = HistoryEntry::from_lookup(key, display_name, &record, Local::now());
        if let Err(err) = self.history.append(entry) {
            let error = format!("{err:#}");
            tracing::warn!(key, %error, "failed to record lookup in history");
        }

        Ok(record)
    }
}
