use crate::{Config, WeatherRecord, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod weatherapi;

/// Why a single provider request produced no weather.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("weather provider answered with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse weather provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    /// The provider answered, but not with a success status.
    pub fn is_status(&self) -> bool {
        matches!(self, ProviderError::Status { .. })
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a free-text location query.
    async fn current(&self, query: &str) -> Result<WeatherRecord, ProviderError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for WeatherAPI.com.\n\
                 Hint: run `il-weather configure` and enter your API key."
        )
    })?;

    Ok(Arc::new(WeatherApiProvider::with_base_url(
        api_key.to_owned(),
        config.weatherapi.base_url.clone(),
    )))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
