use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A settlement as shown in the selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Hebrew name shown to the user.
    pub display_name: String,
    /// English name used as the query key against the weather provider.
    pub resolver_key: String,
}

impl Settlement {
    pub fn new(display_name: impl Into<String>, resolver_key: impl Into<String>) -> Self {
        Self { display_name: display_name.into(), resolver_key: resolver_key.into() }
    }
}

/// Current conditions for one location, normalized from the provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub country: String,
    pub city: String,
    pub temperature_c: f64,
    pub condition: String,
    pub wind_kph: f64,
    pub icon: String,
}

/// One past lookup. Field names match the JSON written by the browser app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "settlement")]
    pub resolver_key: String,
    #[serde(rename = "hebrewName")]
    pub display_name: String,
    #[serde(rename = "temperature", default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl HistoryEntry {
    /// Build the entry recorded after a successful lookup of `resolver_key`.
    pub fn from_lookup(
        resolver_key: &str,
        display_name: &str,
        record: &WeatherRecord,
        at: DateTime<Local>,
    ) -> Self {
        Self {
            resolver_key: resolver_key.to_string(),
            display_name: display_name.to_string(),
            temperature_c: Some(record.temperature_c),
            condition: Some(record.condition.clone()),
            timestamp: he_il_timestamp(at),
            country: Some(record.country.clone()),
        }
    }
}

/// Format a local time the way `toLocaleString("he-IL")` does: `19.10.2026, 14:03:05`.
pub fn he_il_timestamp(at: DateTime<Local>) -> String {
    at.format("%-d.%-m.%Y, %H:%M:%S").to_string()
}

/// Progress of the lookup panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Loading { key: String },
    Success(WeatherRecord),
    Error(String),
}

impl LookupState {
    /// The weather currently on display, if any.
    pub fn weather(&self) -> Option<&WeatherRecord> {
        match self {
            LookupState::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LookupState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading { .. })
    }
}
