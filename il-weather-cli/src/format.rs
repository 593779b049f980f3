use il_weather_core::{HistoryEntry, LookupState, Settlement, WeatherRecord};

pub const EMPTY_HISTORY: &str = "אין חיפושים בהיסטוריה עדיין";

/// Emoji for a provider condition text.
pub fn condition_emoji(condition: &str) -> &'static str {
    const RULES: &[(&[&str], &str)] = &[
        (&["sunny", "clear"], "☀️"),
        (&["cloud"], "☁️"),
        (&["rain", "drizzle"], "🌧️"),
        (&["thunder", "storm"], "⛈️"),
        (&["snow"], "❄️"),
        (&["fog", "mist"], "🌫️"),
        (&["wind"], "💨"),
        (&["hail"], "🌨️"),
        (&["overcast"], "🌥️"),
        (&["partly"], "⛅"),
        (&["night"], "🌙"),
    ];

    let lower = condition.to_lowercase();
    RULES
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| lower.contains(m)))
        .map(|(_, emoji)| *emoji)
        .unwrap_or("🌤️")
}

pub fn format_weather(record: &WeatherRecord) -> String {
    format!(
        "{} {}\n\
         🌍 מדינה: {}\n\
         🏙️ עיר: {}\n\
         🌡️ טמפרטורה: {:.1}° C\n\
         💨 מהירות רוח: {:.1} kph\n",
        condition_emoji(&record.condition),
        record.condition,
        record.country,
        record.city,
        record.temperature_c,
        record.wind_kph,
    )
}

pub fn format_state(state: &LookupState) -> String {
    match state {
        LookupState::Idle => String::new(),
        LookupState::Loading { .. } => "טוען...\n".to_string(),
        LookupState::Success(record) => format_weather(record),
        LookupState::Error(message) => format!("{message}\n"),
    }
}

pub fn format_settlements(settlements: &[Settlement]) -> String {
    let width = settlements.iter().map(|s| s.resolver_key.chars().count()).max().unwrap_or(0);

    let mut output = String::new();
    for s in settlements {
        output.push_str(&format!("{:<width$}  {}\n", s.resolver_key, s.display_name));
    }
    output
}

pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return format!("{EMPTY_HISTORY}\n");
    }

    let mut output = String::from("⏰ זמן החיפוש | 🏙️ שם היישוב | 🌍 שם המדינה\n");
    for entry in entries {
        output.push_str(&format!(
            "{} | {} ({}) | {}\n",
            entry.timestamp,
            entry.display_name,
            entry.resolver_key,
            entry.country.as_deref().unwrap_or("Israel"),
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WeatherRecord {
        WeatherRecord {
            country: "Israel".into(),
            city: "Eilat".into(),
            temperature_c: 31.04,
            condition: "Sunny".into(),
            wind_kph: 7.26,
            icon: String::new(),
        }
    }

    #[test]
    fn emoji_follows_rule_order() {
        assert_eq!(condition_emoji("Clear"), "☀️");
        assert_eq!(condition_emoji("Partly cloudy"), "☁️");
        assert_eq!(condition_emoji("Patchy light drizzle"), "🌧️");
        assert_eq!(condition_emoji("Thundery outbreaks possible"), "⛈️");
        assert_eq!(condition_emoji("Mist"), "🌫️");
        assert_eq!(condition_emoji("Overcast"), "🌥️");
        assert_eq!(condition_emoji("Something else"), "🌤️");
    }

    #[test]
    fn weather_panel_rounds_to_one_decimal() {
        let text = format_weather(&record());

        assert!(text.starts_with("☀️ Sunny"));
        assert!(text.contains("טמפרטורה: 31.0° C"));
        assert!(text.contains("מהירות רוח: 7.3 kph"));
    }

    #[test]
    fn idle_state_prints_nothing() {
        assert_eq!(format_state(&LookupState::Idle), "");
    }

    #[test]
    fn loading_state_prints_placeholder() {
        let state = LookupState::Loading { key: "Haifa".into() };
        assert_eq!(format_state(&state), "טוען...\n");
    }

    #[test]
    fn history_defaults_country_to_israel() {
        let entries = vec![HistoryEntry {
            resolver_key: "Akko".into(),
            display_name: "עכו".into(),
            temperature_c: None,
            condition: None,
            timestamp: "3.4.2026, 12:00:00".into(),
            country: None,
        }];

        assert_eq!(format_history(&entries).lines().nth(1), Some("3.4.2026, 12:00:00 | עכו (Akko) | Israel"));
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(format_history(&[]), format!("{EMPTY_HISTORY}\n"));
    }
}
