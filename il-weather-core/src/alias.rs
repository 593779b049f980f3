//! Redirects for settlements the weather provider does not index directly.
//!
//! The table is consulted with a single exact-match lookup. It is not
//! required to be consistent: `Kfar Saba` and `Raanana` point at each other.

const WEATHER_ALIASES: &[(&str, &str)] = &[
    ("Raanana", "Kfar Saba"),
    ("Petah Tiqwa", "Tel Aviv"),
    ("Hod HaSharon", "Tel Aviv"),
    ("Rishon LeZion", "Tel Aviv"),
    ("Givatayim", "Tel Aviv"),
    ("Ramat Gan", "Tel Aviv"),
    ("Bat Yam", "Tel Aviv"),
    ("Bnei Brak", "Tel Aviv"),
    ("Kfar Saba", "Raanana"),
    ("Herzliya", "Tel Aviv"),
    ("Kiryat Motzkin", "Haifa"),
    ("Kiryat Shmona", "Safed"),
];

/// Name to query the weather provider with on the fallback attempt.
///
/// Returns `key` unchanged when it has no redirect. Never follows more than
/// one hop.
pub fn resolve_weather_query_name(key: &str) -> &str {
    WEATHER_ALIASES
        .iter()
        .find(|(from, _)| *from == key)
        .map(|(_, to)| *to)
        .unwrap_or(key)
}
