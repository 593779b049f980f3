//! Settlement directory built from the data.gov.il datastore.
//!
//! Upstream records are not strictly typed: the Hebrew and English names show
//! up under several field names. [`HEBREW_NAME_FIELDS`] and
//! [`ENGLISH_NAME_FIELDS`] list the candidates in priority order.

use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{collate::hebrew_cmp, config::DirectoryConfig, model::Settlement, provider::truncate_body};

/// A key-scan rule: the key must contain one marker from every group and none
/// of the excluded markers.
#[derive(Debug, Clone, Copy)]
pub struct KeyScan {
    pub all_of: &'static [&'static [&'static str]],
    pub none_of: &'static [&'static str],
    pub ignore_case: bool,
}

impl KeyScan {
    pub fn matches(&self, key: &str) -> bool {
        let key = if self.ignore_case { key.to_lowercase() } else { key.to_string() };
        self.all_of.iter().all(|group| group.iter().any(|marker| key.contains(marker)))
            && !self.none_of.iter().any(|marker| key.contains(marker))
    }
}

/// Where to look for one logical attribute of a record.
#[derive(Debug, Clone, Copy)]
pub struct FieldCandidates {
    /// Exact field names, tried first and in order.
    pub direct: &'static [&'static str],
    /// Scan rules, tried in order over the record's keys.
    pub scans: &'static [KeyScan],
}

pub const HEBREW_NAME_FIELDS: FieldCandidates = FieldCandidates {
    direct: &["שם יישוב", "כ שם יישוב", "כ_שם_יישוב", "שם_ישוב"],
    scans: &[KeyScan {
        all_of: &[&["שם"], &["יישוב", "ישוב", "עיר"]],
        none_of: &["אנגלית", "לועזי"],
        ignore_case: false,
    }],
};

pub const ENGLISH_NAME_FIELDS: FieldCandidates = FieldCandidates {
    direct: &["שם_יישוב_אנגלית", "שם יישוב אנגלית", "English Name", "שם_ישוב_לועזי"],
    scans: &[
        KeyScan { all_of: &[&["english"]], none_of: &[], ignore_case: true },
        KeyScan { all_of: &[&["name"]], none_of: &[], ignore_case: true },
    ],
};

fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// First non-empty value for the attribute described by `fields`.
pub fn find_field(record: &Map<String, Value>, fields: &FieldCandidates) -> Option<String> {
    let direct = fields.direct.iter().find_map(|name| record.get(*name).and_then(text_value));

    direct.or_else(|| {
        fields.scans.iter().find_map(|scan| {
            record
                .iter()
                .filter(|(key, _)| scan.matches(key))
                .find_map(|(_, value)| text_value(value))
        })
    })
}

/// Turn raw datastore records into a deduplicated, sorted directory.
///
/// Records missing either name are skipped. The first Hebrew name seen for an
/// English key wins.
pub fn normalize_records<'a, I>(records: I) -> Vec<Settlement>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut seen = HashSet::new();
    let mut settlements = Vec::new();

    for record in records {
        let Some(display_name) = find_field(record, &HEBREW_NAME_FIELDS) else {
            continue;
        };
        let Some(resolver_key) = find_field(record, &ENGLISH_NAME_FIELDS) else {
            continue;
        };

        if seen.insert(resolver_key.clone()) {
            settlements.push(Settlement { display_name, resolver_key });
        }
    }

    sort_by_display_name(&mut settlements);
    settlements
}

pub fn sort_by_display_name(settlements: &mut [Settlement]) {
    settlements.sort_by(|a, b| hebrew_cmp(&a.display_name, &b.display_name));
}

const FALLBACK_SETTLEMENTS: &[(&str, &str)] = &[
    ("אילת", "Eilat"),
    ("אשדוד", "Ashdod"),
    ("אשקלון", "Ashkelon"),
    ("באר שבע", "Beersheba"),
    ("בני ברק", "Bnei Brak"),
    ("בת ים", "Bat Yam"),
    ("גבעתיים", "Givatayim"),
    ("הוד השרון", "Hod HaSharon"),
    ("הרצליה", "Herzliya"),
    ("חיפה", "Haifa"),
    ("טבריה", "Tiberias"),
    ("ירושלים", "Jerusalem"),
    ("כפר סבא", "Kfar Saba"),
    ("נהריה", "Nahariya"),
    ("נתניה", "Netanya"),
    ("עכו", "Akko"),
    ("פתח תקווה", "Petah Tiqva"),
    ("צפת", "Safed"),
    ("קריית מוצקין", "Kiryat Motzkin"),
    ("קרית שמונה", "Kiryat Shmona"),
    ("ראשון לציון", "Rishon LeZion"),
    ("רמת גן", "Ramat Gan"),
    ("רעננה", "Raanana"),
    ("תל אביב", "Tel Aviv"),
];

/// Built-in list of major settlements, already in display-name order.
pub fn fallback_settlements() -> Vec<Settlement> {
    FALLBACK_SETTLEMENTS.iter().map(|(name, key)| Settlement::new(*name, *key)).collect()
}

#[derive(Debug, Deserialize)]
struct DatastoreResponse {
    result: Option<DatastoreResult>,
}

#[derive(Debug, Deserialize)]
struct DatastoreResult {
    records: Option<Vec<Value>>,
}

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    url: String,
    resource_id: String,
    limit: u32,
    http: Client,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig) -> Self {
        Self {
            url: config.url.clone(),
            resource_id: config.resource_id.clone(),
            limit: config.limit,
            http: Client::new(),
        }
    }

    async fn fetch_records(&self) -> Result<Vec<Map<String, Value>>> {
        let limit = self.limit.to_string();

        let res = self
            .http
            .get(&self.url)
            .query(&[("resource_id", self.resource_id.as_str()), ("limit", limit.as_str())])
            .send()
            .await
            .context("Failed to send request to the settlement directory")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read settlement directory response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Settlement directory request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: DatastoreResponse =
            serde_json::from_str(&body).context("Failed to parse settlement directory JSON")?;

        let records: Vec<_> = parsed
            .result
            .and_then(|r| r.records)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();

        if records.is_empty() {
            return Err(anyhow!("Settlement directory returned no records"));
        }

        Ok(records)
    }

    /// Load the directory, substituting the built-in list on any failure or
    /// when no record yields a usable settlement.
    pub async fn load_settlements(&self) -> Vec<Settlement> {
        match self.fetch_records().await {
            Ok(records) => {
                let settlements = normalize_records(&records);
                if settlements.is_empty() {
                    tracing::warn!(
                        records = records.len(),
                        "no usable settlements in directory records, using built-in list"
                    );
                    return fallback_settlements();
                }
                tracing::info!(count = settlements.len(), "loaded settlement directory");
                settlements
            }
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(%error, "settlement directory unavailable, using built-in list");
                fallback_settlements()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn direct_fields_take_priority_over_scans() {
        let rec = record(json!({
            "שם עיר ישנה": "ישן",
            "שם יישוב": "חיפה",
            "name": "wrong",
            "English Name": "Haifa",
        }));

        assert_eq!(find_field(&rec, &HEBREW_NAME_FIELDS).as_deref(), Some("חיפה"));
        assert_eq!(find_field(&rec, &ENGLISH_NAME_FIELDS).as_deref(), Some("Haifa"));
    }

    #[test]
    fn scan_finds_unlisted_field_names() {
        let rec = record(json!({
            "_id": 7,
            "שם העיר": "  עכו ",
            "City Name": "Akko",
        }));

        assert_eq!(find_field(&rec, &HEBREW_NAME_FIELDS).as_deref(), Some("עכו"));
        assert_eq!(find_field(&rec, &ENGLISH_NAME_FIELDS).as_deref(), Some("Akko"));
    }

    #[test]
    fn english_marker_scan_beats_generic_name_scan() {
        let rec = record(json!({
            "name_code": "1234",
            "ENGLISH_LABEL": "Safed",
        }));

        assert_eq!(find_field(&rec, &ENGLISH_NAME_FIELDS).as_deref(), Some("Safed"));
    }

    #[test]
    fn hebrew_scan_skips_transliterated_columns() {
        let rec = record(json!({
            "שם_ישוב_לועזי_ישן": "TIBERIAS",
            "שם ישוב עברי": "טבריה",
        }));

        assert_eq!(find_field(&rec, &HEBREW_NAME_FIELDS).as_deref(), Some("טבריה"));
    }

    #[test]
    fn blank_direct_value_falls_through_to_next_candidate() {
        let rec = record(json!({ "שם יישוב": "   ", "כ_שם_יישוב": "צפת" }));
        assert_eq!(find_field(&rec, &HEBREW_NAME_FIELDS).as_deref(), Some("צפת"));
    }

    #[test]
    fn numeric_values_are_stringified_and_containers_ignored() {
        let rec = record(json!({ "שם יישוב": 42, "English Name": ["Eilat"] }));
        assert_eq!(find_field(&rec, &HEBREW_NAME_FIELDS).as_deref(), Some("42"));
        assert_eq!(find_field(&rec, &ENGLISH_NAME_FIELDS), None);
    }

    #[test]
    fn normalize_dedupes_by_english_key_first_wins() {
        let records = vec![
            record(json!({ "שם יישוב": "תל אביב - יפו", "English Name": "Tel Aviv" })),
            record(json!({ "שם יישוב": "תל אביב", "English Name": "Tel Aviv" })),
            record(json!({ "שם יישוב": "אילת", "English Name": "Eilat" })),
        ];

        let settlements = normalize_records(&records);

        assert_eq!(
            settlements,
            vec![Settlement::new("אילת", "Eilat"), Settlement::new("תל אביב - יפו", "Tel Aviv")]
        );
    }

    #[test]
    fn normalize_skips_records_missing_a_name() {
        let records = vec![
            record(json!({ "שם יישוב": "אילת" })),
            record(json!({ "English Name": "Eilat" })),
            record(json!({ "שם יישוב": " ", "English Name": "Nowhere" })),
            record(json!({ "שם_ישוב": "נתניה", "שם_ישוב_לועזי": "Netanya" })),
        ];

        assert_eq!(normalize_records(&records), vec![Settlement::new("נתניה", "Netanya")]);
    }

    #[test]
    fn normalize_of_nothing_is_empty() {
        assert!(normalize_records(&Vec::<Map<String, Value>>::new()).is_empty());
    }

    #[test]
    fn fallback_list_is_sorted_and_unique() {
        let list = fallback_settlements();
        assert_eq!(list.len(), 24);

        let mut sorted = list.clone();
        sort_by_display_name(&mut sorted);
        assert_eq!(sorted, list);

        let keys: HashSet<_> = list.iter().map(|s| s.resolver_key.as_str()).collect();
        assert_eq!(keys.len(), list.len());
    }
}
