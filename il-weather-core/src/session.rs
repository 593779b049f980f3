use crate::{
    fetcher::WeatherFetcher,
    model::{LookupState, Settlement},
};

/// State behind the lookup view: the loaded directory, the current
/// selection and what the result panel shows.
///
/// `finish` borrows the session mutably for the whole lookup, so a newer
/// selection can never be overwritten by an older response.
#[derive(Debug)]
pub struct LookupSession {
    settlements: Vec<Settlement>,
    fetcher: WeatherFetcher,
    selected: Option<String>,
    state: LookupState,
}

impl LookupSession {
    pub fn new(settlements: Vec<Settlement>, fetcher: WeatherFetcher) -> Self {
        Self { settlements, fetcher, selected: None, state: LookupState::Idle }
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    /// Hebrew name for a resolver key, or the key itself when unknown.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.settlements
            .iter()
            .find(|s| s.resolver_key == key)
            .map(|s| s.display_name.as_str())
            .unwrap_or(key)
    }

    /// Find a settlement by resolver key or Hebrew name, ignoring ASCII case
    /// and surrounding whitespace.
    pub fn find(&self, query: &str) -> Option<&Settlement> {
        let query = query.trim();
        self.settlements.iter().find(|s| s.resolver_key.eq_ignore_ascii_case(query)).or_else(
            || self.settlements.iter().find(|s| s.display_name == query),
        )
    }

    /// Select a settlement by resolver key. The panel shows `Loading` until
    /// [`finish`](Self::finish) runs.
    ///
    /// A blank key clears the selection and the panel.
    pub fn begin(&mut self, key: &str) -> &LookupState {
        if key.trim().is_empty() {
            self.selected = None;
            self.state = LookupState::Idle;
        } else {
            self.selected = Some(key.to_string());
            self.state = LookupState::Loading { key: key.to_string() };
        }
        &self.state
    }

    /// Complete a lookup started by [`begin`](Self::begin). Does nothing
    /// unless the panel is loading.
    pub async fn finish(&mut self) -> &LookupState {
        let LookupState::Loading { key } = &self.state else {
            return &self.state;
        };
        let key = key.clone();

        let display_name = self.display_name(&key).to_string();
        self.state = match self.fetcher.fetch_weather(&key, &display_name).await {
            Ok(record) => LookupState::Success(record),
            Err(err) => LookupState::Error(err.to_string()),
        };

        &self.state
    }

    /// `begin` followed by `finish`.
    pub async fn select(&mut self, key: &str) -> &LookupState {
        self.begin(key);
        self.finish().await
    }
}
