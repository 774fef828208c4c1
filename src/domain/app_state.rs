use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::{
    entities::{CategoryOption, ChartData, FlashMessage},
    stats::{StatBoard, StatCard},
};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const MIN_REFRESH_SECS: u64 = 5;

/// Where the server lives and how often the dashboard is refreshed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
    pub dashboard_path: String,
    pub pickup_path: String,
    pub categories_path: String,
    pub refresh_interval_secs: u64,
    pub auto_refresh: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dashboard_path: "customer/".to_string(),
            pickup_path: "request-pickup/".to_string(),
            categories_path: "api/waste-categories/".to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
            auto_refresh: true,
        }
    }
}

impl ClientSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(MIN_REFRESH_SECS))
    }

    /// Builds settings from the raw settings-form inputs.
    pub fn parse(
        base_url: &str,
        dashboard_path: &str,
        pickup_path: &str,
        categories_path: &str,
        refresh_secs: &str,
        auto_refresh: bool,
    ) -> Result<Self, SettingsError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let parsed = Url::parse(&base).map_err(|err| SettingsError::BaseUrl(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::BaseUrl(format!(
                "unsupported scheme `{}`",
                parsed.scheme()
            )));
        }

        let refresh_interval_secs: u64 = refresh_secs
            .trim()
            .parse()
            .map_err(|_| SettingsError::RefreshInterval)?;
        if refresh_interval_secs < MIN_REFRESH_SECS {
            return Err(SettingsError::RefreshInterval);
        }

        Ok(Self {
            base_url: base,
            dashboard_path: normalize_path("dashboard", dashboard_path)?,
            pickup_path: normalize_path("pickup", pickup_path)?,
            categories_path: normalize_path("categories", categories_path)?,
            refresh_interval_secs,
            auto_refresh,
        })
    }
}

/// Paths are joined onto the base URL, so they are kept relative.
fn normalize_path(name: &'static str, raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(SettingsError::EmptyPath(name));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("invalid server URL: {0}")]
    BaseUrl(String),
    #[error("the {0} path must not be empty")]
    EmptyPath(&'static str),
    #[error("refresh interval must be a whole number of seconds, at least {MIN_REFRESH_SECS}")]
    RefreshInterval,
}

/// Data fetched from the server pickup page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickupPageState {
    pub options: Vec<CategoryOption>,
    pub csrf_token: Option<String>,
    pub loaded: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardState {
    pub board: StatBoard,
    pub charts: ChartData,
    pub last_refreshed: Option<SystemTime>,
    pub loaded: bool,
}

impl DashboardState {
    /// A full page load: the board becomes exactly the cards on the page.
    pub fn load(&mut self, cards: Vec<StatCard>, charts: ChartData, fetched_at: SystemTime) {
        self.board = StatBoard::from_cards(cards);
        self.finish(charts, fetched_at);
    }

    /// A background refresh: only cards already on screen are updated. An
    /// empty board is seeded instead.
    pub fn patch(&mut self, cards: Vec<StatCard>, charts: ChartData, fetched_at: SystemTime) {
        if self.board.is_empty() {
            self.board = StatBoard::from_cards(cards);
        } else {
            self.board.apply(cards);
        }
        self.finish(charts, fetched_at);
    }

    fn finish(&mut self, charts: ChartData, fetched_at: SystemTime) {
        self.charts = charts;
        self.last_refreshed = Some(fetched_at);
        self.loaded = true;
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub settings: ClientSettings,
    pub pickup: PickupPageState,
    pub dashboard: DashboardState,
    pub alerts: Vec<FlashMessage>,
}

impl AppState {
    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.settings = persisted.settings;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            settings: self.settings.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub settings: ClientSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::StatKey;

    #[test]
    fn settings_parse_normalizes_paths_and_base() {
        let settings = ClientSettings::parse(
            " https://kawadi.example.com ",
            "/customer/",
            "request-pickup/",
            "/api/waste-categories/",
            "45",
            false,
        )
        .unwrap();
        assert_eq!(settings.base_url, "https://kawadi.example.com/");
        assert_eq!(settings.dashboard_path, "customer/");
        assert_eq!(settings.categories_path, "api/waste-categories/");
        assert_eq!(settings.refresh_interval(), Duration::from_secs(45));
        assert!(!settings.auto_refresh);
    }

    #[test]
    fn settings_parse_rejects_bad_input() {
        assert!(matches!(
            ClientSettings::parse("not a url", "a", "b", "c", "30", true),
            Err(SettingsError::BaseUrl(_))
        ));
        assert!(matches!(
            ClientSettings::parse("ftp://host/", "a", "b", "c", "30", true),
            Err(SettingsError::BaseUrl(_))
        ));
        assert_eq!(
            ClientSettings::parse(DEFAULT_BASE_URL, " / ", "b", "c", "30", true),
            Err(SettingsError::EmptyPath("dashboard"))
        );
        assert_eq!(
            ClientSettings::parse(DEFAULT_BASE_URL, "a", "b", "c", "2", true),
            Err(SettingsError::RefreshInterval)
        );
    }

    #[test]
    fn persisted_state_round_trips_settings() {
        let mut state = AppState::default();
        state.settings.refresh_interval_secs = 60;
        let json = serde_json::to_string(&state.to_persisted()).unwrap();
        let restored: PersistedState = serde_json::from_str(&json).unwrap();
        let mut fresh = AppState::default();
        fresh.apply_persisted(restored);
        assert_eq!(fresh.settings.refresh_interval_secs, 60);
    }

    #[test]
    fn dashboard_patch_seeds_then_updates_by_key() {
        let mut dashboard = DashboardState::default();
        let now = SystemTime::now();
        dashboard.patch(
            vec![
                StatCard { key: StatKey::Primary, inner_html: "1".into() },
                StatCard { key: StatKey::Success, inner_html: "2".into() },
            ],
            ChartData::default(),
            now,
        );
        assert_eq!(dashboard.board.len(), 2);

        dashboard.patch(
            vec![StatCard { key: StatKey::Success, inner_html: "3".into() }],
            ChartData::default(),
            now,
        );
        assert_eq!(dashboard.board.get(StatKey::Primary).unwrap().inner_html, "1");
        assert_eq!(dashboard.board.get(StatKey::Success).unwrap().inner_html, "3");
        assert!(dashboard.loaded);
    }

    #[test]
    fn reload_shows_cards_added_since_the_first_load() {
        let mut dashboard = DashboardState::default();
        let now = SystemTime::now();
        dashboard.load(
            vec![StatCard { key: StatKey::Primary, inner_html: "1".into() }],
            ChartData::default(),
            now,
        );

        dashboard.patch(
            vec![
                StatCard { key: StatKey::Primary, inner_html: "2".into() },
                StatCard { key: StatKey::Warning, inner_html: "pending".into() },
            ],
            ChartData::default(),
            now,
        );
        assert!(dashboard.board.get(StatKey::Warning).is_none());

        dashboard.load(
            vec![
                StatCard { key: StatKey::Primary, inner_html: "3".into() },
                StatCard { key: StatKey::Warning, inner_html: "pending".into() },
            ],
            ChartData::default(),
            now,
        );
        assert_eq!(dashboard.board.len(), 2);
        assert_eq!(dashboard.board.get(StatKey::Warning).unwrap().inner_html, "pending");
        assert_eq!(dashboard.board.get(StatKey::Primary).unwrap().inner_html, "3");
    }
}
