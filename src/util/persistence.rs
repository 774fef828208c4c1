use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "OnlineKawadiwala";
const APP_NAME: &str = "KawadiClient";

/// Overrides the stored server URL, e.g. for a staging backend.
pub const BASE_URL_ENV: &str = "KAWADI_BASE_URL";

fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Reads the saved settings and applies the environment override on top.
pub fn load_persisted_state() -> PersistedState {
    let mut state = read_state_file().unwrap_or_default();
    if let Ok(base) = std::env::var(BASE_URL_ENV) {
        let base = base.trim();
        if !base.is_empty() {
            debug!(event = "settings.env_override", base_url = base);
            state.settings.base_url = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{base}/")
            };
        }
    }
    state
}

fn read_state_file() -> Option<PersistedState> {
    let path = settings_file()?;
    let data = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => Some(state),
        Err(err) => {
            warn!(event = "settings.parse_failed", path = %path.display(), error = %err);
            None
        }
    }
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = settings_file().ok_or(PersistSaveError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(&path, json)?;
    debug!(event = "settings.saved", path = %path.display());
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("config directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
