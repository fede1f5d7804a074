//! Settings sync against the external key-value store
//!
//! The store owns the only state that survives across sessions:
//! `{volume, timer, scene, mode}`. It is reached over HTTP
//! (`GET`/`POST /api/settings/{user_id}`, both answering
//! `{success, settings?}`). Failures never surface to the user: a failed load
//! leaves defaults in effect, a failed save is dropped. Both are logged.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_state::EndAction;
use crate::scenes::SceneId;

/// The persisted settings tuple, in the store's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    pub volume: u8,
    /// Sleep-timer duration, minutes
    pub timer: u32,
    pub scene: SceneId,
    pub mode: EndAction,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    success: bool,
    settings: Option<UserSettings>,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    success: bool,
}

/// Seam between the core and whatever holds the settings. The production
/// implementation is HTTP; tests substitute an in-memory store.
pub trait SettingsStore: Send + Sync {
    /// Fetch stored settings. `Ok(None)` means the store answered but has
    /// nothing for this user.
    fn load(&self, user_id: i64) -> Result<Option<UserSettings>>;

    /// Persist settings. Returns whether the store acknowledged the save.
    fn save(&self, user_id: i64, settings: &UserSettings) -> Result<bool>;
}

/// Settings store reached over the host backend's HTTP endpoint.
pub struct HttpSettingsStore {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSettingsStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build settings HTTP client")?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, user_id: i64) -> String {
        format!("{}/api/settings/{}", self.base_url, user_id)
    }
}

impl SettingsStore for HttpSettingsStore {
    fn load(&self, user_id: i64) -> Result<Option<UserSettings>> {
        let url = self.endpoint(user_id);
        let response: LoadResponse = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("GET {} returned an error status", url))?
            .json()
            .context("Failed to decode settings response")?;

        if response.success {
            Ok(response.settings)
        } else {
            log::debug!("settings store has no record for user {}", user_id);
            Ok(None)
        }
    }

    fn save(&self, user_id: i64, settings: &UserSettings) -> Result<bool> {
        let url = self.endpoint(user_id);
        let response: SaveResponse = self
            .client
            .post(&url)
            .json(settings)
            .send()
            .with_context(|| format!("POST {} failed", url))?
            .error_for_status()
            .with_context(|| format!("POST {} returned an error status", url))?
            .json()
            .context("Failed to decode save response")?;

        Ok(response.success)
    }
}
