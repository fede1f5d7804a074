use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::constants::{DEFAULT_TIMER_MINUTES, DEFAULT_VOLUME};
use crate::scenes::SceneId;
use crate::settings::UserSettings;

/// Action taken when the countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndAction {
    /// Alert the user to silence the device; playback continues.
    Mute,
    /// Ask the host platform to terminate the session.
    Exit,
}

/// Application state shared across modules
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppStateInner>>,
}

pub struct AppStateInner {
    /// Currently selected ambient scene
    pub current_scene: SceneId,
    /// Playback volume, percent (0-100)
    pub volume: u8,
    /// Remaining countdown minutes
    pub timer_minutes: u32,
    /// Remaining countdown seconds (0-59)
    pub timer_seconds: u32,
    /// Whether the countdown is running or paused (false = idle)
    pub timer_active: bool,
    /// Whether the countdown is paused; implies timer_active
    pub paused: bool,
    /// What to do when the countdown expires
    pub mode: EndAction,
    /// Whether the guided-breathing overlay is up
    pub breathing_active: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(AppStateInner {
                current_scene: SceneId::Fire,
                volume: DEFAULT_VOLUME,
                timer_minutes: DEFAULT_TIMER_MINUTES,
                timer_seconds: 0,
                timer_active: false,
                paused: false,
                mode: EndAction::Mute,
                breathing_active: false,
            })),
        }
    }

    pub fn lock(&self) -> parking_lot::MutexGuard<'_, AppStateInner> {
        self.inner.lock()
    }

    pub fn current_scene(&self) -> SceneId {
        self.inner.lock().current_scene
    }

    pub fn set_current_scene(&self, scene: SceneId) {
        self.inner.lock().current_scene = scene;
    }

    pub fn volume(&self) -> u8 {
        self.inner.lock().volume
    }

    /// Set the volume percentage; values above 100 are clamped.
    pub fn set_volume(&self, volume: u8) {
        self.inner.lock().volume = volume.min(100);
    }

    pub fn remaining(&self) -> (u32, u32) {
        let state = self.inner.lock();
        (state.timer_minutes, state.timer_seconds)
    }

    pub fn timer_active(&self) -> bool {
        self.inner.lock().timer_active
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().paused
    }

    pub fn mode(&self) -> EndAction {
        self.inner.lock().mode
    }

    pub fn set_mode(&self, mode: EndAction) {
        self.inner.lock().mode = mode;
    }

    pub fn breathing_active(&self) -> bool {
        self.inner.lock().breathing_active
    }

    pub fn set_breathing_active(&self, active: bool) {
        let mut state = self.inner.lock();
        state.breathing_active = active;
        if active {
            log::debug!("breathing overlay engaged");
        } else {
            log::debug!("breathing overlay dismissed");
        }
    }

    /// Snapshot of the persisted settings tuple.
    pub fn settings_snapshot(&self) -> UserSettings {
        let state = self.inner.lock();
        UserSettings {
            volume: state.volume,
            timer: state.timer_minutes,
            scene: state.current_scene,
            mode: state.mode,
        }
    }

    /// Mirror stored settings into the live state. The countdown itself is
    /// untouched when running; callers gate on timer state.
    pub fn apply_settings(&self, settings: &UserSettings) {
        let mut state = self.inner.lock();
        state.volume = settings.volume.min(100);
        state.timer_minutes = settings.timer;
        state.timer_seconds = 0;
        state.current_scene = settings.scene;
        state.mode = settings.mode;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
