// Library interface for the Quietude relaxation core
// The embedding WebView shell wires UI events to QuietudeCore methods and
// implements the view/host adapter traits.

pub mod app_state;
pub mod audio;
pub mod breathing;
pub mod config;
pub mod constants;
pub mod host;
pub mod scenes;
pub mod settings;
pub mod tap_detector;
pub mod ticker;
pub mod timer;

use anyhow::Result;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use app_state::{AppState, EndAction};
use audio::{AudioOutput, AudioService};
use breathing::{BreathingCycle, BreathingEngine, BreathingView};
use config::BreathingConfig;
use constants::{ENTER_BREATHING_TAPS, TAP_WINDOW_MS};
use host::HostBridge;
use scenes::SceneId;
use settings::SettingsStore;
use tap_detector::TapDetector;
use timer::{CountdownTimer, TimerView};

/// Owning controller for the whole mini-app: every UI event funnels through
/// here, mutating the shared state and fanning out to audio, countdown,
/// breathing, and the settings store.
pub struct QuietudeCore {
    pub state: AppState,
    host: Arc<dyn HostBridge>,
    store: Arc<dyn SettingsStore>,
    audio: AudioService,
    timer: CountdownTimer,
    breathing: BreathingEngine,
    enter_taps: Mutex<TapDetector>,
}

impl QuietudeCore {
    pub fn new(
        host: Arc<dyn HostBridge>,
        store: Arc<dyn SettingsStore>,
        output: Arc<dyn AudioOutput>,
        breathing_config: BreathingConfig,
        timer_view: Arc<dyn TimerView>,
        breathing_view: Arc<dyn BreathingView>,
    ) -> Result<Self> {
        let state = AppState::new();
        let audio = AudioService::new(output, state.clone());
        let cycle = BreathingCycle::new(&breathing_config)?;
        let breathing =
            BreathingEngine::new(cycle, state.clone(), audio.clone(), breathing_view);
        let timer = CountdownTimer::new(state.clone(), Arc::clone(&host), timer_view);

        Ok(Self {
            state,
            host,
            store,
            audio,
            timer,
            breathing,
            enter_taps: Mutex::new(TapDetector::new(
                std::time::Duration::from_millis(TAP_WINDOW_MS),
                ENTER_BREATHING_TAPS,
            )),
        })
    }

    /// Startup sequence: mirror stored settings into the live state, start
    /// asset decoding, and tell the host we are ready. The background loop
    /// for the selected scene starts as soon as its decode lands.
    pub fn startup(&self, media_dir: &Path) {
        let user_id = self.host.user_id();
        if user_id != 0 {
            match self.store.load(user_id) {
                Ok(Some(settings)) => {
                    log::info!("loaded settings for user {}", user_id);
                    self.state.apply_settings(&settings);
                }
                Ok(None) => log::info!("no stored settings for user {}, using defaults", user_id),
                Err(e) => log::warn!("settings load failed, using defaults: {:#}", e),
            }
        } else {
            log::debug!("host provided no user identity, skipping settings load");
        }

        let snapshot = self.state.settings_snapshot();
        self.timer.set_minutes(snapshot.timer);
        self.audio.set_volume(f32::from(snapshot.volume) / 100.0);

        self.audio.preload(media_dir);
        self.audio.play_background(snapshot.scene);

        self.host.ready();
        self.host.expand();
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    /// Volume slider moved (0-100).
    pub fn set_volume(&self, percent: u8) {
        self.state.set_volume(percent);
        self.audio
            .set_volume(f32::from(self.state.volume()) / 100.0);
        self.persist_settings();
    }

    /// Timer slider moved. Rejected while the countdown is running or
    /// paused; accepted changes reset the seconds to zero.
    pub fn set_timer_minutes(&self, minutes: u32) {
        if self.state.timer_active() {
            log::warn!("ignoring duration change while the countdown is active");
            return;
        }
        self.timer.set_minutes(minutes);
        self.persist_settings();
    }

    /// Expiry mode button pressed.
    pub fn set_mode(&self, mode: EndAction) {
        self.state.set_mode(mode);
        self.persist_settings();
    }

    /// Scene tile pressed: swap the ambient scene and its background loop.
    pub fn select_scene(&self, scene: SceneId) {
        self.state.set_current_scene(scene);
        if !self.state.breathing_active() {
            self.audio.play_background(scene);
        }
        self.persist_settings();
    }

    /// The start/pause/resume button.
    pub fn toggle_timer(&self) {
        self.timer.toggle();
    }

    /// Tap on the scene animation: plays the scene's tap sound, and a rapid
    /// burst of five opens the breathing overlay.
    pub fn scene_tap(&self) {
        self.scene_tap_at(Instant::now());
    }

    pub fn scene_tap_at(&self, now: Instant) {
        if self.state.breathing_active() {
            return;
        }
        self.audio.play_tap(self.state.current_scene());
        if self.enter_taps.lock().record_at(now) {
            self.breathing.activate();
        }
    }

    /// Tap on the breathing overlay.
    pub fn breathing_tap(&self) {
        self.breathing.tap();
    }

    pub fn breathing_tap_at(&self, now: Instant) {
        self.breathing.tap_at(now);
    }

    /// The overlay's explicit exit control.
    pub fn exit_breathing(&self) {
        self.breathing.deactivate();
    }

    pub fn is_breathing(&self) -> bool {
        self.breathing.is_active()
    }

    /// Access to the countdown engine, mainly for shells that render richer
    /// timer chrome.
    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    /// Push the current settings to the store and echo them to the host, off
    /// the event path. Failures are logged and dropped.
    fn persist_settings(&self) {
        let user_id = self.host.user_id();
        if user_id == 0 {
            return;
        }
        let settings = self.state.settings_snapshot();
        let store = Arc::clone(&self.store);
        let host = Arc::clone(&self.host);

        let spawned = thread::Builder::new()
            .name("settings-save".to_string())
            .spawn(move || match store.save(user_id, &settings) {
                Ok(true) => match serde_json::to_string(&settings) {
                    Ok(json) => host.send_data(&json),
                    Err(e) => log::warn!("failed to encode settings payload: {}", e),
                },
                Ok(false) => log::debug!("settings store rejected save for user {}", user_id),
                Err(e) => log::warn!("settings save failed: {:#}", e),
            });
        if let Err(e) = spawned {
            log::warn!("failed to spawn settings save: {}", e);
        }
    }
}
