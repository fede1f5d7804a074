use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use quietude::app_state::EndAction;
use quietude::audio::{AudioOutput, DecodedSound};
use quietude::breathing::{BreathingView, ParticleDot};
use quietude::config::BreathingConfig;
use quietude::host::{ColorScheme, HostBridge};
use quietude::scenes::SceneId;
use quietude::settings::{SettingsStore, UserSettings};
use quietude::timer::{TimerAffordance, TimerView};
use quietude::QuietudeCore;

struct RecordingHost {
    user_id: i64,
    readies: AtomicUsize,
    expands: AtomicUsize,
    sent: Mutex<Vec<String>>,
}

impl RecordingHost {
    fn new(user_id: i64) -> Self {
        Self {
            user_id,
            readies: AtomicUsize::new(0),
            expands: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl HostBridge for RecordingHost {
    fn user_id(&self) -> i64 {
        self.user_id
    }
    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Dark
    }
    fn ready(&self) {
        self.readies.fetch_add(1, Ordering::SeqCst);
    }
    fn expand(&self) {
        self.expands.fetch_add(1, Ordering::SeqCst);
    }
    fn close(&self) {}
    fn show_alert(&self, _text: &str) {}
    fn send_data(&self, payload: &str) {
        self.sent.lock().push(payload.to_string());
    }
}

#[derive(Default)]
struct MemoryStore {
    stored: Mutex<Option<UserSettings>>,
    saved: Mutex<Vec<UserSettings>>,
}

impl SettingsStore for MemoryStore {
    fn load(&self, _user_id: i64) -> anyhow::Result<Option<UserSettings>> {
        Ok(self.stored.lock().clone())
    }
    fn save(&self, _user_id: i64, settings: &UserSettings) -> anyhow::Result<bool> {
        self.saved.lock().push(settings.clone());
        Ok(true)
    }
}

struct NullOutput;

impl AudioOutput for NullOutput {
    fn play_loop(&self, _sound: DecodedSound) {}
    fn play_oneshot(&self, _sound: DecodedSound) {}
    fn set_volume(&self, _volume: f32) {}
    fn stop_loop(&self) {}
    fn stop_all(&self) {}
}

#[derive(Default)]
struct NullTimerView;

impl TimerView for NullTimerView {
    fn show_remaining(&self, _minutes: u32, _seconds: u32) {}
    fn set_affordance(&self, _affordance: TimerAffordance) {}
    fn set_duration_control_enabled(&self, _enabled: bool) {}
}

#[derive(Default)]
struct NullBreathingView;

impl BreathingView for NullBreathingView {
    fn show_overlay(&self) {}
    fn hide_overlay(&self) {}
    fn render_frame(&self, _circle_radius: f64, _particles: &[ParticleDot]) {}
    fn show_phase_text(&self, _text: &str) {}
}

fn make_core(host: Arc<RecordingHost>, store: Arc<MemoryStore>) -> QuietudeCore {
    let _ = env_logger::builder().is_test(true).try_init();
    QuietudeCore::new(
        host,
        store,
        Arc::new(NullOutput),
        BreathingConfig::default(),
        Arc::new(NullTimerView),
        Arc::new(NullBreathingView),
    )
    .unwrap()
}

fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn startup_applies_stored_settings_and_signals_host() {
    let host = Arc::new(RecordingHost::new(42));
    let store = Arc::new(MemoryStore::default());
    *store.stored.lock() = Some(UserSettings {
        volume: 20,
        timer: 30,
        scene: SceneId::WhiteNoise,
        mode: EndAction::Exit,
    });

    let core = make_core(host.clone(), store);
    core.startup(Path::new("/nonexistent-media"));

    assert_eq!(core.state.volume(), 20);
    assert_eq!(core.state.remaining(), (30, 0));
    assert_eq!(core.state.current_scene(), SceneId::WhiteNoise);
    assert_eq!(core.state.mode(), EndAction::Exit);
    assert_eq!(host.readies.load(Ordering::SeqCst), 1);
    assert_eq!(host.expands.load(Ordering::SeqCst), 1);
}

#[test]
fn startup_without_host_identity_keeps_defaults() {
    let host = Arc::new(RecordingHost::new(0));
    let store = Arc::new(MemoryStore::default());
    *store.stored.lock() = Some(UserSettings {
        volume: 1,
        timer: 1,
        scene: SceneId::Rain,
        mode: EndAction::Exit,
    });

    let core = make_core(host.clone(), store);
    core.startup(Path::new("/nonexistent-media"));

    assert_eq!(core.state.volume(), 50);
    assert_eq!(core.state.current_scene(), SceneId::Fire);
    assert_eq!(host.readies.load(Ordering::SeqCst), 1, "ready fires regardless");
}

#[test]
fn mutations_persist_and_echo_to_host() {
    let host = Arc::new(RecordingHost::new(42));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host.clone(), store.clone());

    core.set_volume(80);

    assert!(wait_for(|| !store.saved.lock().is_empty()));
    assert_eq!(store.saved.lock()[0].volume, 80);

    assert!(wait_for(|| !host.sent.lock().is_empty()));
    let payload = host.sent.lock()[0].clone();
    let echoed: UserSettings = serde_json::from_str(&payload).unwrap();
    assert_eq!(echoed.volume, 80);
}

#[test]
fn no_persistence_without_host_identity() {
    let host = Arc::new(RecordingHost::new(0));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host.clone(), store.clone());

    core.set_volume(80);
    core.select_scene(SceneId::Rain);
    std::thread::sleep(Duration::from_millis(100));

    assert!(store.saved.lock().is_empty());
    assert!(host.sent.lock().is_empty());
}

#[test]
fn scene_selection_updates_state() {
    let host = Arc::new(RecordingHost::new(42));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host, store.clone());

    core.select_scene(SceneId::Rain);
    assert_eq!(core.state.current_scene(), SceneId::Rain);
    assert!(wait_for(|| store
        .saved
        .lock()
        .iter()
        .any(|s| s.scene == SceneId::Rain)));
}

#[test]
fn five_rapid_scene_taps_open_breathing_mode() {
    let host = Arc::new(RecordingHost::new(0));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host, store);

    let start = Instant::now();
    for i in 0..4 {
        core.scene_tap_at(start + Duration::from_millis(i * 100));
        assert!(!core.is_breathing());
    }
    core.scene_tap_at(start + Duration::from_millis(400));
    assert!(core.is_breathing());
    assert!(core.state.breathing_active());

    // Scene taps are swallowed while the overlay is up.
    core.scene_tap_at(start + Duration::from_millis(500));
    assert!(core.is_breathing());

    core.exit_breathing();
    assert!(!core.is_breathing());
}

#[test]
fn breathing_taps_exit_after_a_burst_of_eight() {
    let host = Arc::new(RecordingHost::new(0));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host, store);

    let start = Instant::now();
    for i in 0..5 {
        core.scene_tap_at(start + Duration::from_millis(i * 50));
    }
    assert!(core.is_breathing());

    for i in 0..8 {
        core.breathing_tap_at(start + Duration::from_millis(300 + i * 100));
    }
    assert!(!core.is_breathing());
}

#[test]
fn slow_scene_taps_never_open_breathing_mode() {
    let host = Arc::new(RecordingHost::new(0));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host, store);

    let start = Instant::now();
    for i in 0..10 {
        core.scene_tap_at(start + Duration::from_millis(i * 1600));
    }
    assert!(!core.is_breathing());
}

#[test]
fn duration_change_rejected_while_countdown_runs() {
    let host = Arc::new(RecordingHost::new(0));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host, store);

    core.set_timer_minutes(10);
    assert_eq!(core.state.remaining(), (10, 0));

    core.toggle_timer();
    core.set_timer_minutes(55);
    assert_eq!(core.state.remaining(), (10, 0));

    core.toggle_timer(); // pause
    core.set_timer_minutes(55);
    assert_eq!(core.state.remaining(), (10, 0));
}

#[test]
fn mode_switch_is_reflected_in_state() {
    let host = Arc::new(RecordingHost::new(0));
    let store = Arc::new(MemoryStore::default());
    let core = make_core(host, store);

    core.set_mode(EndAction::Exit);
    assert_eq!(core.state.mode(), EndAction::Exit);
    core.set_mode(EndAction::Mute);
    assert_eq!(core.state.mode(), EndAction::Mute);
}
