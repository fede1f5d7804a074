//! Audio playback service
//!
//! Assets are fetched and decoded once in the background; playback goes
//! through a single volume-controlled output (`AudioOutput`). There is at most
//! one looping background source at a time; tap sounds are fire-and-forget
//! one-shots that may overlap. Requests against assets that have not finished
//! decoding are no-ops, with one exception: when a background decode
//! completes, it auto-starts playback iff its scene is still the selected one
//! at that moment.

pub mod assets;
pub mod output;

pub use output::{RodioOutput, SilentOutput};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::app_state::AppState;
use crate::scenes::SceneId;

/// A fully decoded audio asset, shared cheaply between the asset table and
/// live playback.
#[derive(Clone, Debug)]
pub struct DecodedSound {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Arc<Vec<f32>>,
}

impl DecodedSound {
    pub fn duration_secs(&self) -> f64 {
        let frames = self.samples.len() as f64 / self.channels.max(1) as f64;
        frames / self.sample_rate.max(1) as f64
    }
}

/// Key into the asset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Background(SceneId),
    Tap(SceneId),
    BreathTap,
}

/// Seam to the platform audio graph. The production implementation is
/// `RodioOutput`; tests substitute a recording fake.
pub trait AudioOutput: Send + Sync {
    /// Replace the background loop (at most one plays at a time).
    fn play_loop(&self, sound: DecodedSound);

    /// Start an overlapping one-shot sound.
    fn play_oneshot(&self, sound: DecodedSound);

    /// Apply a uniform volume (0.0-1.0) to every live source, instantly.
    fn set_volume(&self, volume: f32);

    /// Stop the background loop, if any.
    fn stop_loop(&self);

    /// Stop everything.
    fn stop_all(&self);
}

struct ServiceInner {
    output: Arc<dyn AudioOutput>,
    state: AppState,
    assets: Mutex<HashMap<AssetKey, DecodedSound>>,
}

/// Policy layer over the output: asset table, one-loop rule, late-bound
/// background start.
#[derive(Clone)]
pub struct AudioService {
    inner: Arc<ServiceInner>,
}

impl AudioService {
    pub fn new(output: Arc<dyn AudioOutput>, state: AppState) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                output,
                state,
                assets: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Kick off background decoding of every cataloged sound under
    /// `media_dir`. Returns immediately; completions land via
    /// [`AudioService::asset_loaded`].
    pub fn preload(&self, media_dir: &Path) {
        assets::spawn_preload(self.clone(), media_dir);
    }

    /// Install a decoded asset. Called by the loader threads (and by
    /// embedders providing their own loader). A background asset whose scene
    /// is still the selected one starts playing right away, unless the
    /// breathing overlay owns the soundscape.
    pub fn asset_loaded(&self, key: AssetKey, sound: DecodedSound) {
        log::info!(
            "audio asset ready: {:?} ({:.1}s)",
            key,
            sound.duration_secs()
        );
        self.inner.assets.lock().insert(key, sound);

        if let AssetKey::Background(scene) = key {
            if self.inner.state.current_scene() == scene && !self.inner.state.breathing_active() {
                self.play_background(scene);
            }
        }
    }

    /// Whether an asset has finished decoding.
    pub fn has_asset(&self, key: AssetKey) -> bool {
        self.inner.assets.lock().contains_key(&key)
    }

    /// Swap the background loop to `scene`. Drops the request silently when
    /// the asset is still decoding; the decode completion will start it if
    /// the scene is still selected then.
    pub fn play_background(&self, scene: SceneId) {
        self.inner.output.stop_loop();
        let asset = self.inner.assets.lock().get(&AssetKey::Background(scene)).cloned();
        match asset {
            Some(sound) => self.inner.output.play_loop(sound),
            None => log::debug!("background for {} not decoded yet, dropping request", scene),
        }
    }

    /// Fire the scene's tap sound. No-op while the asset is absent.
    pub fn play_tap(&self, scene: SceneId) {
        self.play_oneshot(AssetKey::Tap(scene));
    }

    /// Fire the shared breathing-mode tap sound.
    pub fn play_breath_tap(&self) {
        self.play_oneshot(AssetKey::BreathTap);
    }

    fn play_oneshot(&self, key: AssetKey) {
        let asset = self.inner.assets.lock().get(&key).cloned();
        if let Some(sound) = asset {
            self.inner.output.play_oneshot(sound);
        }
    }

    /// Uniform volume for every live source, 0.0-1.0 (clamped).
    pub fn set_volume(&self, volume: f32) {
        self.inner.output.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn stop_all(&self) {
        self.inner.output.stop_all();
    }
}
