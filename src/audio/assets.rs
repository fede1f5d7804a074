//! Background asset loading
//!
//! Each cataloged sound is fetched and decoded on its own thread, in no
//! particular order. A failed decode is logged and leaves the table entry
//! absent; playback against absent entries stays a no-op. Ordering across the
//! load/user-action boundary is guaranteed only by the late-bound background
//! start in [`AudioService::asset_loaded`].

use anyhow::{Context, Result};
use rodio::{Decoder, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use super::{AssetKey, AudioService, DecodedSound};
use crate::scenes::{self, SceneId, BREATH_TAP_SOUND};

/// Decode a sound file into memory, once.
pub fn decode_file(path: &Path) -> Result<DecodedSound> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open audio file {}", path.display()))?;
    let decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("Failed to decode audio file {}", path.display()))?;

    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples().collect();
    if samples.is_empty() {
        anyhow::bail!("audio file {} decoded to zero samples", path.display());
    }

    Ok(DecodedSound {
        channels,
        sample_rate,
        samples: Arc::new(samples),
    })
}

fn catalog_paths(media_dir: &Path) -> Vec<(AssetKey, PathBuf)> {
    let mut paths = Vec::new();
    for id in SceneId::ALL {
        let scene = scenes::scene(id);
        paths.push((AssetKey::Background(id), media_dir.join(scene.sound)));
        paths.push((AssetKey::Tap(id), media_dir.join(scene.tap_sound)));
    }
    paths.push((AssetKey::BreathTap, media_dir.join(BREATH_TAP_SOUND)));
    paths
}

/// Spawn one decode thread per cataloged asset.
pub(super) fn spawn_preload(service: AudioService, media_dir: &Path) {
    for (key, path) in catalog_paths(media_dir) {
        let service = service.clone();
        let spawned = thread::Builder::new()
            .name(format!("audio-load-{:?}", key))
            .spawn(move || match decode_file(&path) {
                Ok(sound) => service.asset_loaded(key, sound),
                Err(e) => log::warn!("audio asset {:?} unavailable: {:#}", key, e),
            });
        if let Err(e) = spawned {
            log::warn!("failed to spawn loader for {:?}: {}", key, e);
        }
    }
}
