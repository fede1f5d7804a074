//! Static scene catalog
//!
//! Maps each ambient scene to its display name and asset file names. The
//! catalog is fixed at compile time; `SceneId` doubles as the wire name used
//! by the settings store (`fire`, `rain`, `white_noise`).

use serde::{Deserialize, Serialize};

/// Identifier of an ambient scene. Every value has a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    Fire,
    Rain,
    WhiteNoise,
}

impl SceneId {
    /// All scenes, in display order.
    pub const ALL: [SceneId; 3] = [SceneId::Fire, SceneId::Rain, SceneId::WhiteNoise];

    /// Stable string form, matching the settings wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneId::Fire => "fire",
            SceneId::Rain => "rain",
            SceneId::WhiteNoise => "white_noise",
        }
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry for one scene. Asset fields are file names relative to the
/// media directory handed to `AudioService::preload` (sounds) or served
/// directly by the shell (animation/thumbnail).
pub struct Scene {
    pub name: &'static str,
    pub sound: &'static str,
    pub animation: &'static str,
    pub thumbnail: &'static str,
    pub tap_sound: &'static str,
}

/// One-shot sound shared by all scenes while breathing mode is active.
pub const BREATH_TAP_SOUND: &str = "breath_tap.ogg";

const FIRE: Scene = Scene {
    name: "Fireplace",
    sound: "fire.ogg",
    animation: "fire.gif",
    thumbnail: "fire.png",
    tap_sound: "crack.ogg",
};

const RAIN: Scene = Scene {
    name: "Rain",
    sound: "rain.ogg",
    animation: "rain.gif",
    thumbnail: "rain.png",
    tap_sound: "drop.ogg",
};

const WHITE_NOISE: Scene = Scene {
    name: "White Noise",
    sound: "white_noise.ogg",
    animation: "white_noise.gif",
    thumbnail: "white_noise.png",
    tap_sound: "click.ogg",
};

/// Look up the catalog entry for a scene. Total: every id resolves.
pub fn scene(id: SceneId) -> &'static Scene {
    match id {
        SceneId::Fire => &FIRE,
        SceneId::Rain => &RAIN,
        SceneId::WhiteNoise => &WHITE_NOISE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_resolves() {
        for id in SceneId::ALL {
            let s = scene(id);
            assert!(!s.name.is_empty());
            assert!(s.sound.ends_with(".ogg"));
            assert!(s.tap_sound.ends_with(".ogg"));
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for id in SceneId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            let back: SceneId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
        }
    }
}
