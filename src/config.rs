//! Breathing-cycle configuration
//!
//! The cycle geometry and phase text pools ship with built-in defaults and can
//! be overridden by an optional TOML file bundled next to the app assets.
//! A missing file means defaults; an unreadable or invalid file is a real
//! error so a broken deployment is noticed instead of silently ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::constants::{DEFAULT_BASE_RADIUS, DEFAULT_MAX_RADIUS, DEFAULT_PHASE_SECONDS};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreathingConfig {
    /// Inhale ramp duration, seconds
    pub inhale_secs: f64,
    /// Hold after inhale, seconds
    pub hold_in_secs: f64,
    /// Exhale ramp duration, seconds
    pub exhale_secs: f64,
    /// Hold after exhale, seconds
    pub hold_out_secs: f64,
    /// Circle radius at rest
    pub base_radius: f64,
    /// Circle radius at full inhale
    pub max_radius: f64,
    /// Candidate prompt lines, one picked at random per phase entry
    pub inhale_texts: Vec<String>,
    pub exhale_texts: Vec<String>,
    pub hold_texts: Vec<String>,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            inhale_secs: DEFAULT_PHASE_SECONDS,
            hold_in_secs: DEFAULT_PHASE_SECONDS,
            exhale_secs: DEFAULT_PHASE_SECONDS,
            hold_out_secs: DEFAULT_PHASE_SECONDS,
            base_radius: DEFAULT_BASE_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            inhale_texts: vec![
                "breathe in".to_string(),
                "fill your lungs".to_string(),
                "inhale slowly".to_string(),
                "take a deep breath".to_string(),
            ],
            exhale_texts: vec![
                "breathe out".to_string(),
                "exhale".to_string(),
                "let it go slowly".to_string(),
                "release the air".to_string(),
            ],
            hold_texts: vec![
                "hold your breath".to_string(),
                "pause".to_string(),
                "stay still".to_string(),
                "hold it".to_string(),
            ],
        }
    }
}

impl BreathingConfig {
    /// Parse a TOML overlay. Absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BreathingConfig =
            toml::from_str(text).context("Failed to parse breathing config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when the file is absent.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no breathing config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read breathing config {}", path.display()))?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded breathing config from {}", path.display());
        Ok(config)
    }

    /// The cycle duration is used as a modulus and must be positive; radii
    /// and text pools must describe a renderable cycle.
    pub fn validate(&self) -> Result<()> {
        let durations = [
            self.inhale_secs,
            self.hold_in_secs,
            self.exhale_secs,
            self.hold_out_secs,
        ];
        if durations.iter().any(|d| *d < 0.0 || !d.is_finite()) {
            anyhow::bail!("phase durations must be finite and non-negative");
        }
        if durations.iter().sum::<f64>() <= 0.0 {
            anyhow::bail!("breathing cycle duration must be positive");
        }
        if self.max_radius < self.base_radius {
            anyhow::bail!(
                "max_radius ({}) must be at least base_radius ({})",
                self.max_radius,
                self.base_radius
            );
        }
        if self.inhale_texts.is_empty() || self.exhale_texts.is_empty() || self.hold_texts.is_empty()
        {
            anyhow::bail!("every phase needs at least one prompt line");
        }
        Ok(())
    }
}
