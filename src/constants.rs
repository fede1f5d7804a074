//! Centralized constants for the Quietude core
//!
//! This module contains all configurable numerical values used throughout
//! the crate. Each constant includes documentation on its purpose, unit,
//! and recommended value range.

// ============================================================================
// TAP DETECTION
// ============================================================================

/// Sliding window for rapid-tap detection.
/// Unit: milliseconds
/// Range: Fixed by gesture design; taps further apart never accumulate
pub const TAP_WINDOW_MS: u64 = 1500;

/// Taps within the window required to enter breathing mode.
/// Unit: count
/// Recommended range: 3-8 (lower = easier to trigger accidentally)
pub const ENTER_BREATHING_TAPS: usize = 5;

/// Taps within the window required to exit breathing mode.
/// Unit: count
/// Recommended range: ENTER_BREATHING_TAPS..=12 (harder than entry on purpose)
pub const EXIT_BREATHING_TAPS: usize = 8;

// ============================================================================
// TICK INTERVALS
// ============================================================================

/// Countdown timer tick period.
/// Unit: milliseconds
/// Range: Fixed at one second; the countdown counts ticks, not wall time
pub const TIMER_TICK_MS: u64 = 1000;

/// Breathing animation tick period (~60 Hz).
/// Unit: milliseconds
/// Recommended range: 16-33 (lower = smoother, higher = less CPU)
pub const ANIMATION_TICK_MS: u64 = 16;

/// Breathing phase-text check period (~10 Hz).
/// Unit: milliseconds
/// Recommended range: 50-250 (only needs to catch segment boundaries)
pub const PHASE_TICK_MS: u64 = 100;

// ============================================================================
// DEFAULT USER SETTINGS
// ============================================================================

/// Default playback volume when no stored settings exist.
/// Unit: percent (0-100)
pub const DEFAULT_VOLUME: u8 = 50;

/// Default sleep-timer duration when no stored settings exist.
/// Unit: minutes
pub const DEFAULT_TIMER_MINUTES: u32 = 90;

// ============================================================================
// BREATHING CYCLE DEFAULTS
// ============================================================================

/// Default duration of each breathing phase (inhale, both holds, exhale).
/// Unit: seconds
/// Recommended range: 2.0-8.0 (box-breathing convention is 4.0)
pub const DEFAULT_PHASE_SECONDS: f64 = 4.0;

/// Breathing circle radius at rest (fully exhaled).
/// Unit: presentation units (the shell decides what a unit maps to)
pub const DEFAULT_BASE_RADIUS: f64 = 50.0;

/// Breathing circle radius at full inhale.
/// Unit: presentation units
pub const DEFAULT_MAX_RADIUS: f64 = 150.0;

/// Number of decorative particles orbiting the breathing circle.
/// Unit: count
/// Recommended range: 5-20 (purely cosmetic)
pub const PARTICLE_COUNT: usize = 10;

/// Fraction of the current circle radius at which particles orbit.
/// Unit: ratio (0.0-1.0)
pub const PARTICLE_ORBIT_RATIO: f64 = 0.4;

/// Angle each particle advances per animation tick.
/// Unit: radians
/// Recommended range: 0.005-0.05 (higher = faster idle drift)
pub const PARTICLE_PHASE_STEP: f64 = 0.02;

/// Smallest decorative particle radius.
/// Unit: presentation units
pub const PARTICLE_MIN_RADIUS: f64 = 5.0;

/// Largest decorative particle radius.
/// Unit: presentation units
pub const PARTICLE_MAX_RADIUS: f64 = 15.0;
