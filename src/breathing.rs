//! Guided-breathing cycle engine
//!
//! The cycle math is pure: radius and phase are functions of elapsed time
//! against the configured four-phase cycle (inhale, hold, exhale, hold). The
//! engine wraps that math with the two periodic ticks (animation and phase
//! text), the decorative particle field, and the exit-tap detector, and hands
//! every rendering side effect to a `BreathingView` adapter.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

use crate::app_state::AppState;
use crate::audio::AudioService;
use crate::config::BreathingConfig;
use crate::constants::{
    ANIMATION_TICK_MS, EXIT_BREATHING_TAPS, PARTICLE_COUNT, PARTICLE_MAX_RADIUS,
    PARTICLE_MIN_RADIUS, PARTICLE_ORBIT_RATIO, PARTICLE_PHASE_STEP, PHASE_TICK_MS, TAP_WINDOW_MS,
};
use crate::tap_detector::TapDetector;
use crate::ticker::Ticker;

/// Coarse breathing phase, as shown to the user. Both hold segments map to
/// `Hold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

/// Immutable cycle geometry plus the per-phase prompt pools.
pub struct BreathingCycle {
    inhale: f64,
    hold_in: f64,
    exhale: f64,
    hold_out: f64,
    base_radius: f64,
    max_radius: f64,
    inhale_texts: Vec<String>,
    exhale_texts: Vec<String>,
    hold_texts: Vec<String>,
}

impl BreathingCycle {
    pub fn new(config: &BreathingConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            inhale: config.inhale_secs,
            hold_in: config.hold_in_secs,
            exhale: config.exhale_secs,
            hold_out: config.hold_out_secs,
            base_radius: config.base_radius,
            max_radius: config.max_radius,
            inhale_texts: config.inhale_texts.clone(),
            exhale_texts: config.exhale_texts.clone(),
            hold_texts: config.hold_texts.clone(),
        })
    }

    pub fn cycle_len(&self) -> f64 {
        self.inhale + self.hold_in + self.exhale + self.hold_out
    }

    /// Circle radius at `elapsed` seconds since activation: linear ramp up
    /// over the inhale, flat at max through the first hold, linear ramp down
    /// over the exhale, flat at base for the rest.
    pub fn radius_at(&self, elapsed: f64) -> f64 {
        let t = elapsed.rem_euclid(self.cycle_len());
        let range = self.max_radius - self.base_radius;

        if t < self.inhale {
            self.base_radius + range * (t / self.inhale)
        } else if t < self.inhale + self.hold_in {
            self.max_radius
        } else if t < self.inhale + self.hold_in + self.exhale {
            let progress = (t - self.inhale - self.hold_in) / self.exhale;
            self.max_radius - range * progress
        } else {
            self.base_radius
        }
    }

    /// Coarse phase at `elapsed` seconds since activation.
    pub fn phase_at(&self, elapsed: f64) -> Phase {
        let t = elapsed.rem_euclid(self.cycle_len());
        if t < self.inhale {
            Phase::Inhale
        } else if t < self.inhale + self.hold_in {
            Phase::Hold
        } else if t < self.inhale + self.hold_in + self.exhale {
            Phase::Exhale
        } else {
            Phase::Hold
        }
    }

    /// One random prompt line for the phase.
    pub fn pick_text(&self, phase: Phase) -> &str {
        let pool = match phase {
            Phase::Inhale => &self.inhale_texts,
            Phase::Exhale => &self.exhale_texts,
            Phase::Hold => &self.hold_texts,
        };
        &pool[fastrand::usize(..pool.len())]
    }
}

/// One decorative particle's rendered position, relative to the circle
/// center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleDot {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

struct Particle {
    radius: f64,
    angle: f64,
}

/// Rendering adapter. The engine produces values; the shell draws them.
pub trait BreathingView: Send + Sync {
    fn show_overlay(&self);
    fn hide_overlay(&self);
    fn render_frame(&self, circle_radius: f64, particles: &[ParticleDot]);
    fn show_phase_text(&self, text: &str);
}

struct RunState {
    started_at: Option<Instant>,
    last_phase: Option<Phase>,
    particles: Vec<Particle>,
    anim_ticker: Option<Ticker>,
    phase_ticker: Option<Ticker>,
    exit_taps: TapDetector,
}

struct EngineInner {
    cycle: BreathingCycle,
    state: AppState,
    audio: AudioService,
    view: Arc<dyn BreathingView>,
    run: Mutex<RunState>,
}

#[derive(Clone)]
pub struct BreathingEngine {
    inner: Arc<EngineInner>,
}

impl BreathingEngine {
    pub fn new(
        cycle: BreathingCycle,
        state: AppState,
        audio: AudioService,
        view: Arc<dyn BreathingView>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                cycle,
                state,
                audio,
                view,
                run: Mutex::new(RunState {
                    started_at: None,
                    last_phase: None,
                    particles: Vec::new(),
                    anim_ticker: None,
                    phase_ticker: None,
                    exit_taps: TapDetector::new(
                        std::time::Duration::from_millis(TAP_WINDOW_MS),
                        EXIT_BREATHING_TAPS,
                    ),
                }),
            }),
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.run.lock().started_at.is_some()
    }

    /// When the current run started, if one is active.
    pub fn started_at(&self) -> Option<Instant> {
        self.inner.run.lock().started_at
    }

    /// Enter breathing mode. No-op when already active.
    pub fn activate(&self) {
        {
            let mut run = self.inner.run.lock();
            if run.started_at.is_some() {
                log::warn!("breathing mode already active, ignoring activate");
                return;
            }
            run.started_at = Some(Instant::now());
            run.last_phase = None;
            run.exit_taps.reset();
            run.particles = seed_particles();

            let anim = {
                let engine = self.clone();
                Ticker::spawn(
                    "breathing-anim",
                    std::time::Duration::from_millis(ANIMATION_TICK_MS),
                    move || engine.animation_tick_at(Instant::now()),
                )
            };
            let phase = {
                let engine = self.clone();
                Ticker::spawn(
                    "breathing-phase",
                    std::time::Duration::from_millis(PHASE_TICK_MS),
                    move || engine.phase_tick_at(Instant::now()),
                )
            };
            run.anim_ticker = Some(anim);
            run.phase_ticker = Some(phase);
        }

        self.inner.state.set_breathing_active(true);
        self.inner.audio.stop_all();
        self.start_sound();
        self.inner.view.show_overlay();
        log::info!("breathing mode activated");
    }

    /// Leave breathing mode and resume the selected scene's background loop.
    /// No-op when inactive.
    pub fn deactivate(&self) {
        {
            let mut run = self.inner.run.lock();
            if run.started_at.is_none() {
                return;
            }
            if let Some(t) = run.anim_ticker.take() {
                t.cancel();
            }
            if let Some(t) = run.phase_ticker.take() {
                t.cancel();
            }
            run.started_at = None;
            run.last_phase = None;
            run.particles.clear();
        }

        self.stop_sound();
        self.inner.state.set_breathing_active(false);
        self.inner.view.hide_overlay();
        self.inner.audio.play_background(self.inner.state.current_scene());
        log::info!("breathing mode deactivated");
    }

    /// A tap on the breathing overlay: always audible, and eight of them in
    /// the window end the session.
    pub fn tap(&self) {
        self.tap_at(Instant::now());
    }

    pub fn tap_at(&self, now: Instant) {
        let burst = {
            let mut run = self.inner.run.lock();
            if run.started_at.is_none() {
                // Taps routed here while the overlay is down are fully inert.
                return;
            }
            run.exit_taps.record_at(now)
        };
        self.inner.audio.play_breath_tap();
        if burst {
            self.deactivate();
        }
    }

    /// Animation tick: recompute the circle radius and advance the particle
    /// orbit, then hand the frame to the view.
    pub fn animation_tick_at(&self, now: Instant) {
        let frame = {
            let mut run = self.inner.run.lock();
            let Some(started) = run.started_at else {
                return;
            };
            let elapsed = now.saturating_duration_since(started).as_secs_f64();
            let radius = self.inner.cycle.radius_at(elapsed);

            let orbit = radius * PARTICLE_ORBIT_RATIO;
            let dots: Vec<ParticleDot> = run
                .particles
                .iter_mut()
                .map(|p| {
                    p.angle += PARTICLE_PHASE_STEP;
                    ParticleDot {
                        x: p.angle.sin() * orbit,
                        y: p.angle.cos() * orbit,
                        radius: p.radius,
                    }
                })
                .collect();
            (radius, dots)
        };
        self.inner.view.render_frame(frame.0, &frame.1);
    }

    /// Phase tick: on a phase-name change, reveal one fresh prompt line.
    /// Re-checks inside the same segment never reselect.
    pub fn phase_tick_at(&self, now: Instant) {
        let text = {
            let mut run = self.inner.run.lock();
            let Some(started) = run.started_at else {
                return;
            };
            let elapsed = now.saturating_duration_since(started).as_secs_f64();
            let phase = self.inner.cycle.phase_at(elapsed);
            if run.last_phase == Some(phase) {
                return;
            }
            run.last_phase = Some(phase);
            self.inner.cycle.pick_text(phase).to_string()
        };
        self.inner.view.show_phase_text(&text);
    }

    // Extension point: the breathing mode has no dedicated background sound
    // asset yet. TODO: wire an asset key here once one ships with the media
    // set.
    fn start_sound(&self) {
        log::debug!("breathing background sound: no asset configured");
    }

    fn stop_sound(&self) {}
}

fn seed_particles() -> Vec<Particle> {
    (0..PARTICLE_COUNT)
        .map(|_| Particle {
            radius: PARTICLE_MIN_RADIUS
                + fastrand::f64() * (PARTICLE_MAX_RADIUS - PARTICLE_MIN_RADIUS),
            angle: fastrand::f64() * std::f64::consts::TAU,
        })
        .collect()
}
