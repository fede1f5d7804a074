//! Countdown sleep timer
//!
//! Idle -> Running <-> Paused -> Expired, driven by a one-second tick. The
//! remaining time lives in the shared `AppState`; this module owns the tick,
//! the transition rules, and the single-shot end action fired through the
//! host bridge when the countdown reaches zero.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::app_state::{AppState, EndAction};
use crate::constants::TIMER_TICK_MS;
use crate::host::HostBridge;
use crate::ticker::Ticker;

/// What the start/pause control should currently offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAffordance {
    Start,
    Pause,
    Resume,
}

/// Rendering adapter for the countdown. The engine computes; the shell draws.
pub trait TimerView: Send + Sync {
    fn show_remaining(&self, minutes: u32, seconds: u32);
    fn set_affordance(&self, affordance: TimerAffordance);
    fn set_duration_control_enabled(&self, enabled: bool);
}

/// Alert shown when the countdown expires in mute mode.
const EXPIRY_ALERT: &str = "Time's up! Remember to silence your device.";

struct TimerInner {
    state: AppState,
    host: Arc<dyn HostBridge>,
    view: Arc<dyn TimerView>,
    ticker: Mutex<Option<Ticker>>,
}

#[derive(Clone)]
pub struct CountdownTimer {
    inner: Arc<TimerInner>,
}

impl CountdownTimer {
    pub fn new(state: AppState, host: Arc<dyn HostBridge>, view: Arc<dyn TimerView>) -> Self {
        Self {
            inner: Arc::new(TimerInner {
                state,
                host,
                view,
                ticker: Mutex::new(None),
            }),
        }
    }

    /// Current affordance, derived from the shared flags.
    pub fn affordance(&self) -> TimerAffordance {
        let state = self.inner.state.lock();
        if !state.timer_active {
            TimerAffordance::Start
        } else if state.paused {
            TimerAffordance::Resume
        } else {
            TimerAffordance::Pause
        }
    }

    /// Begin the countdown. Legal only from idle; otherwise a warn + no-op.
    pub fn start(&self) {
        {
            let mut state = self.inner.state.lock();
            if state.timer_active {
                log::warn!("timer already started, ignoring start");
                return;
            }
            state.timer_active = true;
            state.paused = false;
        }
        self.inner.view.set_affordance(TimerAffordance::Pause);
        self.inner.view.set_duration_control_enabled(false);
        self.spawn_tick();
        log::info!("countdown started");
    }

    /// Halt ticking, keeping the remaining time. Legal only while running.
    pub fn pause(&self) {
        {
            let mut state = self.inner.state.lock();
            if !state.timer_active || state.paused {
                log::warn!("timer not running, ignoring pause");
                return;
            }
            state.paused = true;
        }
        self.cancel_tick();
        self.inner.view.set_affordance(TimerAffordance::Resume);
        log::info!("countdown paused");
    }

    /// Resume ticking. Legal only while paused.
    pub fn resume(&self) {
        {
            let mut state = self.inner.state.lock();
            if !state.timer_active || !state.paused {
                log::warn!("timer not paused, ignoring resume");
                return;
            }
            state.paused = false;
        }
        self.inner.view.set_affordance(TimerAffordance::Pause);
        self.spawn_tick();
        log::info!("countdown resumed");
    }

    /// Start, pause, or resume depending on the current state. This backs
    /// the single control button the shell exposes.
    pub fn toggle(&self) {
        match self.affordance() {
            TimerAffordance::Start => self.start(),
            TimerAffordance::Pause => self.pause(),
            TimerAffordance::Resume => self.resume(),
        }
    }

    /// Reconfigure the duration. Rejected while running or paused: elapsed
    /// time must not be silently discarded mid-countdown.
    pub fn set_minutes(&self, minutes: u32) {
        {
            let mut state = self.inner.state.lock();
            if state.timer_active {
                log::warn!("cannot change duration while the countdown is running");
                return;
            }
            state.timer_minutes = minutes;
            state.timer_seconds = 0;
        }
        self.inner.view.show_remaining(minutes, 0);
    }

    /// One second elapsed. Decrements the remaining time, borrowing a minute
    /// on seconds underflow; hitting (or already being at) zero expires the
    /// countdown, which fires the configured end action exactly once.
    pub fn tick(&self) {
        let (remaining, expired_ticker) = {
            let mut state = self.inner.state.lock();
            if !state.timer_active || state.paused {
                // Stale tick from a ticker cancelled mid-flight.
                return;
            }

            if state.timer_seconds > 0 {
                state.timer_seconds -= 1;
            } else if state.timer_minutes > 0 {
                state.timer_minutes -= 1;
                state.timer_seconds = 59;
            }

            let expired = state.timer_minutes == 0 && state.timer_seconds == 0;
            let ticker = if expired {
                // Transitioning out of Running inside this lock is what makes
                // the end action single-shot, and taking the ticker handle in
                // the same critical section keeps a racing start() from having
                // its fresh ticker cancelled underneath it.
                state.timer_active = false;
                state.paused = false;
                Some(self.inner.ticker.lock().take())
            } else {
                None
            };
            ((state.timer_minutes, state.timer_seconds), ticker)
        };

        self.inner.view.show_remaining(remaining.0, remaining.1);
        if let Some(ticker) = expired_ticker {
            if let Some(ticker) = ticker {
                ticker.cancel();
            }
            self.expire();
        }
    }

    fn expire(&self) {
        self.inner.view.set_affordance(TimerAffordance::Start);
        self.inner.view.set_duration_control_enabled(true);

        match self.inner.state.mode() {
            EndAction::Exit => {
                log::info!("countdown expired, requesting host close");
                self.inner.host.close();
            }
            EndAction::Mute => {
                log::info!("countdown expired, alerting user");
                self.inner.host.show_alert(EXPIRY_ALERT);
            }
        }
    }

    fn spawn_tick(&self) {
        let timer = self.clone();
        let ticker = Ticker::spawn(
            "countdown-tick",
            Duration::from_millis(TIMER_TICK_MS),
            move || timer.tick(),
        );
        // Replacing an old handle cancels it via Drop.
        *self.inner.ticker.lock() = Some(ticker);
    }

    fn cancel_tick(&self) {
        if let Some(ticker) = self.inner.ticker.lock().take() {
            ticker.cancel();
        }
    }
}
