//! First-class periodic tasks
//!
//! Every engine that used to rely on an ambient interval handle owns a
//! `Ticker` instead. Cancellation is idempotent, safe to call from inside the
//! tick callback, and guarantees the callback never fires again once the
//! in-flight invocation (if any) returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Handle to a periodic background task. Dropping the handle cancels it.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    name: String,
}

impl Ticker {
    /// Spawn a named thread invoking `tick` every `interval` until cancelled.
    /// The first invocation happens one full interval after the spawn.
    pub fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let thread_name = name.to_string();

        let builder = thread::Builder::new().name(thread_name.clone());
        let spawned = builder.spawn(move || {
            log::debug!("ticker '{}' started", thread_name);
            loop {
                thread::sleep(interval);
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                tick();
            }
            log::debug!("ticker '{}' stopped", thread_name);
        });
        if let Err(e) = spawned {
            // Thread spawn only fails under resource exhaustion; the ticker
            // degrades to a no-op handle rather than taking the process down.
            log::warn!("failed to spawn ticker '{}': {}", name, e);
            stop.store(true, Ordering::Relaxed);
        }

        Self {
            stop,
            name: name.to_string(),
        }
    }

    /// Stop the ticker. Idempotent; never blocks on the tick thread, so it is
    /// safe to call from within the tick callback itself.
    pub fn cancel(&self) {
        if !self.stop.swap(true, Ordering::Relaxed) {
            log::debug!("ticker '{}' cancelled", self.name);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn ticks_until_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let ticker = Ticker::spawn("test-tick", Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        thread::sleep(Duration::from_millis(100));
        ticker.cancel();
        let at_cancel = count.load(Ordering::Relaxed);
        assert!(at_cancel >= 2, "expected a few ticks, got {}", at_cancel);

        // No further ticks after cancellation settles.
        thread::sleep(Duration::from_millis(50));
        let settled = count.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::Relaxed), settled);
    }

    #[test]
    fn cancel_is_idempotent() {
        let ticker = Ticker::spawn("idempotent", Duration::from_millis(5), || {});
        ticker.cancel();
        ticker.cancel();
        assert!(ticker.is_cancelled());
    }

    #[test]
    fn drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        {
            let _ticker = Ticker::spawn("dropped", Duration::from_millis(10), move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
            thread::sleep(Duration::from_millis(35));
        }
        thread::sleep(Duration::from_millis(30));
        let settled = count.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::Relaxed), settled);
    }
}
