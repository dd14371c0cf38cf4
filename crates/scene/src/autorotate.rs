use foundation::time::Millis;
use runtime::timer::Timer;
use tracing::trace;

use crate::projection::Rotation;

/// Continuous spin around the polar axis, paused while the user drags.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoRotate {
    timer: Timer,
    deg_per_ms: f64,
    frame_budget_ms: f64,
    last_tick: Millis,
}

impl AutoRotate {
    /// A stopped auto-rotation; `now` seeds the last-tick timestamp.
    pub fn new(deg_per_sec: f64, frame_budget_ms: f64, now: Millis) -> Self {
        Self {
            timer: Timer::stopped(),
            deg_per_ms: deg_per_sec / 1000.0,
            frame_budget_ms,
            last_tick: now,
        }
    }

    pub fn deg_per_ms(&self) -> f64 {
        self.deg_per_ms
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start(&mut self, now: Millis) {
        self.restart(now, 0.0);
    }

    pub fn restart(&mut self, now: Millis, delay_ms: f64) {
        self.timer.restart(now, delay_ms);
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Advances the rotation by the time since the previous tick.
    ///
    /// Intervals at or above the frame budget (a backgrounded tab, the first
    /// tick after a pause) are skipped rather than integrated. Returns `true`
    /// when the longitude changed.
    pub fn tick(&mut self, now: Millis, rotation: &mut Rotation) -> bool {
        if self.timer.poll(now).is_none() {
            return false;
        }
        let elapsed = now.since(self.last_tick);
        self.last_tick = now;
        if elapsed <= 0.0 {
            return false;
        }
        if elapsed >= self.frame_budget_ms {
            trace!(elapsed, "auto-rotate tick over budget; skipped");
            return false;
        }
        rotation.lon_deg += elapsed * self.deg_per_ms;
        true
    }
}
