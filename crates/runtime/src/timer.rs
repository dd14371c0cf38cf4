use foundation::time::Millis;

#[derive(Debug, Copy, Clone, PartialEq)]
enum TimerState {
    Stopped,
    Running { started: Millis },
}

/// A restartable frame timer in the style of `d3.timer`.
///
/// The timer does not own a clock. Callers `poll` it with the current frame
/// timestamp and it reports whether it fired, plus the time since it (re)started.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Timer {
    state: TimerState,
}

impl Default for Timer {
    fn default() -> Self {
        Self::stopped()
    }
}

impl Timer {
    pub fn stopped() -> Self {
        Self {
            state: TimerState::Stopped,
        }
    }

    /// A timer that fires from `now` onwards.
    pub fn started(now: Millis) -> Self {
        let mut timer = Self::stopped();
        timer.restart(now, 0.0);
        timer
    }

    /// Starts (or restarts) the timer; it first fires once `delay_ms` has passed.
    pub fn restart(&mut self, now: Millis, delay_ms: f64) {
        self.state = TimerState::Running {
            started: now + delay_ms.max(0.0),
        };
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Returns the elapsed time since the (delayed) start if the timer fires at `now`.
    pub fn poll(&self, now: Millis) -> Option<f64> {
        match self.state {
            TimerState::Stopped => None,
            TimerState::Running { started } => {
                let elapsed = now.since(started);
                (elapsed >= 0.0).then_some(elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Timer;
    use foundation::time::Millis;

    #[test]
    fn stopped_timer_never_fires() {
        let t = Timer::stopped();
        assert!(!t.is_running());
        assert_eq!(t.poll(Millis(1e9)), None);
    }

    #[test]
    fn reports_elapsed_since_start() {
        let t = Timer::started(Millis(100.0));
        assert_eq!(t.poll(Millis(100.0)), Some(0.0));
        assert_eq!(t.poll(Millis(150.0)), Some(50.0));
    }

    #[test]
    fn delayed_restart_waits() {
        let mut t = Timer::started(Millis(0.0));
        t.stop();
        assert_eq!(t.poll(Millis(10.0)), None);
        t.restart(Millis(10.0), 500.0);
        assert!(t.is_running());
        assert_eq!(t.poll(Millis(400.0)), None);
        assert_eq!(t.poll(Millis(510.0)), Some(0.0));
    }
}
