use std::time::{Duration, Instant};

/// Observable state of a dismissal countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running { remaining: Duration },
    Paused { remaining: Duration },
    /// Will never fire again: auto-close disabled, elapsed, or the toast closed.
    Stopped,
}

/// Pausable countdown with exact remaining-time bookkeeping.
///
/// The countdown does not own a real timer. [`Countdown::start`] hands back
/// the delay to schedule plus a generation token; a wakeup carrying any
/// other generation is stale and [`Countdown::fire`] rejects it.
#[derive(Debug)]
pub struct Countdown {
    duration: Option<Duration>,
    remaining: Duration,
    started: Option<Instant>,
    generation: u64,
    stopped: bool,
}

impl Countdown {
    /// `None` disables the countdown entirely.
    pub fn new(duration: Option<Duration>) -> Self {
        Self {
            duration,
            remaining: duration.unwrap_or_default(),
            started: None,
            generation: 0,
            stopped: duration.is_none(),
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Start (or restart) with whatever time is left.
    ///
    /// Returns the delay to schedule and its generation, or `None` when the
    /// countdown is stopped, exhausted, or already running.
    pub fn start(&mut self, now: Instant) -> Option<(Duration, u64)> {
        if self.stopped || self.remaining.is_zero() || self.started.is_some() {
            return None;
        }
        self.generation += 1;
        self.started = Some(now);
        Some((self.remaining, self.generation))
    }

    /// Stop counting and keep the remaining time. No-op when not running.
    pub fn pause(&mut self, now: Instant) -> bool {
        let Some(started) = self.started.take() else {
            return false;
        };
        self.generation += 1;
        self.remaining = self
            .remaining
            .saturating_sub(now.saturating_duration_since(started));
        true
    }

    /// Cancel permanently.
    pub fn stop(&mut self) {
        self.started = None;
        self.stopped = true;
        self.generation += 1;
    }

    /// Accept a wakeup. True when it belongs to the current run.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.started.is_none() || generation != self.generation {
            return false;
        }
        self.started = None;
        self.remaining = Duration::ZERO;
        self.stopped = true;
        true
    }

    pub fn state(&self, now: Instant) -> TimerState {
        if self.stopped {
            return TimerState::Stopped;
        }
        match self.started {
            Some(started) => TimerState::Running {
                remaining: self
                    .remaining
                    .saturating_sub(now.saturating_duration_since(started)),
            },
            None => TimerState::Paused {
                remaining: self.remaining,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_disabled_never_runs() {
        let now = Instant::now();
        let mut c = Countdown::new(None);
        assert_eq!(c.start(now), None);
        assert_eq!(c.state(now), TimerState::Stopped);
    }

    #[test]
    fn test_pause_keeps_remaining() {
        let t0 = Instant::now();
        let mut c = Countdown::new(Some(ms(1000)));
        let (delay, _) = c.start(t0).unwrap();
        assert_eq!(delay, ms(1000));

        assert!(c.pause(t0 + ms(400)));
        assert_eq!(c.state(t0 + ms(900)), TimerState::Paused { remaining: ms(600) });

        let (delay, _) = c.start(t0 + ms(900)).unwrap();
        assert_eq!(delay, ms(600));
    }

    #[test]
    fn test_pause_resume_zero_elapsed_is_idempotent() {
        let t0 = Instant::now();
        let mut c = Countdown::new(Some(ms(1000)));
        c.start(t0);
        c.pause(t0);
        assert!(!c.pause(t0));
        let (delay, _) = c.start(t0).unwrap();
        assert_eq!(delay, ms(1000));
    }

    #[test]
    fn test_stale_generation_rejected() {
        let t0 = Instant::now();
        let mut c = Countdown::new(Some(ms(500)));
        let (_, first) = c.start(t0).unwrap();
        c.pause(t0 + ms(100));
        let (_, second) = c.start(t0 + ms(200)).unwrap();

        assert!(!c.fire(first));
        assert!(c.fire(second));
        assert_eq!(c.state(t0 + ms(700)), TimerState::Stopped);
    }

    #[test]
    fn test_exhausted_never_restarts() {
        let t0 = Instant::now();
        let mut c = Countdown::new(Some(ms(300)));
        c.start(t0);
        c.pause(t0 + ms(500));
        assert_eq!(c.state(t0 + ms(500)), TimerState::Paused { remaining: Duration::ZERO });
        assert_eq!(c.start(t0 + ms(600)), None);
    }

    #[test]
    fn test_stop_is_final() {
        let t0 = Instant::now();
        let mut c = Countdown::new(Some(ms(300)));
        let (_, generation) = c.start(t0).unwrap();
        c.stop();
        assert!(!c.fire(generation));
        assert_eq!(c.start(t0), None);
        assert_eq!(c.state(t0), TimerState::Stopped);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let t0 = Instant::now();
        let mut c = Countdown::new(Some(ms(300)));
        assert!(c.start(t0).is_some());
        assert_eq!(c.start(t0 + ms(10)), None);
        assert!(c.is_running());
    }
}
