use std::time::{Duration, Instant};

/// Fixed-rate tick schedule. The event loop sleeps until `deadline()` and
/// runs one tick when it is due.
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    last_tick: Instant,
    next_tick: Instant,
}

impl FramePacer {
    pub fn new(fps: u32, now: Instant) -> Self {
        let frame = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        Self {
            frame,
            last_tick: now,
            next_tick: now,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.next_tick
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// Start a tick at `now`; returns seconds since the previous one.
    /// After a stall the schedule restarts from `now` instead of bursting
    /// to catch up.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.next_tick += self.frame;
        if self.next_tick <= now {
            self.next_tick = now + self.frame;
        }
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_due_immediately() {
        let t0 = Instant::now();
        let pacer = FramePacer::new(60, t0);
        assert!(pacer.is_due(t0));
    }

    #[test]
    fn ticks_follow_fixed_schedule() {
        let t0 = Instant::now();
        let frame = Duration::from_secs_f64(1.0 / 50.0);
        let mut pacer = FramePacer::new(50, t0);

        assert_eq!(pacer.tick(t0), 0.0);
        assert_eq!(pacer.deadline(), t0 + frame);
        assert!(!pacer.is_due(t0 + frame / 2));

        // a slightly late tick does not shift the schedule
        let late = t0 + frame + Duration::from_millis(3);
        let dt = pacer.tick(late);
        assert!((dt - 0.023).abs() < 1e-4);
        assert_eq!(pacer.deadline(), t0 + frame * 2);
    }

    #[test]
    fn stall_restarts_schedule() {
        let t0 = Instant::now();
        let frame = Duration::from_secs_f64(1.0 / 60.0);
        let mut pacer = FramePacer::new(60, t0);
        pacer.tick(t0);

        let stalled = t0 + Duration::from_secs(2);
        let dt = pacer.tick(stalled);
        assert!((dt - 2.0).abs() < 1e-4);
        assert_eq!(pacer.deadline(), stalled + frame);
    }
}
