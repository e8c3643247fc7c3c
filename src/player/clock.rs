use std::thread;
use std::time::{Duration, Instant};

/// Fixed-rate frame clock.
#[derive(Debug, Clone)]
pub struct Clock {
    budget: Duration,
    last: Instant,
}

impl Clock {
    /// A clock ticking `fps` times per second (at least once).
    pub fn new(fps: u32) -> Self {
        Clock {
            budget: Duration::from_secs(1) / fps.max(1),
            last: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// When the current frame is due to end.
    pub fn deadline(&self) -> Instant {
        self.last + self.budget
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline().saturating_duration_since(now)
    }

    /// Sleep out whatever is left of the frame budget and start the next
    /// frame. Returns how long the finished frame took.
    pub fn tick(&mut self) -> Duration {
        let left = self.remaining(Instant::now());
        if !left.is_zero() {
            thread::sleep(left);
        }
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_follows_frame_rate() {
        assert_eq!(Clock::new(50).budget(), Duration::from_millis(20));
        assert_eq!(Clock::new(0).budget(), Duration::from_secs(1));
    }

    #[test]
    fn tick_waits_out_the_budget() {
        let mut clock = Clock::new(200);
        let elapsed = clock.tick();
        assert!(elapsed >= Duration::from_millis(5));
        assert!(clock.remaining(Instant::now()) <= clock.budget());
    }
}
