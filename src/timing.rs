// Wall-clock source and the fixed-step accumulator that paces logic updates.
// Rendering runs once per outer loop iteration; logic runs at `rate` Hz.

use std::time::{Duration, Instant};

/// A stopwatch: `restart` returns the time since the previous restart.
pub trait Clock {
    fn restart(&mut self) -> Duration;
}

pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn restart(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        elapsed
    }
}

/// Accumulates elapsed time and hands it out in whole ticks.
#[derive(Debug, Clone)]
pub struct FixedStep {
    tick: Duration,
    lag: Duration,
}

impl FixedStep {
    /// `rate` ticks per second; integer nanoseconds so a burst of exactly one
    /// second always yields `rate` ticks.
    pub fn new(rate: u32) -> Self {
        let rate = rate.max(1) as u64;
        Self { tick: Duration::from_nanos(1_000_000_000 / rate), lag: Duration::ZERO }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.lag += elapsed;
    }

    /// Consume one tick if strictly more than a tick is pending.
    pub fn try_step(&mut self) -> bool {
        if self.lag > self.tick {
            self.lag -= self.tick;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod manual {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::Clock;

    /// Clock that replays scripted durations, then a fixed fallback.
    pub struct ManualClock {
        pub script: VecDeque<Duration>,
        pub fallback: Duration,
    }

    impl ManualClock {
        pub fn steady(step: Duration) -> Self {
            Self { script: VecDeque::new(), fallback: step }
        }

        pub fn scripted(steps: &[Duration]) -> Self {
            Self { script: steps.iter().copied().collect(), fallback: Duration::ZERO }
        }
    }

    impl Clock for ManualClock {
        fn restart(&mut self) -> Duration {
            self.script.pop_front().unwrap_or(self.fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(step: &mut FixedStep) -> usize {
        let mut n = 0;
        while step.try_step() {
            n += 1;
        }
        n
    }

    #[test]
    fn one_second_burst_is_sixty_ticks() {
        let mut step = FixedStep::new(60);
        step.advance(Duration::from_secs(1));
        assert_eq!(drain(&mut step), 60);
    }

    #[test]
    fn split_second_is_still_sixty_ticks() {
        let mut step = FixedStep::new(60);
        let mut total = 0;
        for _ in 0..4 {
            step.advance(Duration::from_millis(250));
            total += drain(&mut step);
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn exactly_one_tick_waits_for_more() {
        let mut step = FixedStep::new(60);
        step.advance(step.tick());
        assert!(!step.try_step());
        step.advance(Duration::from_nanos(1));
        assert!(step.try_step());
        assert!(!step.try_step());
    }

    #[test]
    fn zero_rate_is_clamped() {
        assert_eq!(FixedStep::new(0).tick(), Duration::from_secs(1));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.restart();
        std::thread::sleep(Duration::from_millis(2));
        let b = clock.restart();
        assert!(b >= Duration::from_millis(2));
        assert!(a < Duration::from_secs(1));
    }
}
