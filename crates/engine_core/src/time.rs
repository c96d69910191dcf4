//! Frame clock for the tick loop.

use std::time::{Duration, Instant};

/// Tracks per-tick delta and total elapsed time.
#[derive(Debug)]
pub struct Time {
    /// Time of the last tick.
    last_tick: Instant,
    /// Duration of the last tick.
    delta: Duration,
    /// Total time accumulated through ticks.
    elapsed: Duration,
    /// Ticks since start.
    tick_count: u64,
    /// Target tick length.
    tick_rate: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new(30.0)
    }
}

impl Time {
    /// Clock targeting `hz` ticks per second.
    pub fn new(hz: f64) -> Self {
        Self {
            last_tick: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            tick_count: 0,
            tick_rate: Duration::from_secs_f64(1.0 / hz.max(1.0)),
        }
    }

    /// Measure the wall time since the previous tick.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        self.advance(delta);
    }

    /// Step the clock by a fixed amount (tests, replays).
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.tick_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Time left in the current tick, for sleeping until the next one.
    pub fn remaining_in_tick(&self) -> Duration {
        self.tick_rate.saturating_sub(self.last_tick.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let mut time = Time::new(60.0);
        time.advance(Duration::from_millis(250));
        time.advance(Duration::from_millis(500));
        assert_eq!(time.tick_count(), 2);
        assert!((time.delta_seconds() - 0.5).abs() < 1e-6);
        assert!((time.elapsed_seconds() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn tick_rate_from_hz() {
        let time = Time::new(20.0);
        assert_eq!(time.tick_rate(), Duration::from_millis(50));
        assert!(time.remaining_in_tick() <= Duration::from_millis(50));
    }
}
