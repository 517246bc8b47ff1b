//! Fixed-step frame clock.
//!
//! The clock advances by a fixed increment per rendered frame rather than by
//! measured wall-clock time, so animation speed is a function of frame count,
//! not frame rate. This matches the sketch's intent (a fixed per-frame step)
//! and makes the time sequence fully deterministic for tests.

/// Time increment applied per frame by default.
pub const DEFAULT_STEP: f32 = 0.05;

/// Monotonic time accumulator driven once per rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    elapsed: f32,
    step: f32,
    frame: u64,
}

impl FrameClock {
    /// Create a clock with the default per-frame step.
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            step: DEFAULT_STEP,
            frame: 0,
        }
    }

    /// Create a clock with a custom per-frame step.
    pub fn with_step(step: f32) -> Self {
        Self {
            elapsed: 0.0,
            step,
            frame: 0,
        }
    }

    /// Advance by the configured step and return the new elapsed time.
    pub fn tick(&mut self) -> f32 {
        self.tick_by(self.step)
    }

    /// Advance by an explicit step and return the new elapsed time.
    pub fn tick_by(&mut self, delta: f32) -> f32 {
        self.elapsed += delta;
        self.frame += 1;
        self.elapsed
    }

    /// Accumulated time in seconds of animation.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Configured per-frame step.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Frames ticked since creation or the last reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Reset elapsed time and frame count to zero. The step is kept.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.frame = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 0);
        assert!((clock.step() - DEFAULT_STEP).abs() < 1e-9);
    }

    #[test]
    fn test_tick_advances_by_step() {
        let mut clock = FrameClock::new();
        let t1 = clock.tick();
        let t2 = clock.tick();
        assert!((t1 - 0.05).abs() < 1e-6);
        assert!((t2 - 0.10).abs() < 1e-6);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let deltas = [0.05f32, 0.05, 0.016, 0.1, 0.05];

        let run = |deltas: &[f32]| -> Vec<f32> {
            let mut clock = FrameClock::new();
            deltas.iter().map(|&d| clock.tick_by(d)).collect()
        };

        assert_eq!(run(&deltas), run(&deltas));
    }

    #[test]
    fn test_custom_step() {
        let mut clock = FrameClock::with_step(1.0 / 60.0);
        clock.tick();
        assert!((clock.elapsed() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset_keeps_step() {
        let mut clock = FrameClock::with_step(0.2);
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 0);
        assert!((clock.step() - 0.2).abs() < 1e-9);
    }
}
