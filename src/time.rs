//! Fixed-step simulation clock.
//!
//! Rendering runs at whatever rate the display allows, but the engine should
//! always advance in identical `dt` increments so runs stay deterministic.
//! [`FixedTimestep`] accumulates frame time and reports how many fixed steps
//! to run.
//!
//! # Example
//!
//! ```ignore
//! use springbox::time::FixedTimestep;
//!
//! let mut clock = FixedTimestep::new(0.01)?;
//!
//! // In your frame loop:
//! let steps = system.advance(&mut clock, frame_delta, Integrator::Verlet)?;
//! println!("ran {} steps, {:.2}s simulated", steps, clock.elapsed());
//! ```

use crate::error::{ensure_non_negative, ensure_positive, Result};

/// Default upper bound on steps per frame before time is dropped.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 8;

/// Accumulator turning variable frame deltas into fixed simulation steps.
#[derive(Clone, Debug)]
pub struct FixedTimestep {
    /// Simulation step length in seconds.
    step: f32,
    /// Unsimulated time carried to the next frame.
    accumulator: f32,
    /// Steps allowed per frame; excess time is discarded.
    max_substeps: u32,
    /// Time scale multiplier (1.0 = normal speed).
    time_scale: f32,
    paused: bool,
    /// Total simulated time.
    elapsed: f64,
    /// Total steps handed out.
    steps_taken: u64,
}

impl FixedTimestep {
    pub fn new(step: f32) -> Result<Self> {
        ensure_positive("step", step)?;
        Ok(Self {
            step,
            accumulator: 0.0,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            time_scale: 1.0,
            paused: false,
            elapsed: 0.0,
            steps_taken: 0,
        })
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    /// Feed one frame's wall-clock delta. Returns the number of fixed steps to run.
    pub fn advance(&mut self, frame_delta: f32) -> Result<u32> {
        ensure_non_negative("frame_delta", frame_delta)?;
        if self.paused {
            return Ok(0);
        }

        self.accumulator += frame_delta * self.time_scale;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            log::warn!(
                "fixed timestep fell behind, dropping {:.4}s of simulation time",
                self.accumulator
            );
            self.accumulator %= self.step;
        }

        self.elapsed += steps as f64 * self.step as f64;
        self.steps_taken += steps as u64;
        Ok(steps)
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Fraction of a step left in the accumulator, for render interpolation.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total simulated seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// While paused, `advance` reports zero steps and accumulates nothing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set time scale multiplier. Negative values clamp to 0.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Drop any carried time and counters.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.elapsed = 0.0;
        self.steps_taken = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedTimestep::new(0.25).unwrap();
        assert_eq!(clock.advance(0.125).unwrap(), 0);
        assert_eq!(clock.advance(0.125).unwrap(), 1);
        assert_eq!(clock.advance(0.5).unwrap(), 2);
        assert_eq!(clock.steps_taken(), 3);
        assert_eq!(clock.elapsed(), 0.75);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_substep_cap_drops_time() {
        let mut clock = FixedTimestep::new(0.25).unwrap().with_max_substeps(2);
        assert_eq!(clock.advance(2.0).unwrap(), 2);
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.advance(0.0).unwrap(), 0);
    }

    #[test]
    fn test_pause() {
        let mut clock = FixedTimestep::new(0.25).unwrap();
        clock.pause();
        assert!(clock.is_paused());
        assert_eq!(clock.advance(1.0).unwrap(), 0);
        clock.toggle_pause();
        assert_eq!(clock.advance(0.5).unwrap(), 2);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FixedTimestep::new(0.25).unwrap();
        clock.set_time_scale(2.0);
        assert_eq!(clock.advance(0.25).unwrap(), 2);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.advance(10.0).unwrap(), 0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(FixedTimestep::new(0.0).is_err());
        let mut clock = FixedTimestep::new(0.1).unwrap();
        assert!(clock.advance(-0.1).is_err());
    }
}
