//! Damped springs linking consecutive particles of a chain.
//!
//! All springs in a chain share one [`SpringParams`]. For the pair `(i, i+1)`:
//!
//! ```text
//! d   = pos[i] - pos[i+1]
//! dir = d / |d|
//! F   = (k_e * (|d| - L) + k_d * dot(vel[i+1] - vel[i], dir)) * dir
//! ```
//!
//! Particle `i` receives `+F` and particle `i+1` receives `-F`. With the
//! default negative stiffness a stretched spring pulls the pair together.

use crate::error::{ensure_finite, ensure_non_negative, Result};
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Shared spring constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    /// Elasticity `k_e`.
    pub stiffness: f32,
    /// Damping `k_d`.
    pub damping: f32,
    /// Rest length `L`.
    pub rest_length: f32,
}

impl SpringParams {
    pub fn new(stiffness: f32, damping: f32, rest_length: f32) -> Self {
        Self {
            stiffness,
            damping,
            rest_length,
        }
    }

    /// Springs that exert no force at all.
    pub fn slack() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("spring.stiffness", self.stiffness)?;
        ensure_finite("spring.damping", self.damping)?;
        ensure_non_negative("spring.rest_length", self.rest_length)
    }

    /// Force on `a` from the spring joining it to `b`. Zero when they coincide.
    pub fn force_between(&self, a: &Particle, b: &Particle) -> Vec3 {
        let delta = a.position - b.position;
        let dist = delta.length();
        if dist <= 0.0 {
            return Vec3::ZERO;
        }

        let direction = delta / dist;
        let relative_velocity = b.velocity - a.velocity;
        (self.stiffness * (dist - self.rest_length)
            + self.damping * relative_velocity.dot(direction))
            * direction
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::new(-200.0, 13.0, 0.3)
    }
}

/// Accumulate spring forces along `particles` into each particle's `force`.
///
/// Forces are computed from the current state before any of them is applied,
/// so the result does not depend on iteration order.
pub fn accumulate_chain_forces(particles: &mut [Particle], params: &SpringParams) {
    let springs: Vec<Vec3> = particles
        .windows(2)
        .map(|pair| params.force_between(&pair[0], &pair[1]))
        .collect();

    for (i, force) in springs.into_iter().enumerate() {
        particles[i].add_force(force);
        particles[i + 1].add_force(-force);
    }
}
