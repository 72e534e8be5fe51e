//! Render-side snapshot of the particle collection.
//!
//! The renderer draws one instanced mesh per particle and only needs its
//! position. [`ParticleInstance`] is `Pod`, so a slice of them can be handed
//! to a vertex buffer with `bytemuck::cast_slice`.

use crate::particle::Particle;
use bytemuck::{Pod, Zeroable};

/// Per-instance vertex data. 16 bytes, no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    /// `life / lifetime` clamped to `[0, 1]`; usable for fading.
    pub age: f32,
}

impl From<&Particle> for ParticleInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            age: p.life_fraction(),
        }
    }
}
