//! Particle lifecycle policies.
//!
//! Every particle carries `life` (time since spawn) and `lifetime`. When
//! `life >= lifetime` the particle is *expired* and the active
//! [`LifecyclePolicy`] decides what happens on the next step:
//!
//! | Policy | On expiry |
//! |--------|-----------|
//! | [`LifecyclePolicy::Respawn`] | new emitter position, velocity, mass and restitution; `life = 0` |
//! | [`LifecyclePolicy::Inert`] | `life = 0` only; position and velocity are kept |
//!
//! In both cases the expired particle skips integration and collisions for
//! that step. Particles are never removed from the system.

use crate::emitter::{Emitter, EmitterKind};
use crate::error::Result;
use crate::particle::Particle;
use crate::spawn::{SpawnContext, Span};
use serde::{Deserialize, Serialize};

/// What to do with an expired particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecyclePolicy {
    /// Reset in place through the emitter.
    Respawn,
    /// Reset the clock and nothing else.
    Inert,
}

/// Outcome of [`Lifecycle::expire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    Respawned,
    Renewed,
}

/// Lifetime sampling plus the active expiry policy.
#[derive(Clone, Debug, PartialEq)]
pub struct Lifecycle {
    pub lifetime: Span,
    pub policy: LifecyclePolicy,
}

impl Lifecycle {
    pub fn new(lifetime: Span, policy: LifecyclePolicy) -> Self {
        Self { lifetime, policy }
    }

    /// Draw a lifetime for a newly constructed particle.
    pub fn draw_lifetime(&self, ctx: &mut SpawnContext) -> f32 {
        ctx.sample(self.lifetime)
    }

    /// Apply the policy to an expired particle.
    pub fn expire(
        &self,
        particle: &mut Particle,
        emitter: &Emitter,
        kind: EmitterKind,
        ctx: &mut SpawnContext,
    ) -> Result<Expiry> {
        match self.policy {
            LifecyclePolicy::Respawn => {
                respawn(particle, emitter, kind, ctx)?;
                Ok(Expiry::Respawned)
            }
            LifecyclePolicy::Inert => {
                particle.reset_life();
                Ok(Expiry::Renewed)
            }
        }
    }
}

/// Re-emit `particle` in place.
///
/// The previous position is moved along with the position so the next Verlet
/// step does not see the jump as velocity. Verlet reads velocity from that
/// history only, so the drawn `velocity` has no effect under Verlet; the
/// particle starts from rest and falls.
pub fn respawn(
    particle: &mut Particle,
    emitter: &Emitter,
    kind: EmitterKind,
    ctx: &mut SpawnContext,
) -> Result<()> {
    let emission = emitter.emit(kind, ctx);
    particle.place(emission.position);
    particle.velocity = emission.velocity;
    particle.force = glam::Vec3::ZERO;
    particle.set_mass(emission.mass)?;
    particle.set_restitution(emission.restitution)?;
    particle.reset_life();
    Ok(())
}
