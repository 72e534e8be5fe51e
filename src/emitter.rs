//! Particle emitters for the free topology.
//!
//! An emitter decides where a particle (re)appears, how fast it leaves, and
//! which mass and restitution it gets. Two patterns are available:
//!
//! | Kind | Velocity |
//! |------|----------|
//! | [`EmitterKind::Fountain`] | strong upward launch, lateral spread in x and z |
//! | [`EmitterKind::Waterfall`] | no launch, small lateral drift, falls under gravity |
//!
//! Spawn positions lie on a short downward diagonal starting at the emitter
//! origin: `origin + t * (1, -1, 1)` with `t` in `[0, spread)`.

use crate::error::{ensure_finite_vec, ensure_non_negative, Result};
use crate::spawn::{SpawnContext, Span};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Vertical launch speed of fountain particles.
pub const FOUNTAIN_LIFT: f32 = 5.0;

/// Emission pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmitterKind {
    #[default]
    Fountain,
    Waterfall,
}

/// Where and how particles are emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emitter {
    /// Start of the spawn diagonal.
    pub origin: Vec3,
    /// Length parameter of the spawn diagonal.
    pub spread: f32,
    /// Mass sampled per (re)spawn.
    pub mass: Span,
    /// Restitution sampled per (re)spawn. Values above 1 amplify bounces.
    pub restitution: Span,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 9.0, 0.0),
            spread: 2.0,
            mass: Span::new(1.0, 10.0),
            restitution: Span::new(0.5, 1.5),
        }
    }
}

/// One freshly drawn particle state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emission {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub restitution: f32,
}

impl Emitter {
    pub fn validate(&self) -> Result<()> {
        ensure_finite_vec("emitter.origin", self.origin)?;
        ensure_non_negative("emitter.spread", self.spread)?;
        crate::config::validate_span("emitter.mass", self.mass, true)?;
        crate::config::validate_span("emitter.restitution", self.restitution, false)
    }

    /// Axis-aligned box containing every possible spawn position.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let corner = self.origin + Vec3::new(self.spread, -self.spread, self.spread);
        (self.origin.min(corner), self.origin.max(corner))
    }

    /// Draw a spawn position, velocity, mass and restitution.
    pub fn emit(&self, kind: EmitterKind, ctx: &mut SpawnContext) -> Emission {
        let t = ctx.random_range(0.0, self.spread);
        let position = self.origin + Vec3::new(t, -t, t);

        let velocity = match kind {
            EmitterKind::Fountain => Vec3::new(
                2.0 * (ctx.random() - 0.5),
                FOUNTAIN_LIFT,
                2.0 * ctx.random(),
            ),
            EmitterKind::Waterfall => Vec3::new(ctx.random() - 0.5, 0.0, 0.5 * ctx.random()),
        };

        Emission {
            position,
            velocity,
            mass: ctx.sample(self.mass),
            restitution: ctx.sample(self.restitution),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(p: Vec3, (min, max): (Vec3, Vec3)) -> bool {
        p.cmpge(min).all() && p.cmple(max).all()
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let emitter = Emitter::default();
        let mut ctx = SpawnContext::new(11);
        for kind in [EmitterKind::Fountain, EmitterKind::Waterfall] {
            for _ in 0..200 {
                let e = emitter.emit(kind, &mut ctx);
                assert!(within(e.position, emitter.bounds()));
                assert!(emitter.mass.contains(e.mass));
                assert!(emitter.restitution.contains(e.restitution));
            }
        }
    }

    #[test]
    fn test_fountain_goes_up() {
        let emitter = Emitter::default();
        let mut ctx = SpawnContext::new(5);
        for _ in 0..100 {
            let v = emitter.emit(EmitterKind::Fountain, &mut ctx).velocity;
            assert_eq!(v.y, FOUNTAIN_LIFT);
            assert!(v.x >= -1.0 && v.x < 1.0);
            assert!(v.z >= 0.0 && v.z < 2.0);
        }
    }

    #[test]
    fn test_waterfall_has_no_launch() {
        let emitter = Emitter::default();
        let mut ctx = SpawnContext::new(5);
        for _ in 0..100 {
            let v = emitter.emit(EmitterKind::Waterfall, &mut ctx).velocity;
            assert_eq!(v.y, 0.0);
            assert!(v.x >= -0.5 && v.x < 0.5);
            assert!(v.z >= 0.0 && v.z < 0.5);
        }
    }

    #[test]
    fn test_zero_spread_spawns_at_origin() {
        let emitter = Emitter {
            spread: 0.0,
            ..Default::default()
        };
        let mut ctx = SpawnContext::new(2);
        assert_eq!(emitter.emit(EmitterKind::Fountain, &mut ctx).position, emitter.origin);
    }

    #[test]
    fn test_validate_rejects_zero_mass() {
        let emitter = Emitter {
            mass: Span::new(0.0, 1.0),
            ..Default::default()
        };
        assert!(emitter.validate().is_err());
        assert!(Emitter::default().validate().is_ok());
    }
}
