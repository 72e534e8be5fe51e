//! # springbox
//!
//! A small, step-driven particle engine: emitters, spring chains and
//! collisions against the walls of a box and a sphere obstacle.
//!
//! The engine is synchronous and deterministic. One call to
//! [`ParticleSystem::step`] integrates every particle and resolves every
//! collision before returning; given a seed and a `dt` sequence, the result is
//! always the same. Rendering is someone else's job - read positions with
//! [`ParticleSystem::positions`] or [`ParticleSystem::instances`] between steps.
//!
//! ## Quick Start
//!
//! ```ignore
//! use springbox::prelude::*;
//!
//! let mut system = ParticleSystem::new(SystemConfig::default().with_seed(42))?;
//! system.initialize(500, Topology::fountain())?;
//!
//! let mut clock = FixedTimestep::new(0.01)?;
//! loop {
//!     system.advance(&mut clock, frame_delta, Integrator::EulerSemiImplicit)?;
//!     for position in system.positions() {
//!         // draw an instance at `position`
//!     }
//! }
//! ```
//!
//! ## Topologies
//!
//! | Topology | Forces | Expiry |
//! |----------|--------|--------|
//! | [`Topology::Free`] | gravity | respawn at the emitter |
//! | [`Topology::Chain`] | gravity + springs, all scaled by `force_scale` | clock reset only |
//!
//! ## Integrators
//!
//! [`Integrator::EulerOriginal`], [`Integrator::EulerSemiImplicit`] and
//! [`Integrator::Verlet`] can be switched between steps.
//!
//! ## Reconfiguration
//!
//! [`ParticleSystem::set_spring_damping`], [`ParticleSystem::set_spring_elasticity`],
//! [`ParticleSystem::set_spring_length`] and [`ParticleSystem::set_particle_count`]
//! all rebuild the particle collection from scratch.

pub mod config;
pub mod emitter;
pub mod error;
pub mod geometry;
pub mod instance;
pub mod integrator;
pub mod lifecycle;
pub mod particle;
pub mod spawn;
pub mod spring;
mod system;
pub mod time;

pub use bytemuck;
pub use config::{ChainConfig, ChainLayout, SystemConfig};
pub use emitter::{Emitter, EmitterKind};
pub use error::{Result, SimError};
pub use geometry::{BoxWalls, Obstacle, Plane, Sphere};
pub use glam::Vec3;
pub use instance::ParticleInstance;
pub use integrator::Integrator;
pub use lifecycle::LifecyclePolicy;
pub use particle::Particle;
pub use spawn::Span;
pub use spring::SpringParams;
pub use system::{ParticleSystem, Topology};
pub use time::FixedTimestep;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use springbox::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ChainConfig, ChainLayout, SystemConfig};
    pub use crate::emitter::{Emitter, EmitterKind};
    pub use crate::error::{Result, SimError};
    pub use crate::geometry::{Plane, Sphere};
    pub use crate::instance::ParticleInstance;
    pub use crate::integrator::Integrator;
    pub use crate::lifecycle::LifecyclePolicy;
    pub use crate::particle::Particle;
    pub use crate::spawn::Span;
    pub use crate::spring::SpringParams;
    pub use crate::system::{ParticleSystem, Topology};
    pub use crate::time::FixedTimestep;
    pub use crate::Vec3;
}
