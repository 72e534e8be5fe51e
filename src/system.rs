//! The particle system: one engine for both emitter and chain topologies.
//!
//! A [`ParticleSystem`] owns its particles, the box walls and the sphere
//! obstacle. Each call to [`ParticleSystem::step`] performs one full tick:
//!
//! 1. Force assembly (gravity; plus springs and the global force scale for chains)
//! 2. Per particle: expiry via the lifecycle policy, or integration followed by
//!    collision against floor, left, right, front, back wall and then the sphere
//! 3. Aging (`life += dt`)
//!
//! Collisions are tested independently and in that fixed order, so a single
//! step may resolve several of them one after another.
//!
//! Reconfiguring springs or the particle count always rebuilds the whole
//! collection from scratch; callers can rely on that reset.

use crate::config::SystemConfig;
use crate::emitter::EmitterKind;
use crate::error::{ensure_positive, Result, SimError};
use crate::geometry::{BoxWalls, Obstacle, Sphere};
use crate::instance::ParticleInstance;
use crate::integrator::Integrator;
use crate::lifecycle::{Lifecycle, LifecyclePolicy};
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::spring::{accumulate_chain_forces, SpringParams};
use crate::time::FixedTimestep;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How particles relate to each other.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Topology {
    /// Independent particles fed by an emitter.
    Free { emitter: EmitterKind },
    /// Particles linked in order by identical springs; particle 0 is fixed.
    Chain { spring: SpringParams },
}

impl Topology {
    pub fn fountain() -> Self {
        Topology::Free {
            emitter: EmitterKind::Fountain,
        }
    }

    pub fn waterfall() -> Self {
        Topology::Free {
            emitter: EmitterKind::Waterfall,
        }
    }

    pub fn chain(spring: SpringParams) -> Self {
        Topology::Chain { spring }
    }

    /// Free particles respawn; chain particles only renew their clock.
    pub fn default_lifecycle(&self) -> LifecyclePolicy {
        match self {
            Topology::Free { .. } => LifecyclePolicy::Respawn,
            Topology::Chain { .. } => LifecyclePolicy::Inert,
        }
    }

    /// Emitter used when a particle of this topology is respawned.
    fn emitter_kind(&self) -> EmitterKind {
        match self {
            Topology::Free { emitter } => *emitter,
            Topology::Chain { .. } => EmitterKind::default(),
        }
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::fountain()
    }
}

/// Step-driven particle engine.
///
/// Particles handed out by [`particle`](Self::particle) or
/// [`particles`](Self::particles) are borrowed, so they cannot change until
/// the next `step` or `initialize`.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    config: SystemConfig,
    walls: BoxWalls,
    sphere: Sphere,
    topology: Topology,
    lifecycle: Lifecycle,
    particles: Vec<Particle>,
    rng: SpawnContext,
}

impl ParticleSystem {
    /// Create an empty system. Call [`initialize`](Self::initialize) to populate it.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        let topology = Topology::default();
        Ok(Self {
            walls: BoxWalls::new(config.box_half_extent),
            sphere: config.sphere,
            lifecycle: Lifecycle::new(config.lifetime, topology.default_lifecycle()),
            rng: SpawnContext::new(config.seed),
            topology,
            particles: Vec::new(),
            config,
        })
    }

    /// Discard every particle and build `count` new ones for `topology`.
    ///
    /// The random source is reseeded from the configured seed, so the same
    /// configuration always produces the same initial state.
    pub fn initialize(&mut self, count: usize, topology: Topology) -> Result<()> {
        if let Topology::Chain { spring } = topology {
            spring.validate()?;
            self.config.spring = spring;
        }

        self.rng.reseed(self.config.seed);
        self.topology = topology;
        self.lifecycle = Lifecycle::new(self.config.lifetime, topology.default_lifecycle());

        self.particles = match topology {
            Topology::Free { emitter } => (0..count)
                .map(|_| self.spawn_free(emitter))
                .collect::<Result<Vec<_>>>()?,
            Topology::Chain { spring } => (0..count)
                .map(|i| self.spawn_link(i, &spring))
                .collect::<Result<Vec<_>>>()?,
        };

        log::debug!(
            "initialized {} particles ({:?}, seed {})",
            self.particles.len(),
            self.topology,
            self.config.seed
        );
        Ok(())
    }

    fn spawn_free(&mut self, kind: EmitterKind) -> Result<Particle> {
        let lifetime = self.lifecycle.draw_lifetime(&mut self.rng);
        let emission = self.config.emitter.emit(kind, &mut self.rng);
        Particle::new(emission.position)
            .with_velocity(emission.velocity)
            .with_mass(emission.mass)?
            .with_restitution(emission.restitution)?
            .with_lifetime(lifetime)
    }

    fn spawn_link(&mut self, index: usize, spring: &SpringParams) -> Result<Particle> {
        let lifetime = self.lifecycle.draw_lifetime(&mut self.rng);
        let chain = &self.config.chain;
        if index == 0 {
            return Particle::anchored(chain.anchor).with_lifetime(lifetime);
        }
        Particle::new(chain.position_of(index, spring.rest_length))
            .with_mass(chain.mass)?
            .with_restitution(chain.restitution)?
            .with_lifetime(lifetime)
    }

    /// Advance the simulation by one tick of `dt` using `method`.
    pub fn step(&mut self, dt: f32, method: Integrator) -> Result<()> {
        ensure_positive("dt", dt)?;
        self.assemble_forces();

        let kind = self.topology.emitter_kind();
        let Self {
            config,
            walls,
            sphere,
            lifecycle,
            particles,
            rng,
            ..
        } = self;

        for (index, particle) in particles.iter_mut().enumerate() {
            if particle.fixed {
                continue;
            }

            if particle.is_expired() {
                let outcome = lifecycle.expire(particle, &config.emitter, kind, rng)?;
                log::trace!("particle {index} expired: {outcome:?}");
            } else {
                particle.integrate(dt, method);
                resolve_collisions(index, particle, walls, sphere);
            }

            particle.age(dt);
        }
        Ok(())
    }

    /// Run as many fixed steps as `clock` grants for this frame.
    ///
    /// Returns the number of steps taken. The step length is always the
    /// clock's, never the frame delta.
    pub fn advance(
        &mut self,
        clock: &mut FixedTimestep,
        frame_delta: f32,
        method: Integrator,
    ) -> Result<u32> {
        let steps = clock.advance(frame_delta)?;
        for _ in 0..steps {
            self.step(clock.step(), method)?;
        }
        Ok(steps)
    }

    fn assemble_forces(&mut self) {
        let gravity = Vec3::new(0.0, -self.config.gravity, 0.0);

        match self.topology {
            Topology::Free { .. } => {
                for p in &mut self.particles {
                    p.force = gravity;
                }
            }
            Topology::Chain { spring } => {
                for p in &mut self.particles {
                    p.force = Vec3::ZERO;
                }
                accumulate_chain_forces(&mut self.particles, &spring);
                let scale = self.config.force_scale;
                for p in &mut self.particles {
                    p.force = (p.force + gravity) * scale;
                }
            }
        }
    }

    // ========== Snapshot access ==========

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle(&self, index: usize) -> Result<&Particle> {
        let count = self.particles.len();
        self.particles
            .get(index)
            .ok_or(SimError::IndexOutOfRange { index, count })
    }

    /// Mutable access for scripted setups and tests.
    pub fn particle_mut(&mut self, index: usize) -> Result<&mut Particle> {
        let count = self.particles.len();
        self.particles
            .get_mut(index)
            .ok_or(SimError::IndexOutOfRange { index, count })
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    /// Instance data for the renderer, one entry per particle.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles.iter().map(ParticleInstance::from).collect()
    }

    /// Current force of the spring between particles `index` and `index + 1`.
    pub fn spring_force(&self, index: usize) -> Result<Vec3> {
        let count = self.particles.len();
        if index >= count.saturating_sub(1) {
            return Err(SimError::IndexOutOfRange { index, count });
        }
        Ok(self
            .config
            .spring
            .force_between(&self.particles[index], &self.particles[index + 1]))
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn walls(&self) -> &BoxWalls {
        &self.walls
    }

    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    pub fn lifecycle_policy(&self) -> LifecyclePolicy {
        self.lifecycle.policy
    }

    /// Override the expiry policy until the next `initialize`.
    pub fn set_lifecycle_policy(&mut self, policy: LifecyclePolicy) {
        self.lifecycle.policy = policy;
    }

    // ========== Reconfiguration (always resets) ==========

    /// Set spring damping `k_d` and rebuild the system.
    pub fn set_spring_damping(&mut self, damping: f32) -> Result<()> {
        let spring = SpringParams {
            damping,
            ..self.config.spring
        };
        self.reconfigure_spring(spring)
    }

    /// Set spring elasticity `k_e` and rebuild the system.
    pub fn set_spring_elasticity(&mut self, stiffness: f32) -> Result<()> {
        let spring = SpringParams {
            stiffness,
            ..self.config.spring
        };
        self.reconfigure_spring(spring)
    }

    /// Set spring rest length `L` and rebuild the system.
    pub fn set_spring_length(&mut self, rest_length: f32) -> Result<()> {
        let spring = SpringParams {
            rest_length,
            ..self.config.spring
        };
        self.reconfigure_spring(spring)
    }

    fn reconfigure_spring(&mut self, spring: SpringParams) -> Result<()> {
        spring.validate()?;
        self.config.spring = spring;
        if let Topology::Chain { .. } = self.topology {
            self.topology = Topology::Chain { spring };
        }
        log::debug!("spring changed to {spring:?}, resetting");
        self.reset()
    }

    /// Rebuild with a new particle count and the current topology.
    pub fn set_particle_count(&mut self, count: usize) -> Result<()> {
        self.initialize(count, self.topology)
    }

    /// Seed used by the next `initialize`.
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
    }

    /// Rebuild with the current count and topology.
    pub fn reset(&mut self) -> Result<()> {
        self.initialize(self.particles.len(), self.topology)
    }
}

/// Test and resolve every obstacle in fixed order. Returns the number of hits.
fn resolve_collisions(index: usize, particle: &mut Particle, walls: &BoxWalls, sphere: &Sphere) -> usize {
    let mut hits = 0;

    for (obstacle, plane) in walls.iter() {
        if particle.collides_with_plane(plane) {
            particle.resolve_plane_collision(plane);
            log::trace!("particle {index} hit {obstacle:?}");
            hits += 1;
        }
    }

    if particle.collides_with_sphere(sphere) {
        particle.resolve_sphere_collision(sphere);
        log::trace!("particle {index} hit {:?}", Obstacle::Sphere);
        hits += 1;
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::Span;

    fn system() -> ParticleSystem {
        ParticleSystem::new(SystemConfig::default().with_seed(3)).unwrap()
    }

    #[test]
    fn test_new_system_is_empty() {
        let s = system();
        assert!(s.is_empty());
        assert_eq!(s.topology(), Topology::fountain());
        assert!(matches!(
            s.particle(0),
            Err(SimError::IndexOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SystemConfig::default().with_lifetime(Span::new(-2.0, 1.0));
        assert!(ParticleSystem::new(config).is_err());
    }

    #[test]
    fn test_free_initialize_uses_emitter() {
        let mut s = system();
        s.initialize(50, Topology::waterfall()).unwrap();
        assert_eq!(s.len(), 50);
        let (min, max) = s.config().emitter.bounds();
        for p in s.particles() {
            assert!(p.position.cmpge(min).all() && p.position.cmple(max).all());
            assert!(!p.fixed);
            assert_eq!(p.life(), 0.0);
            assert!(s.config().lifetime.contains(p.lifetime()));
        }
        assert_eq!(s.lifecycle_policy(), LifecyclePolicy::Respawn);
    }

    #[test]
    fn test_chain_initialize_layout() {
        let mut s = system();
        s.initialize(5, Topology::chain(SpringParams::default())).unwrap();
        let p0 = s.particle(0).unwrap();
        assert!(p0.fixed);
        assert_eq!(p0.position, Vec3::new(-4.0, 0.0, 0.0));

        let p3 = s.particle(3).unwrap();
        assert!(!p3.fixed);
        assert!(p3.position.abs_diff_eq(Vec3::new(-4.0 + 3.0 * 0.33, 0.0, 0.0), 1e-5));
        assert_eq!(p3.mass(), 0.1);
        assert_eq!(p3.restitution(), 1.0);
        assert_eq!(s.lifecycle_policy(), LifecyclePolicy::Inert);
    }

    #[test]
    fn test_step_rejects_bad_dt() {
        let mut s = system();
        s.initialize(3, Topology::fountain()).unwrap();
        assert!(s.step(0.0, Integrator::Verlet).is_err());
        assert!(s.step(-0.1, Integrator::EulerOriginal).is_err());
        assert!(s.step(f32::NAN, Integrator::EulerOriginal).is_err());
    }

    #[test]
    fn test_free_mode_applies_gravity() {
        let mut s = system();
        s.initialize(1, Topology::fountain()).unwrap();
        let v0 = s.particle(0).unwrap().velocity;
        s.step(0.01, Integrator::EulerSemiImplicit).unwrap();
        let p = s.particle(0).unwrap();
        assert!((p.velocity.y - (v0.y - 9.8 * 0.01)).abs() < 1e-5);
        assert_eq!(p.force, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(p.life(), 0.01);
    }

    #[test]
    fn test_chain_forces_scaled_by_force_scale() {
        let mut s = ParticleSystem::new(SystemConfig::default().with_force_scale(0.5)).unwrap();
        s.initialize(3, Topology::chain(SpringParams::slack())).unwrap();
        s.step(0.01, Integrator::EulerSemiImplicit).unwrap();
        for p in &s.particles()[1..] {
            assert!(p.force.abs_diff_eq(Vec3::new(0.0, -4.9, 0.0), 1e-6));
        }
    }

    #[test]
    fn test_spring_force_query() {
        let mut s = system();
        s.initialize(3, Topology::chain(SpringParams::default())).unwrap();
        // Initial spacing is 1.1 L, so every spring is stretched and pulls toward +X on i.
        let f = s.spring_force(0).unwrap();
        assert!(f.x > 0.0);
        assert!(matches!(
            s.spring_force(2),
            Err(SimError::IndexOutOfRange { index: 2, count: 3 })
        ));
    }

    #[test]
    fn test_spring_force_query_rejects_huge_index() {
        let mut s = system();
        assert!(matches!(
            s.spring_force(0),
            Err(SimError::IndexOutOfRange { index: 0, count: 0 })
        ));
        s.initialize(3, Topology::chain(SpringParams::default())).unwrap();
        assert!(matches!(
            s.spring_force(usize::MAX),
            Err(SimError::IndexOutOfRange { index: usize::MAX, count: 3 })
        ));
        assert!(s.spring_force(1).is_ok());
    }

    #[test]
    fn test_setters_reset_chain() {
        let mut s = system();
        s.initialize(4, Topology::chain(SpringParams::default())).unwrap();
        for _ in 0..10 {
            s.step(0.01, Integrator::EulerSemiImplicit).unwrap();
        }
        s.set_spring_length(0.5).unwrap();

        assert_eq!(s.len(), 4);
        assert_eq!(s.config().spring.rest_length, 0.5);
        assert_eq!(s.topology(), Topology::chain(SpringParams::new(-200.0, 13.0, 0.5)));
        let p2 = s.particle(2).unwrap();
        assert!(p2.position.abs_diff_eq(Vec3::new(-4.0 + 2.0 * 0.55, 0.0, 0.0), 1e-5));
        assert_eq!(p2.velocity, Vec3::ZERO);

        s.set_spring_damping(1.0).unwrap();
        s.set_spring_elasticity(-50.0).unwrap();
        assert_eq!(s.config().spring, SpringParams::new(-50.0, 1.0, 0.5));
        assert!(s.set_spring_length(-1.0).is_err());
        assert_eq!(s.config().spring.rest_length, 0.5);
    }

    #[test]
    fn test_setters_reset_free_mode_too() {
        let mut s = system();
        s.initialize(8, Topology::fountain()).unwrap();
        let initial: Vec<Vec3> = s.positions().collect();
        for _ in 0..20 {
            s.step(0.05, Integrator::EulerOriginal).unwrap();
        }
        s.set_spring_damping(2.0).unwrap();
        assert_eq!(s.topology(), Topology::fountain());
        assert_eq!(s.positions().collect::<Vec<_>>(), initial);
    }

    #[test]
    fn test_set_particle_count() {
        let mut s = system();
        s.initialize(4, Topology::waterfall()).unwrap();
        s.set_particle_count(9).unwrap();
        assert_eq!(s.len(), 9);
        assert_eq!(s.topology(), Topology::waterfall());
    }

    #[test]
    fn test_instances_match_positions() {
        let mut s = system();
        s.initialize(6, Topology::fountain()).unwrap();
        let instances = s.instances();
        for (instance, pos) in instances.iter().zip(s.positions()) {
            assert_eq!(instance.position, pos.to_array());
        }
    }

    #[test]
    fn test_multiple_wall_hits_in_one_step() {
        let walls = BoxWalls::new(6.0);
        let sphere = Sphere::new(Vec3::new(0.0, -4.45, 0.0), 1.55);
        let mut p = Particle::new(Vec3::new(6.2, -6.1, 0.0))
            .with_restitution(1.0)
            .unwrap()
            .with_velocity(Vec3::new(1.0, -1.0, 0.0));
        p.previous_position = Vec3::new(5.9, -5.9, 0.0);

        assert_eq!(resolve_collisions(0, &mut p, &walls, &sphere), 2);
        assert!(p.velocity.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-6));
        assert!(p.position.abs_diff_eq(Vec3::new(5.8, -5.9, 0.0), 1e-5));
    }
}
