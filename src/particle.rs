//! Per-particle kinematic state, integration and collision response.
//!
//! A [`Particle`] knows how to advance itself one step with any
//! [`Integrator`] and how to detect and correct a crossing of a [`Plane`] or
//! an entry into a [`Sphere`]. It does not know about other particles; forces
//! are assembled by the owning [`ParticleSystem`](crate::ParticleSystem).

use crate::error::{ensure_non_negative, ensure_positive, Result};
use crate::geometry::{Plane, Sphere};
use crate::integrator::{Integrator, VERLET_DAMPING};
use glam::Vec3;

/// Restitution used for every sphere contact, regardless of the particle's own.
///
/// `1 + (-0.9)` leaves a tenth of the normal correction, so sphere hits are a
/// soft push out along the tangent plane rather than a bounce.
pub const SPHERE_RESTITUTION: f32 = -0.9;

/// Lifetime given to particles built without an explicit one.
pub const DEFAULT_LIFETIME: f32 = 15.0;

/// A point mass.
///
/// Kinematic vectors are public. Scalars with invariants (mass > 0,
/// restitution, life and lifetime >= 0) go through validated setters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position at the end of the last step.
    pub position: Vec3,
    /// Position at the start of the last step.
    pub previous_position: Vec3,
    pub velocity: Vec3,
    /// Accumulated force for the next integration.
    pub force: Vec3,
    /// Fixed particles are never moved by integration or collisions.
    pub fixed: bool,
    mass: f32,
    restitution: f32,
    life: f32,
    lifetime: f32,
}

impl Particle {
    /// A resting particle of unit mass at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            fixed: false,
            mass: 1.0,
            restitution: 0.0,
            life: 0.0,
            lifetime: DEFAULT_LIFETIME,
        }
    }

    /// A fixed particle (chain anchor) at `position`.
    pub fn anchored(position: Vec3) -> Self {
        Self {
            fixed: true,
            ..Self::new(position)
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Result<Self> {
        self.set_mass(mass)?;
        Ok(self)
    }

    pub fn with_restitution(mut self, restitution: f32) -> Result<Self> {
        self.set_restitution(restitution)?;
        Ok(self)
    }

    pub fn with_lifetime(mut self, lifetime: f32) -> Result<Self> {
        self.set_lifetime(lifetime)?;
        Ok(self)
    }

    // ========== Accessors ==========

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Time alive since the last (re)spawn.
    #[inline]
    pub fn life(&self) -> f32 {
        self.life
    }

    #[inline]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Whether the particle has reached the end of its lifetime.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.life >= self.lifetime
    }

    /// Fraction of lifetime used, clamped to `[0, 1]`.
    pub fn life_fraction(&self) -> f32 {
        if self.lifetime > 0.0 {
            (self.life / self.lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        ensure_positive("mass", mass)?;
        self.mass = mass;
        Ok(())
    }

    pub fn set_restitution(&mut self, restitution: f32) -> Result<()> {
        ensure_non_negative("restitution", restitution)?;
        self.restitution = restitution;
        Ok(())
    }

    pub fn set_life(&mut self, life: f32) -> Result<()> {
        ensure_non_negative("life", life)?;
        self.life = life;
        Ok(())
    }

    pub fn set_lifetime(&mut self, lifetime: f32) -> Result<()> {
        ensure_non_negative("lifetime", lifetime)?;
        self.lifetime = lifetime;
        Ok(())
    }

    /// Teleport without leaving a trail: both position samples move.
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
        self.previous_position = position;
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub(crate) fn age(&mut self, dt: f32) {
        self.life += dt;
    }

    pub(crate) fn reset_life(&mut self) {
        self.life = 0.0;
    }

    // ========== Integration ==========

    /// Advance one step of `dt` with `method`. Fixed particles are untouched.
    ///
    /// `dt` must be positive; the Verlet scheme divides by it.
    pub fn integrate(&mut self, dt: f32, method: Integrator) {
        if self.fixed {
            return;
        }

        match method {
            Integrator::EulerOriginal => {
                self.previous_position = self.position;
                self.position += self.velocity * dt;
                self.velocity += self.force * dt;
            }
            Integrator::EulerSemiImplicit => {
                self.previous_position = self.position;
                self.velocity += self.force * dt;
                self.position += self.velocity * dt;
            }
            Integrator::Verlet => {
                self.velocity = (self.position - self.previous_position) / dt;
                self.previous_position = self.position;
                self.position +=
                    VERLET_DAMPING * (self.velocity * dt) + self.force * (dt * dt) / self.mass;
            }
        }
    }

    // ========== Planes ==========

    /// Whether the last step's path crossed (or touched) `plane`.
    pub fn collides_with_plane(&self, plane: &Plane) -> bool {
        plane.signed_distance(self.position) * plane.signed_distance(self.previous_position)
            <= 0.0
    }

    /// Reflect position and velocity about `plane`, scaled by `1 + restitution`.
    pub fn resolve_plane_collision(&mut self, plane: &Plane) {
        self.reflect(plane, self.restitution);
    }

    fn reflect(&mut self, plane: &Plane, restitution: f32) {
        let k = 1.0 + restitution;
        self.position -= k * plane.signed_distance(self.position) * plane.normal;
        self.velocity -= k * self.velocity.dot(plane.normal) * plane.normal;
    }

    // ========== Sphere ==========

    /// Whether the last step moved the particle from outside `sphere` to inside.
    ///
    /// Compares linear distance to the center against the radius on both
    /// sides. Non-solid spheres (radius <= 0) never collide.
    pub fn collides_with_sphere(&self, sphere: &Sphere) -> bool {
        if !sphere.is_solid() {
            return false;
        }
        let dist_prev = self.previous_position.distance(sphere.center);
        let dist_now = self.position.distance(sphere.center);
        dist_now <= sphere.radius && dist_prev > sphere.radius
    }

    /// Push the particle out along the sphere's tangent plane.
    ///
    /// The contact point is where the ray from the center through the previous
    /// position meets the surface. The plane normal is `contact - center`, not
    /// normalized, so the correction scales with `radius²`. Always uses
    /// [`SPHERE_RESTITUTION`].
    pub fn resolve_sphere_collision(&mut self, sphere: &Sphere) {
        let Some(direction) = (self.previous_position - sphere.center).try_normalize() else {
            return;
        };
        let contact = sphere.center + sphere.radius * direction;
        let tangent = Plane::new(contact, contact - sphere.center);
        self.reflect(&tangent, SPHERE_RESTITUTION);
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
