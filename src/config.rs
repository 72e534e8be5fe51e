//! System configuration.
//!
//! [`SystemConfig`] is a plain serde aggregate so it can be stored next to a
//! scene or tweaked from a JSON file. Missing fields take their defaults.
//!
//! ```ignore
//! let config = SystemConfig::from_json(r#"{ "seed": 7, "gravity": 3.7 }"#)?;
//! let mut system = ParticleSystem::new(config)?;
//! ```

use crate::emitter::Emitter;
use crate::error::{ensure_finite, ensure_finite_vec, ensure_non_negative, ensure_positive, Result};
use crate::geometry::Sphere;
use crate::spawn::Span;
use crate::spring::SpringParams;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Direction a chain is laid out in from its anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainLayout {
    /// Along +X.
    #[default]
    Horizontal,
    /// Hanging along -Y.
    Vertical,
}

impl ChainLayout {
    pub fn direction(&self) -> Vec3 {
        match self {
            ChainLayout::Horizontal => Vec3::X,
            ChainLayout::Vertical => Vec3::NEG_Y,
        }
    }
}

/// Initial placement and material of chain particles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Position of the fixed particle 0.
    pub anchor: Vec3,
    pub layout: ChainLayout,
    /// Initial spacing as a multiple of the spring rest length.
    pub spacing_factor: f32,
    pub mass: f32,
    pub restitution: f32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            anchor: Vec3::new(-4.0, 0.0, 0.0),
            layout: ChainLayout::Horizontal,
            spacing_factor: 1.1,
            mass: 0.1,
            restitution: 1.0,
        }
    }
}

impl ChainConfig {
    fn validate(&self) -> Result<()> {
        ensure_finite_vec("chain.anchor", self.anchor)?;
        ensure_non_negative("chain.spacing_factor", self.spacing_factor)?;
        ensure_positive("chain.mass", self.mass)?;
        ensure_non_negative("chain.restitution", self.restitution)
    }

    /// Initial position of chain particle `index`.
    pub fn position_of(&self, index: usize, rest_length: f32) -> Vec3 {
        self.anchor + self.layout.direction() * (self.spacing_factor * rest_length * index as f32)
    }
}

/// Everything a [`ParticleSystem`](crate::ParticleSystem) needs besides its topology.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Half-size of the box; walls sit at `±box_half_extent`, the floor at `-box_half_extent`.
    pub box_half_extent: f32,
    pub sphere: Sphere,
    /// Magnitude of gravity along -Y.
    pub gravity: f32,
    /// Chain mode scales the whole accumulated force (gravity included) by this.
    pub force_scale: f32,
    pub spring: SpringParams,
    pub chain: ChainConfig,
    pub emitter: Emitter,
    /// Range particle lifetimes are drawn from.
    pub lifetime: Span,
    pub seed: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let sphere_radius = 1.55;
        Self {
            box_half_extent: 6.0,
            sphere: Sphere::new(Vec3::new(0.0, -6.0 + sphere_radius, 0.0), sphere_radius),
            gravity: 9.8,
            force_scale: 0.1,
            spring: SpringParams::default(),
            chain: ChainConfig::default(),
            emitter: Emitter::default(),
            lifetime: Span::new(10.0, 20.0),
            seed: 0,
        }
    }
}

impl SystemConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_box_half_extent(mut self, half_extent: f32) -> Self {
        self.box_half_extent = half_extent;
        self
    }

    pub fn with_sphere(mut self, center: Vec3, radius: f32) -> Self {
        self.sphere = Sphere::new(center, radius);
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_force_scale(mut self, scale: f32) -> Self {
        self.force_scale = scale;
        self
    }

    pub fn with_spring(mut self, spring: SpringParams) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_emitter(mut self, emitter: Emitter) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn with_lifetime(mut self, lifetime: Span) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every field. A sphere radius <= 0 is allowed and disables the sphere.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("box_half_extent", self.box_half_extent)?;
        ensure_finite_vec("sphere.center", self.sphere.center)?;
        ensure_finite("sphere.radius", self.sphere.radius)?;
        ensure_finite("gravity", self.gravity)?;
        ensure_finite("force_scale", self.force_scale)?;
        self.spring.validate()?;
        self.chain.validate()?;
        self.emitter.validate()?;
        validate_span("lifetime", self.lifetime, false)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Validate a sampling range. `strict` demands a positive lower bound.
pub(crate) fn validate_span(name: &'static str, span: Span, strict: bool) -> Result<()> {
    if strict {
        ensure_positive(name, span.min)?;
    } else {
        ensure_non_negative(name, span.min)?;
    }
    ensure_finite(name, span.max)?;
    if span.max < span.min {
        return Err(crate::error::SimError::invalid(
            name,
            format!("range is inverted ({} > {})", span.min, span.max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    #[test]
    fn test_defaults_are_valid() {
        let config = SystemConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.sphere.center.abs_diff_eq(Vec3::new(0.0, -4.45, 0.0), 1e-5));
        assert_eq!(config.spring.rest_length, 0.3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SystemConfig::from_json(r#"{ "seed": 7, "sphere": { "center": [0.0, 0.0, 0.0], "radius": 2.0 } }"#)
                .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.sphere.radius, 2.0);
        assert_eq!(config.gravity, 9.8);
        assert_eq!(config.chain, ChainConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SystemConfig::default().with_seed(99).with_gravity(3.7);
        let json = config.to_json().unwrap();
        assert_eq!(SystemConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(SystemConfig::from_json("{ nope"), Err(SimError::Config(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_lifetime = SystemConfig::default().with_lifetime(Span::new(-1.0, 5.0));
        assert!(matches!(
            bad_lifetime.validate(),
            Err(SimError::InvalidParameter { name: "lifetime", .. })
        ));

        let inverted = SystemConfig::default().with_lifetime(Span::new(5.0, 1.0));
        assert!(inverted.validate().is_err());

        let bad_chain = SystemConfig::default().with_chain(ChainConfig {
            mass: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            bad_chain.validate(),
            Err(SimError::InvalidParameter { name: "chain.mass", .. })
        ));

        assert!(SystemConfig::default().with_box_half_extent(0.0).validate().is_err());
        assert!(SystemConfig::default().with_gravity(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_degenerate_sphere_is_allowed() {
        let config = SystemConfig::default().with_sphere(Vec3::ZERO, 0.0);
        assert!(config.validate().is_ok());
        let config = SystemConfig::default().with_sphere(Vec3::ZERO, -1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chain_layout_positions() {
        let chain = ChainConfig::default();
        let p = chain.position_of(2, 0.3);
        assert!(p.abs_diff_eq(Vec3::new(-4.0 + 0.66, 0.0, 0.0), 1e-6));

        let vertical = ChainConfig {
            anchor: Vec3::new(1.0, 2.0, 0.0),
            layout: ChainLayout::Vertical,
            ..Default::default()
        };
        assert!(vertical.position_of(1, 0.3).abs_diff_eq(Vec3::new(1.0, 2.0 - 0.33, 0.0), 1e-6));
    }
}
