//! Static collision geometry.
//!
//! Planes and spheres are plain values. The box the particles live in is five
//! planes (floor plus four walls) and there is a single sphere obstacle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An infinite plane `dot(p, normal) + offset == 0`.
///
/// The normal is expected to be unit length but this is not enforced; the
/// collision response scales with its magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    /// Plane through `point` facing `normal`.
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            offset: -point.dot(normal),
        }
    }

    /// Signed distance of `point`; positive on the side the normal faces.
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        point.dot(self.normal) + self.offset
    }
}

/// A sphere obstacle. A radius of zero or less never collides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether the sphere can be hit at all.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.radius > 0.0
    }
}

/// Which obstacle a particle hit. Used for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Obstacle {
    Floor,
    LeftWall,
    RightWall,
    FrontWall,
    BackWall,
    Sphere,
}

/// The five inward-facing planes of an axis-aligned box centred on the origin.
///
/// Order is fixed: floor, left, right, front, back. There is no ceiling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxWalls {
    planes: [(Obstacle, Plane); 5],
}

impl BoxWalls {
    pub fn new(half_extent: f32) -> Self {
        let x = half_extent;
        Self {
            planes: [
                (Obstacle::Floor, Plane::new(Vec3::new(0.0, -x, 0.0), Vec3::Y)),
                (Obstacle::LeftWall, Plane::new(Vec3::new(x, 0.0, 0.0), Vec3::NEG_X)),
                (Obstacle::RightWall, Plane::new(Vec3::new(-x, 0.0, 0.0), Vec3::X)),
                (Obstacle::FrontWall, Plane::new(Vec3::new(0.0, 0.0, -x), Vec3::Z)),
                (Obstacle::BackWall, Plane::new(Vec3::new(0.0, 0.0, x), Vec3::NEG_Z)),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Obstacle, Plane)> {
        self.planes.iter()
    }
}
