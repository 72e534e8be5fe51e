//! Numerical integration schemes.
//!
//! | Scheme | Order of updates | Force scaling |
//! |--------|------------------|---------------|
//! | [`Integrator::EulerOriginal`] | position from old velocity, then velocity | `force * dt` |
//! | [`Integrator::EulerSemiImplicit`] | velocity first, then position | `force * dt` |
//! | [`Integrator::Verlet`] | velocity recovered from position history | `force * dt² / mass` |
//!
//! The Euler variants ignore mass; Verlet divides by it. That asymmetry is
//! part of the engine's observable behavior and must not be "fixed".

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed damping applied to the recovered Verlet velocity.
pub const VERLET_DAMPING: f32 = 0.99;

/// Integration scheme selected per step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Integrator {
    /// Explicit Euler: `x += v*dt` then `v += f*dt`.
    #[default]
    EulerOriginal,
    /// Symplectic Euler: `v += f*dt` then `x += v*dt`. Better for stiff springs.
    EulerSemiImplicit,
    /// Position Verlet with a 0.99 velocity damping factor.
    Verlet,
}

impl Integrator {
    pub const ALL: [Integrator; 3] = [
        Integrator::EulerOriginal,
        Integrator::EulerSemiImplicit,
        Integrator::Verlet,
    ];

    /// Human readable label, as shown in a method picker.
    pub fn label(&self) -> &'static str {
        match self {
            Integrator::EulerOriginal => "Euler (Original)",
            Integrator::EulerSemiImplicit => "Euler (Semi-implicit)",
            Integrator::Verlet => "Verlet",
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Integrator {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "euler (original)" | "euler" | "euler-original" | "explicit" => {
                Ok(Integrator::EulerOriginal)
            }
            "euler (semi-implicit)" | "semi" | "euler-semi" | "semi-implicit" | "symplectic" => {
                Ok(Integrator::EulerSemiImplicit)
            }
            "verlet" => Ok(Integrator::Verlet),
            _ => Err(SimError::invalid(
                "integrator",
                format!("unknown integration method `{s}`"),
            )),
        }
    }
}
