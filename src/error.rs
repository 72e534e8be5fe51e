//! Error types for springbox.
//!
//! Every fallible operation in the crate returns [`Result`]. Invalid
//! configuration is rejected up front so the integrators never see a zero
//! mass or a negative lifetime.

use glam::Vec3;
use thiserror::Error;

/// Errors produced by the particle engine.
#[derive(Error, Debug)]
pub enum SimError {
    /// A particle (or spring) index outside the current collection.
    #[error("particle index {index} out of range (count is {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// A parameter failed validation.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A configuration document could not be parsed or written.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject NaN and infinities.
pub(crate) fn ensure_finite(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be finite, got {value}")))
    }
}

pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be > 0, got {value}")))
    }
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f32) -> Result<()> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be >= 0, got {value}")))
    }
}

pub(crate) fn ensure_finite_vec(name: &'static str, v: Vec3) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("must be finite, got {v}")))
    }
}
