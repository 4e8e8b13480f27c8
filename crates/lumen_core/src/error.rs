//! Construction-time validation errors.
//!
//! Degenerate geometry is rejected when a light or surface is built, so the
//! render loop never has to check for it.

use lumen_math::Vec3;
use thiserror::Error;

/// Errors raised while building scene objects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("{0} must not be a zero-length vector")]
    ZeroLengthVector(&'static str),

    #[error("{0} contains a non-finite component")]
    NonFinite(&'static str),

    #[error("{what} must be positive and finite, got {value}")]
    InvalidRadius { what: &'static str, value: f32 },

    #[error("spot cone must satisfy 0 <= inner < outer <= 90 degrees, got inner={inner} outer={outer}")]
    InvalidCone { inner: f32, outer: f32 },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Normalize `v`, rejecting zero-length and non-finite input.
pub(crate) fn unit_vector(v: Vec3, what: &'static str) -> SceneResult<Vec3> {
    if !v.is_finite() {
        return Err(SceneError::NonFinite(what));
    }
    v.try_normalize().ok_or(SceneError::ZeroLengthVector(what))
}

pub(crate) fn finite_point(p: Vec3, what: &'static str) -> SceneResult<Vec3> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(SceneError::NonFinite(what))
    }
}

pub(crate) fn positive_radius(value: f32, what: &'static str) -> SceneResult<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::InvalidRadius { what, value })
    }
}
