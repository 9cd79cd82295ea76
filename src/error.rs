//! Error types for ledge detection.
//!
//! Rejections (no wall, obstructed, ...) are not errors; they are returned as
//! [`LedgeRejection`](crate::detection::LedgeRejection). The types here cover
//! the cases where a search could not be carried out at all.

use thiserror::Error;

/// Failure reported by a [`CollisionQueryService`](crate::backend::CollisionQueryService).
#[derive(Debug, Clone, Error)]
pub enum CollisionQueryError {
    /// The physics scene cannot be queried (missing context, not yet initialized).
    #[error("collision scene unavailable: {0}")]
    Unavailable(String),

    /// A query was issued but the backend could not answer it.
    #[error("collision query failed: {0}")]
    Failed(String),
}

impl CollisionQueryError {
    /// Creates an unavailable-scene error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Creates a failed-query error.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// Invalid [`LedgeDetectionSettings`](crate::config::LedgeDetectionSettings).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    /// At least one surface step is needed to find anything.
    #[error("max_surface_raycast_steps must be at least 1")]
    NoSurfaceSteps,

    /// A distance setting is negative, NaN or infinite.
    #[error("{field} must be a finite, non-negative distance, got {value}")]
    InvalidDistance {
        /// Name of the offending setting.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
}

/// Errors that abort a ledge search.
#[derive(Debug, Clone, Error)]
pub enum LedgeDetectionError {
    /// The collision query service failed; the search result would be meaningless.
    #[error(transparent)]
    Query(#[from] CollisionQueryError),

    /// The settings cannot describe a meaningful search.
    #[error("invalid ledge detection settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// The probe ray has a zero or non-finite direction, or a non-finite origin.
    #[error("probe ray is degenerate")]
    DegenerateProbe,
}
