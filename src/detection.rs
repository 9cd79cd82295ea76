//! Detection result structures.
//!
//! These structures hold the outcome of a ledge search, both as returned by
//! [`find_ledge`](crate::detector::find_ledge) and as stored on entities by
//! the detection systems.

use std::fmt;

use bevy::prelude::*;

use crate::error::LedgeDetectionError;
use crate::ledge::Ledge;
use crate::trace::LedgeTrace;

/// Why a search produced no ledge.
///
/// Variants are ordered by the stage at which the search gave up.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgeRejection {
    /// The probe ray hit nothing.
    NoWall,
    /// A ceiling above the wall leaves no room for a surface.
    NoSurfaceOverhangTooClose,
    /// The last probe point examined was inside geometry.
    NoSurfaceObstructed,
    /// A standable surface exists but sits too close to the ground.
    TooCloseToGround,
    /// The last surface found had no headroom above it.
    SurfaceObstructedNoClearance,
}

/// Result of one ledge search: a ledge, or the reason there is none.
pub type LedgeSearch = Result<Ledge, LedgeRejection>;

/// Outcome of a ledge search, including success.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LedgeDetectionOutcome {
    /// The probe ray hit nothing.
    #[default]
    NoWall,
    /// A ceiling above the wall leaves no room for a surface.
    NoSurfaceOverhangTooClose,
    /// The last probe point examined was inside geometry.
    NoSurfaceObstructed,
    /// A standable surface exists but sits too close to the ground.
    TooCloseToGround,
    /// The last surface found had no headroom above it.
    SurfaceObstructedNoClearance,
    /// A ledge was found.
    LedgeFound,
}

impl LedgeDetectionOutcome {
    /// Outcome of a finished search.
    pub fn of(search: &LedgeSearch) -> Self {
        match search {
            Ok(_) => Self::LedgeFound,
            Err(rejection) => (*rejection).into(),
        }
    }

    /// Whether a ledge was found.
    #[inline]
    pub fn is_found(self) -> bool {
        self == Self::LedgeFound
    }
}

impl From<LedgeRejection> for LedgeDetectionOutcome {
    fn from(rejection: LedgeRejection) -> Self {
        match rejection {
            LedgeRejection::NoWall => Self::NoWall,
            LedgeRejection::NoSurfaceOverhangTooClose => Self::NoSurfaceOverhangTooClose,
            LedgeRejection::NoSurfaceObstructed => Self::NoSurfaceObstructed,
            LedgeRejection::TooCloseToGround => Self::TooCloseToGround,
            LedgeRejection::SurfaceObstructedNoClearance => Self::SurfaceObstructedNoClearance,
        }
    }
}

impl fmt::Display for LedgeDetectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoWall => "no wall",
            Self::NoSurfaceOverhangTooClose => "no surface: overhang too close",
            Self::NoSurfaceObstructed => "no surface: obstructed",
            Self::TooCloseToGround => "too close to ground",
            Self::SurfaceObstructedNoClearance => "surface obstructed: no clearance",
            Self::LedgeFound => "ledge found",
        };
        f.write_str(label)
    }
}

impl fmt::Display for LedgeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        LedgeDetectionOutcome::from(*self).fmt(f)
    }
}

/// Latest ledge search result for an entity with a
/// [`LedgeDetector`](crate::config::LedgeDetector).
///
/// `outcome` is [`LedgeFound`](LedgeDetectionOutcome::LedgeFound) exactly when
/// `ledge` is set.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct LedgeDetectionState {
    /// Outcome of the last completed search.
    pub outcome: LedgeDetectionOutcome,
    /// The ledge found by the last search, if any.
    pub ledge: Option<Ledge>,
    /// Queries issued by the last search, when tracing is enabled.
    #[reflect(ignore)]
    pub trace: Option<LedgeTrace>,
    /// Why the last search could not run, if it failed.
    #[reflect(ignore)]
    pub last_error: Option<LedgeDetectionError>,
}

impl LedgeDetectionState {
    /// Store a finished search.
    pub fn apply(&mut self, search: LedgeSearch) {
        self.outcome = LedgeDetectionOutcome::of(&search);
        self.ledge = search.ok();
        self.last_error = None;
    }

    /// Record a search that could not run. Nothing is detected until the next
    /// successful search.
    pub fn fail(&mut self, error: LedgeDetectionError) {
        self.outcome = LedgeDetectionOutcome::default();
        self.ledge = None;
        self.last_error = Some(error);
    }

    /// Whether the last search found a ledge.
    pub fn has_ledge(&self) -> bool {
        self.ledge.is_some()
    }
}
