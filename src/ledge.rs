//! The ledge value produced by a successful search.

use bevy::prelude::*;

/// A climbable edge: a horizontal span, the wall's outward normal and the
/// height of the span above the ground beneath it.
///
/// `Ledge::default()` has both endpoints at the world origin and reports
/// itself invalid; that is the "no ledge" sentinel.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct Ledge {
    /// Faces out from the ledge towards the approaching character.
    pub normal: Vec3,
    /// One end of the usable span.
    pub start: Vec3,
    /// The other end of the usable span.
    pub end: Vec3,
    /// Vertical distance from the ledge surface to the ground below it.
    /// `f32::INFINITY` when no ground was found.
    pub distance_from_ground: f32,
}

impl Ledge {
    /// Create a ledge from explicit endpoints.
    pub fn new(start: Vec3, end: Vec3, normal: Vec3, distance_from_ground: f32) -> Self {
        Self {
            normal,
            start,
            end,
            distance_from_ground,
        }
    }

    /// Create a ledge of `width` centered on `surface_point`, spanning the
    /// horizontal axis perpendicular to `normal`.
    pub fn across(surface_point: Vec3, normal: Vec3, width: f32, distance_from_ground: f32) -> Self {
        let cross = normal.cross(Vec3::Y).normalize_or_zero();
        let half_span = cross * width * 0.5;

        Self {
            normal,
            start: surface_point - half_span,
            end: surface_point + half_span,
            distance_from_ground,
        }
    }

    /// Point halfway between start and end.
    #[inline]
    pub fn midpoint(&self) -> Vec3 {
        self.start.lerp(self.end, 0.5)
    }

    /// Length of the span.
    #[inline]
    pub fn width(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// False for the default ledge, i.e. when either endpoint sits on the origin.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start != Vec3::ZERO && self.end != Vec3::ZERO
    }
}
