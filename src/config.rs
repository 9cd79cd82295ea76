//! Ledge detection configuration.
//!
//! [`LedgeDetectionSettings`] tunes the search itself; [`LedgeDetector`] is the
//! component that places a probe on an entity and owns its settings.

use bevy::prelude::*;

use crate::backend::{LayerMask, ProbeRay};
use crate::detection::LedgeDetectionState;
use crate::error::SettingsError;

/// Tuning parameters for one ledge search.
///
/// All distances are in world units.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct LedgeDetectionSettings {
    /// Width of the ledge span produced around the found surface point.
    pub min_ledge_width: f32,

    /// Maximum number of upward steps taken while looking for a surface.
    pub max_surface_raycast_steps: u32,

    /// Vertical distance between steps. The downward surface probe reaches
    /// four steps deep.
    pub max_surface_raycast_step_interval: f32,

    /// How far above the wall hit to look for a ceiling.
    pub overhang_check_height: f32,

    /// Surfaces closer than this to the ground below are steps, not ledges.
    pub min_distance_to_ground: f32,

    /// Free height required above a surface to stand on it.
    pub clearance_height: f32,

    /// Horizontal size of the clearance volume.
    pub obstruction_check_size: f32,

    /// Geometry the wall, overhang, surface and ground rays can hit.
    pub ground_layers: LayerMask,
}

impl Default for LedgeDetectionSettings {
    fn default() -> Self {
        Self {
            min_ledge_width: 1.0,
            max_surface_raycast_steps: 5,
            max_surface_raycast_step_interval: 2.0,
            overhang_check_height: 4.0,
            min_distance_to_ground: 2.0,
            clearance_height: 4.0,
            obstruction_check_size: 0.5,
            ground_layers: LayerMask::ALL,
        }
    }
}

impl LedgeDetectionSettings {
    /// Full size of the clearance volume checked above a candidate surface.
    #[inline]
    pub fn clearance_volume_size(&self) -> Vec3 {
        Vec3::new(
            self.obstruction_check_size,
            self.clearance_height,
            self.obstruction_check_size,
        )
    }

    /// Check that the settings describe a meaningful search.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_surface_raycast_steps == 0 {
            return Err(SettingsError::NoSurfaceSteps);
        }

        let distances = [
            ("min_ledge_width", self.min_ledge_width),
            (
                "max_surface_raycast_step_interval",
                self.max_surface_raycast_step_interval,
            ),
            ("overhang_check_height", self.overhang_check_height),
            ("min_distance_to_ground", self.min_distance_to_ground),
            ("clearance_height", self.clearance_height),
            ("obstruction_check_size", self.obstruction_check_size),
        ];

        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidDistance { field, value });
            }
        }

        Ok(())
    }

    /// Builder: set ledge width.
    pub fn with_min_ledge_width(mut self, width: f32) -> Self {
        self.min_ledge_width = width;
        self
    }

    /// Builder: set step count and interval.
    pub fn with_surface_steps(mut self, steps: u32, interval: f32) -> Self {
        self.max_surface_raycast_steps = steps;
        self.max_surface_raycast_step_interval = interval;
        self
    }

    /// Builder: set overhang check height.
    pub fn with_overhang_check_height(mut self, height: f32) -> Self {
        self.overhang_check_height = height;
        self
    }

    /// Builder: set minimum distance to ground.
    pub fn with_min_distance_to_ground(mut self, distance: f32) -> Self {
        self.min_distance_to_ground = distance;
        self
    }

    /// Builder: set clearance volume dimensions.
    pub fn with_clearance(mut self, height: f32, size: f32) -> Self {
        self.clearance_height = height;
        self.obstruction_check_size = size;
        self
    }

    /// Builder: set ground layers.
    pub fn with_ground_layers(mut self, layers: LayerMask) -> Self {
        self.ground_layers = layers;
        self
    }
}

/// Places a ledge probe on an entity.
///
/// Each detection pass casts from the entity's translation plus
/// [`probe_offset`](Self::probe_offset) along its forward axis and stores the
/// result in [`LedgeDetectionState`].
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_ledge_detector::prelude::*;
///
/// let detector = LedgeDetector::new(
///     LedgeDetectionSettings::default().with_min_distance_to_ground(1.5),
/// )
/// .with_trace();
///
/// let ray = detector.probe_ray(&GlobalTransform::from_xyz(0.0, 0.0, 0.0));
/// assert_eq!(ray.origin, Vec3::Y);
/// assert_eq!(ray.direction, Vec3::NEG_Z);
/// ```
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
#[require(LedgeDetectionState)]
pub struct LedgeDetector {
    /// Search parameters.
    pub settings: LedgeDetectionSettings,
    /// World-space offset from the entity translation to the probe origin.
    pub probe_offset: Vec3,
    /// Record every intermediate query for debug drawing.
    pub record_trace: bool,
}

impl Default for LedgeDetector {
    fn default() -> Self {
        Self {
            settings: LedgeDetectionSettings::default(),
            probe_offset: Vec3::Y,
            record_trace: false,
        }
    }
}

impl LedgeDetector {
    /// Create a detector with the given settings.
    pub fn new(settings: LedgeDetectionSettings) -> Self {
        Self {
            settings,
            ..default()
        }
    }

    /// Builder: set probe offset.
    pub fn with_probe_offset(mut self, offset: Vec3) -> Self {
        self.probe_offset = offset;
        self
    }

    /// Builder: record search traces.
    pub fn with_trace(mut self) -> Self {
        self.record_trace = true;
        self
    }

    /// The probe ray for an entity at `transform`.
    pub fn probe_ray(&self, transform: &GlobalTransform) -> ProbeRay {
        ProbeRay::new(
            transform.translation() + self.probe_offset,
            *transform.forward(),
        )
    }
}
