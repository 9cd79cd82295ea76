//! Physics backend abstraction.
//!
//! The ledge search only needs three kinds of spatial query: raycasts, sphere
//! overlap tests and box overlap counts. [`CollisionQueryService`] is that
//! boundary. [`LedgePhysicsBackend`] is the plugin-level counterpart that wires
//! a concrete physics engine into the per-frame detection systems.

use std::ops::BitOr;

use bevy::prelude::*;

use crate::error::CollisionQueryError;

/// A ray hit reported by a [`CollisionQueryService`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionData {
    /// Distance along the ray.
    pub distance: f32,
    /// Outward surface normal at the hit.
    pub normal: Vec3,
    /// World-space hit position.
    pub point: Vec3,
    /// Collider entity, when the backend knows it.
    pub entity: Option<Entity>,
}

impl CollisionData {
    /// Create a hit record.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }

    /// Whether the normal can be used as a surface direction.
    ///
    /// Hits reported from inside a solid have no meaningful normal.
    #[inline]
    pub fn has_normal(&self) -> bool {
        self.normal.is_finite() && self.normal.length_squared() > f32::EPSILON
    }
}

/// Spatial queries the ledge search issues against world geometry.
///
/// Implementations must be side-effect free and answer against a scene that
/// does not change for the duration of one search. Failures are reserved for
/// a scene that cannot be queried at all; a miss is `Ok(None)` / `Ok(false)` /
/// `Ok(0)`.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_ledge_detector::prelude::*;
/// use msg_ledge_detector::error::CollisionQueryError;
///
/// /// A scene with nothing in it.
/// struct EmptyScene;
///
/// impl CollisionQueryService for EmptyScene {
///     fn raycast(
///         &self,
///         _origin: Vec3,
///         _direction: Vec3,
///         _max_distance: f32,
///         _layers: LayerMask,
///     ) -> Result<Option<CollisionData>, CollisionQueryError> {
///         Ok(None)
///     }
///
///     fn overlaps_sphere(&self, _center: Vec3, _radius: f32, _layers: LayerMask) -> Result<bool, CollisionQueryError> {
///         Ok(false)
///     }
///
///     fn overlap_box_count(&self, _center: Vec3, _half_extents: Vec3, _layers: LayerMask) -> Result<usize, CollisionQueryError> {
///         Ok(0)
///     }
/// }
///
/// let ray = ProbeRay::new(Vec3::ZERO, Vec3::X);
/// let result = find_ledge(&EmptyScene, &ray, &LedgeDetectionSettings::default(), &mut NoopObserver);
/// assert_eq!(result.unwrap(), Err(LedgeRejection::NoWall));
/// ```
pub trait CollisionQueryService {
    /// Cast a ray and return the closest hit within `max_distance`.
    ///
    /// # Arguments
    /// * `origin` - Ray origin in world space
    /// * `direction` - Ray direction (normalized)
    /// * `max_distance` - Maximum cast distance, may be `f32::INFINITY`
    /// * `layers` - Geometry categories that participate
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Result<Option<CollisionData>, CollisionQueryError>;

    /// Check whether any collider overlaps a sphere.
    fn overlaps_sphere(
        &self,
        center: Vec3,
        radius: f32,
        layers: LayerMask,
    ) -> Result<bool, CollisionQueryError>;

    /// Count the colliders overlapping an axis-aligned box.
    fn overlap_box_count(
        &self,
        center: Vec3,
        half_extents: Vec3,
        layers: LayerMask,
    ) -> Result<usize, CollisionQueryError>;
}

impl<T: CollisionQueryService + ?Sized> CollisionQueryService for &T {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Result<Option<CollisionData>, CollisionQueryError> {
        (**self).raycast(origin, direction, max_distance, layers)
    }

    fn overlaps_sphere(
        &self,
        center: Vec3,
        radius: f32,
        layers: LayerMask,
    ) -> Result<bool, CollisionQueryError> {
        (**self).overlaps_sphere(center, radius, layers)
    }

    fn overlap_box_count(
        &self,
        center: Vec3,
        half_extents: Vec3,
        layers: LayerMask,
    ) -> Result<usize, CollisionQueryError> {
        (**self).overlap_box_count(center, half_extents, layers)
    }
}

/// Trait for physics backend implementations.
///
/// A backend contributes the plugin that schedules ledge detection for
/// entities carrying a [`LedgeDetector`](crate::config::LedgeDetector). The
/// plugin's systems typically build a [`CollisionQueryService`] from the
/// engine's query context and call
/// [`update_ledge_state`](crate::systems::update_ledge_state) per entity.
///
/// For an example implementation, see the `rapier` module's `Rapier3dBackend`.
pub trait LedgePhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;
}

/// Backend without any systems.
///
/// Use this when the host drives detection itself, e.g. from a custom spatial
/// index, by calling [`update_ledge_state`](crate::systems::update_ledge_state).
pub struct ManualBackend;

impl LedgePhysicsBackend for ManualBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}

/// Bit mask selecting which geometry categories a query sees.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);
    /// No layer.
    pub const NONE: Self = Self(0);

    /// Mask containing only layer `index`.
    ///
    /// # Panics
    /// If `index` is 32 or more.
    pub const fn layer(index: u32) -> Self {
        assert!(index < u32::BITS, "layer index must be below 32");
        Self(1 << index)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the two masks share at least one layer.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Origin and direction of a ledge search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    /// Origin point of the ray.
    pub origin: Vec3,
    /// Direction of the ray (normalized, or zero when degenerate).
    pub direction: Vec3,
}

impl ProbeRay {
    /// Create a new probe ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// A ray with a zero direction or non-finite components cannot be searched.
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO || !self.origin.is_finite() || !self.direction.is_finite()
    }

    /// Point at `distance` along the ray.
    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}
