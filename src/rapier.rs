//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::log::warn_once;
use bevy::prelude::*;
use bevy_rapier3d::geometry::Group;
use bevy_rapier3d::prelude::*;

use crate::backend::{CollisionData, CollisionQueryService, LayerMask, LedgePhysicsBackend};
use crate::config::LedgeDetector;
use crate::detection::LedgeDetectionState;
use crate::error::CollisionQueryError;
use crate::systems::update_ledge_state;
use crate::LedgeDetectionSet;

/// Rapier3D physics backend for ledge detection.
///
/// Scene queries are issued against the single [`RapierContext`] by a
/// dedicated system that receives it as a system parameter.
pub struct Rapier3dBackend;

impl LedgePhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }
}

/// Plugin that sets up Rapier3D-specific systems for ledge detection.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            rapier_ledge_detection.in_set(LedgeDetectionSet),
        );
    }
}

/// [`CollisionQueryService`] over a [`RapierContext`].
///
/// Sensors are never reported. Use [`excluding`](Self::excluding) to ignore
/// the detecting body's own collider.
pub struct RapierQueryService<'a> {
    context: &'a RapierContext<'a>,
    exclude: Option<Entity>,
}

impl<'a> RapierQueryService<'a> {
    /// Query `context` without excluding anything.
    pub fn new(context: &'a RapierContext<'a>) -> Self {
        Self {
            context,
            exclude: None,
        }
    }

    /// Ignore `entity`, both as a rigid body and as a collider.
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }
}

/// Build the query filter for a layer mask.
///
/// Layers map onto collision group filters; the query itself is a member of
/// every group so only the scene colliders' own settings decide.
pub fn layer_filter(layers: LayerMask, exclude: Option<Entity>) -> QueryFilter<'static> {
    let mut filter = QueryFilter::default()
        .groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(layers.bits()),
        ))
        .exclude_sensors();

    if let Some(entity) = exclude {
        filter = filter.exclude_rigid_body(entity).exclude_collider(entity);
    }

    filter
}

/// A solid ray cast starting inside a collider reports it at distance zero
/// with no normal. Such a collider is not in front of the ray.
fn is_embedded_hit(hit: &CollisionData) -> bool {
    hit.distance <= 0.0 && !hit.has_normal()
}

impl CollisionQueryService for RapierQueryService<'_> {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Result<Option<CollisionData>, CollisionQueryError> {
        if layers == LayerMask::NONE {
            return Ok(None);
        }

        // Parry expects a finite time of impact
        let max_toi = if max_distance.is_finite() {
            max_distance
        } else {
            f32::MAX
        };

        let hit = self
            .context
            .cast_ray_and_get_normal(
                origin,
                direction,
                max_toi,
                true,
                layer_filter(layers, self.exclude),
            )
            .map(|(entity, hit)| {
                CollisionData::new(hit.time_of_impact, hit.normal, hit.point, Some(entity))
            })
            .filter(|hit| !is_embedded_hit(hit));

        Ok(hit)
    }

    fn overlaps_sphere(
        &self,
        center: Vec3,
        radius: f32,
        layers: LayerMask,
    ) -> Result<bool, CollisionQueryError> {
        if layers == LayerMask::NONE {
            return Ok(false);
        }

        let shape = Collider::ball(radius);
        let mut occupied = false;
        self.context.intersections_with_shape(
            center,
            Quat::IDENTITY,
            &shape,
            layer_filter(layers, self.exclude),
            |_| {
                occupied = true;
                false
            },
        );

        Ok(occupied)
    }

    fn overlap_box_count(
        &self,
        center: Vec3,
        half_extents: Vec3,
        layers: LayerMask,
    ) -> Result<usize, CollisionQueryError> {
        if layers == LayerMask::NONE {
            return Ok(0);
        }

        let shape = Collider::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let mut count = 0;
        self.context.intersections_with_shape(
            center,
            Quat::IDENTITY,
            &shape,
            layer_filter(layers, self.exclude),
            |_| {
                count += 1;
                true
            },
        );

        Ok(count)
    }
}

/// Rapier-specific ledge detection system.
///
/// Runs one search per detector entity, excluding the entity's own body from
/// every query.
fn rapier_ledge_detection(
    rapier_context: ReadRapierContext,
    mut q_detectors: Query<(
        Entity,
        &GlobalTransform,
        &LedgeDetector,
        &mut LedgeDetectionState,
    )>,
) {
    if q_detectors.is_empty() {
        return;
    }

    let context = match rapier_context.single() {
        Ok(context) => context,
        Err(err) => {
            warn_once!("ledge detection skipped, no rapier context: {err}");
            return;
        }
    };

    for (entity, transform, detector, mut state) in &mut q_detectors {
        let queries = RapierQueryService::new(&context).excluding(entity);
        update_ledge_state(&queries, entity, transform, detector, &mut state);
    }
}
