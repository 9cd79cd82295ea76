//! The ledge search.
//!
//! Starting from a probe ray the search:
//! 1. casts forward to find a wall
//! 2. casts up from just in front of the wall hit to find a ceiling
//! 3. steps up the wall, at each step testing that the probe point is free,
//!    casting down behind the wall face for a surface and checking that the
//!    surface has standing headroom
//! 4. casts down in front of the wall to measure the height above ground
//! 5. builds the [`Ledge`] from the accepted surface point and the wall normal
//!
//! Offsets are small fixed constants; the feel of ledge grabbing depends on them.

use bevy::log::trace;
use bevy::prelude::*;

use crate::backend::{CollisionData, CollisionQueryService, LayerMask, ProbeRay};
use crate::config::LedgeDetectionSettings;
use crate::detection::{LedgeDetectionOutcome, LedgeRejection, LedgeSearch};
use crate::error::{CollisionQueryError, LedgeDetectionError};
use crate::ledge::Ledge;
use crate::trace::LedgeSearchObserver;

/// Reach of the forward wall probe.
pub const WALL_PROBE_DISTANCE: f32 = 10.0;
/// Distance the overhang probe backs off from the wall along the probe ray.
pub const OVERHANG_PROBE_BACKOFF: f32 = 0.2;
/// Radius of the sphere that must be free at each probe point.
pub const OBSTRUCTION_PROBE_RADIUS: f32 = 0.1;
/// Height above the probe point the surface ray starts at.
pub const SURFACE_PROBE_RISE: f32 = 1.0;
/// Distance behind the wall face the surface ray starts at.
pub const SURFACE_PROBE_INSET: f32 = 0.5;
/// Surface ray depth, in step intervals.
pub const SURFACE_PROBE_DEPTH_STEPS: f32 = 4.0;
/// Lift of the clearance volume off the surface so it doesn't touch the floor.
pub const CLEARANCE_FLOOR_EPSILON: f32 = 0.02;
/// Distance the ledge point is pulled back from the surface hit along the probe ray.
pub const SURFACE_POINT_BACKOFF: f32 = 0.5;
/// Distance in front of the wall the ground ray starts at.
pub const GROUND_PROBE_OUTSET: f32 = 0.7;

/// Search for a ledge along `ray`.
///
/// Returns `Ok(Ok(ledge))` when a ledge was found and `Ok(Err(rejection))`
/// when the search completed without one. `Err` is reserved for searches that
/// could not run: invalid settings, a degenerate ray, or a failing query
/// service.
///
/// Overlap tests see every layer; rays only see `settings.ground_layers`.
pub fn find_ledge<Q, O>(
    queries: &Q,
    ray: &ProbeRay,
    settings: &LedgeDetectionSettings,
    observer: &mut O,
) -> Result<LedgeSearch, LedgeDetectionError>
where
    Q: CollisionQueryService + ?Sized,
    O: LedgeSearchObserver + ?Sized,
{
    settings.validate()?;
    if ray.is_degenerate() {
        return Err(LedgeDetectionError::DegenerateProbe);
    }

    let search = search(queries, ray, settings, observer)?;
    observer.finished(ray, &search);

    trace!(
        "ledge search from {} along {}: {}",
        ray.origin,
        ray.direction,
        LedgeDetectionOutcome::of(&search)
    );

    Ok(search)
}

fn search<Q, O>(
    queries: &Q,
    ray: &ProbeRay,
    settings: &LedgeDetectionSettings,
    observer: &mut O,
) -> Result<LedgeSearch, CollisionQueryError>
where
    Q: CollisionQueryService + ?Sized,
    O: LedgeSearchObserver + ?Sized,
{
    let layers = settings.ground_layers;

    let wall = queries.raycast(ray.origin, ray.direction, WALL_PROBE_DISTANCE, layers)?;
    observer.wall_probe(ray, wall.as_ref());
    // A hit without a usable normal gives the ledge no facing.
    let Some(wall) = wall.filter(CollisionData::has_normal) else {
        return Ok(Err(LedgeRejection::NoWall));
    };
    let wall_normal = wall.normal.normalize_or_zero();

    let overhang_origin = wall.point - ray.direction * OVERHANG_PROBE_BACKOFF;
    let overhang = queries.raycast(
        overhang_origin,
        Vec3::Y,
        settings.overhang_check_height,
        layers,
    )?;
    observer.overhang_probe(overhang_origin, overhang.as_ref());

    let step = settings.max_surface_raycast_step_interval;
    let mut headroom = overhang.map_or(f32::INFINITY, |hit| hit.distance);
    let mut rejection = LedgeRejection::NoWall;
    let mut surface_point = None;
    let mut probe_point = wall.point + Vec3::Y * step;

    for _ in 0..settings.max_surface_raycast_steps {
        headroom -= step;
        if headroom <= step {
            rejection = LedgeRejection::NoSurfaceOverhangTooClose;
            break;
        }

        let occupied =
            queries.overlaps_sphere(probe_point, OBSTRUCTION_PROBE_RADIUS, LayerMask::ALL)?;
        observer.obstruction_check(probe_point, OBSTRUCTION_PROBE_RADIUS, occupied);

        if occupied {
            rejection = LedgeRejection::NoSurfaceObstructed;
        } else {
            let surface_origin =
                probe_point + Vec3::Y * SURFACE_PROBE_RISE - wall_normal * SURFACE_PROBE_INSET;
            let surface = queries.raycast(
                surface_origin,
                Vec3::NEG_Y,
                step * SURFACE_PROBE_DEPTH_STEPS,
                layers,
            )?;
            observer.surface_probe(surface_origin, surface.as_ref());

            if let Some(surface) = surface {
                rejection = LedgeRejection::SurfaceObstructedNoClearance;

                let center = surface.point
                    + Vec3::Y * (settings.clearance_height * 0.5 + CLEARANCE_FLOOR_EPSILON);
                let size = settings.clearance_volume_size();
                let overlaps = queries.overlap_box_count(center, size * 0.5, LayerMask::ALL)?;
                observer.clearance_check(center, size, overlaps);

                if overlaps == 0 {
                    surface_point = Some(surface.point - ray.direction * SURFACE_POINT_BACKOFF);
                    break;
                }
            }
        }

        probe_point += Vec3::Y * step;
    }

    let Some(surface_point) = surface_point else {
        return Ok(Err(rejection));
    };

    let ground_origin = surface_point + wall_normal * GROUND_PROBE_OUTSET;
    let ground = queries.raycast(ground_origin, Vec3::NEG_Y, f32::INFINITY, layers)?;
    observer.ground_probe(ground_origin, ground.as_ref());
    let distance_from_ground = ground.map_or(f32::INFINITY, |hit| hit.distance);

    // Anything lower is a step to walk or jump up, not a ledge.
    if distance_from_ground < settings.min_distance_to_ground {
        return Ok(Err(LedgeRejection::TooCloseToGround));
    }

    Ok(Ok(Ledge::across(
        surface_point,
        wall_normal,
        settings.min_ledge_width,
        distance_from_ground,
    )))
}
