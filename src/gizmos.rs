//! Debug visualization using Bevy gizmos.
//!
//! Draws the recorded [`LedgeTrace`] of every detector that has
//! [`LedgeDetector::record_trace`](crate::config::LedgeDetector::record_trace)
//! enabled, plus any ledge found:
//! - obstruction probes as small spheres, green when free and red when occupied
//! - surface hits as green discs with an up arrow
//! - clearance volumes as cuboids, green when clear and red when blocked
//! - the ground ray as a yellow arrow
//! - the wall ray as an arrow, green if a ledge was found and red otherwise
//! - on success, the standing headroom as a green arrow down onto the ledge
//! - the ledge as a span with three arrows pointing into the wall
//!
//! Drawing only reads detection state and never feeds back into detection.

#![allow(clippy::needless_pass_by_value)] // Bevy system parameters

use bevy::color::palettes::css::{GREEN, RED, YELLOW};
use bevy::prelude::*;

use crate::detection::LedgeDetectionState;
use crate::ledge::Ledge;
use crate::trace::{LedgeTrace, TraceEvent};

/// System set for debug visualization.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgeDebugGizmosSet;

const SURFACE_DISC_RADIUS: f32 = 0.3;
const SURFACE_ARROW_LENGTH: f32 = 0.1;
const LEDGE_ARROW_LENGTH: f32 = 1.0;
const LEDGE_BAR_THICKNESS: f32 = 0.1;

/// Draw traces and ledges for every detector.
pub fn draw_ledge_gizmos(mut gizmos: Gizmos, q_states: Query<&LedgeDetectionState>) {
    for state in &q_states {
        if let Some(trace) = &state.trace {
            draw_trace(&mut gizmos, trace);
        }
        if let Some(ledge) = &state.ledge {
            draw_ledge(&mut gizmos, ledge, RED);
        }
    }
}

/// Draw every query recorded in `trace`.
pub fn draw_trace(gizmos: &mut Gizmos, trace: &LedgeTrace) {
    let found = matches!(trace.search(), Some(Ok(_)));

    for event in trace.events() {
        match *event {
            TraceEvent::WallProbe { ray, hit } => {
                let Some(hit) = hit else {
                    continue;
                };
                let color = if found { GREEN } else { RED };
                gizmos.arrow(ray.origin, ray.at(hit.distance), color);
            }
            TraceEvent::OverhangProbe { .. } => {}
            TraceEvent::ObstructionCheck {
                point,
                radius,
                occupied,
            } => {
                let color = if occupied { RED } else { GREEN };
                gizmos.sphere(Isometry3d::from_translation(point), radius, color);
            }
            TraceEvent::SurfaceProbe { hit, .. } => {
                let Some(hit) = hit else {
                    continue;
                };
                let flat = Quat::from_rotation_arc(Vec3::Z, Vec3::Y);
                gizmos.circle(Isometry3d::new(hit.point, flat), SURFACE_DISC_RADIUS, GREEN);
                gizmos.arrow(hit.point, hit.point + Vec3::Y * SURFACE_ARROW_LENGTH, GREEN);
            }
            TraceEvent::ClearanceCheck {
                center,
                size,
                overlaps,
            } => {
                let color = if overlaps == 0 { GREEN } else { RED };
                gizmos.cuboid(Transform::from_translation(center).with_scale(size), color);
            }
            TraceEvent::GroundProbe { origin, hit } => {
                let Some(hit) = hit else {
                    continue;
                };
                gizmos.arrow(origin, origin + Vec3::NEG_Y * hit.distance, YELLOW);
            }
        }
    }

    if let Some((top, bottom)) = headroom_arrow(trace) {
        gizmos.arrow(top, bottom, GREEN);
    }
}

/// Arrow from the top of the accepted clearance volume down to the ledge.
fn headroom_arrow(trace: &LedgeTrace) -> Option<(Vec3, Vec3)> {
    let Some(Ok(ledge)) = trace.search() else {
        return None;
    };
    let height = trace.events().iter().rev().find_map(|event| match *event {
        TraceEvent::ClearanceCheck { size, .. } => Some(size.y),
        _ => None,
    })?;

    let bottom = ledge.midpoint();
    Some((bottom + Vec3::Y * height, bottom))
}

/// Draw a ledge span with arrows pointing into the wall at start, middle and end.
pub fn draw_ledge(gizmos: &mut Gizmos, ledge: &Ledge, color: impl Into<Color> + Copy) {
    gizmos.line(ledge.start, ledge.end, color);

    let into_wall = -ledge.normal * LEDGE_ARROW_LENGTH;
    for point in [ledge.start, ledge.midpoint(), ledge.end] {
        gizmos.arrow(point, point + into_wall, color);
    }

    let span = ledge.end - ledge.start;
    if span.length_squared() > f32::EPSILON {
        let bar = Transform::from_translation(ledge.midpoint())
            .looking_to(span, Vec3::Y)
            .with_scale(Vec3::new(LEDGE_BAR_THICKNESS, LEDGE_BAR_THICKNESS, span.length()));
        gizmos.cuboid(bar, color);
    }
}
