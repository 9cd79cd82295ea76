//! Per-entity detection driver.
//!
//! Backend systems build a [`CollisionQueryService`] from their physics
//! context and hand it to [`update_ledge_state`] for every detector entity.

use bevy::log::{debug, warn};
use bevy::prelude::*;

use crate::backend::CollisionQueryService;
use crate::config::LedgeDetector;
use crate::detection::{LedgeDetectionOutcome, LedgeDetectionState};
use crate::detector::find_ledge;
use crate::trace::{LedgeTrace, NoopObserver};

/// Run one ledge search for `entity` and store the result in `state`.
///
/// A search that cannot run (failing query service, invalid settings) clears
/// the ledge and keeps the error in [`LedgeDetectionState::last_error`].
pub fn update_ledge_state<Q: CollisionQueryService + ?Sized>(
    queries: &Q,
    entity: Entity,
    transform: &GlobalTransform,
    detector: &LedgeDetector,
    state: &mut LedgeDetectionState,
) {
    let ray = detector.probe_ray(transform);

    let result = if detector.record_trace {
        let mut trace = LedgeTrace::default();
        let result = find_ledge(queries, &ray, &detector.settings, &mut trace);
        state.trace = Some(trace);
        result
    } else {
        state.trace = None;
        find_ledge(queries, &ray, &detector.settings, &mut NoopObserver)
    };

    match result {
        Ok(search) => {
            let outcome = LedgeDetectionOutcome::of(&search);
            if outcome != state.outcome {
                debug!("ledge detector {entity}: {} -> {outcome}", state.outcome);
            }
            state.apply(search);
        }
        Err(err) => {
            warn!("ledge detection failed for {entity}: {err}");
            state.fail(err);
        }
    }
}
