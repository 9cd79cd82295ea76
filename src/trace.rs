//! Observation hooks for the ledge search.
//!
//! The search reports every intermediate query to a [`LedgeSearchObserver`].
//! Observers only receive copies of the data; they cannot steer the search.

use bevy::prelude::*;

use crate::backend::{CollisionData, ProbeRay};
use crate::detection::LedgeSearch;

/// Receives the intermediate results of a ledge search.
///
/// Every method has an empty default so observers implement only what they
/// care about.
pub trait LedgeSearchObserver {
    /// The probe ray looking for a wall.
    fn wall_probe(&mut self, _ray: &ProbeRay, _hit: Option<&CollisionData>) {}

    /// The upward ray looking for a ceiling above the wall.
    fn overhang_probe(&mut self, _origin: Vec3, _hit: Option<&CollisionData>) {}

    /// The sphere test at a step's probe point.
    fn obstruction_check(&mut self, _point: Vec3, _radius: f32, _occupied: bool) {}

    /// The downward ray looking for a surface.
    fn surface_probe(&mut self, _origin: Vec3, _hit: Option<&CollisionData>) {}

    /// The clearance volume above a surface. `size` is the full extent.
    fn clearance_check(&mut self, _center: Vec3, _size: Vec3, _overlaps: usize) {}

    /// The downward ray measuring the height above ground.
    fn ground_probe(&mut self, _origin: Vec3, _hit: Option<&CollisionData>) {}

    /// The search is complete.
    fn finished(&mut self, _ray: &ProbeRay, _search: &LedgeSearch) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LedgeSearchObserver for NoopObserver {}

/// A single recorded query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceEvent {
    /// See [`LedgeSearchObserver::wall_probe`].
    WallProbe {
        ray: ProbeRay,
        hit: Option<CollisionData>,
    },
    /// See [`LedgeSearchObserver::overhang_probe`].
    OverhangProbe {
        origin: Vec3,
        hit: Option<CollisionData>,
    },
    /// See [`LedgeSearchObserver::obstruction_check`].
    ObstructionCheck {
        point: Vec3,
        radius: f32,
        occupied: bool,
    },
    /// See [`LedgeSearchObserver::surface_probe`].
    SurfaceProbe {
        origin: Vec3,
        hit: Option<CollisionData>,
    },
    /// See [`LedgeSearchObserver::clearance_check`].
    ClearanceCheck {
        center: Vec3,
        size: Vec3,
        overlaps: usize,
    },
    /// See [`LedgeSearchObserver::ground_probe`].
    GroundProbe {
        origin: Vec3,
        hit: Option<CollisionData>,
    },
}

/// Observer that records every query of one search, for debug drawing.
#[derive(Debug, Clone, Default)]
pub struct LedgeTrace {
    events: Vec<TraceEvent>,
    search: Option<LedgeSearch>,
}

impl LedgeTrace {
    /// Recorded queries in issue order.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Result of the traced search, once finished.
    pub fn search(&self) -> Option<&LedgeSearch> {
        self.search.as_ref()
    }

    /// Number of surface steps that reached the obstruction test.
    pub fn steps_examined(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, TraceEvent::ObstructionCheck { .. }))
            .count()
    }
}

impl LedgeSearchObserver for LedgeTrace {
    fn wall_probe(&mut self, ray: &ProbeRay, hit: Option<&CollisionData>) {
        self.events.push(TraceEvent::WallProbe {
            ray: *ray,
            hit: hit.copied(),
        });
    }

    fn overhang_probe(&mut self, origin: Vec3, hit: Option<&CollisionData>) {
        self.events.push(TraceEvent::OverhangProbe {
            origin,
            hit: hit.copied(),
        });
    }

    fn obstruction_check(&mut self, point: Vec3, radius: f32, occupied: bool) {
        self.events.push(TraceEvent::ObstructionCheck {
            point,
            radius,
            occupied,
        });
    }

    fn surface_probe(&mut self, origin: Vec3, hit: Option<&CollisionData>) {
        self.events.push(TraceEvent::SurfaceProbe {
            origin,
            hit: hit.copied(),
        });
    }

    fn clearance_check(&mut self, center: Vec3, size: Vec3, overlaps: usize) {
        self.events.push(TraceEvent::ClearanceCheck {
            center,
            size,
            overlaps,
        });
    }

    fn ground_probe(&mut self, origin: Vec3, hit: Option<&CollisionData>) {
        self.events.push(TraceEvent::GroundProbe {
            origin,
            hit: hit.copied(),
        });
    }

    fn finished(&mut self, _ray: &ProbeRay, search: &LedgeSearch) {
        self.search = Some(*search);
    }
}
