//! # `msg_ledge_detector`
//!
//! Ledge detection for climbing characters with physics backend abstraction.
//!
//! Given a probe ray cast forward from a character, the detector finds a wall,
//! walks up its face looking for a standable top surface, checks that there is
//! headroom above it, and measures how far that surface sits above the ground
//! behind the character. The result is either a [`Ledge`](ledge::Ledge) or the
//! reason none was found.
//!
//! ## Architecture
//!
//! - [`detector::find_ledge`] is a pure function over a
//!   [`CollisionQueryService`](backend::CollisionQueryService), so it can be
//!   driven by any physics engine or by an analytic test scene
//! - [`trace::LedgeSearchObserver`] receives every intermediate query, which
//!   the [`gizmos`] module uses for debug drawing
//! - [`LedgeDetectionPlugin`] wires detection into a Bevy app for entities with
//!   a [`LedgeDetector`](config::LedgeDetector) component
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_ledge_detector::prelude::*;
//!
//! // Climb onto ledges at least 1.5 units wide and 1 unit above the ground
//! let settings = LedgeDetectionSettings::default()
//!     .with_min_ledge_width(1.5)
//!     .with_min_distance_to_ground(1.0);
//! let detector = LedgeDetector::new(settings);
//!
//! // Spawn `detector` on the character; `LedgeDetectionState` is added with it
//! ```

use std::marker::PhantomData;

use bevy::prelude::*;

pub mod backend;
pub mod config;
pub mod detection;
pub mod detector;
pub mod error;
pub mod gizmos;
pub mod ledge;
pub mod systems;
pub mod trace;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{
        CollisionData, CollisionQueryService, LayerMask, LedgePhysicsBackend, ManualBackend,
        ProbeRay,
    };
    pub use crate::config::{LedgeDetectionSettings, LedgeDetector};
    pub use crate::detection::{
        LedgeDetectionOutcome, LedgeDetectionState, LedgeRejection, LedgeSearch,
    };
    pub use crate::detector::find_ledge;
    pub use crate::error::{CollisionQueryError, LedgeDetectionError, SettingsError};
    pub use crate::ledge::Ledge;
    pub use crate::systems::update_ledge_state;
    pub use crate::trace::{LedgeSearchObserver, LedgeTrace, NoopObserver};
    pub use crate::{LedgeDetectionPlugin, LedgeDetectionSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, RapierQueryService};
}

/// System set containing the backend's detection systems.
///
/// Order gameplay systems that read
/// [`LedgeDetectionState`](detection::LedgeDetectionState) after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgeDetectionSet;

/// Main plugin for ledge detection.
///
/// Generic over a physics backend `B` that provides the systems feeding
/// [`systems::update_ledge_state`] with scene queries.
///
/// # Examples
///
/// With the Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use msg_ledge_detector::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(LedgeDetectionPlugin::<Rapier3dBackend>::default().with_debug_gizmos())
///     .run();
/// ```
pub struct LedgeDetectionPlugin<B: backend::LedgePhysicsBackend> {
    debug_gizmos: bool,
    _marker: PhantomData<B>,
}

impl<B: backend::LedgePhysicsBackend> Default for LedgeDetectionPlugin<B> {
    fn default() -> Self {
        Self {
            debug_gizmos: false,
            _marker: PhantomData,
        }
    }
}

impl<B: backend::LedgePhysicsBackend> LedgeDetectionPlugin<B> {
    /// Draw recorded traces and found ledges with gizmos.
    ///
    /// Traces are only recorded for detectors built with
    /// [`LedgeDetector::with_trace`](config::LedgeDetector::with_trace).
    pub fn with_debug_gizmos(mut self) -> Self {
        self.debug_gizmos = true;
        self
    }
}

impl<B: backend::LedgePhysicsBackend> Plugin for LedgeDetectionPlugin<B> {
    fn build(&self, app: &mut App) {
        app.register_type::<config::LedgeDetector>();
        app.register_type::<config::LedgeDetectionSettings>();
        app.register_type::<detection::LedgeDetectionState>();
        app.register_type::<detection::LedgeDetectionOutcome>();
        app.register_type::<detection::LedgeRejection>();
        app.register_type::<ledge::Ledge>();
        app.register_type::<backend::LayerMask>();

        app.add_plugins(B::plugin());

        if self.debug_gizmos {
            app.add_systems(
                PostUpdate,
                gizmos::draw_ledge_gizmos.in_set(gizmos::LedgeDebugGizmosSet),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ManualBackend;
    use crate::config::LedgeDetector;
    use crate::detection::{LedgeDetectionOutcome, LedgeDetectionState};

    #[test]
    fn plugin_registers_types() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(LedgeDetectionPlugin::<ManualBackend>::default());

        let registry = app.world().resource::<AppTypeRegistry>().read();
        assert!(registry.get(std::any::TypeId::of::<LedgeDetector>()).is_some());
        assert!(registry
            .get(std::any::TypeId::of::<LedgeDetectionState>())
            .is_some());
    }

    #[test]
    fn detector_requires_state() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(LedgeDetectionPlugin::<ManualBackend>::default());

        let entity = app.world_mut().spawn(LedgeDetector::default()).id();
        app.update();

        let state = app
            .world()
            .get::<LedgeDetectionState>(entity)
            .expect("state should be required by the detector");
        assert_eq!(state.outcome, LedgeDetectionOutcome::NoWall);
        assert!(!state.has_ledge());
    }
}
