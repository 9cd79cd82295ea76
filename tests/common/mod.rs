//! Analytic test scene made of axis-aligned boxes.

#![allow(dead_code)]

use bevy::prelude::*;
use msg_ledge_detector::prelude::*;

/// A solid axis-aligned box on one or more layers.
#[derive(Debug, Clone, Copy)]
pub struct SceneBox {
    pub min: Vec3,
    pub max: Vec3,
    pub layers: LayerMask,
}

impl SceneBox {
    /// Time of impact and normal of a ray entering the box.
    ///
    /// Rays starting inside the box, or on its surface, ignore it.
    fn ray_entry(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<(f32, Vec3)> {
        let mut t_enter = 0.0_f32;
        let mut t_exit = max_distance;
        let mut normal = Vec3::ZERO;

        for (axis, unit) in Vec3::AXES.into_iter().enumerate() {
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < 1e-8 {
                if o < self.min[axis] || o > self.max[axis] {
                    return None;
                }
                continue;
            }

            let (near, far) = if d > 0.0 {
                (self.min[axis], self.max[axis])
            } else {
                (self.max[axis], self.min[axis])
            };
            let t_near = (near - o) / d;
            let t_far = (far - o) / d;

            if t_near > t_enter {
                t_enter = t_near;
                normal = unit * -d.signum();
            }
            t_exit = t_exit.min(t_far);

            if t_enter > t_exit {
                return None;
            }
        }

        (normal != Vec3::ZERO).then_some((t_enter, normal))
    }

    fn touches_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        (closest - center).length_squared() <= radius * radius
    }

    fn overlaps_box(&self, min: Vec3, max: Vec3) -> bool {
        self.min.cmplt(max).all() && min.cmplt(self.max).all()
    }
}

/// Query service over a list of boxes.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    pub boxes: Vec<SceneBox>,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box on layer 0.
    pub fn with_box(self, min: Vec3, max: Vec3) -> Self {
        self.with_box_on(min, max, LayerMask::layer(0))
    }

    pub fn with_box_on(mut self, min: Vec3, max: Vec3, layers: LayerMask) -> Self {
        self.boxes.push(SceneBox { min, max, layers });
        self
    }

    fn visible(&self, layers: LayerMask) -> impl Iterator<Item = &SceneBox> {
        self.boxes
            .iter()
            .filter(move |scene_box| scene_box.layers.intersects(layers))
    }
}

impl CollisionQueryService for BoxScene {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Result<Option<CollisionData>, CollisionQueryError> {
        let hit = self
            .visible(layers)
            .filter_map(|scene_box| scene_box.ray_entry(origin, direction, max_distance))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(distance, normal)| {
                CollisionData::new(distance, normal, origin + direction * distance, None)
            });
        Ok(hit)
    }

    fn overlaps_sphere(
        &self,
        center: Vec3,
        radius: f32,
        layers: LayerMask,
    ) -> Result<bool, CollisionQueryError> {
        Ok(self
            .visible(layers)
            .any(|scene_box| scene_box.touches_sphere(center, radius)))
    }

    fn overlap_box_count(
        &self,
        center: Vec3,
        half_extents: Vec3,
        layers: LayerMask,
    ) -> Result<usize, CollisionQueryError> {
        let (min, max) = (center - half_extents, center + half_extents);
        Ok(self
            .visible(layers)
            .filter(|scene_box| scene_box.overlaps_box(min, max))
            .count())
    }
}

/// Origin of the probe ray used by the scenarios.
pub const PROBE_ORIGIN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Probe from one unit above the ground towards +X.
pub fn probe() -> ProbeRay {
    ProbeRay::new(PROBE_ORIGIN, Vec3::X)
}

/// Flat ground with its top at y = 0.
pub fn ground() -> BoxScene {
    BoxScene::new().with_box(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0))
}

/// Ground plus a wall facing -X at x = 5 whose top is at `top`.
pub fn wall_with_top(top: f32) -> BoxScene {
    ground().with_box(Vec3::new(5.0, 0.0, -50.0), Vec3::new(7.0, top, 50.0))
}

/// Ground plus a wall with a standable top two units up.
pub fn ledge_scene() -> BoxScene {
    wall_with_top(2.0)
}

pub fn assert_vec_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-4,
        "expected {expected}, got {actual}"
    );
}
