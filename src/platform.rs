/*!
Moving and turning platform drivers.

Platforms are ordinary world surfaces driven through the world's pose
mutation API. The linear driver translates its surface every tick and hands
riders the same delta as a carry push, so their motors latch the
moving-support flag and skip gravity while riding. The turning driver only
rotates geometry; nothing rides it.
*/

use crate::collision::{StaticWorld, SurfaceId};
use crate::math::{self, Vec2};
use crate::motor::Motor;

/// Constant-velocity surface mover with an optional travel limit.
#[derive(Clone, Debug)]
pub struct KinematicPlatform {
    surface: SurfaceId,
    /// Unit travel direction; zero when the configured direction was
    /// degenerate, which leaves the platform permanently still.
    direction: Vec2,
    base_speed: f32,
    /// Distance covered since the last reset (meters).
    travel: f32,
    /// Total travel allowed before the platform stops, if any (meters).
    max_travel: Option<f32>,
    active: bool,
}

impl KinematicPlatform {
    pub fn new(surface: SurfaceId, direction: Vec2, base_speed: f32) -> Self {
        let direction = math::normalize_or_zero(direction);
        if direction == Vec2::zeros() {
            log::warn!("platform for surface {:?} has a degenerate direction and will not move", surface);
        }
        Self {
            surface,
            direction,
            base_speed,
            travel: 0.0,
            max_travel: None,
            active: true,
        }
    }

    /// Limit total travel; the platform stops there until reset.
    pub fn with_max_travel(mut self, max_travel: f32) -> Self {
        self.max_travel = Some(max_travel);
        self
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_base_speed(&mut self, base_speed: f32) {
        self.base_speed = base_speed;
    }

    /// Zero the accumulated travel, re-arming a travel-limited platform.
    pub fn reset_input(&mut self) {
        self.travel = 0.0;
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn traveled(&self) -> f32 {
        self.travel
    }

    /// One platform tick: move the surface, then carry every rider standing
    /// on it. The carry push is consumed by the rider's next move.
    pub fn step(&mut self, world: &mut StaticWorld, riders: &mut [&mut dyn Motor], dt: f32) {
        if !self.active || dt <= 0.0 || self.direction == Vec2::zeros() {
            return;
        }

        let mut step_len = self.base_speed * dt;
        if let Some(max_travel) = self.max_travel {
            step_len = step_len.min(max_travel - self.travel);
        }
        if step_len <= 0.0 {
            return;
        }

        let delta = self.direction * step_len;
        if !world.translate_surface(self.surface, delta) {
            log::warn!("platform surface {:?} is gone; deactivating", self.surface);
            self.active = false;
            return;
        }
        self.travel += step_len;

        for rider in riders.iter_mut() {
            if rider.ground_surface() == Some(self.surface) {
                rider.push(delta, true);
            }
        }
    }
}

/// Rotates its surface toward a target angle at a fixed angular speed.
#[derive(Clone, Debug)]
pub struct TurningPlatform {
    surface: SurfaceId,
    target_angle: f32,
    /// Radians per second.
    angular_speed: f32,
    current: f32,
}

impl TurningPlatform {
    pub fn new(surface: SurfaceId, initial_angle: f32, angular_speed: f32) -> Self {
        Self {
            surface,
            target_angle: initial_angle,
            angular_speed,
            current: initial_angle,
        }
    }

    pub fn set_target_angle(&mut self, angle: f32) {
        self.target_angle = angle;
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.current
    }

    pub fn step(&mut self, world: &mut StaticWorld, dt: f32) {
        if dt <= 0.0 || self.current == self.target_angle {
            return;
        }
        let next = math::move_toward(self.current, self.target_angle, self.angular_speed * dt);
        if world.set_surface_rotation(self.surface, next) {
            self.current = next;
        } else {
            // Stop chasing a surface that no longer exists.
            self.target_angle = self.current;
        }
    }
}
