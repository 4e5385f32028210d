/*!
Pushable box driver.

Owns the per-tick physics of a grabbable crate on top of a grounded motor:
gravity while airborne, exponential horizontal drag, the grab drive fed by the
coupling, and a per-state horizontal speed cap. The driver tracks velocity in
m/s and hands the motor pre-scaled displacements.
*/

use parry2d::bounding_volume::Aabb;

use crate::collision::settings::GRAVITY_Y;
use crate::collision::{RaycastSweep, StaticWorld, SweepResolver};
use crate::layers::LayerMask;
use crate::math::{self, Point2, Vec2};
use crate::motor::{GroundedMotor, Motor};

/// Tuning for a [`PushableBox`].
#[derive(Clone, Copy, Debug)]
pub struct BoxPhysicsSettings {
    /// Vertical acceleration while airborne (m/s², negative is down).
    pub gravity: f32,
    /// Exponential decay rate of horizontal velocity (1/seconds).
    pub linear_drag: f32,
    /// Horizontal speed cap while free (m/s).
    pub max_horizontal_speed: f32,
    /// Horizontal speed cap while grabbed (m/s).
    pub max_speed_grabbed: f32,
}

impl Default for BoxPhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_Y,
            linear_drag: 10.0,
            max_horizontal_speed: 4.0,
            max_speed_grabbed: 6.0,
        }
    }
}

/// A grabbable crate riding a collision-resolved motor.
#[derive(Debug)]
pub struct PushableBox {
    motor: GroundedMotor,
    settings: BoxPhysicsSettings,
    /// Driver-owned velocity (m/s); the motor receives `velocity * dt`.
    velocity: Vec2,
    grabbed: bool,
    /// Horizontal acceleration fed by the grab coupling (m/s²).
    grab_accel_x: f32,
}

impl PushableBox {
    pub fn new(position: Point2, half_extents: Vec2, settings: BoxPhysicsSettings) -> Self {
        Self::with_resolver(
            position,
            half_extents,
            settings,
            Box::new(RaycastSweep::default()),
        )
    }

    pub fn with_resolver(
        position: Point2,
        half_extents: Vec2,
        settings: BoxPhysicsSettings,
        resolver: Box<dyn SweepResolver>,
    ) -> Self {
        let motor = GroundedMotor::new(position, half_extents, LayerMask::solid_default(), resolver);
        Self {
            motor,
            settings,
            velocity: Vec2::zeros(),
            grabbed: false,
            grab_accel_x: 0.0,
        }
    }

    /// One physics tick, in a fixed order: gravity, drag, grab drive, speed
    /// cap, resolved move, vertical settle on support.
    pub fn step(&mut self, world: &StaticWorld, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        // 1) Gravity, unless a moving support is carrying the box.
        if !self.motor.is_on_moving_support() {
            self.velocity.y += self.settings.gravity * dt;
        }

        // 2) Horizontal drag, then the grab drive on top of it.
        self.velocity.x = math::exp_decay(self.velocity.x, self.settings.linear_drag, dt);
        if self.grabbed {
            self.velocity.x += self.grab_accel_x * dt;
        }

        // 3) Per-state speed cap.
        let max = if self.grabbed {
            self.settings.max_speed_grabbed
        } else {
            self.settings.max_horizontal_speed
        };
        self.velocity.x = self.velocity.x.clamp(-max, max);

        // 4) Resolved move, then settle the vertical axis on support.
        self.motor.move_by(world, self.velocity * dt, false);
        if self.motor.is_grounded() {
            self.velocity.y = 0.0;
        }
    }

    /// Mark the box as grabbed. Idempotent.
    pub fn grab(&mut self) {
        self.grabbed = true;
    }

    /// Drop the box and clear its grab drive. Idempotent.
    pub fn release(&mut self) {
        self.grabbed = false;
        self.grab_accel_x = 0.0;
    }

    /// Set the horizontal drive acceleration. Ignored unless grabbed.
    pub fn set_grab_drive(&mut self, accel_x: f32) {
        if self.grabbed {
            self.grab_accel_x = accel_x;
        }
    }

    /// Reposition instantly, clearing driver and motor velocity.
    pub fn teleport(&mut self, position: Point2) {
        self.motor.teleport(position);
        self.velocity = Vec2::zeros();
    }

    #[inline]
    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    /// Driver-owned velocity (m/s).
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        self.motor.position()
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.motor.half_extents()
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.motor.aabb()
    }

    #[inline]
    pub fn motor(&self) -> &GroundedMotor {
        &self.motor
    }

    #[inline]
    pub fn motor_mut(&mut self) -> &mut GroundedMotor {
        &mut self.motor
    }
}
