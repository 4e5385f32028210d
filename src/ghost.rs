/*!
Ghost controller.

The detachable spirit runs in one of two modes: trailing its anchor with
critically damped smoothing, or piloted directly under possession. Piloted
motion goes through the leash before it reaches the motor, so the ghost can
never be steered out of range of its anchor. All position changes flow through
the ghost's own free motor.
*/

use crate::leash::{self, LeashSettings};
use crate::math::{self, Point2, Vec2};
use crate::motor::{FreeMotor, FreeMotorSettings, Motor};

/// What currently drives the ghost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GhostMode {
    /// Trail the anchor with smoothing, after a short start delay.
    #[default]
    FollowAnchor,
    /// Piloted by the input axis under possession.
    FreeControl,
}

/// Tuning for the follow mode.
#[derive(Clone, Copy, Debug)]
pub struct FollowSettings {
    /// Delay after entering follow mode before smoothing engages (seconds).
    pub start_delay: f32,
    /// Smoothing time constant (seconds).
    pub smooth_time: f32,
    /// Cap on the smoothed approach speed (m/s).
    pub max_follow_speed: f32,
    /// Resting offset from the anchor; x flips sign with the anchor's facing.
    pub offset: Vec2,
}

impl Default for FollowSettings {
    fn default() -> Self {
        Self {
            start_delay: 0.5,
            smooth_time: 0.25,
            max_follow_speed: 10.0,
            offset: Vec2::new(-1.0, 1.0),
        }
    }
}

/// Tuning for a [`GhostController`].
#[derive(Clone, Copy, Debug)]
pub struct GhostSettings {
    /// Piloted flight speed (m/s).
    pub move_speed: f32,
    pub motor: FreeMotorSettings,
    pub follow: FollowSettings,
    /// Leash to the anchor while piloted. `None` flies unconstrained.
    pub leash: Option<LeashSettings>,
}

impl Default for GhostSettings {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            motor: FreeMotorSettings::default(),
            follow: FollowSettings::default(),
            leash: Some(LeashSettings::default()),
        }
    }
}

/// Mode-switching controller over a free motor.
#[derive(Clone, Debug)]
pub struct GhostController {
    motor: FreeMotor,
    mode: GhostMode,
    follow: FollowSettings,
    leash: Option<LeashSettings>,
    move_speed: f32,
    input_axis: Vec2,
    /// Smoothing state for follow mode; zeroed on every mode entry.
    damp_velocity: Vec2,
    /// Remaining delay before follow smoothing engages (seconds).
    follow_wait: f32,
}

impl GhostController {
    pub fn new(position: Point2, settings: GhostSettings) -> Self {
        let leash = match settings.leash {
            Some(leash) if leash.hard_radius <= 0.0 => {
                log::warn!(
                    "ghost leash configured with non-positive hard radius; disabling the leash"
                );
                None
            }
            other => other,
        };
        Self {
            motor: FreeMotor::new(position, settings.motor),
            mode: GhostMode::FollowAnchor,
            follow: settings.follow,
            leash,
            move_speed: settings.move_speed,
            input_axis: Vec2::zeros(),
            damp_velocity: Vec2::zeros(),
            follow_wait: settings.follow.start_delay,
        }
    }

    /// Per-tick movement input for free control, in [-1, 1] per axis.
    pub fn set_input_axis(&mut self, axis: Vec2) {
        self.input_axis = axis;
    }

    /// Hand the ghost to the player: piloted free control.
    pub fn take_control(&mut self) {
        self.mode = GhostMode::FreeControl;
        self.input_axis = Vec2::zeros();
        self.damp_velocity = Vec2::zeros();
    }

    /// Return the ghost to trailing its anchor, with a fresh start delay.
    pub fn release_control(&mut self) {
        self.mode = GhostMode::FollowAnchor;
        self.input_axis = Vec2::zeros();
        self.damp_velocity = Vec2::zeros();
        self.follow_wait = self.follow.start_delay;
        self.motor.request(Vec2::zeros());
    }

    /// One ghost tick against the anchor's current pose.
    pub fn step(&mut self, anchor: Point2, facing: f32, dt: f32) {
        match self.mode {
            GhostMode::FollowAnchor => self.step_follow(anchor, facing, dt),
            GhostMode::FreeControl => self.step_free(anchor, dt),
        }
    }

    fn step_follow(&mut self, anchor: Point2, facing: f32, dt: f32) {
        // Delay gate: leftover velocity coasts out before smoothing engages.
        if self.follow_wait > 0.0 {
            self.follow_wait = (self.follow_wait - dt).max(0.0);
            self.motor.request(Vec2::zeros());
            self.motor.integrate(dt);
            return;
        }

        let mut offset = self.follow.offset;
        if facing < 0.0 {
            offset.x = -offset.x;
        }
        let target = anchor + offset;
        let next = math::smooth_damp(
            self.motor.position(),
            target,
            &mut self.damp_velocity,
            self.follow.smooth_time,
            self.follow.max_follow_speed,
            dt,
        );
        self.motor.shift(next - self.motor.position());

        // Smoothing owns the motion; keep the motor itself drained so pushes
        // still decay without adding drift.
        self.motor.request(Vec2::zeros());
        self.motor.integrate(dt);
    }

    fn step_free(&mut self, anchor: Point2, dt: f32) {
        let desired = math::normalize_or_zero(self.input_axis) * self.move_speed;
        let constrained = match &self.leash {
            Some(leash) => leash::constrain_velocity(desired, self.motor.position(), anchor, leash),
            None => desired,
        };
        self.motor.request(constrained);
        self.motor.integrate(dt);

        if let Some(leash) = &self.leash {
            if let Some(clamped) = leash::clamp_position(self.motor.position(), anchor, leash) {
                self.motor.shift(clamped - self.motor.position());
            }
        }
    }

    #[inline]
    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        self.motor.position()
    }

    #[inline]
    pub fn motor(&self) -> &FreeMotor {
        &self.motor
    }

    #[inline]
    pub fn motor_mut(&mut self) -> &mut FreeMotor {
        &mut self.motor
    }
}
