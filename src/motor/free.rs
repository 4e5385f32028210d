/*!
Non-colliding integrating motor.

The ghost passes through world geometry, so its motor skips collision entirely
and just integrates a requested velocity. The request is latched per tick and
consumed by `integrate`, which also applies and decays accumulated pushes.
*/

use crate::collision::StaticWorld;
use crate::math::{self, Point2, Vec2};
use crate::motor::{Motor, MotorState};

/// External force below this squared magnitude snaps to zero (m/s, squared).
const FORCE_EPS_SQ: f32 = 1.0e-4;

/// How a [`FreeMotor`] folds the requested velocity into its internal one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegrationProfile {
    /// Ramp toward the target at `acceleration` per second while a non-zero
    /// target is latched, and toward zero at `deceleration` otherwise.
    #[default]
    Smoothed,
    /// The target replaces the internal velocity immediately.
    Direct,
}

/// Tuning for a [`FreeMotor`].
#[derive(Clone, Copy, Debug)]
pub struct FreeMotorSettings {
    pub profile: IntegrationProfile,
    /// Ramp-up rate toward a non-zero target (m/s²).
    pub acceleration: f32,
    /// Ramp-down rate toward zero when no target is latched (m/s²).
    pub deceleration: f32,
    /// Hard cap on the applied speed, force included (m/s).
    pub max_speed: f32,
    /// Exponential decay rate of accumulated pushes (1/seconds).
    pub external_damping: f32,
    /// Applied speeds below this snap to zero to kill micro-drift (m/s).
    pub stop_threshold: f32,
}

impl Default for FreeMotorSettings {
    fn default() -> Self {
        Self {
            profile: IntegrationProfile::Smoothed,
            acceleration: 40.0,
            deceleration: 50.0,
            max_speed: 10.0,
            external_damping: 3.0,
            stop_threshold: 0.05,
        }
    }
}

/// Kinematic motor integrating a velocity without collision.
///
/// The applied velocity reported through [`MotorState`] is in m/s, unlike the
/// grounded motor's per-tick translations; callers of this motor hand it
/// velocities and a dt rather than pre-scaled displacements.
#[derive(Clone, Debug)]
pub struct FreeMotor {
    position: Point2,
    settings: FreeMotorSettings,
    /// Internal velocity advanced by the integration profile (m/s).
    velocity: Vec2,
    /// Velocity target latched by the last request (m/s).
    target: Vec2,
    state: MotorState,
}

impl FreeMotor {
    pub fn new(position: Point2, settings: FreeMotorSettings) -> Self {
        Self {
            position,
            settings,
            velocity: Vec2::zeros(),
            target: Vec2::zeros(),
            state: MotorState::default(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &FreeMotorSettings {
        &self.settings
    }

    /// Latch the velocity target consumed by the next [`Self::integrate`].
    pub fn request(&mut self, target: Vec2) {
        self.target = target;
        self.state.raw_velocity = target;
    }

    /// Advance one tick. `dt <= 0` is a no-op: no motion, no force decay.
    pub fn integrate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        // 1) Fold the latched target into the internal velocity.
        self.velocity = match self.settings.profile {
            IntegrationProfile::Smoothed => {
                if self.target.norm_squared() > 1.0e-12 {
                    math::move_toward_vec(self.velocity, self.target, self.settings.acceleration * dt)
                } else {
                    math::move_toward_vec(self.velocity, Vec2::zeros(), self.settings.deceleration * dt)
                }
            }
            IntegrationProfile::Direct => self.target,
        };

        // 2) Add the in-flight force, clamp the speed, kill micro-drift.
        let mut applied = self.velocity + self.state.external_force;
        let speed_sq = applied.norm_squared();
        let max = self.settings.max_speed;
        if speed_sq > max * max {
            applied *= max / speed_sq.sqrt();
        }
        if applied.norm() < self.settings.stop_threshold {
            applied = Vec2::zeros();
        }

        // 3) Move. No collision for this motor.
        self.position += applied * dt;
        self.state.velocity = applied;

        // 4) Decay the force; sub-step decay composes exactly.
        self.state.external_force =
            math::exp_decay_vec(self.state.external_force, self.settings.external_damping, dt);
        if self.state.external_force.norm_squared() < FORCE_EPS_SQ {
            self.state.external_force = Vec2::zeros();
        }
    }

    /// Raw positional offset that leaves all velocity state untouched.
    ///
    /// The follow-mode smoothing path uses this so positions stay motor-owned
    /// without pretending the offset was integrated motion.
    pub fn shift(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

impl Motor for FreeMotor {
    /// Latches `motion` as the velocity target. `world` and the carry flag are
    /// ignored since this motor never collides or rides geometry.
    fn move_by(&mut self, _world: &StaticWorld, motion: Vec2, _from_moving_support: bool) {
        self.request(motion);
    }

    /// The carry flag is meaningless for a non-colliding body and is ignored.
    fn push(&mut self, force: Vec2, _from_moving_support: bool) {
        self.state.external_force += force;
    }

    fn teleport(&mut self, position: Point2) {
        self.position = position;
        self.velocity = Vec2::zeros();
        self.target = Vec2::zeros();
        self.state = MotorState::default();
    }

    fn position(&self) -> Point2 {
        self.position
    }

    fn state(&self) -> &MotorState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn motor() -> FreeMotor {
        FreeMotor::new(Point2::new(0.0, 0.0), FreeMotorSettings::default())
    }

    fn direct_motor() -> FreeMotor {
        FreeMotor::new(
            Point2::new(0.0, 0.0),
            FreeMotorSettings {
                profile: IntegrationProfile::Direct,
                ..FreeMotorSettings::default()
            },
        )
    }

    #[test]
    fn smoothed_profile_ramps_toward_the_target() {
        let mut m = motor();
        m.request(Vec2::new(10.0, 0.0));

        // 40 m/s² over 0.1s ticks: 4, 8, then capped at the 10 m/s target.
        m.integrate(0.1);
        assert!((m.velocity().x - 4.0).abs() < 1.0e-4);
        m.integrate(0.1);
        assert!((m.velocity().x - 8.0).abs() < 1.0e-4);
        m.integrate(0.1);
        assert!((m.velocity().x - 10.0).abs() < 1.0e-4);

        // Target released: 50 m/s² back toward zero.
        m.request(Vec2::zeros());
        m.integrate(0.1);
        assert!((m.velocity().x - 5.0).abs() < 1.0e-4);
    }

    #[test]
    fn direct_profile_applies_the_target_immediately() {
        let mut m = direct_motor();
        m.request(Vec2::new(3.0, 4.0));
        m.integrate(0.1);

        assert!((m.velocity() - Vec2::new(3.0, 4.0)).norm() < 1.0e-5);
        assert!((m.position() - Point2::new(0.3, 0.4)).norm() < 1.0e-5);
        assert!(!m.is_grounded());
    }

    #[test]
    fn speed_clamps_and_micro_speeds_snap_to_zero() {
        let mut m = direct_motor();
        m.request(Vec2::new(30.0, 40.0));
        m.integrate(0.1);
        // 50 m/s clamped to the 10 m/s cap along the same direction.
        assert!((m.velocity() - Vec2::new(6.0, 8.0)).norm() < 1.0e-4);
        assert!((m.raw_velocity() - Vec2::new(30.0, 40.0)).norm() < 1.0e-6);

        let before = m.position();
        m.request(Vec2::new(0.01, 0.0));
        m.integrate(0.1);
        assert_eq!(m.velocity(), Vec2::zeros());
        assert_eq!(m.position(), before);
    }

    #[test]
    fn force_decay_is_split_step_equivalent() {
        let mut a = motor();
        let mut b = motor();
        a.push(Vec2::new(8.0, 0.0), false);
        b.push(Vec2::new(8.0, 0.0), false);

        for _ in 0..4 {
            a.integrate(0.05);
        }
        b.integrate(0.2);

        assert!((a.state().external_force.x - b.state().external_force.x).abs() < 1.0e-4);
        // 8 * exp(-3 * 0.2)
        assert!((b.state().external_force.x - 8.0 * (-0.6f32).exp()).abs() < 1.0e-4);
    }

    #[test]
    fn zero_dt_integration_changes_nothing() {
        let mut m = motor();
        m.request(Vec2::new(5.0, 0.0));
        m.push(Vec2::new(1.0, 0.0), false);
        m.integrate(0.0);

        assert_eq!(m.position(), Point2::new(0.0, 0.0));
        assert_eq!(m.state().external_force, Vec2::new(1.0, 0.0));
        assert_eq!(m.velocity(), Vec2::zeros());
    }

    #[test]
    fn shift_preserves_velocity_state() {
        let mut m = direct_motor();
        m.request(Vec2::new(2.0, 0.0));
        m.integrate(0.1);

        m.shift(Vec2::new(0.0, 5.0));
        assert!((m.position() - Point2::new(0.2, 5.0)).norm() < 1.0e-5);
        assert!((m.velocity() - Vec2::new(2.0, 0.0)).norm() < 1.0e-5);
        assert!((m.raw_velocity() - Vec2::new(2.0, 0.0)).norm() < 1.0e-5);
    }

    #[test]
    fn teleport_clears_velocity_and_force() {
        let mut m = motor();
        m.request(Vec2::new(5.0, 0.0));
        m.push(Vec2::new(2.0, 0.0), false);
        m.integrate(0.1);

        m.teleport(Point2::new(7.0, -1.0));
        assert_eq!(m.position(), Point2::new(7.0, -1.0));
        assert_eq!(m.velocity(), Vec2::zeros());
        assert_eq!(m.state().external_force, Vec2::zeros());

        // No latched target survives either: the motor stays put.
        m.integrate(0.1);
        assert_eq!(m.position(), Point2::new(7.0, -1.0));
    }
}
