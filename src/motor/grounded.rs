/*!
Collision-resolved kinematic motor.

Boxes and other grounded bodies move through explicit per-tick displacements
that a sweep strategy resolves against the static world before the position
changes. External pushes accumulate between moves and are consumed by the next
one, whether or not the sweep lets the body travel.
*/

use parry2d::bounding_volume::Aabb;

use crate::collision::{
    StaticWorld, SurfaceId, SweepHit, SweepRequest, SweepResolver,
};
use crate::layers::LayerMask;
use crate::math::{Point2, Vec2};
use crate::motor::{Motor, MotorState};

/// Kinematic motor resolving its displacement against static geometry.
#[derive(Debug)]
pub struct GroundedMotor {
    position: Point2,
    half_extents: Vec2,
    mask: LayerMask,
    resolver: Box<dyn SweepResolver>,
    state: MotorState,
    /// Set by pushes flagged as platform carry; consumed by the next move.
    pending_moving_support: bool,
    /// Supporting contact recorded by the last move, while grounded.
    ground: Option<SweepHit>,
}

impl GroundedMotor {
    /// Creates a motor at `position` with the given bounds and collision mask.
    ///
    /// Non-positive half extents degrade to a point body: every sampled edge
    /// collapses onto the body position and resolution still works.
    pub fn new(
        position: Point2,
        half_extents: Vec2,
        mask: LayerMask,
        resolver: Box<dyn SweepResolver>,
    ) -> Self {
        if half_extents.x <= 0.0 || half_extents.y <= 0.0 {
            log::warn!(
                "grounded motor built with degenerate half extents ({}, {}); treating as a point body",
                half_extents.x,
                half_extents.y
            );
        }
        Self {
            position,
            half_extents,
            mask,
            resolver,
            state: MotorState::default(),
            pending_moving_support: false,
            ground: None,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Axis-aligned bounds at the current position.
    pub fn aabb(&self) -> Aabb {
        Aabb {
            mins: Point2::from(self.position.coords - self.half_extents),
            maxs: Point2::from(self.position.coords + self.half_extents),
        }
    }
}

impl Motor for GroundedMotor {
    fn move_by(&mut self, world: &StaticWorld, motion: Vec2, from_moving_support: bool) {
        // 1) Record the request with the pending force folded in. The force is
        //    consumed by this move even when the sweep zeroes travel.
        let requested = motion + self.state.external_force;
        self.state.raw_velocity = requested;
        self.state.external_force = Vec2::zeros();

        // 2) Resolve the combined motion against the world.
        let outcome = self.resolver.resolve(
            world,
            &SweepRequest {
                position: self.position,
                half_extents: self.half_extents,
                displacement: requested,
                mask: self.mask,
            },
        );

        // 3) Apply travel and refresh support state. The moving-support flag
        //    holds only for a move that is marked itself or follows a carry
        //    push.
        self.position += outcome.applied;
        self.state.velocity = outcome.applied;
        self.state.grounded = outcome.grounded;
        self.ground = outcome.ground().copied();
        self.state.on_moving_support = from_moving_support || self.pending_moving_support;
        self.pending_moving_support = false;
    }

    fn push(&mut self, force: Vec2, from_moving_support: bool) {
        self.state.external_force += force;
        self.pending_moving_support |= from_moving_support;
    }

    fn teleport(&mut self, position: Point2) {
        self.position = position;
        self.state = MotorState::default();
        self.pending_moving_support = false;
        self.ground = None;
    }

    fn position(&self) -> Point2 {
        self.position
    }

    fn state(&self) -> &MotorState {
        &self.state
    }

    fn ground_surface(&self) -> Option<SurfaceId> {
        self.ground.map(|hit| hit.surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::settings::DEFAULT_SKIN;
    use crate::collision::{RaycastSweep, Surface};

    fn floor_world() -> StaticWorld {
        StaticWorld::from_surfaces(vec![Surface::half_plane(Vec2::y(), Point2::new(0.0, 0.0))])
    }

    fn motor_at(position: Point2) -> GroundedMotor {
        GroundedMotor::new(
            position,
            Vec2::new(0.5, 0.5),
            LayerMask::solid_default(),
            Box::new(RaycastSweep::default()),
        )
    }

    #[test]
    fn push_lands_on_the_following_move() {
        let world = StaticWorld::new();
        let mut motor = motor_at(Point2::new(0.0, 5.0));

        motor.push(Vec2::new(0.5, 0.0), false);
        assert_eq!(motor.position(), Point2::new(0.0, 5.0));

        motor.move_by(&world, Vec2::zeros(), false);
        assert!((motor.position().x - 0.5).abs() < 1.0e-6);

        // Consumed: the next move adds nothing.
        motor.move_by(&world, Vec2::zeros(), false);
        assert!((motor.position().x - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn force_is_consumed_even_when_the_sweep_blocks_travel() {
        let world = floor_world();
        let rest = Point2::new(0.0, 0.5 + DEFAULT_SKIN);
        let mut motor = motor_at(rest);

        motor.push(Vec2::new(0.0, -1.0), false);
        motor.move_by(&world, Vec2::zeros(), false);
        assert!((motor.raw_velocity().y - -1.0).abs() < 1.0e-6);
        assert!(motor.velocity().y.abs() < 1.0e-5);
        assert_eq!(motor.state().external_force, Vec2::zeros());

        // Nothing left over for the next move.
        motor.move_by(&world, Vec2::zeros(), false);
        assert!(motor.raw_velocity().norm() < 1.0e-6);
        assert!((motor.position().y - rest.y).abs() < 1.0e-5);
    }

    #[test]
    fn landing_grounds_the_motor_and_records_the_surface() {
        let world = floor_world();
        let mut motor = motor_at(Point2::new(0.0, 3.0));

        motor.move_by(&world, Vec2::new(0.0, -5.0), false);
        assert!(motor.is_grounded());
        assert_eq!(motor.ground_surface(), Some(SurfaceId(0)));
        assert!((motor.position().y - (0.5 + DEFAULT_SKIN)).abs() < 1.0e-4);

        // Moving up again clears the support.
        motor.move_by(&world, Vec2::new(0.0, 0.5), false);
        assert!(!motor.is_grounded());
        assert_eq!(motor.ground_surface(), None);
    }

    #[test]
    fn point_body_falls_onto_the_floor_and_keeps_the_skin() {
        let world = floor_world();
        let mut motor = GroundedMotor::new(
            Point2::new(0.0, 5.0),
            Vec2::zeros(),
            LayerMask::solid_default(),
            Box::new(RaycastSweep::default()),
        );

        let dt = 1.0 / 60.0;
        let mut vy: f32 = 0.0;
        for _ in 0..240 {
            vy += -25.0 * dt;
            motor.move_by(&world, Vec2::new(0.0, vy * dt), false);
            if motor.is_grounded() {
                vy = 0.0;
            }
            assert!(motor.position().y >= 0.0);
        }
        assert!(motor.is_grounded());
        assert!((motor.position().y - DEFAULT_SKIN).abs() < 1.0e-4);
    }

    #[test]
    fn moving_support_follows_the_pushes() {
        let world = StaticWorld::new();
        let mut motor = motor_at(Point2::new(0.0, 5.0));

        motor.push(Vec2::new(0.1, 0.0), true);
        motor.move_by(&world, Vec2::zeros(), false);
        assert!(motor.is_on_moving_support());

        // A move without a carry push clears it.
        motor.move_by(&world, Vec2::zeros(), false);
        assert!(!motor.is_on_moving_support());

        // Marking the move itself works without any push.
        motor.move_by(&world, Vec2::zeros(), true);
        assert!(motor.is_on_moving_support());
        motor.move_by(&world, Vec2::zeros(), false);
        assert!(!motor.is_on_moving_support());
    }

    #[test]
    fn teleport_clears_motion_state() {
        let world = StaticWorld::new();
        let mut motor = motor_at(Point2::new(0.0, 5.0));

        motor.move_by(&world, Vec2::new(1.0, 0.0), false);
        motor.push(Vec2::new(2.0, 0.0), true);
        motor.teleport(Point2::new(-3.0, 1.0));

        assert_eq!(motor.position(), Point2::new(-3.0, 1.0));
        assert_eq!(motor.state().external_force, Vec2::zeros());
        assert!(motor.velocity().norm() < 1.0e-6);
        assert!(motor.raw_velocity().norm() < 1.0e-6);

        motor.move_by(&world, Vec2::zeros(), false);
        assert!(!motor.is_on_moving_support());
        assert_eq!(motor.position(), Point2::new(-3.0, 1.0));
    }
}
