/*!
Kinematic motors.

Motors own body positions. Controllers compute what a body should do and hand
it to its motor; nothing else ever writes a position. Two variants:

- grounded: collision-resolved displacement motor for boxes and other bodies
  riding world geometry.
- free: non-colliding integrating motor for the ghost.
*/

pub mod free;
pub mod grounded;

pub use free::{FreeMotor, FreeMotorSettings, IntegrationProfile};
pub use grounded::GroundedMotor;

use crate::collision::{StaticWorld, SurfaceId};
use crate::math::{Point2, Vec2};

/// Per-body kinematic state shared by both motor variants.
#[derive(Clone, Debug, Default)]
pub struct MotorState {
    /// Motion actually applied by the last move, after clamping and
    /// collision resolution.
    pub velocity: Vec2,

    /// Motion requested by the last move, external force included, before any
    /// clamp or resolution. Recorded even when the applied motion ends up
    /// zeroed.
    pub raw_velocity: Vec2,

    /// Accumulated impulses waiting to be consumed by the next move.
    pub external_force: Vec2,

    /// Support flag. Recomputed from scratch on every resolved move; free
    /// motors never set it.
    pub grounded: bool,

    /// True while the body is carried by a moving support (platform riders).
    pub on_moving_support: bool,
}

/// The motion interface shared by both motor variants.
pub trait Motor {
    /// Per-tick motion request. Grounded motors treat `motion` as this tick's
    /// displacement and resolve it against `world`; free motors latch it as a
    /// velocity target consumed by their next integration.
    ///
    /// `from_moving_support` marks the move itself as platform carry; passing
    /// false still honors the flag from a marked push consumed by this move.
    fn move_by(&mut self, world: &StaticWorld, motion: Vec2, from_moving_support: bool);

    /// Accumulates an impulse consumed by the next move. `from_moving_support`
    /// marks the push as platform carry, latching
    /// [`MotorState::on_moving_support`] for the move that consumes it.
    fn push(&mut self, force: Vec2, from_moving_support: bool);

    /// Instant reposition. Clears velocity, raw velocity and external force
    /// atomically.
    fn teleport(&mut self, position: Point2);

    fn position(&self) -> Point2;

    fn state(&self) -> &MotorState;

    fn velocity(&self) -> Vec2 {
        self.state().velocity
    }

    fn raw_velocity(&self) -> Vec2 {
        self.state().raw_velocity
    }

    fn is_grounded(&self) -> bool {
        self.state().grounded
    }

    fn is_on_moving_support(&self) -> bool {
        self.state().on_moving_support
    }

    /// The surface the body stands on, when known. Free motors and airborne
    /// bodies report `None`.
    fn ground_surface(&self) -> Option<SurfaceId> {
        None
    }
}
