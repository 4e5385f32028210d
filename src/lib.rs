pub mod boxes;
pub mod collision;
pub mod ghost;
pub mod grab;
pub mod layers;
pub mod leash;
pub mod math;
pub mod motor;
pub mod plate;
pub mod platform;
pub mod possession;
pub mod respawn;

pub use boxes::{BoxPhysicsSettings, PushableBox};
pub use collision::{
    BoundsSampler, RayHit, RaycastSweep, ShapeCastSweep, StaticWorld, Surface, SurfaceId,
    SurfaceKind, SurfaceShape, SweepHit, SweepOutcome, SweepRequest, SweepResolver, Transform2,
};
pub use ghost::{FollowSettings, GhostController, GhostMode, GhostSettings};
pub use grab::{GrabCoupling, GrabLink, GrabSettings};
pub use layers::{BitmaskFlags, FlagBitmask, Layer, LayerMask};
pub use leash::LeashSettings;
pub use math::{Iso2, Point2, Vec2};
pub use motor::{
    FreeMotor, FreeMotorSettings, GroundedMotor, IntegrationProfile, Motor, MotorState,
};
pub use plate::{PlateEvent, PressurePlate};
pub use platform::{KinematicPlatform, TurningPlatform};
pub use possession::{PossessionChange, PossessionSwitch};
pub use respawn::{RespawnSettings, RespawnTracker};
