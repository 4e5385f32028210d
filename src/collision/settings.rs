/*!
Sweep and motor tolerances.

These constants centralize the parameters used by the bounds sampler, the
sweep resolvers and the box physics step. Keeping them together makes tuning
easier and helps ensure deterministic behavior across platforms.

Notes
- Distances are in meters, time in seconds.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
- Settings structs default to these values; override them from game data.
*/

/// Separation kept from surfaces after a resolved sweep (meters).
/// Too large creates visible gaps; too small risks jitter on contact.
pub const DEFAULT_SKIN: f32 = 0.02;

/// Rays cast per horizontal sweep (spread across the body height).
pub const DEFAULT_HORIZONTAL_RAYS: u32 = 4;

/// Rays cast per vertical sweep (spread across the body width).
pub const DEFAULT_VERTICAL_RAYS: u32 = 4;

/// Minimum per-axis displacement considered worth sweeping (meters).
/// Axis displacements at or below this are dropped to avoid jitter.
pub const MIN_MOVE: f32 = 1.0e-6;

/// Minimum squared vector displacement for the shape-cast strategy (m^2).
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Practical small distance for comparisons (meters).
/// Hits at or below this distance count as already-resolved contacts.
pub const DIST_EPS: f32 = 1.0e-6;

/// Maximum translation consumed per shape-cast sub-step (meters).
pub const DEFAULT_MAX_STEP: f32 = 0.25;

/// Maximum shape casts per resolved move (corner handling).
pub const DEFAULT_MAX_ITERATIONS: u32 = 8;

/// Downward gravity for box-like bodies (meters per second squared).
pub const GRAVITY_Y: f32 = -25.0;
