/*!
Collision root module.

Swept queries over static 2D geometry, using parry2d for the narrow phase and
a BVH broad phase. The code is split for clarity:

- types:        shared data types (Surface, SweepHit, SweepOutcome, etc.)
- settings:     sweep and motor tolerance constants
- broad:        broad-phase helpers (swept AABBs, candidate queries)
- narrow_phase: thin wrappers over parry2d queries (rays, shape casts, overlap)
- world:        the surface store with pose mutation and overlap/ray queries
- sampler:      ray-origin layout over a body's bounds
- sweep:        the per-axis sweep resolvers
*/

pub mod broad;
pub mod narrow_phase;
pub mod sampler;
pub mod settings;
pub mod sweep;
pub mod types;
pub mod world;

// Re-export commonly used types.
pub use sampler::BoundsSampler;
pub use sweep::{RaycastSweep, ShapeCastSweep, SweepRequest, SweepResolver};
pub use types::{
    RayHit, Surface, SurfaceId, SurfaceKind, SurfaceShape, SweepHit, SweepOutcome, Transform2,
};
pub use world::StaticWorld;
