/*!
Swept motion resolution.

Goal
- Turn a requested per-tick displacement into the translation a body is
  actually allowed to take against the static world, plus contact metadata
  (per-axis hits, grounded flag).

Notes
- Axes resolve separately, horizontal first; the vertical pass starts from the
  horizontally-resolved position. Axis separation is what produces wall
  sliding, so neither strategy needs an explicit slide projection.
- [`SweepResolver`] is the strategy seam. [`RaycastSweep`] covers box-like
  bodies with leading-face rays; [`ShapeCastSweep`] sweeps the full rect and
  recovers from overlap, for bodies that need exact corner contact.
- Triggers and surfaces outside the request's layer mask never block.
*/

use std::fmt;

use parry2d::{bounding_volume::Aabb, query::Ray, shape as pshape};

use crate::collision::{broad, narrow_phase};
use crate::collision::sampler::BoundsSampler;
use crate::collision::settings::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_STEP, DEFAULT_SKIN, DIST_EPS, MIN_MOVE,
};
use crate::collision::types::{Surface, SurfaceId, SweepHit, SweepOutcome};
use crate::collision::world::StaticWorld;
use crate::layers::LayerMask;
use crate::math::{Iso2, Point2, Vec2};

/// Parameters for a single resolved move.
#[derive(Clone, Copy, Debug)]
pub struct SweepRequest {
    /// World position of the body center at the start of the move.
    pub position: Point2,
    /// Body half extents (hx, hy).
    pub half_extents: Vec2,
    /// Desired translation for this tick (meters).
    pub displacement: Vec2,
    /// Surfaces the body collides with.
    pub mask: LayerMask,
}

/// Strategy seam for swept motion resolution.
pub trait SweepResolver: fmt::Debug {
    fn resolve(&self, world: &StaticWorld, req: &SweepRequest) -> SweepOutcome;
}

/// Per-axis raycast resolution from leading-face origins.
///
/// The workhorse for boxes: cheap, stable on flat ground, and the skin keeps
/// bodies a fixed clearance away from everything they touch.
#[derive(Clone, Copy, Debug, Default)]
pub struct RaycastSweep {
    pub sampler: BoundsSampler,
}

impl RaycastSweep {
    pub fn new(sampler: BoundsSampler) -> Self {
        Self { sampler }
    }
}

impl SweepResolver for RaycastSweep {
    fn resolve(&self, world: &StaticWorld, req: &SweepRequest) -> SweepOutcome {
        let skin = self.sampler.skin;
        let mut outcome = SweepOutcome::unobstructed(Vec2::zeros());

        // 1) Horizontal axis.
        let dx = req.displacement.x;
        let mut applied_x = 0.0;
        if dx.abs() > MIN_MOVE {
            let dir = dx.signum();
            let origins = self
                .sampler
                .horizontal_origins(req.position, req.half_extents, dir);
            let (hit, allowed) =
                sweep_axis(world, &origins, Vec2::new(dir, 0.0), dx.abs(), skin, req.mask);
            applied_x = allowed * dir;
            outcome.hit_x = hit;
        }

        // 2) Vertical axis, from the horizontally-resolved position.
        let dy = req.displacement.y;
        let mut applied_y = 0.0;
        if dy.abs() > MIN_MOVE {
            let dir = dy.signum();
            let origins =
                self.sampler
                    .vertical_origins(req.position, req.half_extents, dir, applied_x);
            let (hit, allowed) =
                sweep_axis(world, &origins, Vec2::new(0.0, dir), dy.abs(), skin, req.mask);
            applied_y = allowed * dir;
            outcome.grounded = dir < 0.0 && hit.is_some();
            outcome.hit_y = hit;
        }

        outcome.applied = Vec2::new(applied_x, applied_y);
        outcome
    }
}

/// Cast one axis worth of rays and return the nearest blocking hit plus the
/// allowed travel along the axis (unsigned).
fn sweep_axis(
    world: &StaticWorld,
    origins: &[Point2],
    dir: Vec2,
    distance: f32,
    skin: f32,
    mask: LayerMask,
) -> (Option<SweepHit>, f32) {
    let mut reach = distance + skin;
    let mut best: Option<SweepHit> = None;

    let candidates = world.candidate_indices(&axis_aabb(origins, dir, reach));
    for origin in origins {
        let ray = Ray::new(*origin, dir);
        for &idx in &candidates {
            let surface = &world.surfaces()[idx];
            if !blocks(surface, &mask) {
                continue;
            }
            if let Some(hit) = narrow_phase::cast_ray_against_surface(&ray, reach, surface) {
                // Already-resolved contacts (distance 0) never block.
                if hit.distance <= DIST_EPS {
                    continue;
                }
                if best.as_ref().is_none_or(|b| hit.distance < b.distance) {
                    reach = hit.distance;
                    best = Some(SweepHit {
                        distance: hit.distance,
                        normal: hit.normal,
                        surface: SurfaceId(idx as u32),
                    });
                }
            }
        }
    }

    let allowed = match &best {
        Some(hit) => (hit.distance - skin).max(0.0),
        None => distance,
    };
    (best, allowed)
}

/// Conservative AABB covering every origin plus its full reach along `dir`.
fn axis_aabb(origins: &[Point2], dir: Vec2, reach: f32) -> Aabb {
    let mut mins = origins[0].coords;
    let mut maxs = origins[0].coords;
    for origin in origins {
        let a = origin.coords;
        let b = origin.coords + dir * reach;
        mins = mins.inf(&a).inf(&b);
        maxs = maxs.sup(&a).sup(&b);
    }
    let pad = Vec2::repeat(1.0e-3);
    Aabb {
        mins: Point2::from(mins - pad),
        maxs: Point2::from(maxs + pad),
    }
}

#[inline]
fn blocks(surface: &Surface, mask: &LayerMask) -> bool {
    !surface.is_trigger() && surface.layers.overlaps(mask)
}

/// Swept shape casts of the whole rect, with overlap recovery.
///
/// Runs a depenetration pre-pass, then resolves each axis with sub-stepped
/// `cast_shapes` queries so no single cast exceeds `max_step`. Flush contacts
/// block at zero travel instead of being skipped; the pre-pass is what gets a
/// body back out of geometry it was placed into.
#[derive(Clone, Copy, Debug)]
pub struct ShapeCastSweep {
    /// Post-sweep clearance kept from surfaces (meters).
    pub skin: f32,
    /// Maximum translation per sub-step cast (meters).
    pub max_step: f32,
    /// Cast budget per resolved move.
    pub max_iterations: u32,
}

impl Default for ShapeCastSweep {
    fn default() -> Self {
        Self {
            skin: DEFAULT_SKIN,
            max_step: DEFAULT_MAX_STEP,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SweepResolver for ShapeCastSweep {
    fn resolve(&self, world: &StaticWorld, req: &SweepRequest) -> SweepOutcome {
        let rect = pshape::Cuboid::new(req.half_extents);
        let mut pos = req.position;
        let mut outcome = SweepOutcome::unobstructed(Vec2::zeros());

        // 0) Depenetration pre-pass over everything near the body.
        let around = Aabb {
            mins: pos - req.half_extents - Vec2::repeat(self.skin),
            maxs: pos + req.half_extents + Vec2::repeat(self.skin),
        };
        for idx in world.candidate_indices(&around) {
            let surface = &world.surfaces()[idx];
            if !blocks(surface, &req.mask) {
                continue;
            }
            let iso = Iso2::new(pos.coords, 0.0);
            if let Some(fix) =
                narrow_phase::depenetrate_rect_from_surface(&iso, &rect, surface, self.skin)
            {
                pos += fix;
            }
        }

        // 1) Horizontal, then 2) vertical from the resolved position.
        let mut casts = 0u32;
        outcome.hit_x = self.cast_axis(
            world,
            &rect,
            req.half_extents,
            &mut pos,
            Vec2::new(req.displacement.x, 0.0),
            req.mask,
            &mut casts,
        );
        outcome.hit_y = self.cast_axis(
            world,
            &rect,
            req.half_extents,
            &mut pos,
            Vec2::new(0.0, req.displacement.y),
            req.mask,
            &mut casts,
        );
        outcome.grounded = req.displacement.y < 0.0 && outcome.hit_y.is_some();

        outcome.applied = pos - req.position;
        outcome
    }
}

impl ShapeCastSweep {
    /// Resolve one axis by sub-stepped shape casts, advancing `pos` in place.
    /// Returns the blocking hit, if the axis was stopped early.
    fn cast_axis(
        &self,
        world: &StaticWorld,
        rect: &pshape::Cuboid,
        half_extents: Vec2,
        pos: &mut Point2,
        displacement: Vec2,
        mask: LayerMask,
        casts: &mut u32,
    ) -> Option<SweepHit> {
        let len = displacement.norm();
        if len <= MIN_MOVE {
            return None;
        }
        let dir = displacement / len;
        let max_step = self.max_step.max(MIN_MOVE);

        let mut remaining = len;
        while remaining > MIN_MOVE && *casts < self.max_iterations {
            *casts += 1;
            let step_len = remaining.min(max_step);
            let cast_len = step_len + self.skin;
            let vel = dir * cast_len;

            let swept = broad::swept_rect_aabb(half_extents, *pos, vel, self.skin);
            let iso = Iso2::new(pos.coords, 0.0);

            let mut best: Option<(f32, Vec2, SurfaceId)> = None;
            for idx in world.candidate_indices(&swept) {
                let surface = &world.surfaces()[idx];
                if !blocks(surface, &mask) {
                    continue;
                }
                if let Some(hit) =
                    narrow_phase::cast_rect_against_surface(&iso, rect, vel, 1.0, surface)
                {
                    let travel = cast_len * hit.fraction;
                    if best.is_none_or(|(t, _, _)| travel < t) {
                        best = Some((travel, hit.normal, SurfaceId(idx as u32)));
                    }
                }
            }

            match best {
                None => {
                    *pos += dir * step_len;
                    remaining -= step_len;
                }
                Some((travel, normal, surface)) => {
                    // Hits inside the skin margin past the step are clean full
                    // steps; anything nearer blocks the axis.
                    let allowed = (travel - self.skin).max(0.0).min(step_len);
                    *pos += dir * allowed;
                    if allowed + MIN_MOVE < step_len {
                        return Some(SweepHit {
                            distance: travel,
                            normal,
                            surface,
                        });
                    }
                    remaining -= step_len;
                }
            }
        }
        None
    }
}
