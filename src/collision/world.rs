use parry2d::{bounding_volume::Aabb, query::Ray, shape as pshape};

use crate::collision::{broad, narrow_phase};
use crate::collision::types::{RayHit, Surface, SurfaceId};
use crate::layers::LayerMask;
use crate::math::{Iso2, Point2, Vec2, normalize_or_zero};

/// The static world: a surface store plus a broad-phase accelerator.
///
/// Surfaces are addressed by the [`SurfaceId`] returned when they are added.
/// Poses may change afterwards (platform motion); every mutation rebuilds the
/// accelerator so queries always see current geometry. Worlds here are small,
/// so the rebuild is a per-mutation cost we accept for simplicity.
pub struct StaticWorld {
    surfaces: Vec<Surface>,
    accel: broad::WorldAccel,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::from_surfaces(Vec::new())
    }

    pub fn from_surfaces(surfaces: Vec<Surface>) -> Self {
        let accel = broad::build_world_accel(&surfaces);
        Self { surfaces, accel }
    }

    /// Add a surface, returning its stable handle.
    pub fn push_surface(&mut self, surface: Surface) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(surface);
        self.rebuild();
        id
    }

    #[inline]
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.0 as usize)
    }

    #[inline]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    #[inline]
    pub fn accel(&self) -> &broad::WorldAccel {
        &self.accel
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Move a surface by `delta`. Returns false (and logs) for a bad id.
    pub fn translate_surface(&mut self, id: SurfaceId, delta: Vec2) -> bool {
        match self.surfaces.get_mut(id.0 as usize) {
            Some(surface) => {
                surface.transform.translation += delta;
                self.rebuild();
                true
            }
            None => {
                log::warn!("static world: translate on unknown surface {:?}", id);
                false
            }
        }
    }

    /// Set a surface's rotation (radians). Returns false (and logs) for a bad id.
    pub fn set_surface_rotation(&mut self, id: SurfaceId, angle: f32) -> bool {
        match self.surfaces.get_mut(id.0 as usize) {
            Some(surface) => {
                surface.transform.rotation = angle;
                self.rebuild();
                true
            }
            None => {
                log::warn!("static world: rotate on unknown surface {:?}", id);
                false
            }
        }
    }

    /// Candidate surface indices for a swept AABB: half-planes first (always
    /// candidates), then the finite surfaces whose AABB intersects.
    pub fn candidate_indices(&self, swept: &Aabb) -> Vec<usize> {
        let mut out = self.accel.unbounded_indices.clone();
        out.extend(broad::query_candidates(&self.accel, swept));
        out
    }

    /// Cast a ray against solid surfaces matching `mask`; nearest hit wins.
    ///
    /// A degenerate direction yields no hit.
    pub fn raycast(
        &self,
        origin: Point2,
        dir: Vec2,
        max_dist: f32,
        mask: LayerMask,
    ) -> Option<(SurfaceId, RayHit)> {
        let dir = normalize_or_zero(dir);
        if dir == Vec2::zeros() || max_dist <= 0.0 {
            return None;
        }

        let swept = broad::swept_rect_aabb(Vec2::zeros(), origin, dir * max_dist, 1.0e-3);
        let ray = Ray::new(origin, dir);

        let mut best: Option<(SurfaceId, RayHit)> = None;
        let mut reach = max_dist;
        for idx in self.candidate_indices(&swept) {
            let surface = &self.surfaces[idx];
            if surface.is_trigger() || !surface.layers.overlaps(&mask) {
                continue;
            }
            if let Some(hit) = narrow_phase::cast_ray_against_surface(&ray, reach, surface) {
                reach = hit.distance;
                best = Some((SurfaceId(idx as u32), hit));
            }
        }
        best
    }

    /// Surfaces overlapping an axis-aligned rect probe, honoring `mask`.
    ///
    /// Solid surfaces are always reported; triggers only when
    /// `include_triggers` is set.
    pub fn overlap_rect(
        &self,
        center: Point2,
        half_extents: Vec2,
        mask: LayerMask,
        include_triggers: bool,
    ) -> Vec<SurfaceId> {
        let probe = pshape::Cuboid::new(half_extents);
        let probe_iso = Iso2::new(center.coords, 0.0);
        let probe_aabb = Aabb {
            mins: center - half_extents,
            maxs: center + half_extents,
        };

        let mut out = Vec::new();
        for idx in self.candidate_indices(&probe_aabb) {
            let surface = &self.surfaces[idx];
            if surface.is_trigger() && !include_triggers {
                continue;
            }
            if !surface.layers.overlaps(&mask) {
                continue;
            }
            if narrow_phase::overlap_rect_against_surface(&probe_iso, &probe, surface) {
                out.push(SurfaceId(idx as u32));
            }
        }
        out
    }

    fn rebuild(&mut self) {
        self.accel = broad::build_world_accel(&self.surfaces);
    }
}

impl Default for StaticWorld {
    fn default() -> Self {
        Self::new()
    }
}
