use nalgebra as na;
use parry2d::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
    shape as pshape,
};

use crate::collision::types::{Surface, SurfaceShape};
use crate::math::{Point2, Vec2};

/// Acceleration structure for broad-phase queries over world surfaces.
///
/// Notes:
/// - Finite shapes (Rect, Circle) are stored as world-space AABBs inside a
///   BVH. Half-planes are infinite and kept in a separate index list; queries
///   must always test them.
/// - `finite_indices` maps each BVH leaf back to its index in the original
///   surface slice; `unbounded_indices` holds the half-plane indices.
pub struct WorldAccel {
    /// BVH over finite surfaces (AABBs).
    pub bvh: Bvh,
    /// Indices into the surface slice for the BVH leaves above.
    pub finite_indices: Vec<usize>,
    /// Indices into the surface slice for half-planes.
    pub unbounded_indices: Vec<usize>,
}

impl WorldAccel {
    /// Return true if this accelerator has no finite entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.finite_indices.is_empty()
    }

    /// Number of finite entries (AABBs) in this accelerator.
    #[inline]
    pub fn len(&self) -> usize {
        self.finite_indices.len()
    }
}

/// Build a broad-phase accelerator over the given surfaces.
pub fn build_world_accel(surfaces: &[Surface]) -> WorldAccel {
    let mut aabbs: Vec<Aabb> = Vec::new();
    let mut finite_indices: Vec<usize> = Vec::new();
    let mut unbounded_indices: Vec<usize> = Vec::new();

    for (i, surface) in surfaces.iter().enumerate() {
        match surface_aabb(surface) {
            Some(aabb) => {
                aabbs.push(aabb);
                finite_indices.push(i);
            }
            None => unbounded_indices.push(i),
        }
    }

    WorldAccel {
        bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
        finite_indices,
        unbounded_indices,
    }
}

/// World-space AABB of a surface; `None` for unbounded shapes.
pub fn surface_aabb(surface: &Surface) -> Option<Aabb> {
    let iso = surface.iso();
    match surface.shape {
        SurfaceShape::HalfPlane { .. } => None,
        SurfaceShape::Rect { half_extents } => {
            Some(pshape::Cuboid::new(half_extents).aabb(&iso))
        }
        SurfaceShape::Circle { radius } => Some(pshape::Ball::new(radius).aabb(&iso)),
    }
}

/// Compute a swept AABB for an axis-aligned rect moving from `start` to
/// `start + desired`, inflated by `skin` to conservatively include near misses.
pub fn swept_rect_aabb(half_extents: Vec2, start: Point2, desired: Vec2, skin: f32) -> Aabb {
    let rect = pshape::Cuboid::new(half_extents);

    let iso_start = na::Isometry2::new(start.coords, 0.0);
    let iso_end = na::Isometry2::new(start.coords + desired, 0.0);

    let mut swept = aabb_union(&rect.aabb(&iso_start), &rect.aabb(&iso_end));
    if skin > 0.0 {
        swept = aabb_inflate(&swept, skin);
    }
    swept
}

/// Query candidate surface indices whose AABB intersects `swept`.
///
/// Returns indices referencing the original surface slice (not the BVH leaf
/// array). Half-planes are not included; callers take them from
/// `unbounded_indices`.
pub fn query_candidates(accel: &WorldAccel, swept: &Aabb) -> Vec<usize> {
    accel
        .bvh
        .intersect_aabb(swept)
        .map(|leaf_idx| accel.finite_indices[leaf_idx as usize])
        .collect()
}

/// Compute the union of two AABBs.
fn aabb_union(a: &Aabb, b: &Aabb) -> Aabb {
    Aabb {
        mins: na::Point2::new(a.mins.x.min(b.mins.x), a.mins.y.min(b.mins.y)),
        maxs: na::Point2::new(a.maxs.x.max(b.maxs.x), a.maxs.y.max(b.maxs.y)),
    }
}

/// Inflate an AABB by `margin` on all sides.
fn aabb_inflate(a: &Aabb, margin: f32) -> Aabb {
    if margin <= 0.0 {
        return *a;
    }
    let delta = Vec2::new(margin, margin);
    Aabb {
        mins: a.mins - delta,
        maxs: a.maxs + delta,
    }
}

/// Test two AABBs for intersection.
pub fn aabb_intersects(a: &Aabb, b: &Aabb) -> bool {
    !(a.maxs.x < b.mins.x || a.mins.x > b.maxs.x || a.maxs.y < b.mins.y || a.mins.y > b.maxs.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Point2, Vec2};

    #[test]
    fn swept_aabb_covers_start_end_and_skin() {
        let swept = swept_rect_aabb(
            Vec2::new(0.5, 0.5),
            Point2::new(0.0, 0.0),
            Vec2::new(2.0, -1.0),
            0.02,
        );
        // Start rect spans [-0.5, 0.5]; end rect spans [1.5, 2.5] x [-1.5, -0.5].
        assert!(swept.mins.x <= -0.52 + 1.0e-6);
        assert!(swept.maxs.x >= 2.52 - 1.0e-6);
        assert!(swept.mins.y <= -1.52 + 1.0e-6);
        assert!(swept.maxs.y >= 0.52 - 1.0e-6);
    }

    #[test]
    fn candidates_exclude_far_surfaces_and_list_half_planes_separately() {
        let surfaces = vec![
            Surface::half_plane(Vec2::y(), Point2::new(0.0, 0.0)),
            Surface::rect(Vec2::new(1.0, 1.0), Point2::new(0.0, 0.0)),
            Surface::rect(Vec2::new(1.0, 1.0), Point2::new(100.0, 0.0)),
        ];
        let accel = build_world_accel(&surfaces);
        assert_eq!(accel.len(), 2);
        assert_eq!(accel.unbounded_indices, vec![0]);

        let near = swept_rect_aabb(
            Vec2::new(0.5, 0.5),
            Point2::new(2.0, 0.0),
            Vec2::new(-1.0, 0.0),
            0.02,
        );
        let candidates = query_candidates(&accel, &near);
        assert!(candidates.contains(&1));
        assert!(!candidates.contains(&2));
    }

    #[test]
    fn aabb_intersection_is_inclusive_of_touching_edges() {
        let a = Aabb {
            mins: Point2::new(0.0, 0.0),
            maxs: Point2::new(1.0, 1.0),
        };
        let b = Aabb {
            mins: Point2::new(1.0, 0.0),
            maxs: Point2::new(2.0, 1.0),
        };
        let c = Aabb {
            mins: Point2::new(1.1, 0.0),
            maxs: Point2::new(2.0, 1.0),
        };
        assert!(aabb_intersects(&a, &b));
        assert!(!aabb_intersects(&a, &c));
    }
}
