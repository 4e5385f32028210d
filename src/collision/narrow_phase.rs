use parry2d::{
    query::{self, Ray, RayCast as _, ShapeCastOptions},
    shape as pshape,
};

use nalgebra as na;

use crate::collision::types::{RayHit, Surface, SurfaceShape};
use crate::math::{Iso2, Vec2};

/// Result of casting a moving rect against one surface.
#[derive(Clone, Copy, Debug)]
pub struct CastHit {
    /// Fraction (0..1) of the tested translation where the hit occurred.
    pub fraction: f32,
    /// World-space contact normal, opposing the motion.
    pub normal: Vec2,
}

/// Concrete parry shape standing in for one surface during a query.
enum SurfaceProxy {
    HalfPlane(pshape::HalfSpace),
    Rect(pshape::Cuboid),
    Circle(pshape::Ball),
}

impl SurfaceProxy {
    #[inline]
    fn as_shape(&self) -> &dyn pshape::Shape {
        match self {
            SurfaceProxy::HalfPlane(s) => s,
            SurfaceProxy::Rect(s) => s,
            SurfaceProxy::Circle(s) => s,
        }
    }
}

/// Build the parry shape + world isometry for a surface.
///
/// Half-planes store their normal in world space, so their isometry is
/// translation-only; rects and circles use the full surface pose.
fn surface_proxy(surface: &Surface) -> (SurfaceProxy, Iso2) {
    match surface.shape {
        SurfaceShape::HalfPlane { normal } => {
            let plane = pshape::HalfSpace {
                normal: na::Unit::new_normalize(normal),
            };
            (
                SurfaceProxy::HalfPlane(plane),
                Iso2::new(surface.transform.translation, 0.0),
            )
        }
        SurfaceShape::Rect { half_extents } => (
            SurfaceProxy::Rect(pshape::Cuboid::new(half_extents)),
            surface.iso(),
        ),
        SurfaceShape::Circle { radius } => (
            SurfaceProxy::Circle(pshape::Ball::new(radius)),
            surface.iso(),
        ),
    }
}

/// Cast a ray against a single surface and return the nearest hit (if any).
///
/// `ray.dir` must be unit length so that `distance` is in meters. Solid hits
/// from inside the surface report distance 0; callers treat those as
/// already-resolved contacts.
pub fn cast_ray_against_surface(ray: &Ray, max_dist: f32, surface: &Surface) -> Option<RayHit> {
    let (proxy, iso) = surface_proxy(surface);
    let hit = proxy.as_shape().cast_ray_and_get_normal(&iso, ray, max_dist, true)?;

    // Use a normal that opposes the ray.
    let mut normal = hit.normal;
    if normal.dot(&ray.dir) > 0.0 {
        normal = -normal;
    }
    Some(RayHit {
        distance: hit.time_of_impact,
        normal,
    })
}

/// Cast a moving axis-aligned rect against a single surface.
///
/// - `rect_iso`: the rect's starting isometry (identity rotation).
/// - `vel`: the world-space translation vector for this cast (meters).
/// - `max_toi`: the maximum fraction of `vel` to consider (typically 1.0).
pub fn cast_rect_against_surface(
    rect_iso: &Iso2,
    rect: &pshape::Cuboid,
    vel: Vec2,
    max_toi: f32,
    surface: &Surface,
) -> Option<CastHit> {
    let (proxy, iso) = surface_proxy(surface);

    let mut opts = ShapeCastOptions::with_max_time_of_impact(max_toi);
    opts.stop_at_penetration = true;
    if let Ok(Some(hit)) = query::cast_shapes(
        rect_iso,
        &vel,
        rect as &dyn pshape::Shape,
        &iso,
        &Vec2::zeros(),
        proxy.as_shape(),
        opts,
    ) {
        // Use the normal on the moving shape; ensure it opposes the motion.
        let mut n: Vec2 = hit.normal1.into_inner();
        if n.dot(&vel) > 0.0 {
            n = -n;
        }
        return Some(CastHit {
            fraction: hit.time_of_impact,
            normal: n,
        });
    }
    None
}

/// Intersection test between an axis-aligned rect and a surface.
pub fn overlap_rect_against_surface(
    rect_iso: &Iso2,
    rect: &pshape::Cuboid,
    surface: &Surface,
) -> bool {
    let (proxy, iso) = surface_proxy(surface);
    query::intersection_test(rect_iso, rect as &dyn pshape::Shape, &iso, proxy.as_shape())
        .unwrap_or(false)
}

/// Correction that moves an overlapping rect out of a surface, or `None`
/// when the pair is separated.
///
/// The correction leaves `skin` between the rect and the surface.
pub fn depenetrate_rect_from_surface(
    rect_iso: &Iso2,
    rect: &pshape::Cuboid,
    surface: &Surface,
    skin: f32,
) -> Option<Vec2> {
    let (proxy, iso) = surface_proxy(surface);
    if let Ok(Some(contact)) = query::contact(
        rect_iso,
        rect as &dyn pshape::Shape,
        &iso,
        proxy.as_shape(),
        0.0,
    ) {
        if contact.dist < 0.0 {
            // normal1 points from the rect toward the surface; dist is negative.
            let n: Vec2 = contact.normal1.into_inner();
            return Some(n * (contact.dist - skin));
        }
    }
    None
}
