/*!
Core collision types shared by the collision submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- broad (static world acceleration structures and candidate queries)
- narrow_phase (parry2d ray, shape-cast and intersection queries)
- world (the surface store)
- sweep (the per-axis resolvers)
- the motors built on top
*/

use nalgebra as na;

use crate::layers::{Layer, LayerMask};
use crate::math::{Iso2, Point2, Vec2};

/// A rigid 2D transform (translation + rotation angle) in world space.
#[derive(Clone, Copy, Debug)]
pub struct Transform2 {
    pub translation: Vec2,
    /// Counter-clockwise angle in radians.
    pub rotation: f32,
}

impl Transform2 {
    #[inline]
    pub fn new(translation: Vec2, rotation: f32) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec2) -> Self {
        Self {
            translation,
            rotation: 0.0,
        }
    }

    /// Convert to nalgebra `Isometry2` for use with parry2d queries.
    #[inline]
    pub fn iso(&self) -> Iso2 {
        Iso2::new(self.translation, self.rotation)
    }
}

/// Stable handle to a surface inside a `StaticWorld`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

/// Whether a surface blocks sweeps or is only sensed by overlap queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Solid,
    Trigger,
}

/// Static collision shapes supported by the world.
///
/// - HalfPlane: infinite solid half-space; the stored normal points out of the
///   solid region and the surface passes through the transform's translation.
/// - Rect: axis-aligned in local space, placed (and possibly rotated) by the
///   surface transform.
/// - Circle: rotation is irrelevant; the transform's translation is the center.
#[derive(Clone, Copy, Debug)]
pub enum SurfaceShape {
    HalfPlane {
        /// World-space unit normal pointing out of the solid region.
        normal: Vec2,
    },
    Rect {
        /// Local-space half-extents (hx, hy).
        half_extents: Vec2,
    },
    Circle {
        /// Radius in meters.
        radius: f32,
    },
}

/// One piece of static world geometry.
#[derive(Clone, Copy, Debug)]
pub struct Surface {
    pub shape: SurfaceShape,
    pub transform: Transform2,
    /// What this surface is; sweeps test it against the mover's mask.
    pub layers: LayerMask,
    pub kind: SurfaceKind,
}

impl Surface {
    /// An infinite floor/wall through `point` with the given outward `normal`.
    ///
    /// A degenerate normal falls back to +Y (an ordinary floor).
    pub fn half_plane(normal: Vec2, point: Point2) -> Self {
        let normal = if normal.norm_squared() > 1.0e-12 {
            normal.normalize()
        } else {
            Vec2::y()
        };
        Self {
            shape: SurfaceShape::HalfPlane { normal },
            transform: Transform2::from_translation(point.coords),
            layers: LayerMask::from_flags(&[Layer::Terrain]),
            kind: SurfaceKind::Solid,
        }
    }

    /// An axis-aligned rectangle centered at `center`.
    pub fn rect(half_extents: Vec2, center: Point2) -> Self {
        Self {
            shape: SurfaceShape::Rect { half_extents },
            transform: Transform2::from_translation(center.coords),
            layers: LayerMask::from_flags(&[Layer::Terrain]),
            kind: SurfaceKind::Solid,
        }
    }

    /// A rectangle centered at `center`, rotated by `angle` radians.
    pub fn rect_rotated(half_extents: Vec2, center: Point2, angle: f32) -> Self {
        Self {
            shape: SurfaceShape::Rect { half_extents },
            transform: Transform2::new(center.coords, angle),
            layers: LayerMask::from_flags(&[Layer::Terrain]),
            kind: SurfaceKind::Solid,
        }
    }

    /// A circle centered at `center`.
    pub fn circle(radius: f32, center: Point2) -> Self {
        Self {
            shape: SurfaceShape::Circle { radius },
            transform: Transform2::from_translation(center.coords),
            layers: LayerMask::from_flags(&[Layer::Terrain]),
            kind: SurfaceKind::Solid,
        }
    }

    /// Replace the layer mask.
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }

    /// Mark as a sensor: skipped by sweeps, visible to overlap queries.
    pub fn as_trigger(mut self) -> Self {
        self.kind = SurfaceKind::Trigger;
        self
    }

    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.kind == SurfaceKind::Trigger
    }

    #[inline]
    pub fn iso(&self) -> Iso2 {
        self.transform.iso()
    }
}

/// A single ray hit against one surface.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Distance from the ray origin along its (unit) direction (meters).
    pub distance: f32,
    /// World-space surface normal at the hit, opposing the ray.
    pub normal: Vec2,
}

/// Nearest blocking contact found by one axis of a sweep.
#[derive(Clone, Copy, Debug)]
pub struct SweepHit {
    /// Distance from the body's leading face to the contact (meters).
    pub distance: f32,
    /// World-space surface normal at the contact.
    pub normal: Vec2,
    /// The surface that was hit.
    pub surface: SurfaceId,
}

/// Result of one resolved sweep.
#[derive(Clone, Copy, Debug)]
pub struct SweepOutcome {
    /// Translation actually applied (per-axis allowed travel, signed).
    pub applied: Vec2,
    /// Nearest horizontal contact, if the horizontal axis was blocked.
    pub hit_x: Option<SweepHit>,
    /// Nearest vertical contact, if the vertical axis was blocked.
    pub hit_y: Option<SweepHit>,
    /// True iff the vertical sweep moved downward and hit support.
    pub grounded: bool,
}

impl SweepOutcome {
    /// An unobstructed outcome applying the full displacement.
    #[inline]
    pub fn unobstructed(displacement: Vec2) -> Self {
        Self {
            applied: displacement,
            hit_x: None,
            hit_y: None,
            grounded: false,
        }
    }

    /// The supporting contact, present only while grounded.
    #[inline]
    pub fn ground(&self) -> Option<&SweepHit> {
        if self.grounded { self.hit_y.as_ref() } else { None }
    }
}
