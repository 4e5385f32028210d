use crate::collision::settings::{DEFAULT_HORIZONTAL_RAYS, DEFAULT_SKIN, DEFAULT_VERTICAL_RAYS};
use crate::math::{Point2, Vec2};

/// Ray-origin layout over a body's bounds.
///
/// Origins sit on the leading face for the swept axis and are spread across
/// the perpendicular extent, inset by `skin` from the corners so edge rays do
/// not clip surfaces the body is merely resting against. Origins are computed
/// from the current pose on every call; nothing is cached across ticks.
#[derive(Clone, Copy, Debug)]
pub struct BoundsSampler {
    /// Rays per horizontal sweep, spread across the body height.
    pub horizontal_rays: u32,
    /// Rays per vertical sweep, spread across the body width.
    pub vertical_rays: u32,
    /// Corner inset and post-sweep clearance (meters).
    pub skin: f32,
}

impl Default for BoundsSampler {
    fn default() -> Self {
        Self {
            horizontal_rays: DEFAULT_HORIZONTAL_RAYS,
            vertical_rays: DEFAULT_VERTICAL_RAYS,
            skin: DEFAULT_SKIN,
        }
    }
}

impl BoundsSampler {
    /// Counts below 2 degrade to a single centered ray per sweep.
    pub fn new(horizontal_rays: u32, vertical_rays: u32, skin: f32) -> Self {
        if horizontal_rays < 2 || vertical_rays < 2 {
            log::warn!(
                "bounds sampler: ray count below 2 ({horizontal_rays}h/{vertical_rays}v) degrades to a single centered ray"
            );
        }
        Self {
            horizontal_rays,
            vertical_rays,
            skin: skin.max(0.0),
        }
    }

    /// Origins on the leading vertical face for a horizontal sweep toward
    /// `dir_x` (sign only).
    pub fn horizontal_origins(&self, center: Point2, half_extents: Vec2, dir_x: f32) -> Vec<Point2> {
        let edge_x = center.x + dir_x.signum() * half_extents.x;
        let half_span = (half_extents.y - self.skin).max(0.0);
        spread(self.horizontal_rays, center.y, half_span)
            .into_iter()
            .map(|y| Point2::new(edge_x, y))
            .collect()
    }

    /// Origins on the leading horizontal face for a vertical sweep toward
    /// `dir_y`, shifted by `offset_x` (the already-resolved horizontal travel).
    pub fn vertical_origins(
        &self,
        center: Point2,
        half_extents: Vec2,
        dir_y: f32,
        offset_x: f32,
    ) -> Vec<Point2> {
        let edge_y = center.y + dir_y.signum() * half_extents.y;
        let half_span = (half_extents.x - self.skin).max(0.0);
        spread(self.vertical_rays, center.x, half_span)
            .into_iter()
            .map(|x| Point2::new(x + offset_x, edge_y))
            .collect()
    }
}

/// Evenly spaced coordinates across `center ± half_span`.
///
/// Degenerate inputs (count < 2 or a collapsed span) fall back to the center.
fn spread(count: u32, center: f32, half_span: f32) -> Vec<f32> {
    if count < 2 || half_span <= 0.0 {
        return vec![center];
    }
    let start = center - half_span;
    let step = (2.0 * half_span) / (count - 1) as f32;
    (0..count).map(|i| start + step * i as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_origins_sit_on_the_leading_face() {
        let sampler = BoundsSampler::new(3, 3, 0.02);
        let center = Point2::new(1.0, 2.0);
        let half = Vec2::new(0.5, 1.0);

        let right = sampler.horizontal_origins(center, half, 1.0);
        assert_eq!(right.len(), 3);
        for origin in &right {
            assert!((origin.x - 1.5).abs() < 1.0e-6);
        }
        // Inset corners: span is half.y - skin on each side.
        assert!((right[0].y - (2.0 - 0.98)).abs() < 1.0e-6);
        assert!((right[2].y - (2.0 + 0.98)).abs() < 1.0e-6);
        // Even spacing.
        assert!(((right[1].y - right[0].y) - (right[2].y - right[1].y)).abs() < 1.0e-6);

        let left = sampler.horizontal_origins(center, half, -1.0);
        assert!((left[0].x - 0.5).abs() < 1.0e-6);
    }

    #[test]
    fn vertical_origins_apply_the_horizontal_offset() {
        let sampler = BoundsSampler::new(2, 2, 0.02);
        let origins = sampler.vertical_origins(
            Point2::new(0.0, 0.0),
            Vec2::new(0.5, 0.5),
            -1.0,
            0.25,
        );
        assert_eq!(origins.len(), 2);
        for origin in &origins {
            assert!((origin.y - -0.5).abs() < 1.0e-6);
        }
        assert!((origins[0].x - (-0.48 + 0.25)).abs() < 1.0e-6);
        assert!((origins[1].x - (0.48 + 0.25)).abs() < 1.0e-6);
    }

    #[test]
    fn low_ray_counts_degrade_to_a_single_centered_ray() {
        let sampler = BoundsSampler::new(1, 0, 0.02);
        let h = sampler.horizontal_origins(Point2::new(0.0, 3.0), Vec2::new(0.5, 1.0), 1.0);
        assert_eq!(h.len(), 1);
        assert!((h[0].y - 3.0).abs() < 1.0e-6);

        let v = sampler.vertical_origins(Point2::new(2.0, 0.0), Vec2::new(1.0, 0.5), 1.0, 0.0);
        assert_eq!(v.len(), 1);
        assert!((v[0].x - 2.0).abs() < 1.0e-6);
    }

    #[test]
    fn point_bodies_collapse_to_their_position() {
        let sampler = BoundsSampler::default();
        let v = sampler.vertical_origins(Point2::new(0.0, 5.0), Vec2::zeros(), -1.0, 0.0);
        assert_eq!(v.len(), 1);
        assert!((v[0].x).abs() < 1.0e-6);
        assert!((v[0].y - 5.0).abs() < 1.0e-6);
    }
}
