/*!
Radial leash constraint.

Keeps the ghost inside a circle around its anchor by filtering proposed
velocities: inward motion always passes, outward motion fades across a soft
band and dies at the hard radius. Velocity filtering keeps the motion smooth;
the optional position clamp is the backstop for large steps.
*/

use crate::math::{Point2, Vec2};

/// Tuning for the leash between the ghost and its anchor.
#[derive(Clone, Copy, Debug)]
pub struct LeashSettings {
    /// Maximum distance from the anchor (meters). `<= 0` disables the leash.
    pub hard_radius: f32,
    /// Width of the attenuation band inside the hard radius (meters).
    pub soft_band: f32,
    /// At the hard radius, keep tangent motion (slide along the circle)
    /// instead of stopping dead.
    pub tangent_slide: bool,
    /// Also snap positions back onto the circle after integration.
    pub clamp_position: bool,
}

impl Default for LeashSettings {
    fn default() -> Self {
        Self {
            hard_radius: 6.0,
            soft_band: 0.5,
            tangent_slide: true,
            clamp_position: false,
        }
    }
}

/// Filter a proposed velocity against the leash.
///
/// At or beyond the hard radius the returned velocity has no outward radial
/// component (or is exactly zero without tangent slide). Coincident body and
/// anchor use a fixed +X outward direction rather than dividing by zero.
pub fn constrain_velocity(
    velocity: Vec2,
    body: Point2,
    anchor: Point2,
    settings: &LeashSettings,
) -> Vec2 {
    if settings.hard_radius <= 0.0 {
        return velocity;
    }

    let to_body = body - anchor;
    let dist = to_body.norm();
    let outward = if dist > 1.0e-6 {
        to_body / dist
    } else {
        Vec2::x()
    };

    let soft_band = settings.soft_band.max(0.0);
    let free = (settings.hard_radius - soft_band).max(0.0);
    if dist < free {
        return velocity;
    }

    let radial = velocity.dot(&outward);
    if radial <= 0.0 {
        return velocity;
    }

    if dist >= settings.hard_radius {
        if settings.tangent_slide {
            velocity - outward * radial
        } else {
            Vec2::zeros()
        }
    } else {
        // Inside the soft band: fade the outward component toward zero as the
        // body approaches the hard radius.
        let t = ((dist - free) / (settings.hard_radius - free)).clamp(0.0, 1.0);
        velocity - outward * (radial * t)
    }
}

/// Snap a position back onto the hard circle, when the settings ask for it.
///
/// Returns the clamped position only when clamping is enabled and the body
/// actually sits outside the hard radius.
pub fn clamp_position(body: Point2, anchor: Point2, settings: &LeashSettings) -> Option<Point2> {
    if !settings.clamp_position || settings.hard_radius <= 0.0 {
        return None;
    }
    let to_body = body - anchor;
    let dist = to_body.norm();
    if dist <= settings.hard_radius {
        return None;
    }
    Some(anchor + to_body / dist * settings.hard_radius)
}
