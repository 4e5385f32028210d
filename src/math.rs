/*!
Math aliases and steering helpers shared across the crate.

This module intentionally contains no simulation state. It defines the
2D aliases every other module builds on, plus the small interpolation
primitives the motors and controllers use:

- `move_toward` / `move_toward_vec`: constant-rate approach with exact arrival.
- `smooth_damp`: critically damped approach for follow-style smoothing.
- `exp_decay`: frame-rate independent exponential decay (drag, force damping).
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Point2 = na::Point2<f32>;
pub type Iso2 = na::Isometry2<f32>;

/// Move `current` toward `target` by at most `max_delta`, arriving exactly.
///
/// Negative `max_delta` moves away from the target.
#[inline]
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Vector variant of [`move_toward`]: step toward `target` by at most
/// `max_delta` in length, arriving exactly when within range.
#[inline]
pub fn move_toward_vec(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let dist_sq = delta.norm_squared();
    if dist_sq == 0.0 || (max_delta >= 0.0 && dist_sq <= max_delta * max_delta) {
        return target;
    }
    current + delta / dist_sq.sqrt() * max_delta
}

/// Normalize `v`, returning zero for degenerate inputs instead of NaN.
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len_sq = v.norm_squared();
    if len_sq > 1.0e-12 {
        v / len_sq.sqrt()
    } else {
        Vec2::zeros()
    }
}

/// Exponential decay of `value` at `rate` (1/seconds) over `dt`.
///
/// Repeated calls over sub-steps compose exactly: decaying for `dt1` then
/// `dt2` equals decaying once for `dt1 + dt2`.
#[inline]
pub fn exp_decay(value: f32, rate: f32, dt: f32) -> f32 {
    value * (-rate * dt).exp()
}

/// Vector variant of [`exp_decay`].
#[inline]
pub fn exp_decay_vec(value: Vec2, rate: f32, dt: f32) -> Vec2 {
    value * (-rate * dt).exp()
}

/// Critically damped approach of `current` toward `target`.
///
/// `velocity` is the smoothing state carried between calls; zero it whenever
/// the target or the smoothing context changes discontinuously. `smooth_time`
/// is roughly the time to cover most of the remaining distance, `max_speed`
/// caps the approach rate. Returns the new position.
///
/// `dt <= 0` returns `current` unchanged and leaves `velocity` untouched.
pub fn smooth_damp(
    current: Point2,
    target: Point2,
    velocity: &mut Vec2,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> Point2 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1.0e-4);
    let omega = 2.0 / smooth_time;

    // Rational approximation of exp(-omega * dt); stable for large steps.
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let mut change = current - target;
    let max_change = max_speed * smooth_time;
    let change_sq = change.norm_squared();
    if change_sq > max_change * max_change {
        change = change / change_sq.sqrt() * max_change;
    }
    let clamped_target = current - change;

    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * exp;
    let mut out = clamped_target + (change + temp) * exp;

    // Never overshoot past the target.
    if (target - current).dot(&(out - target)) > 0.0 {
        out = target;
        *velocity = Vec2::zeros();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_toward_clamps_and_arrives() {
        // Far away: step is limited to max_delta.
        assert!((move_toward(0.0, 10.0, 1.0) - 1.0).abs() < 1.0e-6);
        assert!((move_toward(0.0, -10.0, 1.0) - -1.0).abs() < 1.0e-6);
        // Within range: arrives exactly, no oscillation.
        assert!((move_toward(9.5, 10.0, 1.0) - 10.0).abs() < 1.0e-6);
    }

    #[test]
    fn move_toward_vec_steps_along_the_direction() {
        let out = move_toward_vec(Vec2::zeros(), Vec2::new(3.0, 4.0), 1.0);
        // Unit step along the (3,4)/5 direction.
        assert!((out.x - 0.6).abs() < 1.0e-6);
        assert!((out.y - 0.8).abs() < 1.0e-6);

        let arrived = move_toward_vec(Vec2::new(2.9, 3.9), Vec2::new(3.0, 4.0), 1.0);
        assert!((arrived - Vec2::new(3.0, 4.0)).norm() < 1.0e-6);
    }

    #[test]
    fn normalize_or_zero_handles_degenerate_input() {
        assert_eq!(normalize_or_zero(Vec2::zeros()), Vec2::zeros());
        let n = normalize_or_zero(Vec2::new(0.0, 3.0));
        assert!((n.norm() - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn exp_decay_is_split_step_equivalent() {
        let total = 0.8;
        let one_shot = exp_decay(5.0, 3.0, total);
        let mut split = 5.0;
        for _ in 0..8 {
            split = exp_decay(split, 3.0, total / 8.0);
        }
        assert!((one_shot - split).abs() < 1.0e-4);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let target = Point2::new(4.0, 1.0);
        let mut pos = Point2::new(0.0, 0.0);
        let mut vel = Vec2::zeros();
        let dt = 1.0 / 60.0;
        let mut best = f32::INFINITY;
        for _ in 0..600 {
            pos = smooth_damp(pos, target, &mut vel, 0.25, 10.0, dt);
            let dist = (target - pos).norm();
            // Monotone approach: distance never grows once shrinking.
            assert!(dist <= best + 1.0e-4);
            best = best.min(dist);
        }
        assert!((target - pos).norm() < 1.0e-3);
    }

    #[test]
    fn smooth_damp_zero_dt_is_identity() {
        let mut vel = Vec2::new(1.0, 2.0);
        let pos = Point2::new(1.0, 1.0);
        let out = smooth_damp(pos, Point2::new(5.0, 5.0), &mut vel, 0.25, 10.0, 0.0);
        assert_eq!(out, pos);
        assert_eq!(vel, Vec2::new(1.0, 2.0));
    }
}
