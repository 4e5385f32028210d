/*!
Respawn snapshots.

Periodically remembers where a body last stood on ground marked safe, probing
straight down through the world's raycast. `recall` teleports the body back to
the newest snapshot; teleport semantics clear its velocity and force.
*/

use crate::collision::StaticWorld;
use crate::layers::{Layer, LayerMask};
use crate::math::{Point2, Vec2};
use crate::motor::Motor;

/// Tuning for a [`RespawnTracker`].
#[derive(Clone, Copy, Debug)]
pub struct RespawnSettings {
    /// Minimum time between snapshots (seconds). `<= 0` disables sampling.
    pub sample_interval: f32,
    /// Downward probe length from the body center (meters).
    pub probe_distance: f32,
    /// Layers that count as safe ground.
    pub safe_mask: LayerMask,
}

impl Default for RespawnSettings {
    fn default() -> Self {
        Self {
            sample_interval: 2.0,
            probe_distance: 1.0,
            safe_mask: LayerMask::from_flags(&[Layer::SafeGround]),
        }
    }
}

/// Last-safe-position tracker for one body.
#[derive(Clone, Debug)]
pub struct RespawnTracker {
    settings: RespawnSettings,
    /// Time left until the next snapshot is allowed (seconds).
    timer: f32,
    last_safe: Option<Point2>,
}

impl RespawnTracker {
    pub fn new(settings: RespawnSettings) -> Self {
        if settings.sample_interval <= 0.0 {
            log::warn!("respawn sampling disabled: non-positive sample interval");
        }
        Self {
            settings,
            timer: 0.0,
            last_safe: None,
        }
    }

    #[inline]
    pub fn last_safe(&self) -> Option<Point2> {
        self.last_safe
    }

    /// One tracker tick. Snapshots the body position when the interval has
    /// elapsed, the body is grounded, and safe ground sits under it.
    pub fn step(&mut self, world: &StaticWorld, motor: &dyn Motor, dt: f32) {
        if self.settings.sample_interval <= 0.0 {
            return;
        }
        self.timer -= dt.max(0.0);
        if self.timer > 0.0 || !motor.is_grounded() {
            return;
        }

        let position = motor.position();
        let probe = world.raycast(
            position,
            -Vec2::y(),
            self.settings.probe_distance,
            self.settings.safe_mask,
        );
        if probe.is_some() {
            self.last_safe = Some(position);
            self.timer = self.settings.sample_interval;
        }
    }

    /// Teleport the body back to the newest snapshot, if one exists.
    pub fn recall(&self, motor: &mut dyn Motor) -> bool {
        match self.last_safe {
            Some(position) => {
                motor.teleport(position);
                true
            }
            None => false,
        }
    }
}
