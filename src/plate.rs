/*!
Pressure plates.

A plate watches one trigger surface and recomputes its occupancy from a set
of body bounds every tick, reporting only the edges: pressed when the first
body arrives, released when the last one leaves. Routing those events into
platform activation or doors is the caller's business.
*/

use parry2d::bounding_volume::Aabb;
use parry2d::shape::Cuboid;

use crate::collision::{narrow_phase, StaticWorld, SurfaceId};
use crate::math::Iso2;

/// Occupancy edge produced by a plate tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlateEvent {
    Pressed,
    Released,
}

/// Edge-reporting occupancy tracker over one trigger surface.
///
/// The caller decides which bodies can press the plate by choosing what goes
/// into the `bodies` slice; the plate itself applies no layer filtering.
#[derive(Clone, Debug)]
pub struct PressurePlate {
    surface: SurfaceId,
    press_count: usize,
}

impl PressurePlate {
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            press_count: 0,
        }
    }

    #[inline]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.press_count > 0
    }

    #[inline]
    pub fn press_count(&self) -> usize {
        self.press_count
    }

    /// Recompute occupancy from scratch and report the edge, if any.
    pub fn step(&mut self, world: &StaticWorld, bodies: &[Aabb]) -> Option<PlateEvent> {
        let was = self.press_count;

        let Some(surface) = world.surface(self.surface) else {
            self.press_count = 0;
            if was > 0 {
                log::warn!("pressure plate surface {:?} is gone; releasing", self.surface);
                return Some(PlateEvent::Released);
            }
            return None;
        };

        self.press_count = bodies
            .iter()
            .filter(|aabb| {
                let iso = Iso2::new(aabb.center().coords, 0.0);
                let rect = Cuboid::new(aabb.half_extents());
                narrow_phase::overlap_rect_against_surface(&iso, &rect, surface)
            })
            .count();

        if was == 0 && self.press_count > 0 {
            Some(PlateEvent::Pressed)
        } else if was > 0 && self.press_count == 0 {
            Some(PlateEvent::Released)
        } else {
            None
        }
    }
}
