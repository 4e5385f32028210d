/*!
Grab coupling between a controller and a pushable box.

Acquire on the rising edge of the hold input, release on the falling edge or
when the pair over-extends. While linked, the horizontal input drives the box
as acceleration and a speed-limited follow nudge keeps it near the hold
anchor. The nudge travels through the motor as a push; the coupling never
writes positions.
*/

use crate::boxes::PushableBox;
use crate::collision::broad;
use crate::collision::settings::MIN_MOVE;
use crate::math::{Point2, Vec2};
use crate::motor::Motor;
use parry2d::bounding_volume::Aabb;

/// Tuning for the grab coupling.
#[derive(Clone, Copy, Debug)]
pub struct GrabSettings {
    /// Probe center distance from the controller along facing (meters).
    pub range: f32,
    /// Half extents of the acquire probe rectangle (meters).
    pub probe_half_extents: Vec2,
    /// Controller-to-box distance that breaks the link (meters).
    pub break_distance: f32,
    /// Horizontal drive acceleration per unit of input axis (m/s²).
    pub grab_move_force: f32,
    /// Speed limit of the follow nudge (m/s).
    pub follow_speed: f32,
    /// Horizontal hold anchor offset from the controller (meters); its sign
    /// follows the facing at grab time.
    pub hold_offset_x: f32,
}

impl Default for GrabSettings {
    fn default() -> Self {
        Self {
            range: 0.6,
            probe_half_extents: Vec2::new(0.35, 0.3),
            break_distance: 2.2,
            grab_move_force: 45.0,
            follow_speed: 12.0,
            hold_offset_x: 0.45,
        }
    }
}

/// Active coupling record.
#[derive(Clone, Copy, Debug)]
pub struct GrabLink {
    /// Index of the grabbed box in the caller's box slice.
    pub box_index: usize,
    /// Anchor offset from the controller; sign fixed at grab time.
    pub anchor_offset_x: f32,
}

/// Edge-triggered grab state machine.
#[derive(Debug, Default)]
pub struct GrabCoupling {
    settings: GrabSettings,
    link: Option<GrabLink>,
    hold_was_down: bool,
}

impl GrabCoupling {
    pub fn new(settings: GrabSettings) -> Self {
        Self {
            settings,
            link: None,
            hold_was_down: false,
        }
    }

    #[inline]
    pub fn settings(&self) -> &GrabSettings {
        &self.settings
    }

    #[inline]
    pub fn link(&self) -> Option<&GrabLink> {
        self.link.as_ref()
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    /// One coupling tick. `hold_down` is the raw per-tick hold input; edges
    /// are detected here. `axis_x` is the horizontal drive input in [-1, 1].
    pub fn step(
        &mut self,
        controller: Point2,
        facing: f32,
        hold_down: bool,
        axis_x: f32,
        boxes: &mut [PushableBox],
        dt: f32,
    ) {
        let pressed = hold_down && !self.hold_was_down;
        let released = !hold_down && self.hold_was_down;
        self.hold_was_down = hold_down;

        if pressed && self.link.is_none() {
            self.try_acquire(controller, facing, boxes);
        }
        if released {
            self.release(boxes);
        }

        let Some(link) = self.link else {
            return;
        };
        if link.box_index >= boxes.len() {
            log::warn!(
                "grab link points at box {} but only {} boxes exist; dropping the link",
                link.box_index,
                boxes.len()
            );
            self.link = None;
            return;
        }

        // 1) Break on over-extension, on the first tick at or past the
        //    distance. Re-acquiring takes a fresh rising edge.
        if (boxes[link.box_index].position() - controller).norm() >= self.settings.break_distance {
            self.release(boxes);
            return;
        }
        let body = &mut boxes[link.box_index];

        // 2) Drive: input feeds the box as acceleration, consumed by its next
        //    physics step.
        body.set_grab_drive(axis_x * self.settings.grab_move_force);

        // 3) Follow: speed-limited nudge toward the hold anchor, delivered as
        //    a push.
        let target_x = controller.x + link.anchor_offset_x;
        let max_step = self.settings.follow_speed * dt.max(0.0);
        let nudge = (target_x - body.position().x).clamp(-max_step, max_step);
        if nudge.abs() > MIN_MOVE {
            body.motor_mut().push(Vec2::new(nudge, 0.0), false);
        }
    }

    /// Probe ahead of the controller and link the first free box overlapping.
    /// Returns whether a link was formed.
    pub fn try_acquire(
        &mut self,
        controller: Point2,
        facing: f32,
        boxes: &mut [PushableBox],
    ) -> bool {
        let sign = if facing < 0.0 { -1.0 } else { 1.0 };
        let center = controller + Vec2::new(sign * self.settings.range, 0.0);
        let probe = Aabb {
            mins: Point2::from(center.coords - self.settings.probe_half_extents),
            maxs: Point2::from(center.coords + self.settings.probe_half_extents),
        };

        for (index, body) in boxes.iter_mut().enumerate() {
            if body.is_grabbed() {
                continue;
            }
            if broad::aabb_intersects(&probe, &body.aabb()) {
                body.grab();
                self.link = Some(GrabLink {
                    box_index: index,
                    anchor_offset_x: self.settings.hold_offset_x * sign,
                });
                return true;
            }
        }
        false
    }

    /// Drop the link and clear the box's grab state. Idempotent.
    pub fn release(&mut self, boxes: &mut [PushableBox]) {
        if let Some(link) = self.link.take() {
            if let Some(body) = boxes.get_mut(link.box_index) {
                body.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::BoxPhysicsSettings;
    use crate::collision::settings::DEFAULT_SKIN;
    use crate::collision::{StaticWorld, Surface};

    const DT: f32 = 1.0 / 60.0;

    fn floor_world() -> StaticWorld {
        StaticWorld::from_surfaces(vec![Surface::half_plane(Vec2::y(), Point2::new(0.0, 0.0))])
    }

    fn box_at(x: f32) -> PushableBox {
        PushableBox::new(
            Point2::new(x, 0.3 + DEFAULT_SKIN),
            Vec2::new(0.3, 0.3),
            BoxPhysicsSettings::default(),
        )
    }

    fn controller() -> Point2 {
        Point2::new(0.0, 0.5)
    }

    #[test]
    fn rising_edge_acquires_the_facing_box() {
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(0.9)];

        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        assert!(grab.is_linked());
        assert!(boxes[0].is_grabbed());
        let link = grab.link().unwrap();
        assert_eq!(link.box_index, 0);
        assert!((link.anchor_offset_x - 0.45).abs() < 1.0e-6);

        // Held input is not a new edge; the link just persists.
        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        assert!(grab.is_linked());
    }

    #[test]
    fn facing_left_probes_and_anchors_on_the_left() {
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(-0.9), box_at(0.9)];

        grab.step(controller(), -1.0, true, 0.0, &mut boxes, DT);
        let link = grab.link().unwrap();
        assert_eq!(link.box_index, 0);
        assert!(link.anchor_offset_x < 0.0);
        assert!(!boxes[1].is_grabbed());
    }

    #[test]
    fn falling_edge_releases_the_box() {
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(0.9)];

        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        grab.step(controller(), 1.0, false, 0.0, &mut boxes, DT);
        assert!(!grab.is_linked());
        assert!(!boxes[0].is_grabbed());

        // Releasing again is a no-op.
        grab.release(&mut boxes);
        assert!(!grab.is_linked());
    }

    #[test]
    fn boxes_grabbed_elsewhere_are_skipped() {
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(0.7), box_at(0.9)];
        boxes[0].grab();

        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        let link = grab.link().unwrap();
        assert_eq!(link.box_index, 1);
    }

    #[test]
    fn over_extension_breaks_the_link_without_reacquire() {
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(0.9)];

        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        assert!(grab.is_linked());

        // The box ends up past the break distance.
        boxes[0].teleport(Point2::new(3.0, 0.5));
        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        assert!(!grab.is_linked());
        assert!(!boxes[0].is_grabbed());

        // Input still held: no rising edge, no new link.
        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        assert!(!grab.is_linked());
    }

    #[test]
    fn drive_reaches_the_box_as_acceleration() {
        let world = floor_world();
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(0.9)];

        grab.step(controller(), 1.0, true, 1.0, &mut boxes, DT);
        boxes[0].step(&world, DT);
        assert!(boxes[0].velocity().x > 0.0);
    }

    #[test]
    fn follow_nudge_is_speed_limited() {
        let world = floor_world();
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(1.2)];

        // Anchor at 0.45, box at 1.2: the 0.75 m error is fed back at most
        // follow_speed * dt per tick.
        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        boxes[0].step(&world, DT);
        let moved = 1.2 - boxes[0].position().x;
        assert!((moved - 12.0 * DT).abs() < 1.0e-4);

        // Within range the nudge lands exactly on the anchor.
        boxes[0].teleport(Point2::new(0.5, 0.3 + DEFAULT_SKIN));
        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        boxes[0].step(&world, DT);
        assert!((boxes[0].position().x - 0.45).abs() < 1.0e-4);
    }

    #[test]
    fn stale_link_index_is_dropped() {
        let mut grab = GrabCoupling::default();
        let mut boxes = vec![box_at(0.9)];
        grab.step(controller(), 1.0, true, 0.0, &mut boxes, DT);
        assert!(grab.is_linked());

        grab.step(controller(), 1.0, true, 0.0, &mut [], DT);
        assert!(!grab.is_linked());
    }
}
