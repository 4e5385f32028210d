/*!
Possession switching.

Hands control back and forth between the player body and the ghost. Entering
possession releases any grab in progress and puts the ghost under free
control; leaving returns it to follow mode with a fresh start delay. Each
transition is reported as an event for camera/audio glue outside this crate.
*/

use crate::boxes::PushableBox;
use crate::ghost::GhostController;
use crate::grab::GrabCoupling;

/// Control transition produced by a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PossessionChange {
    GhostPossessed,
    GhostReleased,
}

/// Edge-triggered control handoff between player and ghost.
#[derive(Debug)]
pub struct PossessionSwitch {
    possessed: bool,
    /// Freeze player locomotion input while the ghost is piloted.
    pub freeze_player: bool,
}

impl Default for PossessionSwitch {
    fn default() -> Self {
        Self {
            possessed: false,
            freeze_player: true,
        }
    }
}

impl PossessionSwitch {
    /// One switch tick. `toggle_pressed` is the pre-debounced per-tick edge;
    /// a `true` swaps control and yields the transition event.
    pub fn step(
        &mut self,
        toggle_pressed: bool,
        ghost: &mut GhostController,
        grab: &mut GrabCoupling,
        boxes: &mut [PushableBox],
    ) -> Option<PossessionChange> {
        if !toggle_pressed {
            return None;
        }

        if self.possessed {
            self.possessed = false;
            ghost.release_control();
            log::debug!("possession released; ghost returns to follow");
            Some(PossessionChange::GhostReleased)
        } else {
            self.possessed = true;
            // A held box cannot stay held by a body that just lost its pilot.
            grab.release(boxes);
            ghost.take_control();
            log::debug!("ghost possessed; player input frozen: {}", self.freeze_player);
            Some(PossessionChange::GhostPossessed)
        }
    }

    #[inline]
    pub fn is_possessed(&self) -> bool {
        self.possessed
    }

    /// Whether player locomotion input should be ignored this tick.
    #[inline]
    pub fn player_frozen(&self) -> bool {
        self.possessed && self.freeze_player
    }
}
