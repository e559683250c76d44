//! Pointer up handling - finalize drags and place palette drops.
//!
//! An armed wire is a click-click gesture: pointer up leaves it armed.

use tracing::debug;

use super::{GestureOutcome, InteractionController, InteractionState};
use crate::geometry::Point;
use crate::profile_scope;

impl InteractionController {
    pub fn pointer_up(&mut self, p: Point) -> GestureOutcome {
        profile_scope!("pointer_up");

        match std::mem::take(&mut self.state) {
            InteractionState::Idle => GestureOutcome::Nothing,
            armed @ InteractionState::CreatingConnection { .. } => {
                self.state = armed;
                self.state.track_pointer(p);
                GestureOutcome::Nothing
            }
            InteractionState::PlacingFromPalette { kind, .. } => {
                if self.graph.settings().is_over_canvas(p) {
                    GestureOutcome::Placed(self.graph.place_block(kind, p))
                } else {
                    debug!(%kind, x = p.x, y = p.y, "Palette drop outside canvas");
                    GestureOutcome::PlacementDiscarded
                }
            }
            InteractionState::MovingBlock { .. }
            | InteractionState::DraggingLabel { .. }
            | InteractionState::DraggingConnectionSegment { .. } => GestureOutcome::DragEnded,
        }
    }
}
