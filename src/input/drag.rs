//! Pointer move handling - block, label and segment drags plus previews.

use tracing::warn;

use super::{GestureOutcome, InteractionController, InteractionState};
use crate::geometry::Point;
use crate::profile_scope;

impl InteractionController {
    pub fn pointer_move(&mut self, p: Point) -> GestureOutcome {
        profile_scope!("pointer_move");

        self.state.track_pointer(p);
        let result = match self.state {
            InteractionState::Idle => return GestureOutcome::Nothing,
            InteractionState::PlacingFromPalette { .. }
            | InteractionState::CreatingConnection { .. } => {
                return GestureOutcome::PreviewUpdated;
            }
            InteractionState::MovingBlock { block, grab_offset } => self
                .graph
                .move_block(block, p.minus(grab_offset))
                .map(|()| GestureOutcome::Moved(block)),
            InteractionState::DraggingLabel { block, grab_offset } => self
                .graph
                .set_label_position(block, p.minus(grab_offset))
                .map(|()| GestureOutcome::LabelMoved(block)),
            InteractionState::DraggingConnectionSegment {
                connection,
                grab_offset,
            } => self
                .graph
                .set_connection_vertical_x(connection, p.x - grab_offset)
                .map(|()| GestureOutcome::SegmentMoved(connection)),
        };

        result.unwrap_or_else(|e| {
            warn!(state = ?self.state, "Drag target vanished: {}", e);
            self.state.reset();
            GestureOutcome::Nothing
        })
    }
}
