//! Pointer down handling - gesture priority, wire arming, drag initiation.
//!
//! ## Performance Notes
//!
//! Pointer down is a hot path. Block hits go through the R-tree spatial
//! index; connector and connection hits are linear scans over small sets.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use tracing::{debug, warn};

use super::{GestureOutcome, InteractionController, InteractionState};
use crate::geometry::Point;
use crate::profile_scope;
use crate::types::{BlockId, BlockKind, ConnectorRef};

impl InteractionController {
    /// Pointer down on a palette button: start dragging a new block.
    pub fn begin_palette_drag(&mut self, kind: BlockKind, pointer: Point) -> GestureOutcome {
        if self.state.is_dragging() {
            return GestureOutcome::Nothing;
        }
        if let Some(source) = self.state.connection_source() {
            debug!(%source, "Palette drag drops the armed wire");
        }
        self.state = InteractionState::PlacingFromPalette { kind, pointer };
        GestureOutcome::PaletteDragStarted(kind)
    }

    /// Pointer down on the canvas.
    ///
    /// First match wins: selected label, vertical segment, connector,
    /// connection body, block, empty canvas. While a wire is armed no drag
    /// can start, and clicks off a connector only change the selection.
    pub fn pointer_down(&mut self, p: Point) -> GestureOutcome {
        profile_scope!("pointer_down");

        if matches!(self.state, InteractionState::PlacingFromPalette { .. }) {
            return GestureOutcome::Nothing;
        }
        if self.state.is_dragging() {
            // lost the matching pointer up
            self.state.reset();
        }
        let armed = self.state.connection_source();

        if armed.is_none() {
            if let Some(outcome) = self.try_grab_label(p) {
                return outcome;
            }
            if let Some(outcome) = self.try_grab_segment(p) {
                return outcome;
            }
        }

        if let Some((block, which)) = self.graph.hit_test_connector(p) {
            return self.click_connector(armed, block, which, p);
        }

        if let Some(hit) = self.graph.hit_test_connection_segment(p) {
            self.graph.select_connection(hit.connection);
            return GestureOutcome::ConnectionSelected(hit.connection);
        }

        if let Some(block) = self.graph.hit_test_block(p) {
            self.graph.select_block(block);
            if armed.is_some() {
                return GestureOutcome::BlockSelected(block);
            }
            let Some(origin) = self.graph.block(block).map(|b| b.position) else {
                return GestureOutcome::Nothing;
            };
            self.state = InteractionState::MovingBlock {
                block,
                grab_offset: p.minus(origin),
            };
            return GestureOutcome::BlockGrabbed(block);
        }

        self.graph.clear_selection();
        GestureOutcome::SelectionCleared
    }

    fn try_grab_label(&mut self, p: Point) -> Option<GestureOutcome> {
        let block = self.graph.block(self.graph.selected_block()?)?;
        let hit = block
            .label
            .hit_rect(block.position, self.label_width(&block.label.text));
        if !hit.contains(p) {
            return None;
        }
        let id = block.id;
        self.state = InteractionState::DraggingLabel {
            block: id,
            grab_offset: p.minus(block.label_anchor()),
        };
        Some(GestureOutcome::LabelGrabbed(id))
    }

    fn try_grab_segment(&mut self, p: Point) -> Option<GestureOutcome> {
        let connection = self.graph.hit_test_vertical_segment(p)?;
        let vertical_x = self.graph.connection(connection)?.vertical_x;
        self.graph.select_connection(connection);
        self.state = InteractionState::DraggingConnectionSegment {
            connection,
            grab_offset: p.x - vertical_x,
        };
        Some(GestureOutcome::SegmentGrabbed(connection))
    }

    fn click_connector(
        &mut self,
        armed: Option<BlockId>,
        block: BlockId,
        which: ConnectorRef,
        p: Point,
    ) -> GestureOutcome {
        let occupied = self
            .graph
            .block(block)
            .and_then(|b| b.connector(which))
            .is_some_and(|c| c.occupied);

        let Some(source) = armed else {
            if which == ConnectorRef::Output && !occupied {
                self.state = InteractionState::CreatingConnection { source: block, pointer: p };
                debug!(%block, "Armed connection");
                return GestureOutcome::ConnectionArmed(block);
            }
            return GestureOutcome::Nothing;
        };

        self.state.reset();
        match which {
            ConnectorRef::Input(slot) if block != source && !occupied => {
                match self.graph.connect(source, block, slot) {
                    Ok(id) => GestureOutcome::Connected(id),
                    Err(e) => {
                        warn!(%source, target = %block, slot, "Connection declined: {}", e);
                        GestureOutcome::Declined(e)
                    }
                }
            }
            _ => {
                debug!(%source, %block, connector = %which, "Armed connection cancelled");
                GestureOutcome::ConnectionCancelled
            }
        }
    }
}
