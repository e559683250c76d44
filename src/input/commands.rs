//! Keyboard and toolbar commands, plus frame capture for the renderer.

use tracing::{debug, info};

use super::{GestureOutcome, InteractionController, InteractionState};
use crate::geometry::{Rect, snap_to_grid};
use crate::graph::DiagramGraph;
use crate::render::{PalettePreview, RenderFrame, preview_path};

impl InteractionController {
    /// Delete the selected block (with its connections), else the selected
    /// connection, else nothing.
    pub fn delete_selected(&mut self) -> GestureOutcome {
        if let Some(block) = self.graph.selected_block() {
            return match self.graph.remove_block(block) {
                Ok(removal) => {
                    if self.state.involves_block(block) {
                        self.state.reset();
                    }
                    GestureOutcome::BlockDeleted {
                        block,
                        connections: removal.connections.len(),
                    }
                }
                Err(e) => GestureOutcome::Declined(e),
            };
        }
        if let Some(connection) = self.graph.selected_connection() {
            return match self.graph.disconnect(connection) {
                Ok(_) => {
                    if self.state.dragged_connection() == Some(connection) {
                        self.state.reset();
                    }
                    GestureOutcome::ConnectionDeleted(connection)
                }
                Err(e) => GestureOutcome::Declined(e),
            };
        }
        GestureOutcome::Nothing
    }

    /// Remove everything and restart block numbering.
    pub fn clear_all(&mut self) -> GestureOutcome {
        self.state.reset();
        self.graph.clear();
        info!("Cleared all blocks and connections");
        GestureOutcome::Cleared
    }

    /// Set the expression text of the selected block.
    pub fn set_expression(&mut self, text: impl Into<String>) -> GestureOutcome {
        let Some(block) = self.graph.selected_block() else {
            return GestureOutcome::Nothing;
        };
        match self.graph.set_expression(block, text) {
            Ok(()) => GestureOutcome::ExpressionSet(block),
            Err(e) => GestureOutcome::Declined(e),
        }
    }

    /// Abandon the pending gesture. Mutations already applied by a drag stay.
    pub fn cancel(&mut self) -> GestureOutcome {
        if self.state.is_idle() {
            return GestureOutcome::Nothing;
        }
        debug!(state = ?self.state, "Gesture cancelled");
        self.state.reset();
        GestureOutcome::Cancelled
    }

    /// Swap in a new graph (after a successful load). Pending gestures end.
    pub fn replace_graph(&mut self, graph: DiagramGraph) -> DiagramGraph {
        self.state.reset();
        std::mem::replace(&mut self.graph, graph)
    }

    pub fn into_graph(self) -> DiagramGraph {
        self.graph
    }

    /// Everything the renderer draws this frame.
    pub fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::from_graph(&self.graph, self.measure.as_ref());
        let settings = self.graph.settings();

        match self.state {
            InteractionState::CreatingConnection { source, pointer } => {
                frame.preview_connection = self
                    .graph
                    .block(source)
                    .map(|b| preview_path(b.output().position, pointer));
            }
            InteractionState::PlacingFromPalette { kind, pointer } => {
                let (width, height) = settings.block_size();
                frame.palette_preview = Some(PalettePreview {
                    kind,
                    bounds: Rect::new(snap_to_grid(pointer, settings.grid_size), width, height),
                    droppable: settings.is_over_canvas(pointer),
                });
            }
            InteractionState::DraggingLabel { block, .. } => {
                frame.dragging_label = Some(block);
            }
            _ => {}
        }
        frame
    }
}
