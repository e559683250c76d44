//! Pointer gesture handling for the diagram canvas.
//!
//! [`InteractionController`] owns the graph and translates pointer events,
//! already converted to canvas-local coordinates by the host, into graph
//! mutations. Every handler returns a [`GestureOutcome`] describing what
//! happened so the host can redraw and update its chrome.
//!
//! ## Architecture
//!
//! The controller uses an explicit state machine (`InteractionState`) to
//! track the gesture in flight. Selection is orthogonal to it and lives on
//! the graph.
//!
//! ## Modules
//!
//! - `state` - Interaction state enum and query helpers
//! - `mouse_down` - Pointer down: gesture priority and palette drag start
//! - `drag` - Pointer move: block, label and segment drags, previews
//! - `mouse_up` - Pointer up: end drags, palette drop
//! - `commands` - Delete, clear, expression edit, cancel, frame capture

mod commands;
mod drag;
mod mouse_down;
mod mouse_up;
mod state;

pub use state::InteractionState;

use crate::error::DiagramError;
use crate::graph::DiagramGraph;
use crate::render::{ApproxTextMeasure, TextMeasure};
use crate::settings::EditorSettings;
use crate::types::{BlockId, BlockKind, ConnectionId};

/// What a single gesture event did.
#[derive(Debug)]
pub enum GestureOutcome {
    /// Event consumed or ignored without any change
    Nothing,

    PaletteDragStarted(BlockKind),
    Placed(BlockId),
    /// Palette drag released outside the canvas
    PlacementDiscarded,

    BlockGrabbed(BlockId),
    Moved(BlockId),
    LabelGrabbed(BlockId),
    LabelMoved(BlockId),
    SegmentGrabbed(ConnectionId),
    SegmentMoved(ConnectionId),
    DragEnded,

    /// An output connector is armed
    ConnectionArmed(BlockId),
    /// The armed wire moved with the pointer
    PreviewUpdated,
    Connected(ConnectionId),
    /// The graph refused the connection; nothing changed
    Declined(DiagramError),
    /// The armed wire was dropped without connecting
    ConnectionCancelled,

    BlockSelected(BlockId),
    ConnectionSelected(ConnectionId),
    SelectionCleared,

    BlockDeleted {
        block: BlockId,
        connections: usize,
    },
    ConnectionDeleted(ConnectionId),
    Cleared,
    ExpressionSet(BlockId),
    /// A pending gesture was abandoned
    Cancelled,
}

impl GestureOutcome {
    /// Whether the graph or the selection changed
    pub fn changed_graph(&self) -> bool {
        !matches!(
            self,
            Self::Nothing
                | Self::PaletteDragStarted(_)
                | Self::PlacementDiscarded
                | Self::DragEnded
                | Self::ConnectionArmed(_)
                | Self::PreviewUpdated
                | Self::Declined(_)
                | Self::ConnectionCancelled
                | Self::Cancelled
        )
    }
}

/// Finite-state controller driving every pointer gesture on one diagram.
pub struct InteractionController {
    graph: DiagramGraph,
    state: InteractionState,
    measure: Box<dyn TextMeasure>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DiagramGraph::new())
    }
}

impl InteractionController {
    pub fn new(graph: DiagramGraph) -> Self {
        Self::with_text_measure(graph, Box::new(ApproxTextMeasure::default()))
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self::new(DiagramGraph::with_settings(settings))
    }

    pub fn with_text_measure(graph: DiagramGraph, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            graph,
            state: InteractionState::Idle,
            measure,
        }
    }

    pub fn graph(&self) -> &DiagramGraph {
        &self.graph
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn settings(&self) -> &EditorSettings {
        self.graph.settings()
    }

    fn label_width(&self, text: &str) -> f32 {
        self.measure.text_width(text, self.graph.settings().label_font_px)
    }
}

impl From<DiagramError> for GestureOutcome {
    fn from(err: DiagramError) -> Self {
        GestureOutcome::Declined(err)
    }
}
