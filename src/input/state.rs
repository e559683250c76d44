//! Interaction state machine - one explicit state per pointer gesture.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> PlacingFromPalette         (pointer down on a palette button)
//! Idle -> DraggingLabel              (pointer down on the selected block's label)
//! Idle -> DraggingConnectionSegment  (pointer down on a vertical segment)
//! Idle -> CreatingConnection         (pointer down on a free output connector)
//! Idle -> MovingBlock                (pointer down on a block)
//!
//! CreatingConnection -> Idle         (pointer down on any connector)
//! Any drag -> Idle                   (pointer up)
//! Any -> Idle                        (cancel)
//! ```
//!
//! Selection is orthogonal and lives on the graph.

use crate::geometry::Point;
use crate::types::{BlockId, BlockKind, ConnectionId};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    /// No gesture in flight
    #[default]
    Idle,

    /// Dragging a new block from the palette
    PlacingFromPalette {
        kind: BlockKind,
        /// Last pointer position, canvas-local
        pointer: Point,
    },

    MovingBlock {
        block: BlockId,
        /// Pointer minus block origin at grab time
        grab_offset: Point,
    },

    DraggingLabel {
        block: BlockId,
        /// Pointer minus label anchor at grab time
        grab_offset: Point,
    },

    /// Output connector armed; resolved by the next connector click
    CreatingConnection {
        source: BlockId,
        /// Last pointer position, for the preview wire
        pointer: Point,
    },

    DraggingConnectionSegment {
        connection: ConnectionId,
        /// Pointer x minus `vertical_x` at grab time
        grab_offset: f32,
    },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true while the pointer button is held for a drag
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::PlacingFromPalette { .. }
                | Self::MovingBlock { .. }
                | Self::DraggingLabel { .. }
                | Self::DraggingConnectionSegment { .. }
        )
    }

    pub fn is_creating_connection(&self) -> bool {
        matches!(self, Self::CreatingConnection { .. })
    }

    /// Source block of the armed wire, if any
    pub fn connection_source(&self) -> Option<BlockId> {
        match self {
            Self::CreatingConnection { source, .. } => Some(*source),
            _ => None,
        }
    }

    pub fn moving_block(&self) -> Option<BlockId> {
        match self {
            Self::MovingBlock { block, .. } => Some(*block),
            _ => None,
        }
    }

    pub fn label_block(&self) -> Option<BlockId> {
        match self {
            Self::DraggingLabel { block, .. } => Some(*block),
            _ => None,
        }
    }

    pub fn dragged_connection(&self) -> Option<ConnectionId> {
        match self {
            Self::DraggingConnectionSegment { connection, .. } => Some(*connection),
            _ => None,
        }
    }

    pub fn palette_kind(&self) -> Option<BlockKind> {
        match self {
            Self::PlacingFromPalette { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether the gesture holds a reference to `block`
    pub fn involves_block(&self, id: BlockId) -> bool {
        self.connection_source() == Some(id)
            || self.moving_block() == Some(id)
            || self.label_block() == Some(id)
    }

    /// Record the latest pointer position for states that preview it
    pub fn track_pointer(&mut self, p: Point) {
        match self {
            Self::PlacingFromPalette { pointer, .. } | Self::CreatingConnection { pointer, .. } => {
                *pointer = p;
            }
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
