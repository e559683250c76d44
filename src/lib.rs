//! Interaction engine for grid-snapped math-expression block diagrams.
//!
//! The host feeds canvas-local pointer events to an
//! [`InteractionController`], draws the [`RenderFrame`] it produces, and
//! persists the graph through [`document`].

pub mod constants;
pub mod document;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod perf;
pub mod render;
pub mod settings;
pub mod spatial_index;
pub mod types;

pub use document::DiagramDocument;
pub use error::{DiagramError, DiagramResult};
pub use geometry::Point;
pub use graph::DiagramGraph;
pub use input::{GestureOutcome, InteractionController, InteractionState};
pub use render::{ApproxTextMeasure, RenderFrame, TextMeasure};
pub use settings::EditorSettings;
pub use types::{BlockId, BlockKind, ConnectionId, ConnectorRef};
