//! Render intents.
//!
//! The engine never rasterizes. Once per frame the host asks the controller
//! for a [`RenderFrame`] and draws it: blocks with their connectors and
//! labels, connection polylines, and the transient previews of whatever
//! gesture is in flight.

use crate::constants::LABEL_LEADER_GAP;
use crate::geometry::{ManhattanPath, Point, Rect};
use crate::graph::DiagramGraph;
use crate::types::{Block, BlockId, BlockKind, Connection, ConnectionId, Connector};

/// Measures label text. Supplied by the host, which owns the real font.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_px: f32) -> f32;
}

/// Fixed average advance per character, close to 14px Arial.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasure {
    /// Advance as a fraction of the font size
    pub advance_ratio: f32,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.55 }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn text_width(&self, text: &str, font_px: f32) -> f32 {
        text.chars().count() as f32 * font_px * self.advance_ratio
    }
}

#[derive(Debug, Clone)]
pub struct BlockView {
    pub id: BlockId,
    pub kind: BlockKind,
    pub symbol: &'static str,
    pub number: u32,
    pub color: String,
    pub bounds: Rect,
    pub selected: bool,
    pub output: Connector,
    pub inputs: Vec<Connector>,
    pub label_text: String,
    pub label_anchor: Point,
    pub label_hit: Rect,
    /// Dotted leader from the output connector to just left of the label
    pub leader: (Point, Point),
}

impl BlockView {
    pub fn new(block: &Block, label_width: f32) -> Self {
        let label_anchor = block.label_anchor();
        Self {
            id: block.id,
            kind: block.kind,
            symbol: block.symbol(),
            number: block.number,
            color: block.color.clone(),
            bounds: block.bounds(),
            selected: block.selected,
            output: *block.output(),
            inputs: block.inputs().to_vec(),
            label_text: block.label.text.clone(),
            label_anchor,
            label_hit: block.label.hit_rect(block.position, label_width),
            leader: (
                block.output().position,
                label_anchor.offset(-LABEL_LEADER_GAP, 0.0),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionView {
    pub id: ConnectionId,
    pub path: ManhattanPath,
    pub selected: bool,
}

impl From<&Connection> for ConnectionView {
    fn from(conn: &Connection) -> Self {
        Self {
            id: conn.id,
            path: conn.path(),
            selected: conn.selected,
        }
    }
}

/// Floating block under the pointer during a palette drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalettePreview {
    pub kind: BlockKind,
    pub bounds: Rect,
    /// Whether releasing now would place the block
    pub droppable: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderFrame {
    pub blocks: Vec<BlockView>,
    pub connections: Vec<ConnectionView>,
    pub preview_connection: Option<ManhattanPath>,
    pub palette_preview: Option<PalettePreview>,
    /// Block whose label is being dragged, drawn highlighted
    pub dragging_label: Option<BlockId>,
}

impl RenderFrame {
    /// Static part of the frame: every block and connection.
    pub fn from_graph(graph: &DiagramGraph, measure: &dyn TextMeasure) -> Self {
        let font_px = graph.settings().label_font_px;
        Self {
            blocks: graph
                .blocks()
                .iter()
                .map(|b| BlockView::new(b, measure.text_width(&b.label.text, font_px)))
                .collect(),
            connections: graph.connections().iter().map(ConnectionView::from).collect(),
            ..Default::default()
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&BlockView> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&ConnectionView> {
        self.connections.iter().find(|c| c.id == id)
    }
}

/// Path from an armed output to the pointer, bent at the midpoint.
pub fn preview_path(start: Point, pointer: Point) -> ManhattanPath {
    ManhattanPath::new(start, (start.x + pointer.x) / 2.0, pointer)
}
