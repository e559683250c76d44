//! Core types for the diagram model.
//!
//! This module defines the blocks, connectors and connections that make up a
//! math-expression diagram, together with the per-type tables (symbol, color,
//! input count) and the connector geometry formula.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CONNECTOR_RADIUS, DEFAULT_EXPRESSION, DUAL_INPUT_INSET, LABEL_HIT_HEIGHT, LABEL_HIT_PADDING,
    LABEL_OFFSET_X, LABEL_OFFSET_Y,
};
use crate::geometry::{ManhattanPath, Point, Rect};

// ============================================================================
// Handles
// ============================================================================

/// Stable handle of a block inside one [`crate::graph::DiagramGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable handle of a connection inside one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.0)
    }
}

// ============================================================================
// Block Types
// ============================================================================

/// The operation a block represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Equals,
    SquareRoot,
    Square,
    Substitute,
    Given,
}

impl BlockKind {
    /// Number of input connectors; the one canonical table.
    pub fn input_count(self) -> usize {
        match self {
            BlockKind::Given => 0,
            BlockKind::Square | BlockKind::SquareRoot => 1,
            BlockKind::Addition
            | BlockKind::Subtraction
            | BlockKind::Multiplication
            | BlockKind::Division
            | BlockKind::Equals
            | BlockKind::Substitute => 2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BlockKind::Addition => "+",
            BlockKind::Subtraction => "−",
            BlockKind::Multiplication => "×",
            BlockKind::Division => "÷",
            BlockKind::Equals => "=",
            BlockKind::SquareRoot => "√",
            BlockKind::Square => "x²",
            BlockKind::Substitute => "↧",
            BlockKind::Given => "⇰",
        }
    }

    /// Palette color a new block of this type starts with
    pub fn default_color(self) -> &'static str {
        match self {
            BlockKind::Addition => "#FF5733",
            BlockKind::Subtraction => "#33FF57",
            BlockKind::Multiplication => "#3357FF",
            BlockKind::Division => "#F3FF33",
            BlockKind::Equals => "#FF33F3",
            BlockKind::SquareRoot => "#33FFF3",
            BlockKind::Square => "#8033FF",
            BlockKind::Substitute => "#FF8033",
            BlockKind::Given => "#33B5FF",
        }
    }

    /// Name used in save files
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Addition => "addition",
            BlockKind::Subtraction => "subtraction",
            BlockKind::Multiplication => "multiplication",
            BlockKind::Division => "division",
            BlockKind::Equals => "equals",
            BlockKind::SquareRoot => "square-root",
            BlockKind::Square => "square",
            BlockKind::Substitute => "substitute",
            BlockKind::Given => "given",
        }
    }

    pub fn all() -> &'static [BlockKind] {
        &[
            BlockKind::Addition,
            BlockKind::Subtraction,
            BlockKind::Multiplication,
            BlockKind::Division,
            BlockKind::Equals,
            BlockKind::SquareRoot,
            BlockKind::Square,
            BlockKind::Substitute,
            BlockKind::Given,
        ]
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown block type '{s}'"))
    }
}

/// Zero-based index into a block's input connectors.
pub type InputSlot = usize;

// ============================================================================
// Connectors
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorRole {
    Output,
    Input,
}

/// An attachment point on a block. Plain data, regenerated from the block's
/// position; only the `occupied` flag survives a regeneration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connector {
    pub position: Point,
    pub radius: f32,
    pub role: ConnectorRole,
    pub occupied: bool,
}

impl Connector {
    fn new(position: Point, role: ConnectorRole, occupied: bool) -> Self {
        Self {
            position,
            radius: CONNECTOR_RADIUS,
            role,
            occupied,
        }
    }
}

/// Which connector of a block: the output or an input slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectorRef {
    Output,
    Input(usize),
}

impl fmt::Display for ConnectorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorRef::Output => f.write_str("output"),
            // slots are shown one-based
            ConnectorRef::Input(slot) => write!(f, "input{}", slot + 1),
        }
    }
}

// ============================================================================
// Expression Label
// ============================================================================

/// Free-text expression attached to a block.
///
/// The anchor is kept relative to the block origin, so moving the block
/// carries the label along while a label drag only changes the offset.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionLabel {
    pub text: String,
    pub offset: (f32, f32),
}

impl ExpressionLabel {
    pub fn for_block(size: (f32, f32)) -> Self {
        Self {
            text: DEFAULT_EXPRESSION.to_string(),
            offset: (size.0 + LABEL_OFFSET_X, size.1 + LABEL_OFFSET_Y),
        }
    }

    pub fn anchor(&self, block_origin: Point) -> Point {
        block_origin.offset(self.offset.0, self.offset.1)
    }

    /// Hit region: text box padded horizontally, centered vertically on the
    /// baseline anchor.
    pub fn hit_rect(&self, block_origin: Point, text_width: f32) -> Rect {
        let anchor = self.anchor(block_origin);
        Rect::new(
            anchor.offset(-LABEL_HIT_PADDING, -LABEL_HIT_HEIGHT / 2.0),
            text_width + 2.0 * LABEL_HIT_PADDING,
            LABEL_HIT_HEIGHT,
        )
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// A typed operation node placed on the grid.
#[derive(Clone, Debug)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    /// Top-left corner, always grid aligned
    pub position: Point,
    pub size: (f32, f32),
    pub color: String,
    /// Display number, unique within the diagram
    pub number: u32,
    pub label: ExpressionLabel,
    pub selected: bool,
    output: Connector,
    inputs: Vec<Connector>,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind, position: Point, size: (f32, f32), number: u32) -> Self {
        let mut block = Self {
            id,
            kind,
            position,
            size,
            color: kind.default_color().to_string(),
            number,
            label: ExpressionLabel::for_block(size),
            selected: false,
            output: Connector::new(Point::default(), ConnectorRole::Output, false),
            inputs: Vec::with_capacity(kind.input_count()),
        };
        block.recompute_connectors();
        block
    }

    pub fn symbol(&self) -> &'static str {
        self.kind.symbol()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size.0, self.size.1)
    }

    pub fn output(&self) -> &Connector {
        &self.output
    }

    pub fn inputs(&self) -> &[Connector] {
        &self.inputs
    }

    pub fn connector(&self, which: ConnectorRef) -> Option<&Connector> {
        match which {
            ConnectorRef::Output => Some(&self.output),
            ConnectorRef::Input(slot) => self.inputs.get(slot),
        }
    }

    pub(crate) fn connector_mut(&mut self, which: ConnectorRef) -> Option<&mut Connector> {
        match which {
            ConnectorRef::Output => Some(&mut self.output),
            ConnectorRef::Input(slot) => self.inputs.get_mut(slot),
        }
    }

    pub fn label_anchor(&self) -> Point {
        self.label.anchor(self.position)
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
        self.recompute_connectors();
    }

    /// Regenerate connector geometry from kind, position and size.
    /// Occupancy flags are carried over slot by slot.
    pub(crate) fn recompute_connectors(&mut self) {
        let Point { x, y } = self.position;
        let (w, h) = self.size;
        let was_occupied: Vec<bool> = self.inputs.iter().map(|c| c.occupied).collect();
        let occupied_at = |slot: usize| was_occupied.get(slot).copied().unwrap_or(false);

        self.output = Connector::new(
            Point::new(x + w, y + h / 2.0),
            ConnectorRole::Output,
            self.output.occupied,
        );

        let positions: Vec<Point> = match self.kind.input_count() {
            0 => Vec::new(),
            1 => vec![Point::new(x, y + h / 2.0)],
            _ => vec![
                Point::new(x, y + DUAL_INPUT_INSET),
                Point::new(x, y + h - DUAL_INPUT_INSET),
            ],
        };
        self.inputs = positions
            .into_iter()
            .enumerate()
            .map(|(slot, p)| Connector::new(p, ConnectorRole::Input, occupied_at(slot)))
            .collect();
    }

    /// Connector under `p` within `hit_radius`; output checked before inputs.
    pub fn connector_at(&self, p: Point, hit_radius: f32) -> Option<ConnectorRef> {
        if p.distance(self.output.position) <= hit_radius {
            return Some(ConnectorRef::Output);
        }
        self.inputs
            .iter()
            .position(|c| p.distance(c.position) <= hit_radius)
            .map(ConnectorRef::Input)
    }
}

// ============================================================================
// Connections
// ============================================================================

/// Directed wire from a block's output to another block's input slot.
///
/// Endpoints are addressed by `(block, slot)`; the cached `start`/`end`
/// coordinates are refreshed from the blocks whenever either one moves.
#[derive(Clone, Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: BlockId,
    pub target: BlockId,
    pub input_slot: InputSlot,
    pub vertical_x: f32,
    pub selected: bool,
    start: Point,
    end: Point,
}

impl Connection {
    pub(crate) fn new(
        id: ConnectionId,
        source: &Block,
        target: &Block,
        input_slot: InputSlot,
        vertical_x: Option<f32>,
    ) -> Option<Self> {
        let start = source.output().position;
        let end = target.inputs().get(input_slot)?.position;
        Some(Self {
            id,
            source: source.id,
            target: target.id,
            input_slot,
            vertical_x: vertical_x.unwrap_or((start.x + end.x) / 2.0),
            selected: false,
            start,
            end,
        })
    }

    pub fn touches(&self, block: BlockId) -> bool {
        self.source == block || self.target == block
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn path(&self) -> ManhattanPath {
        ManhattanPath::new(self.start, self.vertical_x, self.end)
    }

    /// Re-read the endpoint connectors; `vertical_x` is left alone.
    pub(crate) fn refresh_endpoints(&mut self, source: &Block, target: &Block) {
        self.start = source.output().position;
        if let Some(input) = target.inputs().get(self.input_slot) {
            self.end = input.position;
        }
    }
}
