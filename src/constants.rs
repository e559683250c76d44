//! Editor-wide constants.
//!
//! Centralizes the geometry numbers the diagram model and the gesture
//! handlers share. Values that a host may want to tune at runtime are
//! mirrored in [`crate::settings::EditorSettings`]; these are the defaults.

// ============================================================================
// Grid & Canvas
// ============================================================================

/// Side length of one grid cell in pixels. Blocks occupy exactly one cell.
pub const GRID_SIZE: f32 = 60.0;

/// Default canvas width in pixels
pub const CANVAS_WIDTH: f32 = 1200.0;

/// Default canvas height in pixels
pub const CANVAS_HEIGHT: f32 = 840.0;

// ============================================================================
// Connectors
// ============================================================================

/// Visual radius of a connector dot
pub const CONNECTOR_RADIUS: f32 = 5.0;

/// Hit radius for connectors, wider than the dot to ease clicking
pub const CONNECTOR_HIT_RADIUS: f32 = 8.0;

/// Vertical inset of the two input connectors on two-input blocks
pub const DUAL_INPUT_INSET: f32 = 12.0;

// ============================================================================
// Connections
// ============================================================================

/// Perpendicular hit tolerance for selecting a connection
pub const CONNECTION_HIT_TOLERANCE: f32 = 8.0;

/// Horizontal tolerance for grabbing a vertical segment to drag it
pub const SEGMENT_GRAB_TOLERANCE: f32 = 5.0;

// ============================================================================
// Expression Labels
// ============================================================================

/// Text shown on a freshly placed block's label
pub const DEFAULT_EXPRESSION: &str = "Math Expression";

/// Horizontal distance from the block's right edge to the default label anchor
pub const LABEL_OFFSET_X: f32 = 65.0;

/// Vertical distance from the block's bottom edge to the default label anchor
pub const LABEL_OFFSET_Y: f32 = 30.0;

/// Horizontal padding around the label text for hit testing
pub const LABEL_HIT_PADDING: f32 = 5.0;

/// Approximate label text height used for hit testing
pub const LABEL_HIT_HEIGHT: f32 = 20.0;

/// Font size the label is drawn at
pub const LABEL_FONT_PX: f32 = 14.0;

/// Gap between the leader line end and the label anchor
pub const LABEL_LEADER_GAP: f32 = 5.0;

// ============================================================================
// Numbering
// ============================================================================

/// First sequence number handed out on an empty diagram
pub const FIRST_BLOCK_NUMBER: u32 = 1;
