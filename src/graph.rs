//! The diagram graph - owner of all blocks and connections.
//!
//! Every mutation here is atomic with respect to the topology invariants:
//!
//! - a connector is `occupied` iff exactly one live connection references it
//! - every connection references two live blocks and a valid input slot
//! - connector geometry always matches the owning block's current position
//!
//! Connections address endpoints by `(BlockId, slot)` and blocks keep no
//! back-references; "which wires touch this block" is answered on demand.

use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace, warn};

use crate::constants::FIRST_BLOCK_NUMBER;
use crate::error::{DiagramError, DiagramResult};
use crate::geometry::{Point, is_grid_aligned, snap_to_grid};
use crate::profile_scope;
use crate::settings::EditorSettings;
use crate::spatial_index::SpatialIndex;
use crate::types::{Block, BlockId, BlockKind, Connection, ConnectionId, ConnectorRef};

/// Result of a connection hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionHit {
    pub connection: ConnectionId,
    pub on_vertical_segment: bool,
}

/// What a cascading block removal took with it.
#[derive(Debug, Clone)]
pub struct BlockRemoval {
    pub block: Block,
    pub connections: Vec<Connection>,
}

pub struct DiagramGraph {
    settings: EditorSettings,
    blocks: Vec<Block>,
    connections: Vec<Connection>,
    spatial_index: SpatialIndex,
    next_block_id: u64,
    next_connection_id: u64,
    /// Next display number; monotonic until `clear`
    block_counter: u32,
}

impl fmt::Debug for DiagramGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramGraph")
            .field("blocks", &self.blocks.len())
            .field("connections", &self.connections.len())
            .field("block_counter", &self.block_counter)
            .finish()
    }
}

impl Default for DiagramGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramGraph {
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        Self {
            settings,
            blocks: Vec::new(),
            connections: Vec::new(),
            spatial_index: SpatialIndex::new(),
            next_block_id: 0,
            next_connection_id: 0,
            block_counter: FIRST_BLOCK_NUMBER,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    // ==================== Queries ====================

    /// Blocks in insertion order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Position of the block in insertion order
    pub fn block_index(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.iter_mut().find(|c| c.id == id)
    }

    /// Every connection with `block` at either end
    pub fn connections_of(&self, block: BlockId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.touches(block))
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether there is anything to save or clear
    pub fn has_content(&self) -> bool {
        !self.blocks.is_empty() || !self.connections.is_empty()
    }

    pub fn block_counter(&self) -> u32 {
        self.block_counter
    }

    pub(crate) fn set_block_counter(&mut self, counter: u32) {
        self.block_counter = counter;
    }

    // ==================== Mutations ====================

    /// Place a new block with its top-left corner in the grid cell under
    /// `position`. Bounds checking is the caller's responsibility.
    pub fn place_block(&mut self, kind: BlockKind, position: Point) -> BlockId {
        let number = self.block_counter;
        self.block_counter = number.saturating_add(1);
        if self.block_counter == number {
            warn!(number, "Block numbering exhausted; number will repeat");
        }
        self.insert_block(kind, position, number)
    }

    pub(crate) fn insert_block(&mut self, kind: BlockKind, position: Point, number: u32) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;

        let snapped = snap_to_grid(position, self.settings.grid_size);
        let block = Block::new(id, kind, snapped, self.settings.block_size(), number);
        self.spatial_index.upsert(id, block.bounds());
        self.blocks.push(block);

        debug!(block = %id, %kind, number, x = snapped.x, y = snapped.y, "Placed block");
        id
    }

    /// Replace the size of a freshly imported block.
    pub(crate) fn resize_block(&mut self, id: BlockId, size: (f32, f32)) -> DiagramResult<()> {
        let block = self.block_mut(id).ok_or_else(|| DiagramError::missing_block(id))?;
        let old_size = block.size;
        block.size = size;
        // keep the label where it was relative to the block's right/bottom edges
        block.label.offset.0 += size.0 - old_size.0;
        block.label.offset.1 += size.1 - old_size.1;
        block.recompute_connectors();
        let bounds = block.bounds();
        self.spatial_index.upsert(id, bounds);
        self.refresh_connections_of(id);
        Ok(())
    }

    /// Move a block to the grid cell under `position`. Connector geometry
    /// and the endpoints of touching connections follow; occupancy and
    /// `vertical_x` do not change.
    pub fn move_block(&mut self, id: BlockId, position: Point) -> DiagramResult<()> {
        let snapped = snap_to_grid(position, self.settings.grid_size);
        let block = self.block_mut(id).ok_or_else(|| DiagramError::missing_block(id))?;
        if block.position == snapped {
            return Ok(());
        }
        block.set_position(snapped);
        let bounds = block.bounds();
        self.spatial_index.upsert(id, bounds);
        self.refresh_connections_of(id);

        trace!(block = %id, x = snapped.x, y = snapped.y, "Moved block");
        Ok(())
    }

    fn refresh_connections_of(&mut self, id: BlockId) {
        let Self {
            blocks,
            connections,
            ..
        } = self;
        for conn in connections.iter_mut().filter(|c| c.touches(id)) {
            let source = blocks.iter().find(|b| b.id == conn.source);
            let target = blocks.iter().find(|b| b.id == conn.target);
            if let (Some(source), Some(target)) = (source, target) {
                conn.refresh_endpoints(source, target);
            }
        }
    }

    /// Wire `source`'s output into input `slot` of `target`.
    ///
    /// The vertical segment starts at the midpoint of the two endpoints.
    pub fn connect(
        &mut self,
        source: BlockId,
        target: BlockId,
        slot: usize,
    ) -> DiagramResult<ConnectionId> {
        self.connect_with(source, target, slot, None)
    }

    pub(crate) fn connect_with(
        &mut self,
        source: BlockId,
        target: BlockId,
        slot: usize,
        vertical_x: Option<f32>,
    ) -> DiagramResult<ConnectionId> {
        if source == target {
            return Err(DiagramError::SelfLoop(source));
        }
        let source_block = self.block(source).ok_or_else(|| DiagramError::missing_block(source))?;
        let target_block = self.block(target).ok_or_else(|| DiagramError::missing_block(target))?;

        let Some(input) = target_block.inputs().get(slot) else {
            return Err(DiagramError::InvalidReference(format!(
                "block {target} ({}) has no input slot {slot}",
                target_block.kind
            )));
        };
        if input.occupied {
            return Err(DiagramError::ConnectorOccupied {
                block: target,
                connector: ConnectorRef::Input(slot).to_string(),
            });
        }
        if source_block.output().occupied {
            return Err(DiagramError::ConnectorOccupied {
                block: source,
                connector: ConnectorRef::Output.to_string(),
            });
        }

        let id = ConnectionId(self.next_connection_id);
        let connection = Connection::new(id, source_block, target_block, slot, vertical_x)
            .ok_or_else(|| DiagramError::InvalidReference(format!("input slot {slot}")))?;
        self.next_connection_id += 1;

        self.set_occupied(source, ConnectorRef::Output, true);
        self.set_occupied(target, ConnectorRef::Input(slot), true);
        self.connections.push(connection);

        debug!(connection = %id, %source, %target, slot, "Connected");
        Ok(id)
    }

    fn set_occupied(&mut self, block: BlockId, which: ConnectorRef, occupied: bool) {
        match self.block_mut(block).and_then(|b| b.connector_mut(which)) {
            Some(connector) => connector.occupied = occupied,
            None => warn!(%block, connector = %which, "Connector vanished while updating occupancy"),
        }
    }

    /// Remove a connection and release both of its connectors.
    pub fn disconnect(&mut self, id: ConnectionId) -> DiagramResult<Connection> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DiagramError::missing_connection(id))?;
        let connection = self.connections.remove(index);

        self.set_occupied(connection.source, ConnectorRef::Output, false);
        self.set_occupied(connection.target, ConnectorRef::Input(connection.input_slot), false);

        debug!(connection = %id, "Disconnected");
        Ok(connection)
    }

    /// Remove a block together with every connection touching it.
    pub fn remove_block(&mut self, id: BlockId) -> DiagramResult<BlockRemoval> {
        let index = self
            .block_index(id)
            .ok_or_else(|| DiagramError::missing_block(id))?;

        let touching: Vec<ConnectionId> = self.connections_of(id).map(|c| c.id).collect();
        let mut connections = Vec::with_capacity(touching.len());
        for conn_id in touching {
            connections.push(self.disconnect(conn_id)?);
        }

        let block = self.blocks.remove(index);
        self.spatial_index.remove(id);

        debug!(block = %id, cascaded = connections.len(), "Removed block");
        Ok(BlockRemoval { block, connections })
    }

    /// Move a connection's vertical segment. No collision rules apply.
    pub fn set_connection_vertical_x(&mut self, id: ConnectionId, x: f32) -> DiagramResult<()> {
        let conn = self
            .connection_mut(id)
            .ok_or_else(|| DiagramError::missing_connection(id))?;
        conn.vertical_x = x;
        Ok(())
    }

    pub fn set_expression(&mut self, id: BlockId, text: impl Into<String>) -> DiagramResult<()> {
        let block = self.block_mut(id).ok_or_else(|| DiagramError::missing_block(id))?;
        block.label.text = text.into();
        Ok(())
    }

    /// Place the label anchor at an absolute canvas position (never snapped).
    pub fn set_label_position(&mut self, id: BlockId, anchor: Point) -> DiagramResult<()> {
        let block = self.block_mut(id).ok_or_else(|| DiagramError::missing_block(id))?;
        let offset = anchor.minus(block.position);
        block.label.offset = (offset.x, offset.y);
        Ok(())
    }

    pub fn set_block_color(&mut self, id: BlockId, color: impl Into<String>) -> DiagramResult<()> {
        let block = self.block_mut(id).ok_or_else(|| DiagramError::missing_block(id))?;
        block.color = color.into();
        Ok(())
    }

    /// Drop everything and restart numbering.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.connections.clear();
        self.spatial_index.clear();
        self.block_counter = FIRST_BLOCK_NUMBER;
        debug!("Cleared diagram");
    }

    // ==================== Selection ====================

    /// Select exactly this block; any other selection is cleared.
    pub fn select_block(&mut self, id: BlockId) {
        self.clear_selection();
        if let Some(block) = self.block_mut(id) {
            block.selected = true;
        }
    }

    /// Select exactly this connection; any other selection is cleared.
    pub fn select_connection(&mut self, id: ConnectionId) {
        self.clear_selection();
        if let Some(conn) = self.connection_mut(id) {
            conn.selected = true;
        }
    }

    pub fn clear_selection(&mut self) {
        self.blocks.iter_mut().for_each(|b| b.selected = false);
        self.connections.iter_mut().for_each(|c| c.selected = false);
    }

    pub fn selected_block(&self) -> Option<BlockId> {
        self.blocks.iter().find(|b| b.selected).map(|b| b.id)
    }

    pub fn selected_connection(&self) -> Option<ConnectionId> {
        self.connections.iter().find(|c| c.selected).map(|c| c.id)
    }

    // ==================== Hit Testing ====================

    /// Connector within the hit radius of `p`, scanning blocks in insertion
    /// order and, per block, the output before the inputs.
    pub fn hit_test_connector(&self, p: Point) -> Option<(BlockId, ConnectorRef)> {
        profile_scope!("hit_test_connector");
        let radius = self.settings.connector_hit_radius;
        self.blocks
            .iter()
            .find_map(|b| b.connector_at(p, radius).map(|which| (b.id, which)))
    }

    /// Topmost (most recently placed) block containing `p`.
    pub fn hit_test_block(&self, p: Point) -> Option<BlockId> {
        profile_scope!("hit_test_block");
        let candidates = self.spatial_index.query_point(p);
        if candidates.is_empty() {
            return None;
        }
        self.blocks
            .iter()
            .rev()
            .find(|b| candidates.contains(&b.id))
            .map(|b| b.id)
    }

    /// Vertical segment close enough to `p` to start dragging it. Tighter
    /// than the selection tolerance.
    pub fn hit_test_vertical_segment(&self, p: Point) -> Option<ConnectionId> {
        profile_scope!("hit_test_vertical_segment");
        let tolerance = self.settings.segment_grab_tolerance;
        self.connections
            .iter()
            .find(|c| c.path().hits_vertical(p, tolerance))
            .map(|c| c.id)
    }

    /// Connection under `p`. A vertical-segment hit on any connection wins
    /// over a horizontal-stub hit on another.
    pub fn hit_test_connection_segment(&self, p: Point) -> Option<ConnectionHit> {
        profile_scope!("hit_test_connection_segment");
        let tolerance = self.settings.connection_hit_tolerance;
        if let Some(conn) = self
            .connections
            .iter()
            .find(|c| c.path().hits_vertical(p, tolerance))
        {
            return Some(ConnectionHit {
                connection: conn.id,
                on_vertical_segment: true,
            });
        }
        self.connections
            .iter()
            .find(|c| c.path().hits_horizontal(p, tolerance))
            .map(|c| ConnectionHit {
                connection: c.id,
                on_vertical_segment: false,
            })
    }

    // ==================== Invariants ====================

    /// Recompute everything derivable and report each disagreement with the
    /// stored state. Empty means the graph is well-formed.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut references: HashMap<(BlockId, ConnectorRef), usize> = HashMap::new();

        for conn in &self.connections {
            let (Some(source), Some(target)) = (self.block(conn.source), self.block(conn.target))
            else {
                violations.push(format!("connection {} references a missing block", conn.id));
                continue;
            };
            if conn.source == conn.target {
                violations.push(format!("connection {} is a self-loop", conn.id));
            }
            let Some(input) = target.inputs().get(conn.input_slot) else {
                violations.push(format!(
                    "connection {} targets missing slot {}",
                    conn.id, conn.input_slot
                ));
                continue;
            };
            if conn.start() != source.output().position || conn.end() != input.position {
                violations.push(format!("connection {} has stale endpoints", conn.id));
            }
            *references.entry((conn.source, ConnectorRef::Output)).or_default() += 1;
            *references
                .entry((conn.target, ConnectorRef::Input(conn.input_slot)))
                .or_default() += 1;
        }

        let mut numbers = HashMap::new();
        for block in &self.blocks {
            if let Some(previous) = numbers.insert(block.number, block.id) {
                violations.push(format!(
                    "blocks {previous} and {} share number {}",
                    block.id, block.number
                ));
            }
            let grid = self.settings.grid_size;
            if !is_grid_aligned(block.position.x, grid) || !is_grid_aligned(block.position.y, grid) {
                violations.push(format!("block {} is off-grid", block.id));
            }

            let mut fresh = block.clone();
            fresh.recompute_connectors();
            let slots = std::iter::once(ConnectorRef::Output)
                .chain((0..block.inputs().len()).map(ConnectorRef::Input));
            for which in slots {
                let (Some(stored), Some(expected)) = (block.connector(which), fresh.connector(which))
                else {
                    continue;
                };
                if stored.position != expected.position {
                    violations.push(format!("block {} {which} is stale", block.id));
                }
                let count = references.get(&(block.id, which)).copied().unwrap_or(0);
                if count > 1 {
                    violations.push(format!(
                        "block {} {which} is referenced by {count} connections",
                        block.id
                    ));
                }
                if stored.occupied != (count == 1) {
                    violations.push(format!(
                        "block {} {which} occupied={} but has {count} connections",
                        block.id, stored.occupied
                    ));
                }
            }
        }

        if self.spatial_index.len() != self.blocks.len() {
            violations.push("spatial index out of sync".to_string());
        }

        violations
    }

    /// `Err` with every violation joined when the graph is not well-formed.
    pub fn check_invariants(&self) -> DiagramResult<()> {
        let violations = self.invariant_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DiagramError::MalformedDocument(violations.join("; ")))
        }
    }
}
