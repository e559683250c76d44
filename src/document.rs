//! Save file format.
//!
//! A document references blocks by their position in the block list.
//! Connector geometry and occupancy are never persisted: import rebuilds
//! connectors from `(type, position)` and re-runs every connection through
//! [`DiagramGraph::connect`], so a loaded graph is valid by construction.
//!
//! Import is all-or-nothing. It builds a fresh graph; the caller swaps it in
//! only on success.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::constants::FIRST_BLOCK_NUMBER;
use crate::error::{DiagramError, DiagramResult};
use crate::geometry::{Point, is_grid_aligned};
use crate::graph::DiagramGraph;
use crate::settings::EditorSettings;
use crate::types::{BlockId, BlockKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDocument {
    pub blocks: Vec<BlockRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    #[serde(default = "first_block_number")]
    pub block_counter: u32,
}

fn first_block_number() -> u32 {
    FIRST_BLOCK_NUMBER
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Informational; the type decides
    pub symbol: String,
    /// Informational; the type decides
    pub inputs: usize,
    pub color: String,
    pub block_number: u32,
    pub expression: String,
    pub label_x: f32,
    pub label_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub source_block_index: usize,
    pub target_block_index: usize,
    pub input_index: usize,
    pub vertical_x: f32,
}

impl DiagramDocument {
    pub fn from_graph(graph: &DiagramGraph) -> Self {
        let index_of: HashMap<BlockId, usize> = graph
            .blocks()
            .iter()
            .enumerate()
            .map(|(index, b)| (b.id, index))
            .collect();

        let blocks = graph
            .blocks()
            .iter()
            .map(|b| {
                let anchor = b.label_anchor();
                BlockRecord {
                    x: b.position.x,
                    y: b.position.y,
                    width: b.size.0,
                    height: b.size.1,
                    kind: b.kind,
                    symbol: b.symbol().to_string(),
                    inputs: b.kind.input_count(),
                    color: b.color.clone(),
                    block_number: b.number,
                    expression: b.label.text.clone(),
                    label_x: anchor.x,
                    label_y: anchor.y,
                }
            })
            .collect();

        // live connections always resolve; filter_map only skips the impossible
        let connections = graph
            .connections()
            .iter()
            .filter_map(|c| {
                Some(ConnectionRecord {
                    source_block_index: *index_of.get(&c.source)?,
                    target_block_index: *index_of.get(&c.target)?,
                    input_index: c.input_slot,
                    vertical_x: c.vertical_x,
                })
            })
            .collect();

        Self {
            blocks,
            connections,
            block_counter: graph.block_counter(),
        }
    }

    /// Rebuild a graph with default settings.
    pub fn into_graph(self) -> DiagramResult<DiagramGraph> {
        self.into_graph_with(EditorSettings::default())
    }

    pub fn into_graph_with(self, settings: EditorSettings) -> DiagramResult<DiagramGraph> {
        let mut graph = DiagramGraph::with_settings(settings);
        let grid = graph.settings().grid_size;
        let mut ids = Vec::with_capacity(self.blocks.len());

        for (index, record) in self.blocks.into_iter().enumerate() {
            record.validate(index)?;
            record.warn_on_repairs(index, grid);

            let id = graph.insert_block(record.kind, Point::new(record.x, record.y), record.block_number);
            if (record.width, record.height) != graph.settings().block_size() {
                graph.resize_block(id, (record.width, record.height))?;
            }
            graph.set_block_color(id, record.color)?;
            graph.set_expression(id, record.expression)?;
            graph.set_label_position(id, Point::new(record.label_x, record.label_y))?;
            ids.push(id);
        }

        for (index, record) in self.connections.iter().enumerate() {
            let resolve = |block_index: usize| {
                ids.get(block_index).copied().ok_or_else(|| {
                    DiagramError::InvalidReference(format!(
                        "connection {index} references block index {block_index} of {}",
                        ids.len()
                    ))
                })
            };
            let source = resolve(record.source_block_index)?;
            let target = resolve(record.target_block_index)?;
            if !record.vertical_x.is_finite() {
                return Err(DiagramError::MalformedDocument(format!(
                    "connection {index} has a non-finite verticalX"
                )));
            }
            graph.connect_with(source, target, record.input_index, Some(record.vertical_x))?;
        }

        if self.block_counter == u32::MAX {
            return Err(DiagramError::MalformedDocument(format!(
                "blockCounter {} leaves no number for the next block",
                self.block_counter
            )));
        }
        // validate() keeps every number below u32::MAX
        let next_free = graph
            .blocks()
            .iter()
            .map(|b| b.number.saturating_add(1))
            .max()
            .unwrap_or(FIRST_BLOCK_NUMBER);
        graph.set_block_counter(self.block_counter.max(next_free).max(FIRST_BLOCK_NUMBER));

        graph.check_invariants()?;
        debug!(
            blocks = graph.block_count(),
            connections = graph.connection_count(),
            "Imported document"
        );
        Ok(graph)
    }

    pub fn to_json_string(&self) -> DiagramResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> DiagramResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl BlockRecord {
    fn validate(&self, index: usize) -> DiagramResult<()> {
        let position = Point::new(self.x, self.y);
        let label = Point::new(self.label_x, self.label_y);
        if !position.is_finite() || !label.is_finite() {
            return Err(DiagramError::MalformedDocument(format!(
                "block {index} has non-finite coordinates"
            )));
        }
        if self.block_number == u32::MAX {
            return Err(DiagramError::MalformedDocument(format!(
                "block {index} has out-of-range number {}",
                self.block_number
            )));
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(DiagramError::MalformedDocument(format!(
                "block {index} has invalid size {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    fn warn_on_repairs(&self, index: usize, grid: f32) {
        if self.inputs != self.kind.input_count() {
            warn!(
                index,
                kind = %self.kind,
                stored = self.inputs,
                expected = self.kind.input_count(),
                "Ignoring stored input count"
            );
        }
        if self.symbol != self.kind.symbol() {
            warn!(index, kind = %self.kind, stored = %self.symbol, "Ignoring stored symbol");
        }
        if !is_grid_aligned(self.x, grid) || !is_grid_aligned(self.y, grid) {
            warn!(index, x = self.x, y = self.y, "Snapping off-grid block");
        }
    }
}

/// Write `graph` to `path` atomically: a temp file in the same directory is
/// renamed over the target.
pub fn save_to_path(graph: &DiagramGraph, path: &Path) -> DiagramResult<()> {
    let json = DiagramDocument::from_graph(graph).to_json_string()?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| DiagramError::Io(e.error))?;

    info!(
        path = %path.display(),
        blocks = graph.block_count(),
        connections = graph.connection_count(),
        "Saved diagram"
    );
    Ok(())
}

/// Load a fresh graph from `path` with default settings.
pub fn load_from_path(path: &Path) -> DiagramResult<DiagramGraph> {
    load_from_path_with(path, EditorSettings::default())
}

pub fn load_from_path_with(path: &Path, settings: EditorSettings) -> DiagramResult<DiagramGraph> {
    let raw = std::fs::read_to_string(path)?;
    let graph = DiagramDocument::from_json_str(&raw)?.into_graph_with(settings)?;
    info!(path = %path.display(), blocks = graph.block_count(), "Loaded diagram");
    Ok(graph)
}
