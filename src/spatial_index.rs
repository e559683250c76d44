//! Spatial Index Module
//!
//! R-tree over block bounding boxes so block hit testing is O(log n) for
//! point queries. The graph keeps it in sync on every place, move and remove.

use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

use crate::geometry::{Point, Rect};
use crate::types::BlockId;

/// A spatial entry representing one block's bounding box.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub block: BlockId,
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl SpatialEntry {
    pub fn new(block: BlockId, bounds: Rect) -> Self {
        Self {
            block,
            min_x: bounds.origin.x,
            min_y: bounds.origin.y,
            max_x: bounds.max_x(),
            max_y: bounds.max_y(),
        }
    }

    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PartialEq for SpatialEntry {
    fn eq(&self, other: &Self) -> bool {
        self.block == other.block
    }
}

pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
    entries: HashMap<BlockId, SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            entries: HashMap::new(),
        }
    }

    /// Insert or replace the entry for `block`.
    pub fn upsert(&mut self, block: BlockId, bounds: Rect) {
        if let Some(old_entry) = self.entries.remove(&block) {
            self.tree.remove(&old_entry);
        }

        let entry = SpatialEntry::new(block, bounds);
        self.tree.insert(entry);
        self.entries.insert(block, entry);
    }

    pub fn remove(&mut self, block: BlockId) -> bool {
        if let Some(entry) = self.entries.remove(&block) {
            self.tree.remove(&entry);
            true
        } else {
            false
        }
    }

    /// All blocks whose bounds contain `p`, in no particular order.
    pub fn query_point(&self, p: Point) -> Vec<BlockId> {
        let point_envelope = AABB::from_point([p.x, p.y]);

        self.tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.contains_point(p.x, p.y))
            .map(|entry| entry.block)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.entries.clear();
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
