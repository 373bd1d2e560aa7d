//! Build-time configuration for the world tree.

use crate::{Result, WorldTreeError};

/// Default maximum tree depth. Leaves never sit deeper than `MAX_DEPTH - 1`.
pub const MAX_DEPTH: u16 = 12;

/// Largest accepted `max_depth`. Construction and traversal recurse once per level.
pub const MAX_DEPTH_LIMIT: u16 = 64;

/// Default triangle count at or below which a node becomes a leaf.
pub const LEAF_THRESHOLD: usize = 20;

/// Controls how the partition builder subdivides and what ingestion accepts.
///
/// All fields fall back to their defaults when deserialized from a partial
/// document (with the `serde` feature enabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldTreeConfig {
    /// Number of tree levels; a node at depth `max_depth - 1` is always a leaf.
    pub max_depth: u16,
    /// Nodes holding this many triangles or fewer become leaves.
    pub leaf_threshold: usize,
    /// Reject zero-area and non-finite triangles in `add_triangles`.
    pub reject_degenerate: bool,
}

impl Default for WorldTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            leaf_threshold: LEAF_THRESHOLD,
            reject_degenerate: false,
        }
    }
}

impl WorldTreeConfig {
    /// Checks that the configuration can produce a tree.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DEPTH_LIMIT).contains(&self.max_depth) {
            return Err(WorldTreeError::InvalidConfig(format!(
                "max_depth must be between 1 and {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        Ok(())
    }

    /// Returns `true` if a node at `depth` holding `triangle_count` triangles
    /// must become a leaf.
    #[inline]
    pub fn is_leaf(&self, depth: u16, triangle_count: usize) -> bool {
        depth >= self.max_depth.saturating_sub(1) || triangle_count <= self.leaf_threshold
    }
}
