//! State hashing for determinism verification.
//!
//! Two grids built by the same sequence of placements and steps hash
//! identically. Session replays compare these hashes to confirm that a seed
//! reproduces the same world.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::Grid;

/// Compute a deterministic hash of grid occupancy.
///
/// This hash includes:
/// - Every occupied cell, in row-major order
/// - The occupants of each cell, in insertion order
#[must_use]
pub fn hash_grid<E: Copy + Eq + Hash>(grid: &Grid<E>) -> u64 {
    let mut hasher = DefaultHasher::new();

    grid.len().hash(&mut hasher);

    for (cell, occupants) in grid.cells() {
        cell.hash(&mut hasher);
        occupants.len().hash(&mut hasher);
        for occupant in occupants {
            occupant.hash(&mut hasher);
        }
    }

    hasher.finish()
}
