//! Occupancy grid with a reverse placement index.
//!
//! # Architecture
//!
//! Two maps are kept in lockstep:
//!
//! - `cells`: `BTreeMap<Position, Vec<E>>`, iterated row-major so every scan
//!   over the grid is deterministic
//! - `placements`: `HashMap<E, Position>`, only ever looked up by key
//!
//! Every mutation goes through [`Grid::place`], [`Grid::remove`] or
//! [`Grid::step`], which update both maps. An entity therefore never appears
//! in two cells, and its recorded position always names a cell that lists it.
//!
//! Movement is checked against occupancy only. There is no bounds check:
//! stepping outside the generated [`Extent`](crate::Extent) lands on a cell
//! that simply has no occupants.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use tracing::trace;

use crate::{Direction, Position};

/// Error returned by [`Grid::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// The entity has no recorded position.
    #[error("entity is not placed on the grid")]
    NotPlaced,
    /// The destination cell already has occupants.
    #[error("destination {0} is occupied")]
    Blocked(Position),
}

/// Mapping from cells to the ordered entities standing on them.
///
/// `E` is a cheap handle (an id), not the entity itself.
///
/// # Example
///
/// ```
/// use skirmish_grid::{Grid, Position};
///
/// let mut grid = Grid::new();
/// grid.place(Position::new(0, 0), 'a');
/// grid.place(Position::new(0, 0), 'b');
///
/// assert_eq!(grid.occupants_at(Position::new(0, 0)), &['a', 'b']);
/// assert!(grid.remove(&'a'));
/// assert!(grid.remove(&'b'));
/// assert!(grid.is_free(Position::new(0, 0)));
/// assert_eq!(grid.cell_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Grid<E> {
    /// Occupants per cell, in insertion order.
    cells: BTreeMap<Position, Vec<E>>,
    /// Current cell of every placed entity.
    placements: HashMap<E, Position>,
}

impl<E> Default for Grid<E> {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
            placements: HashMap::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> Grid<E> {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity under a position.
    ///
    /// If the entity was already placed it is detached from its old cell
    /// first, and the old position is returned.
    ///
    /// # Arguments
    ///
    /// * `position` - Cell to place the entity in
    /// * `entity` - Entity handle
    pub fn place(&mut self, position: Position, entity: E) -> Option<Position> {
        let previous = self.detach(&entity);
        self.cells.entry(position).or_default().push(entity);
        self.placements.insert(entity, position);
        previous
    }

    /// Remove an entity from the grid.
    ///
    /// # Returns
    ///
    /// `false` if the entity was not placed.
    pub fn remove(&mut self, entity: &E) -> bool {
        self.detach(entity).is_some()
    }

    /// Current position of an entity, if placed.
    #[must_use]
    pub fn position_of(&self, entity: &E) -> Option<Position> {
        self.placements.get(entity).copied()
    }

    /// Check whether an entity is on the grid.
    #[must_use]
    pub fn contains(&self, entity: &E) -> bool {
        self.placements.contains_key(entity)
    }

    /// Entities at a position in insertion order (empty if none).
    #[must_use]
    pub fn occupants_at(&self, position: Position) -> &[E] {
        self.cells.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True iff nothing is recorded at the position.
    #[must_use]
    pub fn is_free(&self, position: Position) -> bool {
        !self.cells.contains_key(&position)
    }

    /// Move an entity one cell in a direction.
    ///
    /// Fails if the entity is not placed or the destination has any
    /// occupant. Destinations outside the generated area are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::NotPlaced`] or [`MoveError::Blocked`]; the grid
    /// is unchanged in both cases.
    pub fn step(&mut self, entity: E, direction: Direction) -> Result<Position, MoveError> {
        let from = self.position_of(&entity).ok_or(MoveError::NotPlaced)?;
        let to = from.neighbor(direction);
        if !self.is_free(to) {
            trace!(%from, %to, %direction, "step blocked");
            return Err(MoveError::Blocked(to));
        }
        self.place(to, entity);
        Ok(to)
    }

    /// Entities on cells within a Manhattan radius of `origin`.
    ///
    /// Yields `(cell, entity)` pairs in row-major cell order, then insertion
    /// order within a cell.
    pub fn within(&self, origin: Position, radius: u32) -> impl Iterator<Item = (Position, &E)> {
        let reach = i32::try_from(radius).unwrap_or(i32::MAX);
        let first = Position::new(origin.row.saturating_sub(reach), i32::MIN);
        let last = Position::new(origin.row.saturating_add(reach), i32::MAX);
        self.cells
            .range(first..=last)
            .filter(move |(cell, _)| cell.distance_to(origin) <= radius)
            .flat_map(|(cell, occupants)| occupants.iter().map(move |e| (*cell, e)))
    }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &[E])> {
        self.cells.iter().map(|(cell, occupants)| (*cell, occupants.as_slice()))
    }

    /// All placed entities in row-major cell order.
    pub fn entities(&self) -> impl Iterator<Item = &E> {
        self.cells.values().flatten()
    }

    /// Number of placed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// True if nothing is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Remove an entity from its cell and the index, pruning empty cells.
    fn detach(&mut self, entity: &E) -> Option<Position> {
        let position = self.placements.remove(entity)?;
        if let Some(occupants) = self.cells.get_mut(&position) {
            occupants.retain(|e| e != entity);
            if occupants.is_empty() {
                self.cells.remove(&position);
            }
        }
        Some(position)
    }
}
