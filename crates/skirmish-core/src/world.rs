//! World context owning the grid and every entity collection.
//!
//! The World is the container for one game session. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - The occupancy [`Grid`] keyed by [`EntityId`]
//! - Per-tag collections in insertion order (players, enemies, items)
//! - Entity lifecycle management (spawn/despawn)
//!
//! # Architecture
//!
//! The grid is the single source of truth for positions. Spawning places the
//! entity, despawning removes it from the grid and from its collection in one
//! step, so no collection ever holds an id the grid has forgotten.
//!
//! Lookups that the turn sequencer relies on return [`WorldError`] rather than
//! `Option`: asking for an unknown id or the combat record of an item means
//! the caller's contract was broken, which is distinct from normal game
//! outcomes like a blocked move.
//!
//! # Example
//!
//! ```
//! use skirmish_core::entity::{CombatState, EntityInner, HeroClass, PlayerComponents};
//! use skirmish_core::World;
//! use skirmish_grid::{Extent, Position};
//!
//! let mut world = World::new(Extent::new(10, 10));
//! let hero = world.spawn(
//!     Position::new(4, 4),
//!     EntityInner::Player(PlayerComponents::new("Rin", HeroClass::Warrior, CombatState::warrior(8, 40))),
//! );
//!
//! assert_eq!(world.position_of(hero).unwrap(), Position::new(4, 4));
//! assert_eq!(world.visible_symbol_at(Position::new(4, 4)), Some('W'));
//! ```

use std::collections::BTreeMap;

use skirmish_grid::{Direction, Extent, Grid, MoveError, Position};
use tracing::debug;

use crate::entity::{CombatState, Entity, EntityId, EntityInner, EntityTag, PlayerComponents};

/// Radius used when revealing around the player.
pub const REVEAL_RADIUS: u32 = 2;

/// Broken caller contract when addressing entities in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// No entity with this id exists.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    /// The entity exists but has no recorded position.
    #[error("entity {0} has no recorded position")]
    Unplaced(EntityId),
    /// The entity cannot fight.
    #[error("entity {0} is not a combatant")]
    NotACombatant(EntityId),
    /// The entity has a different tag than required.
    #[error("entity {id} is a {found}, expected a {expected}")]
    UnexpectedTag {
        /// Offending entity
        id: EntityId,
        /// Tag the caller required
        expected: EntityTag,
        /// Tag the entity has
        found: EntityTag,
    },
}

/// Container for every entity in a session.
#[derive(Debug, Clone)]
pub struct World {
    /// Generated area (rendering and setup only).
    extent: Extent,
    /// Next id to hand out.
    next_id: u64,
    /// All entities by id.
    entities: BTreeMap<EntityId, Entity>,
    /// Where each entity stands.
    grid: Grid<EntityId>,
    /// Player ids in insertion order.
    players: Vec<EntityId>,
    /// Active enemy ids in insertion order.
    enemies: Vec<EntityId>,
    /// Item ids in insertion order.
    items: Vec<EntityId>,
}

impl World {
    /// Create an empty world over an extent.
    #[must_use]
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            next_id: 0,
            entities: BTreeMap::new(),
            grid: Grid::new(),
            players: Vec::new(),
            enemies: Vec::new(),
            items: Vec::new(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create an entity and place it on the grid.
    ///
    /// # Returns
    ///
    /// The new entity's id.
    pub fn spawn(&mut self, position: Position, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        match inner.tag() {
            EntityTag::Player => self.players.push(id),
            EntityTag::Enemy => self.enemies.push(id),
            EntityTag::Item => self.items.push(id),
        }
        self.entities.insert(id, Entity::new(id, inner));
        self.grid.place(position, id);
        debug!(%id, %position, "spawned");
        id
    }

    /// Remove an entity from the grid, its collection, and storage.
    ///
    /// # Returns
    ///
    /// The removed entity, or `None` if the id was unknown.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.grid.remove(&id);
        let collection = match entity.tag() {
            EntityTag::Player => &mut self.players,
            EntityTag::Enemy => &mut self.enemies,
            EntityTag::Item => &mut self.items,
        };
        collection.retain(|other| *other != id);
        debug!(%id, "despawned");
        Some(entity)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable entity by id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Entity by id, failing loudly if unknown.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] if no such entity exists.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, WorldError> {
        self.get(id).ok_or(WorldError::UnknownEntity(id))
    }

    /// Mutable entity by id, failing loudly if unknown.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] if no such entity exists.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, WorldError> {
        self.get_mut(id).ok_or(WorldError::UnknownEntity(id))
    }

    /// Combat record of a player or enemy.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] or [`WorldError::NotACombatant`].
    pub fn combatant(&self, id: EntityId) -> Result<&CombatState, WorldError> {
        self.entity(id)?.combat().ok_or(WorldError::NotACombatant(id))
    }

    /// Mutable combat record of a player or enemy.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] or [`WorldError::NotACombatant`].
    pub fn combatant_mut(&mut self, id: EntityId) -> Result<&mut CombatState, WorldError> {
        self.entity_mut(id)?
            .combat_mut()
            .ok_or(WorldError::NotACombatant(id))
    }

    /// Check that an entity exists and has the given tag.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] or [`WorldError::UnexpectedTag`].
    pub fn expect_tag(&self, id: EntityId, expected: EntityTag) -> Result<&Entity, WorldError> {
        let entity = self.entity(id)?;
        if entity.tag() == expected {
            Ok(entity)
        } else {
            Err(WorldError::UnexpectedTag {
                id,
                expected,
                found: entity.tag(),
            })
        }
    }

    /// Player components of a player entity.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] or [`WorldError::UnexpectedTag`].
    pub fn player(&self, id: EntityId) -> Result<&PlayerComponents, WorldError> {
        self.expect_tag(id, EntityTag::Player)?
            .as_player()
            .ok_or(WorldError::UnknownEntity(id))
    }

    /// Mutable player components of a player entity.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] or [`WorldError::UnexpectedTag`].
    pub fn player_mut(&mut self, id: EntityId) -> Result<&mut PlayerComponents, WorldError> {
        let entity = self.entity_mut(id)?;
        let found = entity.tag();
        entity.as_player_mut().ok_or(WorldError::UnexpectedTag {
            id,
            expected: EntityTag::Player,
            found,
        })
    }

    /// Current position of an entity.
    ///
    /// # Errors
    ///
    /// [`WorldError::Unplaced`] if the entity is not on the grid.
    pub fn position_of(&self, id: EntityId) -> Result<Position, WorldError> {
        self.grid.position_of(&id).ok_or(WorldError::Unplaced(id))
    }

    /// Manhattan distance between two placed entities.
    ///
    /// # Errors
    ///
    /// [`WorldError::Unplaced`] if either entity is off the grid.
    pub fn distance_between(&self, a: EntityId, b: EntityId) -> Result<u32, WorldError> {
        Ok(self.position_of(a)?.distance_to(self.position_of(b)?))
    }

    // =========================================================================
    // Grid access
    // =========================================================================

    /// Generated extent.
    #[must_use]
    pub const fn extent(&self) -> Extent {
        self.extent
    }

    /// Read-only grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid<EntityId> {
        &self.grid
    }

    /// Entities at a position in display-priority order.
    #[must_use]
    pub fn occupants_at(&self, position: Position) -> &[EntityId] {
        self.grid.occupants_at(position)
    }

    /// True iff nothing stands at the position.
    #[must_use]
    pub fn is_free(&self, position: Position) -> bool {
        self.grid.is_free(position)
    }

    /// Move an entity one cell.
    ///
    /// # Errors
    ///
    /// [`MoveError`] if the entity is unplaced or the destination is occupied.
    pub fn move_entity(&mut self, id: EntityId, direction: Direction) -> Result<Position, MoveError> {
        self.grid.step(id, direction)
    }

    /// Put an existing entity at a position (moving it if already placed).
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownEntity`] if the id is not stored.
    pub fn place(&mut self, id: EntityId, position: Position) -> Result<(), WorldError> {
        self.entity(id)?;
        self.grid.place(position, id);
        Ok(())
    }

    /// Mark every entity within `radius` of `origin` visible.
    ///
    /// Visibility is never cleared.
    ///
    /// # Returns
    ///
    /// Ids that became visible on this call, in row-major order.
    pub fn reveal_nearby(&mut self, origin: Position, radius: u32) -> Vec<EntityId> {
        let nearby: Vec<EntityId> = self.grid.within(origin, radius).map(|(_, id)| *id).collect();
        let mut revealed = Vec::new();
        for id in nearby {
            if let Some(entity) = self.entities.get_mut(&id) {
                if !entity.is_visible() {
                    entity.set_visible(true);
                    revealed.push(id);
                }
            }
        }
        if !revealed.is_empty() {
            debug!(%origin, count = revealed.len(), "revealed");
        }
        revealed
    }

    /// Symbol of the first visible occupant at a position.
    #[must_use]
    pub fn visible_symbol_at(&self, position: Position) -> Option<char> {
        self.occupants_at(position)
            .iter()
            .filter_map(|id| self.entities.get(id))
            .find(|entity| entity.is_visible())
            .map(Entity::symbol)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Player ids in insertion order.
    #[must_use]
    pub fn players(&self) -> &[EntityId] {
        &self.players
    }

    /// Active enemy ids in insertion order.
    #[must_use]
    pub fn enemies(&self) -> &[EntityId] {
        &self.enemies
    }

    /// Item ids in insertion order.
    #[must_use]
    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    /// All entities sorted by id.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
