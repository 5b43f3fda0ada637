//! Entities that live on the skirmish map.
//!
//! This module provides the entity types the world stores:
//! - [`EntityId`]: Stable handle, also used as the grid occupant key
//! - [`EntityTag`]: Classification (player, enemy, item)
//! - [`EntityInner`]: Type-safe storage for the per-kind components
//! - [`Entity`]: Handle + components + visibility flag
//!
//! # Architecture
//!
//! Positions are not stored here. The world's grid is the only record of
//! where an entity stands, so an entity's position can never disagree with
//! the cell that lists it.
//!
//! Fighting entities (players and enemies) expose a [`CombatState`] through
//! [`Entity::combat`]; items do not, and asking the world for an item's
//! combat state is an error.
//!
//! # Example
//!
//! ```
//! use skirmish_core::entity::{Entity, EntityId, EntityInner, EntityTag, EnemyComponents};
//! use skirmish_core::entity::{CombatState, EnemyKind};
//!
//! let orc = Entity::new(
//!     EntityId::new(3),
//!     EntityInner::Enemy(EnemyComponents::new(EnemyKind::Orc, CombatState::orc(9, 0.2), 180)),
//! );
//!
//! assert_eq!(orc.tag(), EntityTag::Enemy);
//! assert_eq!(orc.symbol(), 'O');
//! assert!(!orc.is_visible());
//! ```

pub mod archetype;
pub mod components;
pub mod inventory;
pub mod item;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use archetype::{EnemyKind, HeroClass};
pub use components::{
    AttackFamily, Capabilities, CombatState, Element, EvasionProfile, Matchup, Mitigation, Reach,
    MAX_HEALTH,
};
pub use inventory::Inventory;
pub use item::ItemKind;

/// Unique identifier for an entity.
///
/// Ids are handed out by the world in increasing order and never reused, so
/// ordering by id is ordering by creation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Wrap a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Entity classification.
///
/// The world keeps one collection per tag; the turn sequencer iterates the
/// enemy collection in insertion order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Player-controlled character
    Player,
    /// AI-controlled fighter
    Enemy,
    /// Potion, treasure, or wall
    Item,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
            Self::Item => write!(f, "Item"),
        }
    }
}

// =============================================================================
// Components
// =============================================================================

/// Components of a player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComponents {
    /// Display name
    pub name: String,
    /// Chosen class
    pub class: HeroClass,
    /// Combat record
    pub combat: CombatState,
    /// Carried items
    pub inventory: Inventory,
    /// Accumulated treasure points (never negative)
    pub treasure_points: u32,
}

impl PlayerComponents {
    /// Create a player with an empty inventory and no points.
    #[must_use]
    pub fn new(name: impl Into<String>, class: HeroClass, combat: CombatState) -> Self {
        Self {
            name: name.into(),
            class,
            combat,
            inventory: Inventory::new(),
            treasure_points: 0,
        }
    }

    /// Add `delta` to the treasure points.
    ///
    /// # Returns
    ///
    /// `false`, with the total unchanged, if the result would be negative or
    /// not fit the counter.
    pub fn update_treasure_points(&mut self, delta: i64) -> bool {
        match u32::try_from(i64::from(self.treasure_points) + delta) {
            Ok(total) => {
                self.treasure_points = total;
                true
            }
            Err(_) => false,
        }
    }
}

/// Components of an enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyComponents {
    /// Variety
    pub kind: EnemyKind,
    /// Combat record
    pub combat: CombatState,
    /// Value of the treasure dropped on death
    pub loot: u32,
}

impl EnemyComponents {
    /// Create an enemy.
    #[must_use]
    pub fn new(kind: EnemyKind, combat: CombatState, loot: u32) -> Self {
        Self { kind, combat, loot }
    }
}

/// Type-safe storage for entity-specific components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player components
    Player(PlayerComponents),
    /// Enemy components
    Enemy(EnemyComponents),
    /// Item payload
    Item(ItemKind),
}

impl EntityInner {
    /// Tag matching this storage.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Player(_) => EntityTag::Player,
            Self::Enemy(_) => EntityTag::Enemy,
            Self::Item(_) => EntityTag::Item,
        }
    }
}

// =============================================================================
// Entity
// =============================================================================

/// A stored entity.
///
/// Players start visible; enemies and items start hidden until revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
    visible: bool,
}

impl Entity {
    /// Create an entity with the default visibility for its tag.
    #[must_use]
    pub fn new(id: EntityId, inner: EntityInner) -> Self {
        let visible = inner.tag() == EntityTag::Player;
        Self { id, inner, visible }
    }

    /// Entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Entity tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// True once the entity has been revealed.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set the visibility flag.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Single-character map symbol.
    #[must_use]
    pub fn symbol(&self) -> char {
        match &self.inner {
            EntityInner::Player(player) => player.class.symbol(),
            EntityInner::Enemy(enemy) => enemy.kind.symbol(),
            EntityInner::Item(item) => item.symbol(),
        }
    }

    /// Combat record, for players and enemies.
    #[must_use]
    pub fn combat(&self) -> Option<&CombatState> {
        match &self.inner {
            EntityInner::Player(player) => Some(&player.combat),
            EntityInner::Enemy(enemy) => Some(&enemy.combat),
            EntityInner::Item(_) => None,
        }
    }

    /// Mutable combat record, for players and enemies.
    #[must_use]
    pub fn combat_mut(&mut self) -> Option<&mut CombatState> {
        match &mut self.inner {
            EntityInner::Player(player) => Some(&mut player.combat),
            EntityInner::Enemy(enemy) => Some(&mut enemy.combat),
            EntityInner::Item(_) => None,
        }
    }

    /// Player components, if this is a player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&PlayerComponents> {
        match &self.inner {
            EntityInner::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Mutable player components, if this is a player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut PlayerComponents> {
        match &mut self.inner {
            EntityInner::Player(player) => Some(player),
            _ => None,
        }
    }

    /// Enemy components, if this is an enemy.
    #[must_use]
    pub const fn as_enemy(&self) -> Option<&EnemyComponents> {
        match &self.inner {
            EntityInner::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Item payload, if this is an item.
    #[must_use]
    pub const fn as_item(&self) -> Option<ItemKind> {
        match &self.inner {
            EntityInner::Item(item) => Some(*item),
            _ => None,
        }
    }
}
