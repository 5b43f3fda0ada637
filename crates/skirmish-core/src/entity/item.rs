//! Items found on the map and carried in inventories.
//!
//! The turn sequencer treats items as opaque: it asks an item to
//! [`ItemKind::pick_up`] and removes it from the world on success. What an
//! item actually does (heal, boost, award points) is decided here.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::archetype::LOOT_RANGE;
use super::PlayerComponents;

/// Health restored by a healing potion.
pub const POTION_RESTORE_RANGE: RangeInclusive<i32> = 10..=50;

/// Power granted by a power potion.
pub const POWER_BOOST_RANGE: RangeInclusive<i32> = 1..=5;

/// Item variety and its payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores health when drunk
    Potion {
        /// Health restored
        restore: i32,
    },
    /// Raises power when drunk
    PowerPotion {
        /// Power added
        boost: i32,
    },
    /// Dropped by defeated enemies
    Treasure {
        /// Points awarded on the points roll
        value: u32,
    },
    /// Blocks a cell and cannot be picked up
    Wall,
}

impl ItemKind {
    /// Roll a healing potion.
    pub fn roll_potion<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::Potion {
            restore: rng.gen_range(POTION_RESTORE_RANGE),
        }
    }

    /// Roll a power potion.
    pub fn roll_power_potion<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::PowerPotion {
            boost: rng.gen_range(POWER_BOOST_RANGE),
        }
    }

    /// Map symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Potion { .. } => 'P',
            Self::PowerPotion { .. } => '+',
            Self::Treasure { .. } => 'T',
            Self::Wall => '#',
        }
    }

    /// Short name for messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Potion { .. } => "Health potion",
            Self::PowerPotion { .. } => "Power potion",
            Self::Treasure { .. } => "Treasure",
            Self::Wall => "Wall",
        }
    }

    /// True for items that go into an inventory and can be drunk later.
    #[must_use]
    pub const fn is_potion(self) -> bool {
        matches!(self, Self::Potion { .. } | Self::PowerPotion { .. })
    }

    /// Hand this item to a player.
    ///
    /// Potions go into the inventory. Treasure is opened on the spot with a
    /// d6: 0 yields a power potion, 1-3 award a fresh [`LOOT_RANGE`] roll in
    /// points, 4-5 yield a healing potion. The dropped value is only what
    /// the map advertised. Walls cannot be picked up.
    ///
    /// # Returns
    ///
    /// `true` if the item was taken and should leave the map.
    pub fn pick_up<R: Rng + ?Sized>(self, player: &mut PlayerComponents, rng: &mut R) -> bool {
        match self {
            Self::Potion { .. } | Self::PowerPotion { .. } => {
                player.inventory.add(self);
                true
            }
            Self::Treasure { .. } => {
                match rng.gen_range(0..6) {
                    0 => player.inventory.add(Self::roll_power_potion(rng)),
                    1..=3 => {
                        let points = rng.gen_range(LOOT_RANGE);
                        player.update_treasure_points(i64::from(points));
                    }
                    _ => player.inventory.add(Self::roll_potion(rng)),
                }
                true
            }
            Self::Wall => false,
        }
    }

    /// Apply a potion's effect to a player.
    ///
    /// Healing is limited to the missing health; power has no ceiling.
    ///
    /// # Returns
    ///
    /// `false` if this item is not drinkable.
    pub fn drink(self, player: &mut PlayerComponents) -> bool {
        match self {
            Self::Potion { restore } => {
                let missing = super::components::MAX_HEALTH - player.combat.health();
                player.combat.heal(restore.min(missing));
                true
            }
            Self::PowerPotion { boost } => {
                let power = player.combat.power().saturating_add(boost);
                player.combat.set_power(power);
                true
            }
            Self::Treasure { .. } | Self::Wall => false,
        }
    }
}
