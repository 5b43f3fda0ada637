//! Results and events produced by combat and turn processing.
//!
//! Nothing in this module is an error. Evasions, misses, out-of-range
//! attempts and blocked moves are ordinary outcomes; they are returned as
//! values and recorded as [`Event`]s so that a presenter can narrate them.
//!
//! # Types
//!
//! - [`Engagement`]: what one dispatch call did
//! - [`Defeat`]: who died, and what they leave behind
//! - [`Event`]: the session's narration stream
//! - [`TurnOutcome`]: whether the session continues

use serde::{Deserialize, Serialize};
use skirmish_grid::{Direction, Position};

use crate::command::PotionSlot;
use crate::entity::{EnemyKind, EntityId, ItemKind};

// =============================================================================
// Attack results
// =============================================================================

/// Fighting style used for an attack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    /// Adjacent physical attack
    Melee,
    /// Shot or spell at range
    Ranged,
}

/// Outcome of a single dispatch call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Damage was applied.
    Hit {
        /// Damage subtracted from health
        amount: i32,
        /// Whether the strike was doubled
        critical: bool,
        /// Defender health afterwards
        remaining: i32,
    },
    /// The defender dodged.
    Evaded,
    /// The attacker's accuracy check failed.
    Missed,
    /// No style applies at this distance.
    OutOfRange {
        /// Manhattan distance between the two
        distance: u32,
    },
    /// The defender was already dead; nothing happened.
    TargetDefeated,
    /// The attacker is dead and cannot act.
    AttackerDefeated,
}

impl AttackOutcome {
    /// True if an attack was attempted (hit, evaded or missed).
    #[must_use]
    pub const fn attacked(self) -> bool {
        matches!(self, Self::Hit { .. } | Self::Evaded | Self::Missed)
    }

    /// True if repeating the attack could eventually change health.
    ///
    /// Accuracy misses are deterministic, so they never progress.
    #[must_use]
    pub const fn can_progress(self) -> bool {
        matches!(self, Self::Hit { .. } | Self::Evaded)
    }
}

/// Treasure left behind by a defeated enemy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loot {
    /// Where the enemy fell
    pub position: Position,
    /// Treasure value
    pub value: u32,
}

/// A combatant died from an attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Defeat {
    /// An enemy died and drops loot.
    Enemy {
        /// Defeated enemy
        enemy: EntityId,
        /// Its variety
        kind: EnemyKind,
        /// What it leaves behind
        loot: Loot,
    },
    /// The player died; the session is over.
    Player {
        /// Defeated player
        player: EntityId,
        /// Player name
        name: String,
        /// Points collected before death
        treasure_points: u32,
    },
}

/// Everything one dispatch call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    /// Acting entity
    pub attacker: EntityId,
    /// Target entity
    pub defender: EntityId,
    /// Style used, if any attack was attempted
    pub style: Option<Style>,
    /// What happened
    pub outcome: AttackOutcome,
    /// Set if this call killed the defender
    pub defeat: Option<Defeat>,
}

// =============================================================================
// Events
// =============================================================================

/// Narration of a session, in order of occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// The player starts fighting a visible enemy.
    EngagementStarted {
        /// Enemy engaged
        enemy: EntityId,
        /// Its variety
        kind: EnemyKind,
    },
    /// An attack landed.
    DamageDealt {
        /// Acting entity
        attacker: EntityId,
        /// Damaged entity
        defender: EntityId,
        /// Style used
        style: Style,
        /// Damage applied
        amount: i32,
        /// Whether it was a critical hit
        critical: bool,
        /// Defender health afterwards
        remaining: i32,
    },
    /// The defender dodged.
    AttackEvaded {
        /// Acting entity
        attacker: EntityId,
        /// Dodging entity
        defender: EntityId,
        /// Style used
        style: Style,
    },
    /// The attacker's accuracy check failed.
    AttackMissed {
        /// Acting entity
        attacker: EntityId,
        /// Intended target
        defender: EntityId,
    },
    /// The attacker had no style for this distance.
    OutOfRange {
        /// Acting entity
        attacker: EntityId,
        /// Intended target
        defender: EntityId,
        /// Distance between them
        distance: u32,
    },
    /// An enemy died.
    EnemyDefeated {
        /// Defeated enemy
        enemy: EntityId,
        /// Its variety
        kind: EnemyKind,
    },
    /// The player died.
    PlayerDefeated {
        /// Defeated player
        player: EntityId,
        /// Player name
        name: String,
        /// Points collected
        treasure_points: u32,
    },
    /// Loot materialized as a visible treasure item.
    LootDropped {
        /// The new treasure item
        item: EntityId,
        /// Where it lies
        position: Position,
        /// Its value
        value: u32,
    },
    /// Neither side could ever land a blow, so the fight was abandoned.
    Stalemate {
        /// Enemy left standing
        enemy: EntityId,
    },
    /// The player moved.
    Moved {
        /// Moving entity
        entity: EntityId,
        /// Direction taken
        direction: Direction,
        /// New position
        to: Position,
    },
    /// The player tried to move into an occupied cell.
    MoveBlocked {
        /// Moving entity
        entity: EntityId,
        /// Direction attempted
        direction: Direction,
        /// Occupied destination
        to: Position,
    },
    /// A potion was drunk.
    PotionUsed {
        /// Slot requested
        slot: PotionSlot,
        /// Potion consumed
        item: ItemKind,
        /// Health afterwards
        health: i32,
        /// Power afterwards
        power: i32,
    },
    /// No potion of the requested kind was carried.
    PotionMissing {
        /// Slot requested
        slot: PotionSlot,
    },
    /// Adjacent visible items were collected.
    ItemsLooted {
        /// Items taken off the map
        taken: Vec<ItemKind>,
    },
    /// The player asked for their stats.
    StatsInspected {
        /// Player name
        name: String,
        /// Current health
        health: i32,
        /// Current power
        power: i32,
        /// Treasure points
        treasure_points: u32,
        /// Number of carried items
        inventory: usize,
    },
    /// Input did not parse as a command; the action was forfeited.
    CommandRejected {
        /// Raw input
        input: String,
        /// Parser message
        reason: String,
    },
    /// The player ended the session.
    SessionEnded {
        /// Final health
        health: i32,
        /// Final power
        power: i32,
        /// Final treasure points
        treasure_points: u32,
    },
}

impl Event {
    /// True for events that end the session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::PlayerDefeated { .. } | Self::SessionEnded { .. })
    }
}

/// What happens after a turn or command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Play another turn.
    Continue,
    /// The player died.
    GameOver,
    /// The player ended the session.
    Exit,
}

impl TurnOutcome {
    /// True if no further turns may be played.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }
}
