//! Combat components shared by every fighting entity.
//!
//! A fighter is one [`CombatState`] record plus a [`Capabilities`] set. The
//! set decides which attacks are legal (melee and/or ranged) and which damage
//! family they use (physical and/or magic). Variant-specific behaviour is data
//! carried in the record rather than a subtype:
//!
//! - [`EvasionProfile`]: flat chance or agility-scaled chance
//! - [`Reach`]: the ranged in-range predicate
//! - [`Mitigation`]: defender-side armor or magic resistance
//!
//! The damage pipeline that consumes these lives in
//! [`crate::resolver::damage`].

use bitflags::bitflags;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for health after any heal or explicit set.
pub const MAX_HEALTH: i32 = 100;

/// Evasion chance for fighters without a special evasion profile.
pub const BASE_EVASION: f64 = 0.25;

/// Critical chance for the common physical attackers.
pub const BASE_CRITICAL_CHANCE: f64 = 0.1;

/// Hard ceiling on agility-scaled evasion.
pub const AGILITY_EVASION_CAP: f64 = 0.8;

/// Hard ceiling on the armor reduction fraction.
pub const ARMOR_REDUCTION_CAP: f64 = 0.6;

/// Multiplier applied to power for magic attacks.
pub const MAGIC_POWER_FACTOR: f64 = 1.5;

// =============================================================================
// Elements
// =============================================================================

/// Elemental affinity used to scale magic damage.
///
/// Dominance is a 4-cycle: Fire beats Ice, Ice beats Lightning, Lightning
/// beats Acid, Acid beats Fire. Nothing beats itself and opposite elements
/// (Fire/Lightning, Ice/Acid) do not dominate each other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// Beats Ice
    Fire,
    /// Beats Lightning
    Ice,
    /// Beats Acid
    Lightning,
    /// Beats Fire
    Acid,
}

impl Element {
    /// All elements in cycle order.
    pub const ALL: [Element; 4] = [Self::Fire, Self::Ice, Self::Lightning, Self::Acid];

    /// The element this one dominates.
    #[must_use]
    pub const fn prey(self) -> Element {
        match self {
            Self::Fire => Self::Ice,
            Self::Ice => Self::Lightning,
            Self::Lightning => Self::Acid,
            Self::Acid => Self::Fire,
        }
    }

    /// True if this element dominates `other`.
    #[must_use]
    pub fn is_stronger_than(self, other: Element) -> bool {
        self.prey() == other
    }

    /// How a spell of this element fares against a target element.
    #[must_use]
    pub fn matchup(self, target: Element) -> Matchup {
        if self == target {
            Matchup::Even
        } else if self.is_stronger_than(target) {
            Matchup::Advantage
        } else {
            Matchup::Disadvantage
        }
    }

    /// Draw a uniformly random element.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Element {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fire => write!(f, "Fire"),
            Self::Ice => write!(f, "Ice"),
            Self::Lightning => write!(f, "Lightning"),
            Self::Acid => write!(f, "Acid"),
        }
    }
}

/// Result of comparing a caster's element to its target's.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Matchup {
    /// Caster dominates the target: x1.2
    Advantage,
    /// Same element: x1.0
    Even,
    /// Different element the caster does not dominate: x0.8
    Disadvantage,
}

impl Matchup {
    /// Damage multiplier for this matchup.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Advantage => 1.2,
            Self::Even => 1.0,
            Self::Disadvantage => 0.8,
        }
    }
}

// =============================================================================
// Capabilities
// =============================================================================

bitflags! {
    /// Fighting-style capabilities a combatant holds.
    ///
    /// Styles (`MELEE`, `RANGED`) say when an attack is legal; families
    /// (`PHYSICAL`, `MAGIC`) say how its damage is computed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Attacks adjacent targets (distance 1)
        const MELEE = 0b0000_0001;
        /// Attacks targets its [`Reach`] admits
        const RANGED = 0b0000_0010;
        /// Can land critical hits
        const PHYSICAL = 0b0000_0100;
        /// Casts element-scaled spells
        const MAGIC = 0b0000_1000;
    }
}

/// Distance predicate for ranged attacks.
///
/// Both forms exist in play: most ranged fighters hit anything up to their
/// range, while some casters only hit at exactly their range and so cannot
/// act at distance 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reach {
    /// `distance <= range`
    Within(u32),
    /// `distance == range`
    Exactly(u32),
}

impl Reach {
    /// Declared range.
    #[must_use]
    pub const fn range(self) -> u32 {
        match self {
            Self::Within(range) | Self::Exactly(range) => range,
        }
    }

    /// True if a target at `distance` can be attacked.
    #[must_use]
    pub const fn admits(self, distance: u32) -> bool {
        match self {
            Self::Within(range) => distance <= range,
            Self::Exactly(range) => distance == range,
        }
    }
}

// =============================================================================
// Evasion & Mitigation
// =============================================================================

/// How a combatant's chance to dodge is computed.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvasionProfile {
    /// Fixed probability
    Flat(f64),
    /// `min(0.8, agility / 100)`
    Agility(u32),
}

impl EvasionProfile {
    /// Effective probability of evading one attack.
    #[must_use]
    pub fn chance(self) -> f64 {
        match self {
            Self::Flat(chance) => chance.clamp(0.0, 1.0),
            Self::Agility(agility) => (f64::from(agility) / 100.0).min(AGILITY_EVASION_CAP),
        }
    }

    /// Evasion stat opponents aim against.
    ///
    /// Agility sharpens the dodge roll only; the stat stays at
    /// [`BASE_EVASION`].
    #[must_use]
    pub fn rating(self) -> f64 {
        match self {
            Self::Flat(chance) => chance.clamp(0.0, 1.0),
            Self::Agility(_) => BASE_EVASION,
        }
    }
}

impl Default for EvasionProfile {
    fn default() -> Self {
        Self::Flat(BASE_EVASION)
    }
}

/// Damage family of an incoming strike.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackFamily {
    /// Raw power, may crit
    Physical,
    /// Power x1.5, element-scaled
    Magic,
}

/// Defender-side damage reduction.
///
/// Mitigating defenders roll their own evasion gate before the reduction is
/// applied, and the shared gate again afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Mitigation {
    /// Takes damage as dealt
    #[default]
    None,
    /// Reduces every strike by `min(0.6, defence / 200)`
    Armor {
        /// Defence stat
        defence: u32,
    },
    /// Reduces magic strikes by `resistance`, drawn from `[0, 0.5)`
    Resistance {
        /// Fraction of magic damage ignored
        resistance: f64,
    },
}

impl Mitigation {
    /// True if this defender rolls its own evasion gate before mitigating.
    #[must_use]
    pub const fn has_own_evasion_gate(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Fraction of a strike of `family` that is removed.
    #[must_use]
    pub fn reduction(self, family: AttackFamily) -> f64 {
        match (self, family) {
            (Self::None, _) | (Self::Resistance { .. }, AttackFamily::Physical) => 0.0,
            (Self::Armor { defence }, _) => {
                (f64::from(defence) / 200.0).min(ARMOR_REDUCTION_CAP)
            }
            (Self::Resistance { resistance }, AttackFamily::Magic) => resistance.clamp(0.0, 1.0),
        }
    }

    /// Apply the reduction to an incoming amount, rounding half away from zero.
    #[must_use]
    pub fn mitigate(self, amount: i32, family: AttackFamily) -> i32 {
        let reduction = self.reduction(family);
        if reduction <= 0.0 {
            return amount;
        }
        round_half_away(f64::from(amount) * (1.0 - reduction))
    }
}

/// Round to the nearest integer with halves going away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_away(value: f64) -> i32 {
    value.round() as i32
}

// =============================================================================
// Combat State
// =============================================================================

/// Attribute record for anything that can deal and receive damage.
///
/// Health may go negative transiently while damage is applied; death is read
/// through [`CombatState::is_dead`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Current health (max [`MAX_HEALTH`])
    pub health: i32,
    /// Attack power
    pub power: i32,
    /// Elemental affinity, if any
    pub element: Option<Element>,
    /// Fighting styles and damage families
    pub capabilities: Capabilities,
    /// Dodge behaviour
    pub evasion: EvasionProfile,
    /// Chance that a physical strike doubles
    pub critical_chance: f64,
    /// Ranged predicate (ranged fighters only)
    pub reach: Option<Reach>,
    /// Ranged hit confirmation stat, checked against the target's evasion
    pub accuracy: Option<f64>,
    /// Incoming damage reduction
    pub mitigation: Mitigation,
}

impl CombatState {
    /// Create a capability-less record with base evasion.
    ///
    /// Archetype constructors in [`super::archetype`] build on this.
    #[must_use]
    pub fn new(health: i32, power: i32) -> Self {
        Self {
            health: health.min(MAX_HEALTH),
            power,
            element: None,
            capabilities: Capabilities::empty(),
            evasion: EvasionProfile::default(),
            critical_chance: 0.0,
            reach: None,
            accuracy: None,
            mitigation: Mitigation::None,
        }
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Set health, clamped to at most [`MAX_HEALTH`].
    pub fn set_health(&mut self, health: i32) {
        self.health = health.min(MAX_HEALTH);
    }

    /// Heal by `amount`, capped at [`MAX_HEALTH`]. Non-positive amounts are ignored.
    pub fn heal(&mut self, amount: i32) {
        if amount > 0 {
            self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
        }
    }

    /// True iff health is zero or below.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Attack power.
    #[must_use]
    pub const fn power(&self) -> i32 {
        self.power
    }

    /// Set attack power.
    pub fn set_power(&mut self, power: i32) {
        self.power = power;
    }

    /// Elemental affinity.
    #[must_use]
    pub const fn element(&self) -> Option<Element> {
        self.element
    }

    /// Capability set.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Effective evasion probability, used by [`CombatState::try_evade`].
    #[must_use]
    pub fn evasion_chance(&self) -> f64 {
        self.evasion.chance()
    }

    /// Listed evasion stat, read by an attacker's accuracy check.
    #[must_use]
    pub fn evasion_rating(&self) -> f64 {
        self.evasion.rating()
    }

    /// Roll one evasion check.
    pub fn try_evade<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.evasion_chance()
    }

    /// Roll one critical check (physical attackers only).
    pub fn roll_critical<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.capabilities.contains(Capabilities::PHYSICAL)
            && rng.gen::<f64>() < self.critical_chance
    }

    /// True if this combatant can melee a target at `distance`.
    #[must_use]
    pub fn in_melee_range(&self, distance: u32) -> bool {
        self.capabilities.contains(Capabilities::MELEE) && distance == 1
    }

    /// True if this combatant can shoot or cast at a target at `distance`.
    #[must_use]
    pub fn in_reach(&self, distance: u32) -> bool {
        self.capabilities.contains(Capabilities::RANGED)
            && self.reach.is_some_and(|reach| reach.admits(distance))
    }
}
