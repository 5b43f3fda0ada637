//! Character archetypes expressed as capability bundles.
//!
//! | Archetype | Capabilities                   | Special stat                    |
//! |-----------|--------------------------------|---------------------------------|
//! | Warrior   | melee, physical                | armor `0..=120`                 |
//! | Mage      | ranged (<= 2), magic           | element                         |
//! | Archer    | ranged (<= 2), physical        | accuracy `[0, 0.8)`             |
//! | Goblin    | melee, physical                | agility `0..=80`                |
//! | Orc       | melee, physical                | magic resistance `[0, 0.5)`     |
//! | Dragon    | melee, ranged (== 2), both     | element                         |
//!
//! Each archetype has an explicit-stat constructor on [`CombatState`] (used by
//! tests and scripted setups) and a rolled constructor that draws the stats
//! from an RNG.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use super::components::{
    Capabilities, CombatState, Element, EvasionProfile, Mitigation, Reach, BASE_CRITICAL_CHANCE,
};

/// Starting health for player characters.
pub const PLAYER_HEALTH: i32 = 100;

/// Starting health for enemies.
pub const ENEMY_HEALTH: i32 = 50;

/// Power range for every archetype.
pub const POWER_RANGE: RangeInclusive<i32> = 4..=14;

/// Loot value range carried by enemies.
pub const LOOT_RANGE: RangeInclusive<u32> = 100..=300;

/// Range of ranged attacks for every archetype that has them.
pub const RANGED_REACH: u32 = 2;

/// Warrior defence roll.
pub const DEFENCE_RANGE: RangeInclusive<u32> = 0..=120;

/// Goblin agility roll.
pub const AGILITY_RANGE: RangeInclusive<u32> = 0..=80;

/// Upper bound (exclusive) of archer accuracy.
pub const ACCURACY_CAP: f64 = 0.8;

/// Upper bound (exclusive) of orc resistance.
pub const RESISTANCE_CAP: f64 = 0.5;

// =============================================================================
// Player classes
// =============================================================================

/// Playable character class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroClass {
    /// Armored melee fighter
    Warrior,
    /// Elemental caster
    Mage,
    /// Accurate bowman
    Archer,
}

impl HeroClass {
    /// All classes in menu order.
    pub const ALL: [HeroClass; 3] = [Self::Warrior, Self::Mage, Self::Archer];

    /// Map symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Warrior => 'W',
            Self::Mage => 'M',
            Self::Archer => 'A',
        }
    }

    /// Roll a fresh combat record for this class.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> CombatState {
        let power = rng.gen_range(POWER_RANGE);
        match self {
            Self::Warrior => CombatState::warrior(power, rng.gen_range(DEFENCE_RANGE)),
            Self::Mage => CombatState::mage(power, Element::random(rng)),
            Self::Archer => CombatState::archer(power, rng.gen::<f64>() * ACCURACY_CAP),
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warrior => write!(f, "Warrior"),
            Self::Mage => write!(f, "Mage"),
            Self::Archer => write!(f, "Archer"),
        }
    }
}

impl std::str::FromStr for HeroClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warrior" | "1" => Ok(Self::Warrior),
            "mage" | "2" => Ok(Self::Mage),
            "archer" | "3" => Ok(Self::Archer),
            other => Err(format!("unknown class `{other}`")),
        }
    }
}

// =============================================================================
// Enemy kinds
// =============================================================================

/// Enemy variety.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Nimble melee enemy
    Goblin,
    /// Magic-resistant melee enemy
    Orc,
    /// Melee and exact-range caster
    Dragon,
}

impl EnemyKind {
    /// All kinds in spawn-table order.
    pub const ALL: [EnemyKind; 3] = [Self::Goblin, Self::Orc, Self::Dragon];

    /// Map symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Goblin => 'G',
            Self::Orc => 'O',
            Self::Dragon => 'D',
        }
    }

    /// Human-readable descriptor for logs and announcements.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Goblin => "Goblin",
            Self::Orc => "Orc",
            Self::Dragon => "Dragon",
        }
    }

    /// Roll a fresh combat record for this kind.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> CombatState {
        let power = rng.gen_range(POWER_RANGE);
        match self {
            Self::Goblin => CombatState::goblin(power, rng.gen_range(AGILITY_RANGE)),
            Self::Orc => CombatState::orc(power, rng.gen::<f64>() * RESISTANCE_CAP),
            Self::Dragon => CombatState::dragon(power, Element::random(rng)),
        }
    }

    /// Roll a loot value.
    pub fn roll_loot<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        rng.gen_range(LOOT_RANGE)
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

// =============================================================================
// Explicit-stat constructors
// =============================================================================

impl CombatState {
    /// Melee physical fighter with armor.
    #[must_use]
    pub fn warrior(power: i32, defence: u32) -> Self {
        Self {
            capabilities: Capabilities::MELEE | Capabilities::PHYSICAL,
            critical_chance: BASE_CRITICAL_CHANCE,
            mitigation: Mitigation::Armor { defence },
            ..Self::new(PLAYER_HEALTH, power)
        }
    }

    /// Ranged caster.
    #[must_use]
    pub fn mage(power: i32, element: Element) -> Self {
        Self {
            capabilities: Capabilities::RANGED | Capabilities::MAGIC,
            element: Some(element),
            reach: Some(Reach::Within(RANGED_REACH)),
            ..Self::new(PLAYER_HEALTH, power)
        }
    }

    /// Ranged physical shooter. Critical chance is half the accuracy.
    #[must_use]
    pub fn archer(power: i32, accuracy: f64) -> Self {
        Self {
            capabilities: Capabilities::RANGED | Capabilities::PHYSICAL,
            critical_chance: accuracy / 2.0,
            reach: Some(Reach::Within(RANGED_REACH)),
            accuracy: Some(accuracy),
            ..Self::new(PLAYER_HEALTH, power)
        }
    }

    /// Melee enemy whose evasion scales with agility.
    #[must_use]
    pub fn goblin(power: i32, agility: u32) -> Self {
        Self {
            capabilities: Capabilities::MELEE | Capabilities::PHYSICAL,
            critical_chance: BASE_CRITICAL_CHANCE,
            evasion: EvasionProfile::Agility(agility),
            ..Self::new(ENEMY_HEALTH, power)
        }
    }

    /// Melee enemy that shrugs off part of every spell.
    #[must_use]
    pub fn orc(power: i32, resistance: f64) -> Self {
        Self {
            capabilities: Capabilities::MELEE | Capabilities::PHYSICAL,
            critical_chance: BASE_CRITICAL_CHANCE,
            mitigation: Mitigation::Resistance { resistance },
            ..Self::new(ENEMY_HEALTH, power)
        }
    }

    /// Melee brawler that also casts at exactly range 2.
    #[must_use]
    pub fn dragon(power: i32, element: Element) -> Self {
        Self {
            capabilities: Capabilities::all(),
            critical_chance: BASE_CRITICAL_CHANCE,
            element: Some(element),
            reach: Some(Reach::Exactly(RANGED_REACH)),
            ..Self::new(ENEMY_HEALTH, power)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod roll_tests {
        use super::*;

        #[test]
        fn rolled_heroes_stay_in_range() {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            for _ in 0..200 {
                for class in HeroClass::ALL {
                    let state = class.roll(&mut rng);
                    assert_eq!(state.health(), PLAYER_HEALTH);
                    assert!(POWER_RANGE.contains(&state.power()));
                    match state.mitigation {
                        Mitigation::Armor { defence } => assert!(DEFENCE_RANGE.contains(&defence)),
                        Mitigation::None => {}
                        Mitigation::Resistance { .. } => panic!("heroes never resist"),
                    }
                    if let Some(accuracy) = state.accuracy {
                        assert!((0.0..ACCURACY_CAP).contains(&accuracy));
                    }
                }
            }
        }

        #[test]
        fn rolled_enemies_stay_in_range() {
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            for _ in 0..200 {
                for kind in EnemyKind::ALL {
                    let state = kind.roll(&mut rng);
                    assert_eq!(state.health(), ENEMY_HEALTH);
                    assert!(POWER_RANGE.contains(&state.power()));
                    assert!(state.evasion_chance() <= 0.8);
                    if let Mitigation::Resistance { resistance } = state.mitigation {
                        assert!((0.0..RESISTANCE_CAP).contains(&resistance));
                    }
                }
                assert!(LOOT_RANGE.contains(&EnemyKind::roll_loot(&mut rng)));
            }
        }
    }

    mod capability_tests {
        use super::*;

        #[test]
        fn dragon_holds_every_capability() {
            let dragon = CombatState::dragon(10, Element::Fire);
            assert_eq!(dragon.capabilities(), Capabilities::all());
            assert!(dragon.in_melee_range(1));
            assert!(!dragon.in_reach(1));
            assert!(dragon.in_reach(2));
        }

        #[test]
        fn mage_reaches_one_and_two() {
            let mage = CombatState::mage(10, Element::Ice);
            assert!(!mage.in_melee_range(1));
            assert!(mage.in_reach(1));
            assert!(mage.in_reach(2));
            assert!(!mage.in_reach(3));
        }

        #[test]
        fn archer_crit_scales_with_accuracy() {
            let archer = CombatState::archer(10, 0.6);
            assert!((archer.critical_chance - 0.3).abs() < 1e-12);
        }
    }

    #[test]
    fn symbols_and_descriptions() {
        assert_eq!(HeroClass::Warrior.symbol(), 'W');
        assert_eq!(HeroClass::Mage.symbol(), 'M');
        assert_eq!(HeroClass::Archer.symbol(), 'A');
        assert_eq!(EnemyKind::Goblin.symbol(), 'G');
        assert_eq!(EnemyKind::Orc.symbol(), 'O');
        assert_eq!(EnemyKind::Dragon.symbol(), 'D');
        assert_eq!(EnemyKind::Dragon.to_string(), "Dragon");
        assert_eq!("2".parse::<HeroClass>(), Ok(HeroClass::Mage));
        assert!("rogue".parse::<HeroClass>().is_err());
    }
}
