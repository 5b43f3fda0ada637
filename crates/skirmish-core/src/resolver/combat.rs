//! Combat dispatcher.
//!
//! The `CombatResolver` decides, for one attacker and one defender, which
//! fighting style applies and runs the damage pipeline at most once:
//!
//! 1. Melee if the attacker has `MELEE` and the target is adjacent
//! 2. Otherwise ranged if the attacker has `RANGED` and its [`Reach`] admits
//!    the distance; casters (`MAGIC`) send a spell, everyone else a
//!    physical shot gated by accuracy
//! 3. Otherwise nothing happens ([`AttackOutcome::OutOfRange`])
//!
//! # Defeat Handling
//!
//! If the defender dies from the attack, the returned [`Engagement`] carries
//! a [`Defeat`]: loot at the defender's last position for an enemy, name and
//! treasure points for a player. Turning loot into an item on the map is the
//! turn sequencer's job.
//!
//! [`Reach`]: crate::entity::Reach

use rand::Rng;
use tracing::trace;

use crate::entity::{Capabilities, CombatState, EntityId, EntityInner};
use crate::output::{AttackOutcome, Defeat, Engagement, Event, Loot, Style};
use crate::world::{World, WorldError};

use super::damage::{DamageOutcome, Strike};
use super::event::EventLog;

/// Dispatcher between two combatants.
///
/// # Example
///
/// ```
/// use rand::rngs::mock::StepRng;
/// use skirmish_core::entity::{CombatState, EnemyComponents, EnemyKind, EntityInner, HeroClass, PlayerComponents};
/// use skirmish_core::output::AttackOutcome;
/// use skirmish_core::resolver::{CombatResolver, EventLog};
/// use skirmish_core::World;
/// use skirmish_grid::{Extent, Position};
///
/// let mut world = World::new(Extent::new(10, 10));
/// let hero = world.spawn(
///     Position::new(0, 0),
///     EntityInner::Player(PlayerComponents::new("Bo", HeroClass::Warrior, CombatState::warrior(10, 0))),
/// );
/// let goblin = world.spawn(
///     Position::new(0, 1),
///     EntityInner::Enemy(EnemyComponents::new(EnemyKind::Goblin, CombatState::goblin(6, 0), 120)),
/// );
///
/// let mut log = EventLog::new();
/// let mut rng = StepRng::new(u64::MAX, 0); // never evades, never crits
/// let engagement = CombatResolver::new()
///     .resolve(&mut world, hero, goblin, &mut rng, &mut log)
///     .unwrap();
///
/// assert!(matches!(engagement.outcome, AttackOutcome::Hit { amount: 10, .. }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver;

impl CombatResolver {
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Let `attacker` attack `defender` once, if any style applies.
    ///
    /// # Arguments
    ///
    /// * `world` - World holding both combatants
    /// * `attacker` - Acting entity
    /// * `defender` - Target entity
    /// * `rng` - Source of every roll
    /// * `log` - Receives the events this call produces
    ///
    /// # Errors
    ///
    /// [`WorldError`] if either id is unknown, not a combatant, or unplaced.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        attacker: EntityId,
        defender: EntityId,
        rng: &mut R,
        log: &mut EventLog,
    ) -> Result<Engagement, WorldError> {
        let distance = world.distance_between(attacker, defender)?;
        let striker = world.combatant(attacker)?.clone();
        let target = world.combatant(defender)?;

        let skipped = |outcome| Engagement {
            attacker,
            defender,
            style: None,
            outcome,
            defeat: None,
        };
        if target.is_dead() {
            return Ok(skipped(AttackOutcome::TargetDefeated));
        }
        if striker.is_dead() {
            return Ok(skipped(AttackOutcome::AttackerDefeated));
        }

        let (style, strike) = if striker.in_melee_range(distance) {
            (Style::Melee, Strike::physical(&striker, rng))
        } else if striker.in_reach(distance) {
            if striker.capabilities().contains(Capabilities::MAGIC) {
                (Style::Ranged, Strike::magic(&striker, target.element()))
            } else if Self::accuracy_confirms(&striker, target) {
                (Style::Ranged, Strike::physical(&striker, rng))
            } else {
                log.record(Event::AttackMissed { attacker, defender });
                return Ok(Engagement {
                    style: Some(Style::Ranged),
                    ..skipped(AttackOutcome::Missed)
                });
            }
        } else {
            log.record(Event::OutOfRange {
                attacker,
                defender,
                distance,
            });
            return Ok(skipped(AttackOutcome::OutOfRange { distance }));
        };

        trace!(%attacker, %defender, ?style, amount = strike.amount, "strike");
        let outcome = match world.combatant_mut(defender)?.receive_damage(&strike, rng) {
            DamageOutcome::Landed { amount, remaining } => {
                log.record(Event::DamageDealt {
                    attacker,
                    defender,
                    style,
                    amount,
                    critical: strike.critical,
                    remaining,
                });
                AttackOutcome::Hit {
                    amount,
                    critical: strike.critical,
                    remaining,
                }
            }
            DamageOutcome::Evaded => {
                log.record(Event::AttackEvaded {
                    attacker,
                    defender,
                    style,
                });
                AttackOutcome::Evaded
            }
            DamageOutcome::Ignored => AttackOutcome::TargetDefeated,
        };

        let defeat = if world.combatant(defender)?.is_dead() {
            Some(Self::report_defeat(world, defender, log)?)
        } else {
            None
        };

        Ok(Engagement {
            attacker,
            defender,
            style: Some(style),
            outcome,
            defeat,
        })
    }

    /// Accuracy check for physical ranged shots.
    ///
    /// Attackers without an accuracy stat always pass. Otherwise the shot
    /// lands only if `accuracy > rating * (1 - accuracy)`, where `rating` is
    /// the target's listed evasion. Agility does not raise it.
    #[must_use]
    pub fn accuracy_confirms(attacker: &CombatState, target: &CombatState) -> bool {
        attacker
            .accuracy
            .is_none_or(|accuracy| accuracy > target.evasion_rating() * (1.0 - accuracy))
    }

    /// Build and record the defeat report for a dead defender.
    fn report_defeat(
        world: &World,
        defender: EntityId,
        log: &mut EventLog,
    ) -> Result<Defeat, WorldError> {
        let position = world.position_of(defender)?;
        match world.entity(defender)?.inner() {
            EntityInner::Enemy(enemy) => {
                log.record(Event::EnemyDefeated {
                    enemy: defender,
                    kind: enemy.kind,
                });
                Ok(Defeat::Enemy {
                    enemy: defender,
                    kind: enemy.kind,
                    loot: Loot {
                        position,
                        value: enemy.loot,
                    },
                })
            }
            EntityInner::Player(player) => {
                log.record(Event::PlayerDefeated {
                    player: defender,
                    name: player.name.clone(),
                    treasure_points: player.treasure_points,
                });
                Ok(Defeat::Player {
                    player: defender,
                    name: player.name.clone(),
                    treasure_points: player.treasure_points,
                })
            }
            EntityInner::Item(_) => Err(WorldError::NotACombatant(defender)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{
        EnemyComponents, EnemyKind, Element, HeroClass, PlayerComponents,
    };
    use rand::rngs::mock::StepRng;
    use skirmish_grid::{Extent, Position};

    fn unlucky() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    fn spawn_player(world: &mut World, at: Position, combat: CombatState) -> EntityId {
        world.spawn(
            at,
            EntityInner::Player(PlayerComponents::new("Hero", HeroClass::Warrior, combat)),
        )
    }

    fn spawn_enemy(world: &mut World, at: Position, kind: EnemyKind, combat: CombatState) -> EntityId {
        world.spawn(at, EntityInner::Enemy(EnemyComponents::new(kind, combat, 250)))
    }

    mod melee_tests {
        use super::*;

        #[test]
        fn adjacent_melee_hits() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(5, 5), CombatState::warrior(10, 0));
            let goblin = spawn_enemy(
                &mut world,
                Position::new(5, 6),
                EnemyKind::Goblin,
                CombatState::goblin(5, 0),
            );
            let mut log = EventLog::new();

            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, goblin, &mut unlucky(), &mut log)
                .unwrap();

            assert_eq!(engagement.style, Some(Style::Melee));
            assert_eq!(
                engagement.outcome,
                AttackOutcome::Hit {
                    amount: 10,
                    critical: false,
                    remaining: 40
                }
            );
            assert!(engagement.defeat.is_none());
            assert_eq!(log.len(), 1);
        }

        #[test]
        fn melee_only_fighter_cannot_reach_two() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(5, 5), CombatState::warrior(10, 0));
            let goblin = spawn_enemy(
                &mut world,
                Position::new(5, 7),
                EnemyKind::Goblin,
                CombatState::goblin(5, 0),
            );
            let mut log = EventLog::new();

            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, goblin, &mut unlucky(), &mut log)
                .unwrap();

            assert_eq!(engagement.outcome, AttackOutcome::OutOfRange { distance: 2 });
            assert_eq!(engagement.style, None);
            assert_eq!(world.combatant(goblin).unwrap().health(), 50);
        }

        #[test]
        fn diagonal_is_distance_two() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(5, 5), CombatState::warrior(10, 0));
            let goblin = spawn_enemy(
                &mut world,
                Position::new(6, 6),
                EnemyKind::Goblin,
                CombatState::goblin(5, 0),
            );
            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, goblin, &mut unlucky(), &mut EventLog::new())
                .unwrap();
            assert!(!engagement.outcome.attacked());
        }
    }

    mod ranged_tests {
        use super::*;

        #[test]
        fn mage_casts_at_distance_one_and_two() {
            for col in [6, 7] {
                let mut world = World::new(Extent::new(10, 10));
                let hero =
                    spawn_player(&mut world, Position::new(5, 5), CombatState::mage(10, Element::Fire));
                let dragon = spawn_enemy(
                    &mut world,
                    Position::new(5, col),
                    EnemyKind::Dragon,
                    CombatState::dragon(5, Element::Ice),
                );
                let engagement = CombatResolver::new()
                    .resolve(&mut world, hero, dragon, &mut unlucky(), &mut EventLog::new())
                    .unwrap();
                assert_eq!(engagement.style, Some(Style::Ranged));
                assert!(matches!(engagement.outcome, AttackOutcome::Hit { amount: 18, .. }));
            }
        }

        #[test]
        fn dragon_casts_only_at_exactly_two() {
            let mut world = World::new(Extent::new(10, 10));
            let dragon = spawn_enemy(
                &mut world,
                Position::new(0, 0),
                EnemyKind::Dragon,
                CombatState::dragon(10, Element::Fire),
            );
            let hero = spawn_player(&mut world, Position::new(0, 2), CombatState::archer(5, 0.5));

            let at_two = CombatResolver::new()
                .resolve(&mut world, dragon, hero, &mut unlucky(), &mut EventLog::new())
                .unwrap();
            // Hero has no element, so the spell is unscaled
            assert!(matches!(at_two.outcome, AttackOutcome::Hit { amount: 15, .. }));
            assert_eq!(at_two.style, Some(Style::Ranged));

            world.place(hero, Position::new(0, 3)).unwrap();
            let at_three = CombatResolver::new()
                .resolve(&mut world, dragon, hero, &mut unlucky(), &mut EventLog::new())
                .unwrap();
            assert_eq!(at_three.outcome, AttackOutcome::OutOfRange { distance: 3 });
        }

        #[test]
        fn dragon_prefers_melee_when_adjacent() {
            let mut world = World::new(Extent::new(10, 10));
            let dragon = spawn_enemy(
                &mut world,
                Position::new(0, 0),
                EnemyKind::Dragon,
                CombatState::dragon(10, Element::Fire),
            );
            let hero = spawn_player(&mut world, Position::new(1, 0), CombatState::archer(5, 0.5));
            let engagement = CombatResolver::new()
                .resolve(&mut world, dragon, hero, &mut unlucky(), &mut EventLog::new())
                .unwrap();
            assert_eq!(engagement.style, Some(Style::Melee));
            assert!(matches!(engagement.outcome, AttackOutcome::Hit { amount: 10, .. }));
        }

        #[test]
        fn inaccurate_archer_misses() {
            let mut world = World::new(Extent::new(10, 10));
            // 0.1 > 0.25 * 0.9 is false
            let hero = spawn_player(&mut world, Position::new(0, 0), CombatState::archer(10, 0.1));
            let goblin = spawn_enemy(
                &mut world,
                Position::new(0, 2),
                EnemyKind::Goblin,
                CombatState::goblin(5, 80),
            );
            let mut log = EventLog::new();
            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, goblin, &mut unlucky(), &mut log)
                .unwrap();
            assert_eq!(engagement.outcome, AttackOutcome::Missed);
            assert_eq!(
                log.events(),
                &[Event::AttackMissed {
                    attacker: hero,
                    defender: goblin
                }]
            );
        }

        #[test]
        fn agile_goblin_does_not_raise_the_aim_threshold() {
            let mut world = World::new(Extent::new(10, 10));
            // 0.3 > 0.25 * 0.7; the goblin's 0.8 dodge only matters to the roll
            let hero = spawn_player(&mut world, Position::new(0, 0), CombatState::archer(10, 0.3));
            let goblin = spawn_enemy(
                &mut world,
                Position::new(0, 2),
                EnemyKind::Goblin,
                CombatState::goblin(5, 80),
            );
            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, goblin, &mut unlucky(), &mut EventLog::new())
                .unwrap();
            assert_ne!(engagement.outcome, AttackOutcome::Missed);
            assert!(matches!(engagement.outcome, AttackOutcome::Hit { amount: 10, .. }));
        }

        #[test]
        fn accurate_shot_still_faces_orc_gate() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(0, 0), CombatState::archer(10, 0.6));
            let orc = spawn_enemy(
                &mut world,
                Position::new(2, 0),
                EnemyKind::Orc,
                CombatState::orc(5, 0.4),
            );
            // 0.6 > 0.25 * 0.4 passes; every roll then reads 0.0, so the
            // orc's own gate dodges before resistance applies.
            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, orc, &mut lucky(), &mut EventLog::new())
                .unwrap();
            assert_eq!(engagement.outcome, AttackOutcome::Evaded);
        }
    }

    mod defeat_tests {
        use super::*;

        #[test]
        fn killing_an_enemy_reports_loot() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(3, 3), CombatState::warrior(14, 0));
            let orc = spawn_enemy(
                &mut world,
                Position::new(3, 4),
                EnemyKind::Orc,
                CombatState::orc(5, 0.1),
            );
            world.combatant_mut(orc).unwrap().set_health(10);
            let mut log = EventLog::new();

            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, orc, &mut unlucky(), &mut log)
                .unwrap();

            assert_eq!(
                engagement.defeat,
                Some(Defeat::Enemy {
                    enemy: orc,
                    kind: EnemyKind::Orc,
                    loot: Loot {
                        position: Position::new(3, 4),
                        value: 250
                    },
                })
            );
            assert!(log.events().contains(&Event::EnemyDefeated {
                enemy: orc,
                kind: EnemyKind::Orc
            }));
        }

        #[test]
        fn killing_the_player_reports_name_and_points() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(3, 3), CombatState::archer(5, 0.5));
            world
                .get_mut(hero)
                .unwrap()
                .as_player_mut()
                .unwrap()
                .treasure_points = 90;
            world.combatant_mut(hero).unwrap().set_health(3);
            let goblin = spawn_enemy(
                &mut world,
                Position::new(4, 3),
                EnemyKind::Goblin,
                CombatState::goblin(8, 0),
            );

            let engagement = CombatResolver::new()
                .resolve(&mut world, goblin, hero, &mut unlucky(), &mut EventLog::new())
                .unwrap();
            assert_eq!(
                engagement.defeat,
                Some(Defeat::Player {
                    player: hero,
                    name: "Hero".to_string(),
                    treasure_points: 90,
                })
            );
        }

        #[test]
        fn dead_defender_is_not_attacked_again() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(3, 3), CombatState::warrior(10, 0));
            let goblin = spawn_enemy(
                &mut world,
                Position::new(3, 4),
                EnemyKind::Goblin,
                CombatState::goblin(5, 0),
            );
            world.combatant_mut(goblin).unwrap().set_health(-2);
            let mut log = EventLog::new();

            let engagement = CombatResolver::new()
                .resolve(&mut world, hero, goblin, &mut unlucky(), &mut log)
                .unwrap();
            assert_eq!(engagement.outcome, AttackOutcome::TargetDefeated);
            assert!(engagement.defeat.is_none());
            assert!(log.is_empty());
            assert_eq!(world.combatant(goblin).unwrap().health(), -2);
        }

        #[test]
        fn dead_attacker_does_not_act() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(3, 3), CombatState::warrior(10, 0));
            let goblin = spawn_enemy(
                &mut world,
                Position::new(3, 4),
                EnemyKind::Goblin,
                CombatState::goblin(5, 0),
            );
            world.combatant_mut(goblin).unwrap().set_health(0);
            let engagement = CombatResolver::new()
                .resolve(&mut world, goblin, hero, &mut unlucky(), &mut EventLog::new())
                .unwrap();
            assert_eq!(engagement.outcome, AttackOutcome::AttackerDefeated);
            assert_eq!(world.combatant(hero).unwrap().health(), 100);
        }
    }

    mod error_tests {
        use super::*;
        use crate::entity::ItemKind;

        #[test]
        fn unknown_entities_are_errors() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(3, 3), CombatState::warrior(10, 0));
            let ghost = EntityId::new(404);
            let result =
                CombatResolver::new().resolve(&mut world, hero, ghost, &mut unlucky(), &mut EventLog::new());
            assert_eq!(result, Err(WorldError::Unplaced(ghost)));
        }

        #[test]
        fn items_cannot_be_attacked() {
            let mut world = World::new(Extent::new(10, 10));
            let hero = spawn_player(&mut world, Position::new(3, 3), CombatState::warrior(10, 0));
            let wall = world.spawn(Position::new(3, 4), EntityInner::Item(ItemKind::Wall));
            let result =
                CombatResolver::new().resolve(&mut world, hero, wall, &mut unlucky(), &mut EventLog::new());
            assert_eq!(result, Err(WorldError::NotACombatant(wall)));
        }
    }
}
