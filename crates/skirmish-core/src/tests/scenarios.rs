//! End-to-end turn scenarios.
//!
//! These tests drive a [`Session`] through whole turns with scripted input
//! and scripted rolls, covering:
//! - Melee and magic fights to the death, with loot
//! - Blocked and unbounded movement
//! - Game over, stalemates and rejected input
//! - Potions and looting

use rand::rngs::mock::StepRng;
use skirmish_grid::{Direction, Position};

use crate::command::{Command, PotionSlot};
use crate::entity::{CombatState, Element, EnemyKind, HeroClass, ItemKind};
use crate::output::{Event, Style, TurnOutcome};
use crate::simulation::{CommandSource, Phase, Session};

use super::helpers::{
    empty_world, health_of, spawn_enemy, spawn_hero, spawn_item, unlucky, RecordingPresenter,
    ScriptedInput,
};

// =============================================================================
// Fights
// =============================================================================

#[test]
fn melee_fight_ends_with_visible_loot() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    let goblin = spawn_enemy(
        &mut world,
        Position::new(5, 6),
        EnemyKind::Goblin,
        CombatState::goblin(3, 0),
        250,
    );
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();
    let mut input = ScriptedInput::new(&["inspect"]);
    let mut screen = RecordingPresenter::default();

    let outcome = session.play_turn(&mut input, &mut screen).unwrap();
    assert_eq!(outcome, TurnOutcome::Continue);

    // Power 10, no crit, no mitigation, failed evasion: exactly 10
    assert_eq!(
        screen.events[0],
        Event::EngagementStarted {
            enemy: goblin,
            kind: EnemyKind::Goblin
        }
    );
    assert_eq!(
        screen.events[1],
        Event::DamageDealt {
            attacker: hero,
            defender: goblin,
            style: Style::Melee,
            amount: 10,
            critical: false,
            remaining: 40,
        }
    );

    // Five player hits, four goblin replies of 3
    assert_eq!(health_of(session.world(), hero), 88);
    assert!(screen.events.contains(&Event::EnemyDefeated {
        enemy: goblin,
        kind: EnemyKind::Goblin
    }));

    // Exactly one visible treasure where the goblin fell
    let world = session.world();
    assert!(world.enemies().is_empty());
    assert!(world.get(goblin).is_none());
    assert_eq!(world.items().len(), 1);
    let treasure = world.entity(world.items()[0]).unwrap();
    assert!(treasure.is_visible());
    assert_eq!(treasure.as_item(), Some(ItemKind::Treasure { value: 250 }));
    assert_eq!(world.position_of(treasure.id()).unwrap(), Position::new(5, 6));
    assert_eq!(world.visible_symbol_at(Position::new(5, 6)), Some('T'));

    // Rendered before and after the fight
    assert_eq!(screen.renders, 2);
    assert!(matches!(
        screen.events.last(),
        Some(Event::StatsInspected { health: 88, .. })
    ));
}

#[test]
fn magic_fight_scales_by_element() {
    let mut world = empty_world();
    let hero = spawn_hero(
        &mut world,
        Position::new(0, 0),
        HeroClass::Mage,
        CombatState::mage(10, Element::Fire),
    );
    let dragon = spawn_enemy(
        &mut world,
        Position::new(0, 2),
        EnemyKind::Dragon,
        CombatState::dragon(4, Element::Ice),
        100,
    );
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();

    let report = session.engage().unwrap();
    assert_eq!(report.fought, vec![dragon]);
    assert_eq!(report.outcome, TurnOutcome::Continue);

    let events = session.take_events();
    assert_eq!(
        events[1],
        Event::DamageDealt {
            attacker: hero,
            defender: dragon,
            style: Style::Ranged,
            amount: 18,
            critical: false,
            remaining: 32,
        }
    );
    // Ice against Fire is at a disadvantage: 4 * 1.5 * 0.8 rounds to 5
    assert_eq!(
        events[2],
        Event::DamageDealt {
            attacker: dragon,
            defender: hero,
            style: Style::Ranged,
            amount: 5,
            critical: false,
            remaining: 95,
        }
    );
    assert!(session.world().enemies().is_empty());
    assert_eq!(health_of(session.world(), hero), 90);
    assert_eq!(session.phase(), Phase::PlayerAction);
}

#[test]
fn player_death_is_game_over() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    world.combatant_mut(hero).unwrap().set_health(5);
    let orc = spawn_enemy(
        &mut world,
        Position::new(6, 5),
        EnemyKind::Orc,
        CombatState::orc(14, 0.0),
        100,
    );
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();
    let mut input = ScriptedInput::new(&["inspect"]);
    let mut screen = RecordingPresenter::default();

    assert_eq!(
        session.play_turn(&mut input, &mut screen).unwrap(),
        TurnOutcome::GameOver
    );
    assert_eq!(
        screen.events.last(),
        Some(&Event::PlayerDefeated {
            player: hero,
            name: "Tester".to_string(),
            treasure_points: 0,
        })
    );
    assert_eq!(health_of(session.world(), hero), -9);
    assert_eq!(health_of(session.world(), orc), 40);

    // Terminal: nothing more happens and no input is read
    let seen = screen.events.len();
    assert_eq!(
        session.play_turn(&mut input, &mut screen).unwrap(),
        TurnOutcome::GameOver
    );
    assert_eq!(screen.events.len(), seen);
    assert_eq!(input.next_line().as_deref(), Some("inspect"));
    assert_eq!(session.phase(), Phase::GameOver);
}

#[test]
fn unreachable_enemy_is_a_stalemate() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    let goblin = spawn_enemy(
        &mut world,
        Position::new(5, 7),
        EnemyKind::Goblin,
        CombatState::goblin(3, 0),
        120,
    );
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();
    let mut input = ScriptedInput::new(&["move right", "inspect"]);
    let mut screen = RecordingPresenter::default();

    session.play_turn(&mut input, &mut screen).unwrap();
    assert_eq!(
        &screen.events[..4],
        &[
            Event::EngagementStarted {
                enemy: goblin,
                kind: EnemyKind::Goblin
            },
            Event::OutOfRange {
                attacker: hero,
                defender: goblin,
                distance: 2
            },
            Event::OutOfRange {
                attacker: goblin,
                defender: hero,
                distance: 2
            },
            Event::Stalemate { enemy: goblin },
        ]
    );
    assert_eq!(session.world().position_of(hero).unwrap(), Position::new(5, 6));

    // Now adjacent, the next turn settles it
    session.play_turn(&mut input, &mut screen).unwrap();
    assert!(session.world().enemies().is_empty());
    assert_eq!(health_of(session.world(), hero), 88);
}

#[test]
fn inaccurate_archer_gives_up() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(0, 0), HeroClass::Archer, CombatState::archer(10, 0.1));
    let goblin = spawn_enemy(
        &mut world,
        Position::new(1, 1),
        EnemyKind::Goblin,
        CombatState::goblin(5, 80),
        120,
    );
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();

    session.engage().unwrap();
    let events = session.take_events();
    assert!(events.contains(&Event::AttackMissed {
        attacker: hero,
        defender: goblin
    }));
    assert_eq!(events.last(), Some(&Event::Stalemate { enemy: goblin }));
    assert_eq!(health_of(session.world(), goblin), 50);
}

// =============================================================================
// Movement
// =============================================================================

#[test]
fn move_into_wall_is_blocked() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    spawn_item(&mut world, Position::new(4, 5), ItemKind::Wall);
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();
    let mut input = ScriptedInput::new(&["move up", "move down"]);
    let mut screen = RecordingPresenter::default();

    session.play_turn(&mut input, &mut screen).unwrap();
    assert_eq!(
        screen.events,
        vec![Event::MoveBlocked {
            entity: hero,
            direction: Direction::Up,
            to: Position::new(4, 5),
        }]
    );
    assert_eq!(session.world().position_of(hero).unwrap(), Position::new(5, 5));

    session.play_turn(&mut input, &mut screen).unwrap();
    assert_eq!(session.world().position_of(hero).unwrap(), Position::new(6, 5));
}

#[test]
fn moves_may_leave_the_generated_extent() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(0, 0), HeroClass::Warrior, CombatState::warrior(10, 0));
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();

    session.perform(Command::Move(Direction::Up)).unwrap();
    session.perform(Command::Move(Direction::Left)).unwrap();
    let position = session.world().position_of(hero).unwrap();
    assert_eq!(position, Position::new(-1, -1));
    assert!(!session.world().extent().contains(position));
}

// =============================================================================
// Input handling
// =============================================================================

#[test]
fn unknown_input_forfeits_the_action() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();
    let mut input = ScriptedInput::new(&["  dance "]);
    let mut screen = RecordingPresenter::default();

    let outcome = session.play_turn(&mut input, &mut screen).unwrap();
    assert_eq!(outcome, TurnOutcome::Continue);
    assert_eq!(
        screen.events,
        vec![Event::CommandRejected {
            input: "dance".to_string(),
            reason: "unknown command: dance".to_string(),
        }]
    );
    assert_eq!(session.world().position_of(hero).unwrap(), Position::new(5, 5));
    assert_eq!(session.turn(), 1);
}

#[test]
fn exhausted_input_ends_the_session() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();
    let mut screen = RecordingPresenter::default();

    let outcome = session
        .play_turn(&mut ScriptedInput::default(), &mut screen)
        .unwrap();
    assert_eq!(outcome, TurnOutcome::Exit);
    assert_eq!(
        screen.events,
        vec![Event::SessionEnded {
            health: 100,
            power: 10,
            treasure_points: 0,
        }]
    );
}

// =============================================================================
// Items
// =============================================================================

#[test]
fn potions_heal_and_empower() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    {
        let player = world.player_mut(hero).unwrap();
        player.combat.set_health(60);
        player.inventory.add(ItemKind::PowerPotion { boost: 3 });
        player.inventory.add(ItemKind::Potion { restore: 30 });
        player.inventory.add(ItemKind::Potion { restore: 30 });
    }
    let mut session = Session::with_rng(world, hero, unlucky()).unwrap();

    session.perform(Command::UsePotion(PotionSlot::Healing)).unwrap();
    session.perform(Command::UsePotion(PotionSlot::Healing)).unwrap();
    session.perform(Command::UsePotion(PotionSlot::Power)).unwrap();
    session.perform(Command::UsePotion(PotionSlot::Power)).unwrap();

    assert_eq!(
        session.take_events(),
        vec![
            Event::PotionUsed {
                slot: PotionSlot::Healing,
                item: ItemKind::Potion { restore: 30 },
                health: 90,
                power: 10,
            },
            Event::PotionUsed {
                slot: PotionSlot::Healing,
                item: ItemKind::Potion { restore: 30 },
                health: 100,
                power: 10,
            },
            Event::PotionUsed {
                slot: PotionSlot::Power,
                item: ItemKind::PowerPotion { boost: 3 },
                health: 100,
                power: 13,
            },
            Event::PotionMissing {
                slot: PotionSlot::Power
            },
        ]
    );
    assert!(session.world().player(hero).unwrap().inventory.is_empty());
}

#[test]
fn loot_takes_adjacent_visible_items() {
    let mut world = empty_world();
    let hero = spawn_hero(&mut world, Position::new(5, 5), HeroClass::Warrior, CombatState::warrior(10, 0));
    let potion = spawn_item(&mut world, Position::new(5, 6), ItemKind::Potion { restore: 20 });
    let treasure = spawn_item(&mut world, Position::new(4, 5), ItemKind::Treasure { value: 120 });
    let wall = spawn_item(&mut world, Position::new(6, 5), ItemKind::Wall);
    let far = spawn_item(&mut world, Position::new(5, 8), ItemKind::Potion { restore: 40 });

    // The treasure's d6 reads 1, then the points roll reads 150
    let mut session = Session::with_rng(world, hero, StepRng::new(1 << 30, 0)).unwrap();
    session.reveal().unwrap();
    session.perform(Command::Loot).unwrap();

    assert_eq!(
        session.take_events(),
        vec![Event::ItemsLooted {
            taken: vec![
                ItemKind::Potion { restore: 20 },
                ItemKind::Treasure { value: 120 }
            ],
        }]
    );
    let world = session.world();
    let player = world.player(hero).unwrap();
    assert_eq!(player.treasure_points, 150);
    assert_eq!(player.inventory.items(), &[ItemKind::Potion { restore: 20 }]);
    assert!(world.get(potion).is_none());
    assert!(world.get(treasure).is_none());
    assert_eq!(world.items(), &[wall, far]);
}
