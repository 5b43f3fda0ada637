//! Test helper functions for building worlds and driving sessions.

use std::collections::VecDeque;

use rand::rngs::mock::StepRng;
use skirmish_grid::{Extent, Position};

use crate::entity::{
    CombatState, EnemyComponents, EnemyKind, EntityId, EntityInner, HeroClass, ItemKind,
    PlayerComponents,
};
use crate::output::Event;
use crate::simulation::{CommandSource, Presenter};
use crate::world::World;

// =============================================================================
// Scripted randomness
// =============================================================================

/// Every roll lands just under 1.0: nobody evades, nobody crits.
pub fn unlucky() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Every roll is 0.0: every chance succeeds.
pub fn lucky() -> StepRng {
    StepRng::new(0, 0)
}

// =============================================================================
// World setup
// =============================================================================

/// An empty 10x10 world.
pub fn empty_world() -> World {
    World::new(Extent::new(10, 10))
}

/// Spawn a player with the given class and combat record.
pub fn spawn_hero(world: &mut World, at: Position, class: HeroClass, combat: CombatState) -> EntityId {
    world.spawn(
        at,
        EntityInner::Player(PlayerComponents::new("Tester", class, combat)),
    )
}

/// Spawn an enemy with the given combat record and loot.
pub fn spawn_enemy(
    world: &mut World,
    at: Position,
    kind: EnemyKind,
    combat: CombatState,
    loot: u32,
) -> EntityId {
    world.spawn(at, EntityInner::Enemy(EnemyComponents::new(kind, combat, loot)))
}

/// Spawn an item.
pub fn spawn_item(world: &mut World, at: Position, kind: ItemKind) -> EntityId {
    world.spawn(at, EntityInner::Item(kind))
}

/// Current health of a combatant.
pub fn health_of(world: &World, id: EntityId) -> i32 {
    world.combatant(id).map(CombatState::health).unwrap_or_default()
}

// =============================================================================
// Collaborators
// =============================================================================

/// Command source fed from a fixed script.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| (*line).to_string()).collect(),
        }
    }
}

impl CommandSource for ScriptedInput {
    fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Presenter that keeps everything it is shown.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub renders: usize,
    pub events: Vec<Event>,
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, _world: &World) {
        self.renders += 1;
    }

    fn announce(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}
