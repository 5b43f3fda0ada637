//! Turn sequencer.
//!
//! A [`Session`] owns one [`World`], the player's id and the session RNG, and
//! advances the game one turn at a time:
//!
//! 1. **AWAITING ENGAGEMENT**: reveal everything within the reveal radius of
//!    the player and present the world
//! 2. **ENEMY COMBAT LOOP**: for every visible enemy, in collection order,
//!    the player attacks, then the enemy replies, until one side is dead
//! 3. **LOOT COLLECTION**: a dead enemy leaves the grid and its loot becomes
//!    a visible treasure where it fell
//! 4. **PLAYER ACTION**: read and perform exactly one command
//!
//! Player death ends the session in **GAME OVER**; the `end` command ends it
//! in **EXIT**. Both are terminal: further calls do nothing.
//!
//! # Determinism
//!
//! Every roll is drawn from the session RNG in a fixed order (enemies in
//! insertion order, items in insertion order), so a session built from the
//! same world and seed replays identically.
//!
//! # Example
//!
//! ```
//! use rand::rngs::mock::StepRng;
//! use skirmish_core::command::Command;
//! use skirmish_core::entity::{CombatState, EntityInner, HeroClass, PlayerComponents};
//! use skirmish_core::output::TurnOutcome;
//! use skirmish_core::simulation::Session;
//! use skirmish_core::World;
//! use skirmish_grid::{Direction, Extent, Position};
//!
//! let mut world = World::new(Extent::new(10, 10));
//! let hero = world.spawn(
//!     Position::new(0, 0),
//!     EntityInner::Player(PlayerComponents::new("Ash", HeroClass::Warrior, CombatState::warrior(9, 30))),
//! );
//!
//! let mut session = Session::with_rng(world, hero, StepRng::new(u64::MAX, 0)).unwrap();
//! assert_eq!(session.engage().unwrap().outcome, TurnOutcome::Continue);
//! assert_eq!(session.perform(Command::Move(Direction::Down)).unwrap(), TurnOutcome::Continue);
//! assert_eq!(session.world().position_of(hero).unwrap(), Position::new(1, 0));
//! assert_eq!(session.perform(Command::End).unwrap(), TurnOutcome::Exit);
//! ```

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skirmish_grid::{Direction, MoveError};
use tracing::{debug, info};

use crate::command::{Command, PotionSlot};
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityInner, EntityTag, ItemKind};
use crate::output::{Defeat, Event, Loot, TurnOutcome};
use crate::resolver::{CombatResolver, EventLog};
use crate::world::{World, WorldError, REVEAL_RADIUS};

// =============================================================================
// Collaborator interfaces
// =============================================================================

/// Where player commands come from.
///
/// One call yields one line of input. `None` means the input is exhausted,
/// which the session treats as the `end` command.
pub trait CommandSource {
    /// Block until the next line is available.
    fn next_line(&mut self) -> Option<String>;
}

/// Where the session shows its state.
///
/// The session never formats text itself; presenters decide how a world and
/// each [`Event`] look.
pub trait Presenter {
    /// Draw the world as the player currently sees it.
    fn render(&mut self, world: &World);

    /// Narrate one event.
    fn announce(&mut self, event: &Event);
}

// =============================================================================
// Phases
// =============================================================================

/// State of the turn state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Start of a turn: reveal and present.
    AwaitingEngagement,
    /// Fighting a visible enemy.
    EnemyCombatLoop,
    /// Turning a dead enemy into treasure.
    LootCollection,
    /// Waiting for one player command.
    PlayerAction,
    /// The player died (terminal).
    GameOver,
    /// The player ended the session (terminal).
    Exit,
}

impl Phase {
    /// Outcome matching this phase.
    #[must_use]
    pub const fn outcome(self) -> TurnOutcome {
        match self {
            Self::GameOver => TurnOutcome::GameOver,
            Self::Exit => TurnOutcome::Exit,
            _ => TurnOutcome::Continue,
        }
    }
}

/// Result of the engagement phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngageReport {
    /// Enemies fought this turn, in order
    pub fought: Vec<EntityId>,
    /// Whether the session continues
    pub outcome: TurnOutcome,
}

// =============================================================================
// Session
// =============================================================================

/// One running game.
///
/// The RNG type defaults to [`ChaCha8Rng`]; tests substitute a scripted
/// generator through [`Session::with_rng`].
#[derive(Debug)]
pub struct Session<R = ChaCha8Rng> {
    /// Every entity and the grid.
    world: World,
    /// The controlled player.
    player: EntityId,
    /// Source of every roll.
    rng: R,
    /// Events not yet handed to a presenter.
    log: EventLog,
    /// Current state machine phase.
    phase: Phase,
    /// Turns started so far.
    turn: u64,
    /// Seed the RNG was built from, when known.
    seed: Option<u64>,
    /// Reveal radius around the player.
    reveal_radius: u32,
    /// Combat dispatcher.
    resolver: CombatResolver,
}

impl Session<ChaCha8Rng> {
    /// Create a session that continues a seeded stream.
    ///
    /// `seed` and `rng` normally come from [`GameConfig::session_rng`]; the
    /// stream may already have populated `world`. The config's reveal radius
    /// applies.
    ///
    /// # Errors
    ///
    /// [`WorldError`] if `player` is not a placed player entity.
    pub fn seeded(
        world: World,
        player: EntityId,
        config: &GameConfig,
        seed: u64,
        rng: ChaCha8Rng,
    ) -> Result<Self, WorldError> {
        let mut session =
            Self::with_rng(world, player, rng)?.with_reveal_radius(config.reveal_radius);
        session.seed = Some(seed);
        Ok(session)
    }
}

impl<R: Rng> Session<R> {
    /// Create a session around an existing RNG.
    ///
    /// # Errors
    ///
    /// [`WorldError`] if `player` is unknown, not a player, or unplaced.
    pub fn with_rng(world: World, player: EntityId, rng: R) -> Result<Self, WorldError> {
        world.expect_tag(player, EntityTag::Player)?;
        world.position_of(player)?;
        Ok(Self {
            world,
            player,
            rng,
            log: EventLog::new(),
            phase: Phase::AwaitingEngagement,
            turn: 0,
            seed: None,
            reveal_radius: REVEAL_RADIUS,
            resolver: CombatResolver::new(),
        })
    }

    /// Use a different reveal radius.
    #[must_use]
    pub fn with_reveal_radius(mut self, radius: u32) -> Self {
        self.reveal_radius = radius;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world, for setup and tests.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The controlled player's id.
    #[must_use]
    pub const fn player(&self) -> EntityId {
        self.player
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Seed of the session RNG, if the session built it.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Turns started so far.
    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// True once the session reached a terminal phase.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.phase.outcome().is_terminal()
    }

    /// Drain events not yet announced.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.log.take_events()
    }

    // =========================================================================
    // Turn phases
    // =========================================================================

    /// Reveal everything within the reveal radius of the player.
    ///
    /// # Errors
    ///
    /// [`WorldError::Unplaced`] if the player left the grid.
    pub fn reveal(&mut self) -> Result<Vec<EntityId>, WorldError> {
        let origin = self.world.position_of(self.player)?;
        Ok(self.world.reveal_nearby(origin, self.reveal_radius))
    }

    /// Fight every visible enemy, then collect loot.
    ///
    /// Each fight alternates player and enemy attacks until one side dies.
    /// A fight in which neither side can ever land a blow is abandoned with
    /// [`Event::Stalemate`].
    ///
    /// # Errors
    ///
    /// [`WorldError`] if the world no longer holds the entities it lists.
    pub fn engage(&mut self) -> Result<EngageReport, WorldError> {
        let mut fought = Vec::new();
        if self.is_over() {
            return Ok(EngageReport {
                fought,
                outcome: self.phase.outcome(),
            });
        }

        self.phase = Phase::AwaitingEngagement;
        self.reveal()?;

        let visible: Vec<EntityId> = self
            .world
            .enemies()
            .iter()
            .copied()
            .filter(|id| self.world.get(*id).is_some_and(Entity::is_visible))
            .collect();

        for enemy in visible {
            let kind = self
                .world
                .entity(enemy)?
                .as_enemy()
                .map(|components| components.kind)
                .ok_or(WorldError::NotACombatant(enemy))?;
            self.phase = Phase::EnemyCombatLoop;
            self.log.record(Event::EngagementStarted { enemy, kind });
            fought.push(enemy);

            match self.fight(enemy)? {
                Some(Defeat::Player { .. }) => {
                    self.phase = Phase::GameOver;
                    return Ok(EngageReport {
                        fought,
                        outcome: TurnOutcome::GameOver,
                    });
                }
                Some(Defeat::Enemy { enemy, loot, .. }) => {
                    self.phase = Phase::LootCollection;
                    self.drop_loot(enemy, loot);
                }
                None => {}
            }
        }

        self.phase = Phase::PlayerAction;
        Ok(EngageReport {
            fought,
            outcome: TurnOutcome::Continue,
        })
    }

    /// Alternate attacks until someone dies or nothing can change.
    fn fight(&mut self, enemy: EntityId) -> Result<Option<Defeat>, WorldError> {
        loop {
            let forward = self.resolver.resolve(
                &mut self.world,
                self.player,
                enemy,
                &mut self.rng,
                &mut self.log,
            )?;
            if forward.defeat.is_some() {
                return Ok(forward.defeat);
            }

            let reply = self.resolver.resolve(
                &mut self.world,
                enemy,
                self.player,
                &mut self.rng,
                &mut self.log,
            )?;
            if reply.defeat.is_some() {
                return Ok(reply.defeat);
            }

            if !forward.outcome.can_progress() && !reply.outcome.can_progress() {
                self.log.record(Event::Stalemate { enemy });
                return Ok(None);
            }
        }
    }

    /// Replace a dead enemy with a visible treasure worth its loot.
    fn drop_loot(&mut self, enemy: EntityId, loot: Loot) {
        self.world.despawn(enemy);
        let item = self.world.spawn(
            loot.position,
            EntityInner::Item(ItemKind::Treasure { value: loot.value }),
        );
        if let Some(entity) = self.world.get_mut(item) {
            entity.set_visible(true);
        }
        self.log.record(Event::LootDropped {
            item,
            position: loot.position,
            value: loot.value,
        });
    }

    /// Perform one player command.
    ///
    /// Failed actions (blocked move, missing potion) are recorded as events
    /// and forfeit the action; they are not errors.
    ///
    /// # Errors
    ///
    /// [`WorldError`] if the player is no longer a placed player entity.
    pub fn perform(&mut self, command: Command) -> Result<TurnOutcome, WorldError> {
        if self.is_over() {
            return Ok(self.phase.outcome());
        }
        debug!(%command, "performing");

        match command {
            Command::Move(direction) => self.step(direction)?,
            Command::UsePotion(slot) => self.use_potion(slot)?,
            Command::Loot => self.loot()?,
            Command::Inspect => {
                let hero = self.world.player(self.player)?;
                self.log.record(Event::StatsInspected {
                    name: hero.name.clone(),
                    health: hero.combat.health(),
                    power: hero.combat.power(),
                    treasure_points: hero.treasure_points,
                    inventory: hero.inventory.len(),
                });
            }
            Command::End => {
                let hero = self.world.player(self.player)?;
                self.log.record(Event::SessionEnded {
                    health: hero.combat.health(),
                    power: hero.combat.power(),
                    treasure_points: hero.treasure_points,
                });
                self.phase = Phase::Exit;
                return Ok(TurnOutcome::Exit);
            }
        }

        self.phase = Phase::AwaitingEngagement;
        Ok(TurnOutcome::Continue)
    }

    fn step(&mut self, direction: Direction) -> Result<(), WorldError> {
        let entity = self.player;
        match self.world.move_entity(entity, direction) {
            Ok(to) => self.log.record(Event::Moved {
                entity,
                direction,
                to,
            }),
            Err(MoveError::Blocked(to)) => self.log.record(Event::MoveBlocked {
                entity,
                direction,
                to,
            }),
            Err(MoveError::NotPlaced) => return Err(WorldError::Unplaced(entity)),
        }
        Ok(())
    }

    fn use_potion(&mut self, slot: PotionSlot) -> Result<(), WorldError> {
        let hero = self.world.player_mut(self.player)?;
        let Some(item) = hero.inventory.take_first(|item| slot.matches(*item)) else {
            self.log.record(Event::PotionMissing { slot });
            return Ok(());
        };
        item.drink(hero);
        self.log.record(Event::PotionUsed {
            slot,
            item,
            health: hero.combat.health(),
            power: hero.combat.power(),
        });
        Ok(())
    }

    /// Pick up every visible item next to the player.
    fn loot(&mut self) -> Result<(), WorldError> {
        let mut adjacent = Vec::new();
        for &id in self.world.items() {
            let entity = self.world.entity(id)?;
            if entity.is_visible() && self.world.distance_between(self.player, id)? == 1 {
                if let Some(kind) = entity.as_item() {
                    adjacent.push((id, kind));
                }
            }
        }

        let mut taken = Vec::new();
        for (id, kind) in adjacent {
            let hero = self.world.player_mut(self.player)?;
            if kind.pick_up(hero, &mut self.rng) {
                self.world.despawn(id);
                taken.push(kind);
            }
        }
        self.log.record(Event::ItemsLooted { taken });
        Ok(())
    }

    /// Play one full turn: reveal, fight, then one command.
    ///
    /// Unparseable input is reported as [`Event::CommandRejected`] and
    /// forfeits the action. Exhausted input ends the session.
    ///
    /// # Arguments
    ///
    /// * `input` - Supplies the command line
    /// * `presenter` - Receives renders and every event of the turn
    ///
    /// # Errors
    ///
    /// [`WorldError`] if the world is inconsistent; the turn is abandoned.
    pub fn play_turn(
        &mut self,
        input: &mut impl CommandSource,
        presenter: &mut impl Presenter,
    ) -> Result<TurnOutcome, WorldError> {
        if self.is_over() {
            return Ok(self.phase.outcome());
        }
        self.turn += 1;
        debug!(turn = self.turn, "turn started");

        self.reveal()?;
        presenter.render(&self.world);

        let report = self.engage()?;
        self.announce(presenter);
        if report.outcome.is_terminal() {
            info!(turn = self.turn, outcome = ?report.outcome, "session over");
            return Ok(report.outcome);
        }
        if !report.fought.is_empty() {
            self.reveal()?;
            presenter.render(&self.world);
        }

        let outcome = match input.next_line() {
            None => self.perform(Command::End)?,
            Some(line) => match line.parse::<Command>() {
                Ok(command) => self.perform(command)?,
                Err(err) => {
                    self.log.record(Event::CommandRejected {
                        input: line.trim().to_string(),
                        reason: err.to_string(),
                    });
                    self.phase = Phase::AwaitingEngagement;
                    TurnOutcome::Continue
                }
            },
        };
        self.announce(presenter);
        if outcome.is_terminal() {
            info!(turn = self.turn, ?outcome, "session over");
        }
        Ok(outcome)
    }

    fn announce(&mut self, presenter: &mut impl Presenter) {
        for event in self.log.take_events() {
            presenter.announce(&event);
        }
    }
}
