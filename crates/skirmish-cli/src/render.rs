//! ASCII presenter.
//!
//! The map is drawn row by row over the generated extent, one symbol and a
//! space per cell: the first visible occupant's symbol, or `.` for an empty
//! or unexplored cell. Events become one line of narration each.

use std::io::Write;

use skirmish_core::entity::EntityId;
use skirmish_core::output::{Event, Style};
use skirmish_core::simulation::Presenter;
use skirmish_core::World;
use skirmish_grid::Position;
use tracing::warn;

/// Presenter writing plain text to any writer.
#[derive(Debug)]
pub struct TextPresenter<W> {
    out: W,
    /// Player id, to phrase events from the player's point of view
    player: Option<EntityId>,
}

impl<W: Write> TextPresenter<W> {
    /// Create a presenter over a writer.
    pub fn new(out: W) -> Self {
        Self { out, player: None }
    }

    /// Narrate events involving this entity as "you".
    #[must_use]
    pub fn with_player(mut self, player: EntityId) -> Self {
        self.player = Some(player);
        self
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(%err, "could not write output");
        }
    }
}

/// Draw the visible map over the world's extent.
#[must_use]
pub fn draw_map(world: &World) -> String {
    let extent = world.extent();
    let mut map = String::new();
    for row in 0..i32::try_from(extent.rows).unwrap_or(i32::MAX) {
        for col in 0..i32::try_from(extent.cols).unwrap_or(i32::MAX) {
            map.push(world.visible_symbol_at(Position::new(row, col)).unwrap_or('.'));
            map.push(' ');
        }
        map.push('\n');
    }
    map
}

/// One line of narration for an event.
///
/// `player` is addressed as "you"; every other entity by its id.
#[must_use]
pub fn describe(event: &Event, player: Option<EntityId>) -> String {
    let who = |id: EntityId| {
        if player == Some(id) {
            "you".to_string()
        } else {
            format!("entity {id}")
        }
    };
    let line = match event {
        Event::EngagementStarted { kind, .. } => format!("{kind} in range, commencing combat!"),
        Event::DamageDealt {
            attacker,
            defender,
            style,
            amount,
            critical,
            remaining,
        } => {
            let how = match style {
                Style::Melee => "hit",
                Style::Ranged => "shot",
            };
            let crit = if *critical { " Critical hit!" } else { "" };
            format!(
                "{} {how} {} for {amount} damage ({remaining} left).{crit}",
                who(*attacker),
                who(*defender)
            )
        }
        Event::AttackEvaded { defender, .. } => format!("{} evaded the attack!", who(*defender)),
        Event::AttackMissed { attacker, .. } => format!("{} missed!", who(*attacker)),
        Event::OutOfRange { attacker, distance, .. } => {
            format!("{} is too far away to attack ({distance} cells).", who(*attacker))
        }
        Event::EnemyDefeated { kind, .. } => format!("{kind} has been defeated!"),
        Event::PlayerDefeated {
            name,
            treasure_points,
            ..
        } => format!("Game Over! {name} has been defeated. Total treasure: {treasure_points}"),
        Event::LootDropped { position, value, .. } => {
            format!("Treasure worth {value} dropped at {position}.")
        }
        Event::Stalemate { .. } => "Neither side can reach the other; the fight breaks off.".to_string(),
        Event::Moved { direction, to, .. } => format!("Moved {direction} to {to}."),
        Event::MoveBlocked { direction, to, .. } => format!("Cannot move {direction}: {to} is occupied."),
        Event::PotionUsed {
            item, health, power, ..
        } => format!("Used {}! Health: {health}, power: {power}.", item.name().to_lowercase()),
        Event::PotionMissing { slot } => {
            format!("You don't have a potion for choice {}.", slot.number())
        }
        Event::ItemsLooted { taken } if taken.is_empty() => "Nothing to loot here.".to_string(),
        Event::ItemsLooted { taken } => {
            let names: Vec<&str> = taken.iter().map(|item| item.name()).collect();
            format!("Looted: {}.", names.join(", "))
        }
        Event::StatsInspected {
            name,
            health,
            power,
            treasure_points,
            inventory,
        } => format!(
            "Player: {name}\nHealth: {health}\nPower: {power}\nTreasure Points: {treasure_points}\nInventory: {inventory} item(s)"
        ),
        Event::CommandRejected { reason, .. } => format!("Invalid command: {reason}"),
        Event::SessionEnded {
            health,
            power,
            treasure_points,
        } => format!(
            "Exiting game........\nfinal stats:\nHealth: {health}\nPower: {power}\nTreasure Points: {treasure_points}"
        ),
    };
    capitalize(&line)
}

fn capitalize(line: &str) -> String {
    let mut chars = line.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn render(&mut self, world: &World) {
        let map = draw_map(world);
        if let Err(err) = write!(self.out, "{map}") {
            warn!(%err, "could not draw map");
        }
    }

    fn announce(&mut self, event: &Event) {
        let line = describe(event, self.player);
        self.emit(&line);
    }
}
