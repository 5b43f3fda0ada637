//! Event log for narration and telemetry.
//!
//! The `EventLog` records every [`Event`] produced while resolving combat and
//! commands. Recording also emits a `tracing` record, so a subscriber sees
//! the same stream a presenter does.
//!
//! # Usage
//!
//! Drain the log with [`EventLog::take_events`] after each phase and hand the
//! events to a presenter.

use tracing::{debug, info, warn};

use crate::output::Event;

/// Ordered record of session events.
///
/// # Example
///
/// ```
/// use skirmish_core::entity::EntityId;
/// use skirmish_core::output::Event;
/// use skirmish_core::resolver::EventLog;
///
/// let mut log = EventLog::new();
/// log.record(Event::Stalemate { enemy: EntityId::new(2) });
/// assert_eq!(log.len(), 1);
///
/// let events = log.take_events();
/// assert_eq!(events.len(), 1);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and trace it.
    pub fn record(&mut self, event: Event) {
        trace_event(&event);
        self.events.push(event);
    }

    /// Drain and return all recorded events in order.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discard all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Emit the tracing record for an event.
fn trace_event(event: &Event) {
    match event {
        Event::EngagementStarted { enemy, kind } => {
            info!(%enemy, %kind, "in range, commencing combat");
        }
        Event::DamageDealt {
            attacker,
            defender,
            style,
            amount,
            critical,
            remaining,
        } => {
            debug!(%attacker, %defender, ?style, amount, critical, remaining, "damage dealt");
        }
        Event::AttackEvaded {
            attacker,
            defender,
            style,
        } => {
            debug!(%attacker, %defender, ?style, "attack evaded");
        }
        Event::AttackMissed { attacker, defender } => {
            debug!(%attacker, %defender, "attack missed");
        }
        Event::OutOfRange {
            attacker,
            defender,
            distance,
        } => {
            debug!(%attacker, %defender, distance, "out of range");
        }
        Event::EnemyDefeated { enemy, kind } => {
            info!(%enemy, %kind, "enemy defeated");
        }
        Event::PlayerDefeated {
            player,
            name,
            treasure_points,
        } => {
            info!(%player, name = name.as_str(), treasure_points, "game over");
        }
        Event::LootDropped {
            item,
            position,
            value,
        } => {
            info!(%item, %position, value, "loot dropped");
        }
        Event::Stalemate { enemy } => {
            warn!(%enemy, "neither side can land a blow, abandoning fight");
        }
        Event::Moved {
            entity,
            direction,
            to,
        } => {
            debug!(%entity, %direction, %to, "moved");
        }
        Event::MoveBlocked {
            entity,
            direction,
            to,
        } => {
            debug!(%entity, %direction, %to, "move blocked");
        }
        Event::PotionUsed {
            slot,
            health,
            power,
            ..
        } => {
            debug!(?slot, health, power, "potion used");
        }
        Event::PotionMissing { slot } => {
            debug!(?slot, "no potion of that kind");
        }
        Event::ItemsLooted { taken } => {
            debug!(count = taken.len(), "items looted");
        }
        Event::StatsInspected { .. } => {
            debug!("stats inspected");
        }
        Event::CommandRejected { input, reason } => {
            warn!(input = input.as_str(), reason = reason.as_str(), "command rejected");
        }
        Event::SessionEnded {
            health,
            power,
            treasure_points,
        } => {
            info!(health, power, treasure_points, "session ended");
        }
    }
}
