//! Damage and mitigation pipeline.
//!
//! Every attack is resolved in a fixed order:
//!
//! 1. Attacker side builds a [`Strike`]: physical strikes start from raw
//!    power and may crit (x2); magic strikes start from power x1.5 and are
//!    scaled by the elemental matchup, then rounded.
//! 2. Defender side runs [`CombatState::receive_damage`]: a mitigating
//!    defender rolls its own evasion gate, then reduces the amount; every
//!    defender then rolls the shared evasion gate; what is left is subtracted
//!    from health.
//!
//! Physical and magic are exclusive families: criticals never touch spells
//! and elements never touch physical strikes. All rounding is half away from
//! zero. Death is not handled here; callers read
//! [`CombatState::is_dead`] afterwards.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::components::{round_half_away, MAGIC_POWER_FACTOR};
use crate::entity::{AttackFamily, CombatState, Element, Matchup};

/// A candidate amount of damage on its way to a defender.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    /// Amount before defender mitigation
    pub amount: i32,
    /// Damage family
    pub family: AttackFamily,
    /// Whether a critical hit doubled the amount
    pub critical: bool,
    /// Elemental matchup, for magic strikes against an elemental target
    pub matchup: Option<Matchup>,
}

impl Strike {
    /// Build a physical strike: raw power, doubled on a critical roll.
    pub fn physical<R: Rng + ?Sized>(attacker: &CombatState, rng: &mut R) -> Self {
        let base = attacker.power().max(0);
        let critical = attacker.roll_critical(rng);
        let amount = if critical { base.saturating_mul(2) } else { base };
        Self {
            amount,
            family: AttackFamily::Physical,
            critical,
            matchup: None,
        }
    }

    /// Build a magic strike against a target with the given element.
    ///
    /// A target with no element skips scaling entirely.
    #[must_use]
    pub fn magic(attacker: &CombatState, target: Option<Element>) -> Self {
        let base = f64::from(attacker.power().max(0)) * MAGIC_POWER_FACTOR;
        let matchup = attacker
            .element()
            .zip(target)
            .map(|(own, theirs)| own.matchup(theirs));
        let scaled = matchup.map_or(base, |m| base * m.multiplier());
        Self {
            amount: round_half_away(scaled),
            family: AttackFamily::Magic,
            critical: false,
            matchup,
        }
    }
}

/// What happened when a strike reached its defender.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Damage was subtracted.
    Landed {
        /// Amount after mitigation
        amount: i32,
        /// Health afterwards (may be negative)
        remaining: i32,
    },
    /// One of the evasion gates negated the strike.
    Evaded,
    /// The defender was already dead; nothing changed.
    Ignored,
}

impl CombatState {
    /// Run the defender side of the pipeline.
    ///
    /// Dead defenders ignore further strikes, so damage can never revive
    /// anyone.
    pub fn receive_damage<R: Rng + ?Sized>(&mut self, strike: &Strike, rng: &mut R) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        if self.mitigation.has_own_evasion_gate() && self.try_evade(rng) {
            trace!(mitigation = ?self.mitigation, "evaded before mitigation");
            return DamageOutcome::Evaded;
        }
        let amount = self.mitigation.mitigate(strike.amount, strike.family).max(0);
        if self.try_evade(rng) {
            trace!("evaded");
            return DamageOutcome::Evaded;
        }
        self.health -= amount;
        DamageOutcome::Landed {
            amount,
            remaining: self.health,
        }
    }
}
