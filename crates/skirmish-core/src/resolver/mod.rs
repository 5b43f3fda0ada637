//! Resolvers turn intents into state changes.
//!
//! Combat is resolved in two halves: the dispatcher picks a style and builds
//! a [`Strike`], the defender's [`CombatState::receive_damage`] applies it.
//! Every observable step is recorded in an [`EventLog`].
//!
//! # Invariants
//!
//! - At most one attack is made per dispatch call
//! - Dead combatants neither attack nor take damage
//! - All randomness comes from the caller's RNG, so a seeded RNG replays a
//!   fight exactly
//!
//! # Available Resolvers
//!
//! - [`CombatResolver`]: melee/ranged dispatch and defeat reporting
//! - [`EventLog`]: ordered narration, mirrored to `tracing`
//!
//! [`CombatState::receive_damage`]: crate::entity::CombatState::receive_damage

mod combat;
mod damage;
mod event;

pub use combat::CombatResolver;
pub use damage::{DamageOutcome, Strike};
pub use event::EventLog;
