//! # Skirmish Core
//!
//! Turn-based grid combat engine.
//!
//! This crate provides the combat rules, the world context and the turn
//! sequencer for a single-player dungeon skirmish. It knows nothing about
//! terminals: input arrives through a [`CommandSource`] and output leaves
//! through a [`Presenter`].
//!
//! ## Architecture
//!
//! - **Entities**: players, enemies and items; fighters carry a
//!   [`CombatState`] whose capability set (melee, ranged, physical, magic)
//!   decides how they fight
//! - **World**: owns the occupancy grid and every entity collection
//! - **Resolvers**: the combat dispatcher and damage pipeline
//! - **Session**: the per-turn state machine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skirmish_core::{GameConfig, Session};
//!
//! let config = GameConfig { seed: Some(7), ..GameConfig::default() };
//! let (seed, rng) = config.session_rng();
//! let mut session = Session::seeded(world, player, &config, seed, rng)?;
//! while !session.play_turn(&mut input, &mut screen)?.is_terminal() {}
//! ```
//!
//! [`CommandSource`]: simulation::CommandSource
//! [`Presenter`]: simulation::Presenter
//! [`CombatState`]: entity::CombatState

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the grid for positions and directions
pub use skirmish_grid;

pub mod command;
pub mod config;
pub mod entity;
pub mod output;
pub mod resolver;
pub mod simulation;
pub mod world;

#[cfg(test)]
mod tests;

pub use command::{Command, CommandError, PotionSlot};
pub use config::{ConfigError, GameConfig};
pub use output::{Event, TurnOutcome};
pub use simulation::{CommandSource, Phase, Presenter, Session};
pub use world::{World, WorldError};
