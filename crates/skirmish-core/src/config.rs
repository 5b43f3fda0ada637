//! Session configuration.
//!
//! A [`GameConfig`] is plain data: every field has a default, so a config
//! file only needs the fields it wants to change. Frontends load it (the CLI
//! reads JSON), apply their own overrides, then call
//! [`GameConfig::validate`] before building a world.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skirmish_grid::Extent;
use thiserror::Error;
use tracing::info;

use crate::entity::HeroClass;
use crate::world::REVEAL_RADIUS;

/// Smallest accepted map side.
pub const MIN_EXTENT: u32 = 10;

/// Parameters of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Map rows
    pub rows: u32,
    /// Map columns
    pub cols: u32,
    /// Manhattan radius revealed around the player each turn
    pub reveal_radius: u32,
    /// RNG seed (None = random, logged at startup)
    pub seed: Option<u64>,
    /// Player name
    pub player_name: String,
    /// Player class
    pub class: HeroClass,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: MIN_EXTENT,
            cols: MIN_EXTENT,
            reveal_radius: REVEAL_RADIUS,
            seed: None,
            player_name: "Hero".to_string(),
            class: HeroClass::Warrior,
        }
    }
}

impl GameConfig {
    /// Generated map size.
    #[must_use]
    pub const fn extent(&self) -> Extent {
        Extent::new(self.rows, self.cols)
    }

    /// The session's random stream and the seed it was built from.
    ///
    /// Without a configured seed a random one is drawn. The seed is logged
    /// either way, so any game can be replayed. Population and play should
    /// both draw from this one stream.
    #[must_use]
    pub fn session_rng(&self) -> (u64, ChaCha8Rng) {
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(seed, configured = self.seed.is_some(), "session seeded");
        (seed, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Check the config describes a playable session.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ExtentTooSmall`] below 10×10,
    /// [`ConfigError::InvalidRevealRadius`] for a zero radius.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_EXTENT || self.cols < MIN_EXTENT {
            return Err(ConfigError::ExtentTooSmall {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.reveal_radius == 0 {
            return Err(ConfigError::InvalidRevealRadius(self.reveal_radius));
        }
        Ok(())
    }
}

/// A config that cannot start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Map smaller than the minimum on either side.
    #[error("map must be at least {min}x{min}, got {rows}x{cols}", min = MIN_EXTENT)]
    ExtentTooSmall {
        /// Requested rows
        rows: u32,
        /// Requested columns
        cols: u32,
    },

    /// The player would never see anything.
    #[error("reveal radius must be positive, got {0}")]
    InvalidRevealRadius(u32),
}
