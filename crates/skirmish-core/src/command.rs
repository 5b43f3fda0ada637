//! Player command vocabulary.
//!
//! One line of input is one command. Parsing is case-insensitive and
//! ignores surrounding whitespace:
//!
//! | input                                  | command                      |
//! |----------------------------------------|------------------------------|
//! | `move up` / `move d` / ...             | [`Command::Move`]            |
//! | `use potion 1`, `use-potion 2`         | [`Command::UsePotion`]       |
//! | `loot`                                 | [`Command::Loot`]            |
//! | `inspect`, `show stats`, `stats`       | [`Command::Inspect`]         |
//! | `end`, `exit`                          | [`Command::End`]             |
//!
//! # Example
//!
//! ```
//! use skirmish_core::command::{Command, PotionSlot};
//! use skirmish_grid::Direction;
//!
//! assert_eq!("Move Left".parse(), Ok(Command::Move(Direction::Left)));
//! assert_eq!("use potion 2".parse(), Ok(Command::UsePotion(PotionSlot::Power)));
//! assert!("dance".parse::<Command>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skirmish_grid::{Direction, ParseDirectionError};
use thiserror::Error;

use crate::entity::ItemKind;

/// Which kind of potion to drink.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotionSlot {
    /// Slot 1: restores health
    Healing,
    /// Slot 2: raises power
    Power,
}

impl PotionSlot {
    /// True if the item belongs in this slot.
    #[must_use]
    pub const fn matches(self, item: ItemKind) -> bool {
        matches!(
            (self, item),
            (Self::Healing, ItemKind::Potion { .. }) | (Self::Power, ItemKind::PowerPotion { .. })
        )
    }

    /// Menu number shown to the player.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Healing => 1,
            Self::Power => 2,
        }
    }
}

impl FromStr for PotionSlot {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Healing),
            "2" => Ok(Self::Power),
            other => Err(CommandError::BadPotionSlot(other.to_string())),
        }
    }
}

/// One player action.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Step one cell.
    Move(Direction),
    /// Drink the first carried potion of a kind.
    UsePotion(PotionSlot),
    /// Pick up every visible item at distance 1.
    Loot,
    /// Report player stats.
    Inspect,
    /// End the session.
    End,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(direction) => write!(f, "move {direction}"),
            Self::UsePotion(slot) => write!(f, "use potion {}", slot.number()),
            Self::Loot => f.write_str("loot"),
            Self::Inspect => f.write_str("inspect"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Input that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank line.
    #[error("no command given")]
    Empty,

    /// Not in the vocabulary.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// `move` without a direction.
    #[error("move needs a direction: up, down, left or right")]
    MissingDirection,

    /// `move` with something that is not a direction.
    #[error(transparent)]
    BadDirection(#[from] ParseDirectionError),

    /// `use potion` without a slot.
    #[error("which potion? 1 = healing, 2 = power")]
    MissingPotionSlot,

    /// A slot other than 1 or 2.
    #[error("invalid potion choice: {0:?}")]
    BadPotionSlot(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim().to_lowercase();
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => Err(CommandError::Empty),
            ["move"] => Err(CommandError::MissingDirection),
            ["move", direction] => Ok(Self::Move(direction.parse()?)),
            ["use", "potion"] | ["use-potion"] => Err(CommandError::MissingPotionSlot),
            ["use", "potion", slot] | ["use-potion", slot] => Ok(Self::UsePotion(slot.parse()?)),
            ["loot"] => Ok(Self::Loot),
            ["inspect"] | ["stats"] | ["show", "stats"] => Ok(Self::Inspect),
            ["end"] | ["exit"] => Ok(Self::End),
            _ => Err(CommandError::Unknown(s.trim().to_string())),
        }
    }
}
