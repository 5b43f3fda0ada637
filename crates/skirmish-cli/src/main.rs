//! Terminal frontend for Skirmish.
//!
//! Builds a random map, places the hero, and plays turns against stdin until
//! the hero dies or the player types `end`.
//!
//! # Architecture
//!
//! ```text
//! flags + config file --> GameConfig --> populate --> Session
//!                                                       |
//!                       stdin --> PromptedInput --> play_turn --> TextPresenter --> stdout
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`). The seed is logged at
//! `info`, so `RUST_LOG=info` plus `--seed` replays a game.

mod input;
mod populate;
mod render;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use skirmish_core::entity::HeroClass;
use skirmish_core::{GameConfig, Session};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::input::PromptedInput;
use crate::render::TextPresenter;

/// Consecutive failed turns tolerated before giving up.
const MAX_FAILED_TURNS: u32 = 3;

#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(author, version, about = "Turn-based grid skirmish in the terminal", long_about = None)]
struct Cli {
    /// JSON config file; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map rows (at least 10)
    #[arg(short, long)]
    rows: Option<u32>,

    /// Map columns (at least 10)
    #[arg(short = 'k', long)]
    cols: Option<u32>,

    /// RNG seed; random if omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Hero name
    #[arg(short, long)]
    name: Option<String>,

    /// Hero class: warrior, mage or archer (or 1, 2, 3)
    #[arg(short = 'C', long)]
    class: Option<HeroClass>,

    /// Manhattan radius revealed around the hero each turn
    #[arg(long)]
    reveal_radius: Option<u32>,
}

impl Cli {
    /// Merge the config file (if any) with the flags, flags winning.
    fn load_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => GameConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(name) = &self.name {
            config.player_name.clone_from(name);
        }
        if let Some(class) = self.class {
            config.class = class;
        }
        if let Some(radius) = self.reveal_radius {
            config.reveal_radius = radius;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn read_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    info!(rows = config.rows, cols = config.cols, class = %config.class, "starting session");
    let (seed, mut rng) = config.session_rng();
    let (world, player) = populate::build_world(&config, &mut rng)?;
    let mut session = Session::seeded(world, player, &config, seed, rng)?;

    let stdin = io::stdin();
    let mut input = PromptedInput::new(stdin.lock(), io::stdout());
    let mut screen = TextPresenter::new(io::stdout()).with_player(player);

    let mut failed_turns = 0;
    loop {
        match session.play_turn(&mut input, &mut screen) {
            Ok(outcome) if outcome.is_terminal() => {
                info!(?outcome, turns = session.turn(), seed, "session finished");
                break;
            }
            Ok(_) => failed_turns = 0,
            Err(err) => {
                failed_turns += 1;
                error!(%err, failed_turns, "turn abandoned");
                if failed_turns >= MAX_FAILED_TURNS {
                    bail!("giving up after {failed_turns} failed turns: {err}");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("skirmish").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        let config = parse(&[]).load_config().unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--rows", "12", "--cols", "15", "--seed", "9", "--name", "Ash", "--class", "archer",
        ])
        .load_config()
        .unwrap();
        assert_eq!((config.rows, config.cols), (12, 15));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.player_name, "Ash");
        assert_eq!(config.class, HeroClass::Archer);
    }

    #[test]
    fn numeric_class_choice() {
        assert_eq!(parse(&["-C", "2"]).class, Some(HeroClass::Mage));
        assert!(Cli::try_parse_from(["skirmish", "--class", "bard"]).is_err());
    }

    #[test]
    fn small_maps_are_rejected() {
        let err = parse(&["--rows", "9"]).load_config().unwrap_err();
        assert!(format!("{err:#}").contains("at least 10x10"));
    }

    #[test]
    fn config_file_then_flags() {
        let path = std::env::temp_dir().join(format!("skirmish-config-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"rows": 20, "cols": 20, "player_name": "File", "seed": 5}}"#).unwrap();
        drop(file);

        let config = parse(&["--config", path.to_str().unwrap(), "--cols", "11"])
            .load_config()
            .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!((config.rows, config.cols), (20, 11));
        assert_eq!(config.player_name, "File");
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let err = parse(&["--config", "/nonexistent/skirmish.json"])
            .load_config()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/skirmish.json"));
    }
}
