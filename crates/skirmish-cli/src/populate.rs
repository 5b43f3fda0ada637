//! Random world population.
//!
//! Every cell of the extent gets one roll:
//!
//! | roll        | content                                   |
//! |-------------|-------------------------------------------|
//! | `< 0.4`     | nothing                                   |
//! | `< 0.7`     | an enemy (goblin, orc, dragon equally)    |
//! | `< 0.8`     | a wall                                    |
//! | otherwise   | a potion (healing 75%, power 25%)         |
//!
//! The player then goes on a random free cell. Everything starts hidden
//! except the player.

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use skirmish_core::entity::{
    EnemyComponents, EnemyKind, EntityId, EntityInner, ItemKind, PlayerComponents,
};
use skirmish_core::{GameConfig, World};
use skirmish_grid::Position;
use tracing::debug;

const EMPTY_BELOW: f64 = 0.4;
const ENEMY_BELOW: f64 = 0.7;
const WALL_BELOW: f64 = 0.8;
const HEALING_SHARE: f64 = 0.75;

/// Build a populated world and place the configured player in it.
///
/// # Returns
///
/// The world and the player's id.
///
/// # Errors
///
/// Fails if population left no free cell for the player.
pub fn build_world<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<(World, EntityId)> {
    let extent = config.extent();
    let mut world = World::new(extent);

    for position in extent.positions() {
        let roll: f64 = rng.gen();
        if roll < EMPTY_BELOW {
            continue;
        }
        let inner = if roll < ENEMY_BELOW {
            let kind = EnemyKind::ALL[rng.gen_range(0..EnemyKind::ALL.len())];
            let combat = kind.roll(rng);
            let loot = EnemyKind::roll_loot(rng);
            EntityInner::Enemy(EnemyComponents::new(kind, combat, loot))
        } else if roll < WALL_BELOW {
            EntityInner::Item(ItemKind::Wall)
        } else if rng.gen::<f64>() < HEALING_SHARE {
            EntityInner::Item(ItemKind::roll_potion(rng))
        } else {
            EntityInner::Item(ItemKind::roll_power_potion(rng))
        };
        world.spawn(position, inner);
    }

    let free: Vec<Position> = extent.positions().filter(|p| world.is_free(*p)).collect();
    let Some(&start) = free.choose(rng) else {
        bail!("no free cell left for the player on a {}x{} map", extent.rows, extent.cols);
    };

    let combat = config.class.roll(rng);
    let player = world.spawn(
        start,
        EntityInner::Player(PlayerComponents::new(
            config.player_name.clone(),
            config.class,
            combat,
        )),
    );
    debug!(
        enemies = world.enemies().len(),
        items = world.items().len(),
        %start,
        "world populated"
    );
    Ok((world, player))
}
