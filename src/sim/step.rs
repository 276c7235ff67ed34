/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Player cooldown tick
///   2. Player input (at most one move)
///   3. Enemy updates, in roster order
///   4. Collision check (every living enemy against the player)
///
/// Only step 2 can change the grid. Randomness is injected by the caller
/// so the whole tick is reproducible from a seed or a scripted source.

use log::{info, trace};

use crate::domain::ai::{ChaseOutcome, ChaseRng};
use crate::domain::entity::Direction;
use crate::domain::rules;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: ChaseRng>(
    world: &mut WorldState,
    input: Option<Direction>,
    rng: &mut R,
) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    world.player.tick();
    resolve_player_input(world, input, &mut events);
    resolve_enemies(world, rng);
    resolve_collisions(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player_input(world: &mut WorldState, input: Option<Direction>, events: &mut Vec<GameEvent>) {
    if !world.player.alive { return; }
    let dir = match input { Some(d) => d, None => return };

    let dug_before = world.player.dirt_dug;
    if world.player.try_move(dir, &mut world.grid, &world.speed)
        && world.player.dirt_dug > dug_before
    {
        events.push(GameEvent::Dug { col: world.player.col, row: world.player.row });
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies: read the grid and the player, never write either
// ══════════════════════════════════════════════════════════════

fn resolve_enemies<R: ChaseRng>(world: &mut WorldState, rng: &mut R) {
    for (i, enemy) in world.enemies.iter_mut().enumerate() {
        let outcome = enemy.update(&world.player, &world.grid, &world.speed, rng);
        if let ChaseOutcome::Moved { .. } | ChaseOutcome::Blocked = outcome {
            trace!("tick {} enemy {i} {:?} -> ({}, {})", world.tick, outcome, enemy.col, enemy.row);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Collision
// ══════════════════════════════════════════════════════════════

fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let caught_by = world.enemies.iter().position(|e| rules::collides(e, &world.player));
    if let Some(enemy) = caught_by {
        info!(
            "player caught by enemy {enemy} at ({}, {}) on tick {}, {} dirt dug",
            world.player.col, world.player.row, world.tick, world.player.dirt_dug,
        );
        events.push(GameEvent::PlayerCaught { enemy });
        player_die(world);
    }
}

fn player_die(world: &mut WorldState) {
    world.player.kill();
    world.phase = Phase::GameOver;
}
