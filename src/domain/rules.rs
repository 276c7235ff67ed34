/// Movement rules and the collision predicate, truth-table driven.
///
/// Pure functions operating on the grid: they encode "what is legal"
/// without performing the action. `Player::try_move` and `Enemy::update`
/// apply the results.
///
/// ## Player Step
/// ┌──────────────────────────┬────────────────┬──────────────────────┐
/// │ Condition (in order)     │ Result         │ Notes                │
/// ├──────────────────────────┼────────────────┼──────────────────────┤
/// │ Dest out of bounds       │ DENY           │ grid edge            │
/// │ Dest Dirt, dir = Up      │ DENY           │ never dig upward     │
/// │ Dest Dirt                │ ALLOW + dig    │ Dirt becomes Tunnel  │
/// │ Dest Empty / Tunnel      │ ALLOW          │                      │
/// │ Dest Rock                │ DENY           │                      │
/// └──────────────────────────┴────────────────┴──────────────────────┘
///
/// ## Enemy Step
/// ┌──────────────────────────┬────────────────┬──────────────────────┐
/// │ Condition (in order)     │ Result         │ Notes                │
/// ├──────────────────────────┼────────────────┼──────────────────────┤
/// │ Dest out of bounds       │ DENY           │                      │
/// │ Dest Rock                │ DENY           │                      │
/// │ Dest Dirt                │ ALLOW, ghost   │ grid untouched       │
/// │ Dest Empty / Tunnel      │ ALLOW          │                      │
/// └──────────────────────────┴────────────────┴──────────────────────┘
///
/// The cooldown gate is entity state, checked by the callers.

use super::entity::{Direction, Enemy, Player};
use super::grid::Grid;

/// A legal player move: destination and whether it digs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerStep {
    pub col: i32,
    pub row: i32,
    pub digs: bool,
}

/// A legal enemy move: destination and whether it ghosts through dirt.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EnemyStep {
    pub col: i32,
    pub row: i32,
    pub ghosting: bool,
}

pub fn player_step(grid: &Grid, col: i32, row: i32, dir: Direction) -> Option<PlayerStep> {
    let (col, row) = dir.apply(col, row);
    if !grid.in_bounds(row, col) { return None; }

    let dest = grid.get(row, col);
    if dest.is_diggable() {
        if dir == Direction::Up { return None; }
        return Some(PlayerStep { col, row, digs: true });
    }
    if dest.is_open() {
        Some(PlayerStep { col, row, digs: false })
    } else {
        None
    }
}

pub fn enemy_step(grid: &Grid, col: i32, row: i32, dir: Direction) -> Option<EnemyStep> {
    let (col, row) = dir.apply(col, row);
    if !grid.in_bounds(row, col) { return None; }

    let dest = grid.get(row, col);
    if !dest.is_enemy_passable() { return None; }
    Some(EnemyStep { col, row, ghosting: dest.slows_enemies() })
}

/// True iff both are alive and share a cell.
pub fn collides(enemy: &Enemy, player: &Player) -> bool {
    enemy.alive && player.alive && enemy.col == player.col && enemy.row == player.row
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
