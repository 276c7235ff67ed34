/// Level setup: the starting grid, the player spawn and the enemy roster.
///
/// There is a single built-in level. The grid layout lives in
/// `Grid::init`; the spawn cells below are placed to fit it.
///
/// ## Roster
///   Chaser        col 19, row 5   right edge, in the dirt band
///   Chaser        col 5,  row 10  deep, left
///   FireBreather  col 10, row 8   just under the rock

use log::{info, warn};

use crate::domain::entity::{Enemy, EnemyKind, Player};
use crate::domain::grid::Grid;
use crate::domain::tile::Tile;
use crate::sim::world::{Phase, WorldState};

/// Player spawn (col, row): the middle of the pre-dug tunnel.
pub const PLAYER_SPAWN: (i32, i32) = (10, 2);

/// Upper bound on simultaneously tracked enemies.
pub const MAX_ENEMIES: usize = 10;

/// Enemy spawn roster: (kind, col, row).
pub const ENEMY_ROSTER: &[(EnemyKind, i32, i32)] = &[
    (EnemyKind::Chaser, 19, 5),
    (EnemyKind::Chaser, 5, 10),
    (EnemyKind::FireBreather, 10, 8),
];

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Reset the world to the start of the level: fresh grid, player at
/// spawn, full roster. Preserves speed settings.
pub fn load_level(world: &mut WorldState) {
    world.grid.init();
    world.player = Player::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1);
    world.enemies.clear();
    for &(kind, col, row) in ENEMY_ROSTER {
        spawn_enemy(world, kind, col, row);
    }
    world.phase = Phase::Playing;
    world.paused = false;
    world.tick = 0;
    world.message.clear();
    world.message_timer = 0;
    info!(
        "level loaded: player at {:?}, {} enemies, {} dirt cells",
        PLAYER_SPAWN,
        world.enemies.len(),
        world.grid.count(Tile::Dirt),
    );
}

/// Add an enemy to the roster. Rejected (with a warning) when the roster
/// is full or the spawn cell is off the grid or solid rock.
pub fn spawn_enemy(world: &mut WorldState, kind: EnemyKind, col: i32, row: i32) -> bool {
    if world.enemies.len() >= MAX_ENEMIES {
        warn!("roster full ({MAX_ENEMIES}); dropping {kind:?} at ({col}, {row})");
        return false;
    }
    if !spawn_cell_ok(&world.grid, col, row) {
        warn!("invalid spawn cell ({col}, {row}) for {kind:?}");
        return false;
    }
    world.enemies.push(Enemy::new(kind, col, row));
    true
}

fn spawn_cell_ok(grid: &Grid, col: i32, row: i32) -> bool {
    grid.in_bounds(row, col) && grid.get(row, col).is_enemy_passable()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedConfig;
    use crate::domain::entity::Direction;

    #[test]
    fn roster_spawns_are_valid() {
        let grid = Grid::new();
        for &(_, col, row) in ENEMY_ROSTER {
            assert!(spawn_cell_ok(&grid, col, row), "({col}, {row})");
        }
        assert!(ENEMY_ROSTER.len() <= MAX_ENEMIES);
    }

    #[test]
    fn load_level_builds_the_session() {
        let world = WorldState::new(SpeedConfig::default());
        assert_eq!((world.player.col, world.player.row), PLAYER_SPAWN);
        assert_eq!(world.player.facing, Direction::Right);
        assert_eq!(world.grid.get(PLAYER_SPAWN.1, PLAYER_SPAWN.0), Tile::Tunnel);
        assert_eq!(world.enemies.len(), ENEMY_ROSTER.len());
        assert_eq!(world.enemies[2].kind, EnemyKind::FireBreather);
        assert_eq!(world.phase, Phase::Playing);
    }

    #[test]
    fn spawn_rejects_bad_cells() {
        let mut world = WorldState::new(SpeedConfig::default());
        let n = world.enemies.len();
        assert!(!spawn_enemy(&mut world, EnemyKind::Chaser, 20, 5)); // off the right edge
        assert!(!spawn_enemy(&mut world, EnemyKind::Chaser, 3, -1));
        assert!(!spawn_enemy(&mut world, EnemyKind::Chaser, 10, 5)); // rock
        assert_eq!(world.enemies.len(), n);
    }

    #[test]
    fn roster_is_bounded() {
        let mut world = WorldState::new(SpeedConfig::default());
        while world.enemies.len() < MAX_ENEMIES {
            assert!(spawn_enemy(&mut world, EnemyKind::Chaser, 0, 14));
        }
        assert!(!spawn_enemy(&mut world, EnemyKind::Chaser, 0, 14));
        assert_eq!(world.enemies.len(), MAX_ENEMIES);
    }

    #[test]
    fn reload_restores_grid_and_roster() {
        let mut world = WorldState::new(SpeedConfig::default());
        world.grid.set(9, 9, Tile::Tunnel);
        world.player.dirt_dug = 7;
        world.player.alive = false;
        world.enemies[0].alive = false;
        world.phase = Phase::GameOver;

        load_level(&mut world);
        assert_eq!(world.grid, Grid::new());
        assert_eq!(world.player.dirt_dug, 0);
        assert!(world.player.alive);
        assert!(world.enemies.iter().all(|e| e.alive));
        assert_eq!(world.phase, Phase::Playing);
    }
}
