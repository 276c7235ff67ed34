/// Entities: Player and Enemy, plus the Direction they move in.
/// Movement is cooldown-gated: a successful move sets the cooldown,
/// and only `tick()` (player) or `update()` (enemy) count it down.

use crate::config::SpeedConfig;

use super::grid::Grid;
use super::rules;
use super::tile::Tile;

/// Movement direction. No diagonals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset as (dcol, drow).
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The cell one step from (col, row), as (col, row).
    pub fn apply(self, col: i32, row: i32) -> (i32, i32) {
        let (dc, dr) = self.offset();
        (col + dc, row + dr)
    }

    /// The three directions other than `self`, in `ALL` order.
    pub fn others(self) -> [Direction; 3] {
        let mut out = [self; 3];
        let mut n = 0;
        for d in Direction::ALL {
            if d != self {
                out[n] = d;
                n += 1;
            }
        }
        out
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub col: i32,
    pub row: i32,
    pub facing: Direction,
    pub alive: bool,
    pub dirt_dug: u32,
    pub move_cooldown: u32, // ticks until the next move is permitted
}

impl Player {
    pub fn new(col: i32, row: i32) -> Self {
        Player {
            col, row,
            facing: Direction::Right,
            alive: true,
            dirt_dug: 0,
            move_cooldown: 0,
        }
    }

    /// Attempt one step. Digs through dirt (never upward), stops at rock.
    /// Returns whether the player moved; a rejected move changes nothing.
    pub fn try_move(&mut self, dir: Direction, grid: &mut Grid, speed: &SpeedConfig) -> bool {
        if self.move_cooldown > 0 { return false; }

        let step = match rules::player_step(grid, self.col, self.row, dir) {
            Some(s) => s,
            None => return false,
        };

        if step.digs {
            grid.set(step.row, step.col, Tile::Tunnel);
            self.dirt_dug += 1;
        }

        self.col = step.col;
        self.row = step.row;
        self.facing = dir;
        self.move_cooldown = if step.digs {
            speed.player_dig_cooldown
        } else {
            speed.player_walk_cooldown
        };
        true
    }

    /// Advance one frame of cooldown.
    pub fn tick(&mut self) {
        if self.move_cooldown > 0 {
            self.move_cooldown -= 1;
        }
    }

    /// Death only flips aliveness; position and counters stay for the HUD.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Enemy variants. Both chase identically for now; FireBreather is
/// kept distinct so the roster and renderer can tell them apart.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnemyKind {
    Chaser,
    FireBreather,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub col: i32,
    pub row: i32,
    pub facing: Direction,
    pub alive: bool,
    pub move_cooldown: u32,
    pub ghosting: bool, // last move went through dirt
}

impl Enemy {
    pub fn new(kind: EnemyKind, col: i32, row: i32) -> Self {
        Enemy {
            kind, col, row,
            facing: Direction::Left,
            alive: true,
            move_cooldown: 0,
            ghosting: false,
        }
    }

    /// Attempt one step in `dir`. Enemies burrow through dirt without
    /// changing it, which is slower than moving through open space.
    pub fn try_step(&mut self, dir: Direction, grid: &Grid, speed: &SpeedConfig) -> bool {
        let step = match rules::enemy_step(grid, self.col, self.row, dir) {
            Some(s) => s,
            None => return false,
        };

        self.col = step.col;
        self.row = step.row;
        self.facing = dir;
        self.ghosting = step.ghosting;
        self.move_cooldown = if step.ghosting {
            speed.enemy_dirt_cooldown
        } else {
            speed.enemy_tunnel_cooldown
        };
        true
    }
}
