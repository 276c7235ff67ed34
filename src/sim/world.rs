/// WorldState: the complete state of a running session.
///
/// The session owns the grid, the player and the enemy roster. The domain
/// operations borrow what they need per call; nothing holds a reference
/// back into the world.
///
/// ## Grid ownership
///
/// Only the player mutates the grid (dig: Dirt → Tunnel). Enemies and the
/// renderer read it. `load_level` restores the starting layout.

use crate::config::SpeedConfig;
use crate::domain::entity::{Enemy, Player};
use crate::domain::grid::Grid;
use crate::sim::level;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
}

pub struct WorldState {
    // ── Terrain ──
    pub grid: Grid,

    // ── Entities ──
    pub player: Player,
    /// Fixed roster, iterated in order every tick. Dead enemies keep their slot.
    pub enemies: Vec<Enemy>,

    // ── Speed config ──
    pub speed: SpeedConfig,

    // ── Meta ──
    pub phase: Phase,
    pub paused: bool,
    pub tick: u64,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl WorldState {
    /// A fresh session at the start of the level.
    pub fn new(speed: SpeedConfig) -> Self {
        let mut world = WorldState {
            grid: Grid::new(),
            player: Player::new(level::PLAYER_SPAWN.0, level::PLAYER_SPAWN.1),
            enemies: Vec::with_capacity(level::MAX_ENEMIES),
            speed,
            phase: Phase::Playing,
            paused: false,
            tick: 0,
            message: String::new(),
            message_timer: 0,
        };
        level::load_level(&mut world);
        world
    }

    /// Back to the start of the level.
    pub fn restart(&mut self) {
        level::load_level(self);
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the message timer; clears the message when it expires.
    /// A duration of 0 means the message stays until replaced.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 { self.message.clear(); }
        }
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_expires() {
        let mut w = WorldState::new(SpeedConfig::default());
        w.set_message("hello", 2);
        w.tick_message();
        assert_eq!(w.message, "hello");
        w.tick_message();
        assert!(w.message.is_empty());
    }

    #[test]
    fn sticky_message_stays() {
        let mut w = WorldState::new(SpeedConfig::default());
        w.set_message("PAUSED", 0);
        for _ in 0..10 { w.tick_message(); }
        assert_eq!(w.message, "PAUSED");
    }

    #[test]
    fn dead_enemies_are_skipped_but_keep_their_slot() {
        let mut w = WorldState::new(SpeedConfig::default());
        let total = w.enemies.len();
        w.enemies[0].alive = false;
        assert_eq!(w.enemies.len(), total);
        assert_eq!(w.living_enemies().count(), total - 1);
    }
}
