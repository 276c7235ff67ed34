/// Enemy AI: axis-priority chase blended with random wandering.
///
/// Each ready tick builds a small ordered plan of candidate directions:
///   1. **Wander**: a uniformly random direction, only when the
///      `enemy_wander_chance` roll hits.
///   2. **Chase**: the heuristic direction toward the player.
///   3. **Detour**: one of the three non-chase directions, drawn uniformly.
///
/// The first candidate that can be entered is taken. The detour is the
/// last attempt; if it is blocked too, the enemy stays put this tick.
///
/// All randomness goes through `ChaseRng`, so the plan can be tested
/// with a scripted source.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::SpeedConfig;

use super::entity::{Direction, Enemy, Player};
use super::grid::Grid;

/// Random source used by the chase AI.
pub trait ChaseRng {
    /// Uniform in `0..100`.
    fn percent(&mut self) -> u32;
    /// Uniform in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

impl ChaseRng for StdRng {
    fn percent(&mut self) -> u32 {
        self.random_range(0..100)
    }

    fn index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Which plan entry produced a move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    Wander,
    Chase,
    Detour,
}

/// What an enemy did this tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChaseOutcome {
    /// Dead enemies never act.
    Inactive,
    /// Spent the tick counting down its cooldown.
    CoolingDown,
    Moved { dir: Direction, by: Strategy },
    /// Every candidate was blocked.
    Blocked,
}

/// Direction toward the target along the axis with the larger delta.
/// Horizontal only wins on a strictly larger |dx|; ties go vertical.
pub fn heuristic_direction(dx: i32, dy: i32) -> Direction {
    if dx.abs() > dy.abs() {
        if dx > 0 { Direction::Right } else { Direction::Left }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Ordered candidate directions for one ready tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ChasePlan {
    pub wander: Option<Direction>,
    pub chase: Direction,
    pub detour: Direction,
}

impl ChasePlan {
    /// Draw a plan: roll for a wander, then pick the detour among the
    /// directions other than `chase`.
    pub fn draw<R: ChaseRng>(chase: Direction, wander_chance: u32, rng: &mut R) -> Self {
        let wander = if rng.percent() < wander_chance {
            Some(Direction::ALL[rng.index(Direction::ALL.len())])
        } else {
            None
        };
        let others = chase.others();
        let detour = others[rng.index(others.len())];
        ChasePlan { wander, chase, detour }
    }

    /// Candidates in evaluation order.
    pub fn candidates(&self) -> impl Iterator<Item = (Strategy, Direction)> {
        let wander = self.wander.map(|d| (Strategy::Wander, d));
        wander.into_iter().chain([
            (Strategy::Chase, self.chase),
            (Strategy::Detour, self.detour),
        ])
    }
}

impl Enemy {
    /// Advance this enemy by one tick.
    pub fn update<R: ChaseRng>(
        &mut self,
        player: &Player,
        grid: &Grid,
        speed: &SpeedConfig,
        rng: &mut R,
    ) -> ChaseOutcome {
        if !self.alive { return ChaseOutcome::Inactive; }

        if self.move_cooldown > 0 {
            self.move_cooldown -= 1;
            return ChaseOutcome::CoolingDown;
        }

        let chase = heuristic_direction(player.col - self.col, player.row - self.row);
        let plan = ChasePlan::draw(chase, speed.enemy_wander_chance, rng);

        for (by, dir) in plan.candidates() {
            if self.try_step(dir, grid, speed) {
                return ChaseOutcome::Moved { dir, by };
            }
        }
        ChaseOutcome::Blocked
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::entity::EnemyKind;
    use crate::domain::tile::Tile;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Scripted random source: `percent()` and `index()` pop from their own
    /// queues. An empty percent queue never wanders; an empty index queue
    /// picks 0.
    #[derive(Default)]
    pub(crate) struct Scripted {
        pub percents: VecDeque<u32>,
        pub indices: VecDeque<usize>,
    }

    impl Scripted {
        /// Never wanders, always detours to the first alternative.
        pub fn steady() -> Self {
            Scripted::default()
        }

        pub fn new(percents: &[u32], indices: &[usize]) -> Self {
            Scripted {
                percents: percents.iter().copied().collect(),
                indices: indices.iter().copied().collect(),
            }
        }
    }

    impl ChaseRng for Scripted {
        fn percent(&mut self) -> u32 {
            self.percents.pop_front().unwrap_or(99)
        }
        fn index(&mut self, len: usize) -> usize {
            self.indices.pop_front().unwrap_or(0) % len
        }
    }

    fn speed() -> SpeedConfig {
        SpeedConfig::default()
    }

    // ── Heuristic ──

    #[test]
    fn heuristic_prefers_larger_axis() {
        assert_eq!(heuristic_direction(5, 1), Direction::Right);
        assert_eq!(heuristic_direction(-5, 1), Direction::Left);
        assert_eq!(heuristic_direction(1, 5), Direction::Down);
        assert_eq!(heuristic_direction(1, -5), Direction::Up);
    }

    #[test]
    fn heuristic_ties_go_vertical() {
        assert_eq!(heuristic_direction(3, 3), Direction::Down);
        assert_eq!(heuristic_direction(-3, 3), Direction::Down);
        assert_eq!(heuristic_direction(3, -3), Direction::Up);
        assert_eq!(heuristic_direction(0, 0), Direction::Up);
    }

    // ── Plan ──

    #[test]
    fn plan_without_wander() {
        let mut rng = Scripted::new(&[30], &[2]);
        let plan = ChasePlan::draw(Direction::Down, 30, &mut rng);
        assert_eq!(plan.wander, None);
        assert_eq!(plan.detour, Direction::Right); // others(Down) = [Up, Left, Right]
        let order: Vec<_> = plan.candidates().collect();
        assert_eq!(order, vec![
            (Strategy::Chase, Direction::Down),
            (Strategy::Detour, Direction::Right),
        ]);
    }

    #[test]
    fn plan_with_wander() {
        let mut rng = Scripted::new(&[29], &[2, 0]);
        let plan = ChasePlan::draw(Direction::Right, 30, &mut rng);
        assert_eq!(plan.wander, Some(Direction::Left));
        assert_eq!(plan.detour, Direction::Up);
        let order: Vec<_> = plan.candidates().collect();
        assert_eq!(order, vec![
            (Strategy::Wander, Direction::Left),
            (Strategy::Chase, Direction::Right),
            (Strategy::Detour, Direction::Up),
        ]);
    }

    #[test]
    fn detour_never_repeats_chase() {
        let mut rng = StdRng::seed_from_u64(7);
        for chase in Direction::ALL {
            for _ in 0..200 {
                let plan = ChasePlan::draw(chase, 100, &mut rng);
                assert_ne!(plan.detour, chase);
                assert!(plan.wander.is_some());
            }
        }
    }

    #[test]
    fn zero_chance_never_wanders() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            assert_eq!(ChasePlan::draw(Direction::Up, 0, &mut rng).wander, None);
        }
    }

    // ── Update ──

    #[test]
    fn dead_enemy_is_inert() {
        let g = Grid::from_rows(&[]);
        let p = Player::new(0, 0);
        let mut e = Enemy::new(EnemyKind::Chaser, 5, 5);
        e.alive = false;
        e.move_cooldown = 4;
        let out = e.update(&p, &g, &speed(), &mut Scripted::steady());
        assert_eq!(out, ChaseOutcome::Inactive);
        assert_eq!((e.col, e.row, e.move_cooldown), (5, 5, 4));
    }

    #[test]
    fn cooldown_tick_consumes_the_turn() {
        let g = Grid::from_rows(&[]);
        let p = Player::new(0, 0);
        let mut e = Enemy::new(EnemyKind::Chaser, 5, 5);
        e.move_cooldown = 1;
        let out = e.update(&p, &g, &speed(), &mut Scripted::steady());
        assert_eq!(out, ChaseOutcome::CoolingDown);
        assert_eq!(e.move_cooldown, 0);
        assert_eq!((e.col, e.row), (5, 5));
    }

    #[test]
    fn chases_along_larger_axis() {
        let g = Grid::from_rows(&[
            "..........",
        ]);
        let p = Player::new(9, 0);
        let mut e = Enemy::new(EnemyKind::Chaser, 2, 0);
        let s = speed();
        let out = e.update(&p, &g, &s, &mut Scripted::steady());
        assert_eq!(out, ChaseOutcome::Moved { dir: Direction::Right, by: Strategy::Chase });
        assert_eq!((e.col, e.row), (3, 0));
        assert_eq!(e.facing, Direction::Right);
        assert!(!e.ghosting);
        assert_eq!(e.move_cooldown, s.enemy_tunnel_cooldown);
    }

    #[test]
    fn successful_wander_skips_chase() {
        let g = Grid::from_rows(&[
            "....",
            "....",
        ]);
        let p = Player::new(3, 0);
        let mut e = Enemy::new(EnemyKind::Chaser, 1, 0);
        // roll 0 hits, wander index 1 = Down
        let mut rng = Scripted::new(&[0], &[1, 0]);
        let out = e.update(&p, &g, &speed(), &mut rng);
        assert_eq!(out, ChaseOutcome::Moved { dir: Direction::Down, by: Strategy::Wander });
        assert_eq!((e.col, e.row), (1, 1));
        assert_eq!(e.facing, Direction::Down);
    }

    #[test]
    fn blocked_wander_falls_back_to_chase() {
        let g = Grid::from_rows(&[
            "....",
        ]);
        let p = Player::new(3, 0);
        let mut e = Enemy::new(EnemyKind::Chaser, 1, 0);
        // wander Up is off the grid
        let mut rng = Scripted::new(&[0], &[0, 0]);
        let out = e.update(&p, &g, &speed(), &mut rng);
        assert_eq!(out, ChaseOutcome::Moved { dir: Direction::Right, by: Strategy::Chase });
        assert_eq!((e.col, e.row), (2, 0));
    }

    #[test]
    fn detours_around_rock() {
        let g = Grid::from_rows(&[
            ".O.",
            "...",
        ]);
        let p = Player::new(2, 0);
        let mut e = Enemy::new(EnemyKind::Chaser, 0, 0);
        // others(Right) = [Up, Down, Left]; pick Down
        let mut rng = Scripted::new(&[], &[1]);
        let out = e.update(&p, &g, &speed(), &mut rng);
        assert_eq!(out, ChaseOutcome::Moved { dir: Direction::Down, by: Strategy::Detour });
        assert_eq!((e.col, e.row), (0, 1));
        assert_eq!(e.facing, Direction::Down);
    }

    #[test]
    fn blocked_detour_ends_the_tick() {
        let g = Grid::from_rows(&[
            ".O.",
            "...",
        ]);
        let p = Player::new(2, 0);
        let mut e = Enemy::new(EnemyKind::Chaser, 0, 0);
        // detour Up is off the grid; no further fallback
        let mut rng = Scripted::new(&[], &[0]);
        let out = e.update(&p, &g, &speed(), &mut rng);
        assert_eq!(out, ChaseOutcome::Blocked);
        assert_eq!((e.col, e.row), (0, 0));
        assert_eq!(e.facing, Direction::Left);
        assert_eq!(e.move_cooldown, 0);
    }

    #[test]
    fn burrows_through_dirt_without_digging() {
        let g = Grid::from_rows(&[
            ".###",
        ]);
        let before = g.clone();
        let p = Player::new(3, 0);
        let mut e = Enemy::new(EnemyKind::FireBreather, 0, 0);
        let s = speed();
        let out = e.update(&p, &g, &s, &mut Scripted::steady());
        assert_eq!(out, ChaseOutcome::Moved { dir: Direction::Right, by: Strategy::Chase });
        assert!(e.ghosting);
        assert_eq!(e.move_cooldown, s.enemy_dirt_cooldown);
        assert_eq!(g.get(0, 1), Tile::Dirt);
        assert_eq!(g, before);
    }

    #[test]
    fn never_enters_rock_under_any_strategy() {
        // Rocks scattered through a dirt field, enemies driven by a real rng.
        let g = Grid::from_rows(&[
            "#O#O#O#O#O",
            "O#O#O#O#O#",
            "#O#.#O#O#O",
            "O#O#O#O#O#",
        ]);
        let s = SpeedConfig { enemy_wander_chance: 50, ..speed() };
        let mut rng = StdRng::seed_from_u64(42);
        let mut e = Enemy::new(EnemyKind::Chaser, 3, 2);
        let p = Player::new(19, 14);
        for _ in 0..5_000 {
            e.update(&p, &g, &s, &mut rng);
            assert_ne!(g.get(e.row, e.col), Tile::Rock, "enemy on rock at ({}, {})", e.col, e.row);
        }
    }
}
