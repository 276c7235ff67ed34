/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so terrain semantics for the player and the enemies live here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    /// Open surface. Also what out-of-bounds queries report.
    #[default]
    Empty,
    Dirt,   // Diggable by the player, burrowable by enemies
    Tunnel, // Dug-out dirt
    Rock,   // Blocks everyone
}

impl Tile {
    /// Can the player dig this tile into a tunnel?
    pub fn is_diggable(self) -> bool {
        matches!(self, Tile::Dirt)
    }

    /// Can the player stand in this tile without digging?
    pub fn is_open(self) -> bool {
        matches!(self, Tile::Empty | Tile::Tunnel)
    }

    /// Can an enemy enter this tile (possibly by ghosting through it)?
    pub fn is_enemy_passable(self) -> bool {
        !matches!(self, Tile::Rock)
    }

    /// Does an enemy entering this tile ghost through it?
    pub fn slows_enemies(self) -> bool {
        matches!(self, Tile::Dirt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert_eq!(Tile::default(), Tile::Empty);
    }

    #[test]
    fn player_terrain() {
        assert!(Tile::Empty.is_open());
        assert!(Tile::Tunnel.is_open());
        assert!(!Tile::Dirt.is_open());
        assert!(!Tile::Rock.is_open());
        assert!(Tile::Dirt.is_diggable());
        assert!(!Tile::Rock.is_diggable());
        assert!(!Tile::Tunnel.is_diggable());
    }

    #[test]
    fn enemy_terrain() {
        assert!(Tile::Empty.is_enemy_passable());
        assert!(Tile::Tunnel.is_enemy_passable());
        assert!(Tile::Dirt.is_enemy_passable());
        assert!(!Tile::Rock.is_enemy_passable());
        assert!(Tile::Dirt.slows_enemies());
        assert!(!Tile::Tunnel.slows_enemies());
    }
}
