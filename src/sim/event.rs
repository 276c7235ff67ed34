/// Events emitted during a simulation step.
/// The presentation layer consumes these for messages and logging.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// The player turned a dirt cell into tunnel.
    Dug { col: i32, row: i32 },
    /// Enemy at roster index `enemy` caught the player.
    PlayerCaught { enemy: usize },
}
