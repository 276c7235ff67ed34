/// Game rules: tiles, the grid, entities, movement legality and chase AI.
/// Nothing in here touches the terminal, the clock, or global state.

pub mod ai;
pub mod entity;
pub mod grid;
pub mod rules;
pub mod tile;
