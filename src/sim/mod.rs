/// Session state and the per-tick step that drives the domain rules.

pub mod event;
pub mod level;
pub mod step;
pub mod world;
