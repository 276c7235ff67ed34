/// Terminal front end: keyboard, gamepad and rendering.

pub mod gamepad;
pub mod input;
pub mod renderer;
