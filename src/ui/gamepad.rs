/// Gamepad input tracker using gilrs.
///
/// Button mapping comes from the `[gamepad]` section of config.toml.
/// Default mapping:
///   D-pad / Left Stick    →  Move (dig)
///   Start                 →  Confirm / Restart
///   Select                →  Quit
///   North (Y)             →  Pause
///
/// Without the `gamepad` feature the tracker stays disconnected and every
/// query returns false.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
use log::{info, warn};

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

const BTN_COUNT: usize = 8;

/// Face and shoulder buttons that can be bound to actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    South,
    East,
    West,
    North,
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::South),
            "B" | "EAST"  => Some(Btn::East),
            "X" | "WEST"  => Some(Btn::West),
            "Y" | "NORTH" => Some(Btn::North),
            "L1" | "LB"   => Some(Btn::L1),
            "R1" | "RB"   => Some(Btn::R1),
            "START"       => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::South),
            Button::East  => Some(Btn::East),
            Button::West  => Some(Btn::West),
            Button::North => Some(Btn::North),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Held (continuous) and just_pressed (edge) for one input.
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

impl BtnState {
    fn set(&mut self, held: bool) {
        if held && !self.held { self.just_pressed = true; }
        self.held = held;
    }
}

struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    pause: Vec<Btn>,
}

impl ActionMap {
    fn from_config(cfg: &GamepadConfig) -> Self {
        let defaults = GamepadConfig::default();
        ActionMap {
            confirm: parse_list("confirm", &cfg.confirm, &defaults.confirm),
            cancel: parse_list("cancel", &cfg.cancel, &defaults.cancel),
            pause: parse_list("pause", &cfg.pause, &defaults.pause),
        }
    }
}

/// Resolve button names; unknown names are skipped. An action left with no
/// valid buttons falls back to its default binding.
fn parse_list(action: &str, names: &[String], fallback: &[String]) -> Vec<Btn> {
    let mut btns = Vec::with_capacity(names.len());
    for name in names {
        match Btn::from_name(name) {
            Some(b) => btns.push(b),
            None => warn!("gamepad.{action}: unknown button {name:?}"),
        }
    }
    if btns.is_empty() {
        btns = fallback.iter().filter_map(|s| Btn::from_name(s)).collect();
    }
    btns
}

fn dir_index(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],

    // Indexed by `dir_index`
    dpad: [BtnState; 4],
    stick: [BtnState; 4],
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new(cfg: &GamepadConfig) -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        if connected { info!("gamepad connected"); }

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [BtnState::default(); 4],
            stick: [BtnState::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::from_config(cfg),
            connected,
        }
    }

    /// Poll pending events. Call once per frame.
    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();

        self.derive_stick();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dpad_dir = match gilrs_btn {
            Button::DPadUp => Some(Direction::Up),
            Button::DPadDown => Some(Direction::Down),
            Button::DPadLeft => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = dpad_dir {
            self.dpad[dir_index(dir)].set(held);
        } else if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn as usize].set(held);
        }
    }

    /// Turn the analog stick into four digital directions.
    fn derive_stick(&mut self) {
        let (x, y) = (self.stick_x, self.stick_y);
        self.stick[dir_index(Direction::Up)].set(y > STICK_DEADZONE);
        self.stick[dir_index(Direction::Down)].set(y < -STICK_DEADZONE);
        self.stick[dir_index(Direction::Left)].set(x < -STICK_DEADZONE);
        self.stick[dir_index(Direction::Right)].set(x > STICK_DEADZONE);
    }

    // ── Action queries ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn confirm_pressed(&self) -> bool { self.any_just_pressed(&self.action_map.confirm) }
    pub fn cancel_pressed(&self) -> bool { self.any_just_pressed(&self.action_map.cancel) }
    pub fn pause_pressed(&self) -> bool { self.any_just_pressed(&self.action_map.pause) }

    /// Direction to attempt this tick: a fresh press first, then anything
    /// held, each in Up/Down/Left/Right order.
    pub fn movement(&self) -> Option<Direction> {
        let fresh = Direction::ALL.into_iter().find(|&d| {
            let i = dir_index(d);
            self.dpad[i].just_pressed || self.stick[i].just_pressed
        });
        fresh.or_else(|| {
            Direction::ALL.into_iter().find(|&d| {
                let i = dir_index(d);
                self.dpad[i].held || self.stick[i].held
            })
        })
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            b.just_pressed = false;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            *b = BtnState::default();
        }
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> GamepadState {
        let mut p = GamepadState::new(&GamepadConfig::default());
        p.release_all();
        p
    }

    #[test]
    fn button_names() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Y"), Some(Btn::North));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn unknown_names_fall_back_to_defaults() {
        let cfg = GamepadConfig {
            confirm: vec!["Bogus".into()],
            cancel: vec!["B".into(), "nope".into()],
            pause: vec![],
        };
        let map = ActionMap::from_config(&cfg);
        assert_eq!(map.confirm, vec![Btn::Start]);
        assert_eq!(map.cancel, vec![Btn::East]);
        assert_eq!(map.pause, vec![Btn::North]);
    }

    #[test]
    fn mapped_buttons_trigger_actions() {
        let mut p = pad();
        p.buttons[Btn::North as usize].set(true);
        assert!(p.pause_pressed());
        assert!(!p.confirm_pressed());

        // Held across frames: only the first frame counts
        p.clear_just_pressed();
        p.buttons[Btn::North as usize].set(true);
        assert!(!p.pause_pressed());
    }

    #[test]
    fn stick_past_deadzone_moves() {
        let mut p = pad();
        p.stick_x = -0.8;
        p.derive_stick();
        assert_eq!(p.movement(), Some(Direction::Left));

        // Next frame: stick back inside the deadzone
        p.clear_just_pressed();
        p.stick_x = 0.1;
        p.derive_stick();
        assert_eq!(p.movement(), None);
    }

    #[test]
    fn fresh_press_beats_held() {
        let mut p = pad();
        p.dpad[dir_index(Direction::Up)].set(true);
        p.clear_just_pressed();
        p.dpad[dir_index(Direction::Right)].set(true);
        assert_eq!(p.movement(), Some(Direction::Right));

        p.clear_just_pressed();
        assert_eq!(p.movement(), Some(Direction::Up));
    }
}
