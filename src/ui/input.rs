/// Keyboard input tracker.
///
/// Turns the terminal's key event stream into per-tick intents:
///   - a movement direction (fresh press wins, otherwise the held key)
///   - one-shot commands (pause, restart, quit)
///
/// Terminals without keyboard enhancement never report key releases, so a
/// key counts as held until no Press/Repeat arrives for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Direction;

/// After this long without a Press/Repeat event, the key counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::F(1), KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R'), KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Direction keys in resolution priority order.
const DIRECTION_KEYS: [(Direction, &[KeyCode]); 4] = [
    (Direction::Up, KEYS_UP),
    (Direction::Down, KEYS_DOWN),
    (Direction::Left, KEYS_LEFT),
    (Direction::Right, KEYS_RIGHT),
];

pub struct InputState {
    /// Timestamp of the last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the most recent
    /// `drain_events()` call, in arrival order.
    fresh_presses: Vec<KeyCode>,

    ctrl_c: bool,

    /// Honor Release events. Set from `Renderer::keyboard_enhanced`.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        self.expire(Instant::now());
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            self.ctrl_c = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                if !self.is_held_at(key.code, now) {
                    self.fresh_presses.push(key.code);
                }
                self.last_active.insert(key.code, now);
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Direction to attempt this tick. The latest fresh press wins;
    /// otherwise the first held direction in Up/Down/Left/Right order.
    pub fn movement(&self) -> Option<Direction> {
        let now = Instant::now();
        let fresh = self.fresh_presses.iter().rev().find_map(|code| direction_of(*code));
        fresh.or_else(|| {
            DIRECTION_KEYS.iter()
                .find(|(_, codes)| codes.iter().any(|c| self.is_held_at(*c, now)))
                .map(|(d, _)| *d)
        })
    }

    pub fn pause_pressed(&self) -> bool { self.any_pressed(KEYS_PAUSE) }
    pub fn restart_pressed(&self) -> bool { self.any_pressed(KEYS_RESTART) }
    pub fn quit_pressed(&self) -> bool { self.ctrl_c || self.any_pressed(KEYS_QUIT) }

    // ── Internal ──

    fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        self.fresh_presses.iter().any(|c| codes.contains(c))
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active.get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

fn direction_of(code: KeyCode) -> Option<Direction> {
    DIRECTION_KEYS.iter()
        .find(|(_, codes)| codes.contains(&code))
        .map(|(d, _)| *d)
}
