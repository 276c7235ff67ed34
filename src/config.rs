/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub gamepad: GamepadConfig,
    /// Fixed seed for the enemy AI's random source. `None` = OS entropy.
    pub seed: Option<u64>,
}

/// Frame timing and movement cooldowns, all counted in ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub player_dig_cooldown: u32,   // after digging through dirt
    pub player_walk_cooldown: u32,  // after moving through tunnel / open space
    pub enemy_dirt_cooldown: u32,   // after ghosting through dirt
    pub enemy_tunnel_cooldown: u32,
    pub enemy_wander_chance: u32,   // percent chance per ready tick to try a random direction
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            tick_rate_ms: default_tick_rate(),
            player_dig_cooldown: default_player_dig(),
            player_walk_cooldown: default_player_walk(),
            enemy_dirt_cooldown: default_enemy_dirt(),
            enemy_tunnel_cooldown: default_enemy_tunnel(),
            enemy_wander_chance: default_wander_chance(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub pause: Vec<String>,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        GamepadConfig {
            confirm: default_confirm(),
            cancel: default_cancel(),
            pause: default_pause(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_player_dig")]
    player_dig_cooldown: u32,
    #[serde(default = "default_player_walk")]
    player_walk_cooldown: u32,
    #[serde(default = "default_enemy_dirt")]
    enemy_dirt_cooldown: u32,
    #[serde(default = "default_enemy_tunnel")]
    enemy_tunnel_cooldown: u32,
    #[serde(default = "default_wander_chance")]
    enemy_wander_chance: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }     // ~60 ticks per second
fn default_player_dig() -> u32 { 8 }
fn default_player_walk() -> u32 { 3 }
fn default_enemy_dirt() -> u32 { 20 }
fn default_enemy_tunnel() -> u32 { 10 }
fn default_wander_chance() -> u32 { 30 }

fn default_confirm() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_pause() -> Vec<String> { vec!["North".into()] }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            player_dig_cooldown: default_player_dig(),
            player_walk_cooldown: default_player_walk(),
            enemy_dirt_cooldown: default_enemy_dirt(),
            enemy_tunnel_cooldown: default_enemy_tunnel(),
            enemy_wander_chance: default_wander_chance(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            pause: default_pause(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/burrow.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    /// Parse config text directly. Parse errors fall back to defaults.
    #[cfg(test)]
    pub fn parse(text: &str) -> Self {
        GameConfig::from_toml(parse_toml(text, Path::new("config.toml")))
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let mut speed = SpeedConfig {
            tick_rate_ms: toml_cfg.speed.tick_rate_ms,
            player_dig_cooldown: toml_cfg.speed.player_dig_cooldown,
            player_walk_cooldown: toml_cfg.speed.player_walk_cooldown,
            enemy_dirt_cooldown: toml_cfg.speed.enemy_dirt_cooldown,
            enemy_tunnel_cooldown: toml_cfg.speed.enemy_tunnel_cooldown,
            enemy_wander_chance: toml_cfg.speed.enemy_wander_chance,
        };

        if speed.tick_rate_ms == 0 {
            warn!("speed.tick_rate_ms must be positive; using {}", default_tick_rate());
            speed.tick_rate_ms = default_tick_rate();
        }
        if speed.enemy_wander_chance > 100 {
            warn!("speed.enemy_wander_chance {} exceeds 100; clamping", speed.enemy_wander_chance);
            speed.enemy_wander_chance = 100;
        }

        GameConfig {
            speed,
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                pause: toml_cfg.gamepad.pause,
            },
            seed: toml_cfg.general.seed,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + user data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. ~/.local/share/burrow
    if let Ok(home) = std::env::var("HOME") {
        let data = PathBuf::from(&home).join(".local/share/burrow");
        if data.is_dir() && !dirs.iter().any(|d| d == &data) {
            dirs.push(data);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                info!("loading {}", path.display());
                return parse_toml(&text, &path);
            }
            Err(e) => warn!("could not read {}: {e}", path.display()),
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str, path: &Path) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("{} parse error: {e}; using default settings", path.display());
            TomlConfig::default()
        }
    }
}
