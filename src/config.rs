//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD).
//! Falls back to sensible defaults if the file is missing, incomplete
//! or invalid; loading never fails.

use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::placement::DEFAULT_MAX_ATTEMPTS;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub timing: TimingConfig,
    pub placement: PlacementConfig,
    pub gamepad: GamepadConfig,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldConfig {
    pub width: usize,
    pub height: usize,
    pub wall_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingConfig {
    pub frame_delay_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementConfig {
    pub max_attempts: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid [field] section: {0}")]
    InvalidField(String),
    #[error("invalid [placement] section: {0}")]
    InvalidPlacement(String),
}

impl FieldConfig {
    /// The start cell is always forbidden for walls, so the field needs
    /// at least one other cell or placement could never succeed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidField(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(ConfigError::InvalidField(format!(
                "dimensions {}x{} exceed the coordinate range",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells >= 2 => Ok(()),
            Some(_) => Err(ConfigError::InvalidField(
                "field needs at least 2 cells".into(),
            )),
            None => Err(ConfigError::InvalidField("cell count overflows".into())),
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidPlacement(
                "max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl TimingConfig {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    field: TomlField,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    placement: TomlPlacement,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlField {
    #[serde(default = "default_width")]
    width: usize,
    #[serde(default = "default_height")]
    height: usize,
    #[serde(default = "default_wall_count")]
    wall_count: u32,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_frame_delay")]
    frame_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlPlacement {
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
}

// ── Defaults ──

fn default_width() -> usize { 80 }
fn default_height() -> usize { 25 }
fn default_wall_count() -> u32 { 750 }
fn default_frame_delay() -> u64 { 50 }
fn default_max_attempts() -> u32 { DEFAULT_MAX_ATTEMPTS }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlField {
    fn default() -> Self {
        TomlField {
            width: default_width(),
            height: default_height(),
            wall_count: default_wall_count(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming { frame_delay_ms: default_frame_delay() }
    }
}

impl Default for TomlPlacement {
    fn default() -> Self {
        TomlPlacement { max_attempts: default_max_attempts() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            quit: default_quit(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        let t = TomlField::default();
        FieldConfig { width: t.width, height: t.height, wall_count: t.wall_count }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/gridwalk`.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    info!("loading {}", path.display());
                    return GameConfig::parse(&text);
                }
                Err(e) => warn!("could not read {}: {e}", path.display()),
            }
        }
        info!("no config.toml found, using defaults");
        GameConfig::default()
    }

    /// Parse TOML text. A malformed document yields all defaults; an
    /// invalid section falls back to that section's defaults.
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => GameConfig::from_toml(cfg),
            Err(e) => {
                warn!("config.toml parse error, using default settings: {e}");
                GameConfig::default()
            }
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let mut field = FieldConfig {
            width: cfg.field.width,
            height: cfg.field.height,
            wall_count: cfg.field.wall_count,
        };
        if let Err(e) = field.validate() {
            warn!("{e}; using default field");
            field = FieldConfig::default();
        }

        let mut placement = PlacementConfig { max_attempts: cfg.placement.max_attempts };
        if let Err(e) = placement.validate() {
            warn!("{e}; using default");
            placement = PlacementConfig { max_attempts: default_max_attempts() };
        }

        GameConfig {
            field,
            timing: TimingConfig { frame_delay_ms: cfg.timing.frame_delay_ms },
            placement,
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                quit: cfg.gamepad.quit,
            },
            seed: cfg.general.seed,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so an installed link still finds the real binary's dir.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gridwalk");
        if xdg.is_dir() && !dirs.contains(&xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
