/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing, unreadable or
/// malformed. Gameplay constants (board size, tick rate, scoring) are not
/// configurable; only presentation and host concerns live here.

use std::path::{Path, PathBuf};

use log::{info, warn, LevelFilter};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE: &str = "config.toml";

// ── Public Config Structs ──

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub sound: SoundConfig,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_sound_enabled")]
    pub enabled: bool,
    #[serde(default = "default_eat_volume")]
    pub eat_volume: f32,
    #[serde(default = "default_game_over_volume")]
    pub game_over_volume: f32,
    #[serde(default = "default_game_over_delay")]
    pub game_over_delay_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GamepadConfig {
    #[serde(default = "default_restart")]
    pub restart: Vec<String>,
    #[serde(default = "default_quit")]
    pub quit: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Defaults ──

fn default_sound_enabled() -> bool { true }
fn default_eat_volume() -> f32 { 0.4 }
fn default_game_over_volume() -> f32 { 0.5 }
fn default_game_over_delay() -> u64 { 100 }
fn default_frame_rate() -> u32 { 60 }
fn default_restart() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> String { "gridsnake.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for SoundConfig {
    fn default() -> Self {
        SoundConfig {
            enabled: default_sound_enabled(),
            eat_volume: default_eat_volume(),
            game_over_volume: default_game_over_volume(),
            game_over_delay_ms: default_game_over_delay(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { frame_rate: default_frame_rate() }
    }
}

impl Default for GamepadConfig {
    fn default() -> Self {
        GamepadConfig { restart: default_restart(), quit: default_quit() }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { file: default_log_file(), level: default_log_level() }
    }
}

// ── Errors ──

#[derive(Debug, Error)]
enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{} is malformed: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

// ── Loading ──

/// Where the settings came from, for the startup log line.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    ///
    /// Runs before the logger exists, so problems are returned as warning
    /// lines for the caller to log once logging is up.
    pub fn load() -> (Self, ConfigSource, Vec<String>) {
        let mut warnings = Vec::new();
        for dir in candidate_dirs() {
            let path = dir.join(CONFIG_FILE);
            if !path.exists() {
                continue;
            }
            match read_file(&path) {
                Ok(cfg) => return (cfg, ConfigSource::File(path), warnings),
                Err(e @ ConfigError::Parse { .. }) => {
                    warnings.push(format!("{e}; using default settings"));
                    return (GameConfig::default(), ConfigSource::Defaults, warnings);
                }
                Err(e) => warnings.push(e.to_string()),
            }
        }
        (GameConfig::default(), ConfigSource::Defaults, warnings)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<GameConfig>(text).map(GameConfig::sanitized)
    }

    /// Clamp values to what the host can use.
    fn sanitized(mut self) -> Self {
        self.sound.eat_volume = self.sound.eat_volume.clamp(0.0, 1.0);
        self.sound.game_over_volume = self.sound.game_over_volume.clamp(0.0, 1.0);
        self.display.frame_rate = self.display.frame_rate.clamp(1, 240);
        self
    }

    pub fn log_startup(&self, source: &ConfigSource, warnings: &[String]) {
        for w in warnings {
            warn!("config: {w}");
        }
        match source {
            ConfigSource::File(p) => info!("config loaded from {}", p.display()),
            ConfigSource::Defaults => info!("no usable config.toml, using defaults"),
        }
    }
}

impl LogConfig {
    /// Unknown names fall back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

fn read_file(path: &Path) -> Result<GameConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    GameConfig::from_toml_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = GameConfig::from_toml_str("").expect("empty toml parses");
        assert!(cfg.sound.enabled);
        assert_eq!(cfg.sound.eat_volume, 0.4);
        assert_eq!(cfg.sound.game_over_volume, 0.5);
        assert_eq!(cfg.sound.game_over_delay_ms, 100);
        assert_eq!(cfg.display.frame_rate, 60);
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
        assert_eq!(cfg.log.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml_str(
            "[sound]\neat_volume = 0.9\n\n[log]\nlevel = \"debug\"\n",
        )
        .expect("valid toml");
        assert_eq!(cfg.sound.eat_volume, 0.9);
        assert_eq!(cfg.sound.game_over_volume, 0.5);
        assert_eq!(cfg.log.file, "gridsnake.log");
        assert_eq!(cfg.log.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = GameConfig::from_toml_str(
            "[sound]\neat_volume = 3.0\ngame_over_volume = -1.0\n[display]\nframe_rate = 0\n",
        )
        .expect("valid toml");
        assert_eq!(cfg.sound.eat_volume, 1.0);
        assert_eq!(cfg.sound.game_over_volume, 0.0);
        assert_eq!(cfg.display.frame_rate, 1);
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(GameConfig::from_toml_str("[sound\nenabled = yes").is_err());
        assert!(GameConfig::from_toml_str("[sound]\nenabled = \"loud\"").is_err());
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let log = LogConfig { level: "chatty".into(), ..LogConfig::default() };
        assert_eq!(log.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn read_errors_name_the_file() {
        let err = read_file(Path::new("/definitely/not/here/config.toml"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
