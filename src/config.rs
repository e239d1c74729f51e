/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems are collected in `warnings` and logged once tracing is up,
/// since the subscriber needs the config to start.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sim::resolve::Pauses;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub ghosts: GhostConfig,
    pub gamepad: GamepadConfig,
    pub maze_file: Option<PathBuf>,
    pub log_file: PathBuf,
    pub log_level: String,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub player_step_ms: u64,
    pub ghost_step_ms: u64,
    pub collision_pause_ms: u64, // cell cleared → actors reset
    pub reset_pause_ms: u64,     // reset shown → play resumes
    pub transition_pause_ms: u64, // before win/lose screen
}

#[derive(Clone, Debug)]
pub struct GhostConfig {
    pub chase_bias: f64,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub quit: Vec<String>,
}

impl TimingConfig {
    pub fn player_step(&self) -> Duration { Duration::from_millis(self.player_step_ms) }
    pub fn ghost_step(&self) -> Duration { Duration::from_millis(self.ghost_step_ms) }

    pub fn pauses(&self) -> Pauses {
        Pauses {
            collision: Duration::from_millis(self.collision_pause_ms),
            reset: Duration::from_millis(self.reset_pause_ms),
            transition: Duration::from_millis(self.transition_pause_ms),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    ghosts: TomlGhosts,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_player_step")]
    player_step_ms: u64,
    #[serde(default = "default_ghost_step")]
    ghost_step_ms: u64,
    #[serde(default = "default_collision_pause")]
    collision_pause_ms: u64,
    #[serde(default = "default_reset_pause")]
    reset_pause_ms: u64,
    #[serde(default = "default_transition_pause")]
    transition_pause_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGhosts {
    #[serde(default = "default_chase_bias")]
    chase_bias: f64,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    maze_file: Option<String>,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

// ── Defaults ──

fn default_player_step() -> u64 { 120 }
fn default_ghost_step() -> u64 { 280 }
fn default_collision_pause() -> u64 { 200 }
fn default_reset_pause() -> u64 { 1000 }
fn default_transition_pause() -> u64 { 100 }
fn default_chase_bias() -> f64 { 0.35 }

fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> String { "ghostmaze.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            player_step_ms: default_player_step(),
            ghost_step_ms: default_ghost_step(),
            collision_pause_ms: default_collision_pause(),
            reset_pause_ms: default_reset_pause(),
            transition_pause_ms: default_transition_pause(),
        }
    }
}

impl Default for TomlGhosts {
    fn default() -> Self {
        TomlGhosts { chase_bias: default_chase_bias(), seed: None }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { confirm: default_confirm(), quit: default_quit() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            maze_file: None,
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = vec![];
        let toml_cfg = load_toml(&search_dirs, &mut warnings);
        Self::from_toml(toml_cfg, &search_dirs, warnings)
    }

    /// Parse config text directly (no file search).
    #[cfg(test)]
    pub fn parse(text: &str) -> Self {
        let mut warnings = vec![];
        let toml_cfg = parse_toml(text, Path::new("config.toml"), &mut warnings);
        Self::from_toml(toml_cfg, &[], warnings)
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf], warnings: Vec<String>) -> Self {
        // A relative maze path is looked up next to config.toml first.
        let maze_file = toml_cfg.general.maze_file.map(|name| {
            let p = PathBuf::from(&name);
            if p.is_absolute() {
                return p;
            }
            search_dirs.iter()
                .map(|d| d.join(&name))
                .find(|p| p.is_file())
                .unwrap_or(p)
        });

        GameConfig {
            timing: TimingConfig {
                player_step_ms: toml_cfg.timing.player_step_ms,
                ghost_step_ms: toml_cfg.timing.ghost_step_ms,
                collision_pause_ms: toml_cfg.timing.collision_pause_ms,
                reset_pause_ms: toml_cfg.timing.reset_pause_ms,
                transition_pause_ms: toml_cfg.timing.transition_pause_ms,
            },
            ghosts: GhostConfig {
                chase_bias: toml_cfg.ghosts.chase_bias,
                seed: toml_cfg.ghosts.seed,
            },
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                quit: toml_cfg.gamepad.quit,
            },
            maze_file,
            log_file: PathBuf::from(toml_cfg.general.log_file),
            log_level: toml_cfg.general.log_level,
            warnings,
        }
    }
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

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_toml(&text, &path, warnings),
                Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str, path: &Path, warnings: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
            TomlConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("");
        assert_eq!(cfg.timing.player_step_ms, 120);
        assert_eq!(cfg.timing.ghost_step_ms, 280);
        let p = cfg.timing.pauses();
        assert_eq!(p.collision, Duration::from_millis(200));
        assert_eq!(p.reset, Duration::from_secs(1));
        assert_eq!(p.transition, Duration::from_millis(100));
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.maze_file.is_none());
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[timing]\nghost_step_ms = 500\n\n[ghosts]\nchase_bias = 0.9\nseed = 42\n",
        );
        assert_eq!(cfg.timing.ghost_step_ms, 500);
        assert_eq!(cfg.timing.player_step_ms, 120);
        assert_eq!(cfg.ghosts.chase_bias, 0.9);
        assert_eq!(cfg.ghosts.seed, Some(42));
        assert_eq!(cfg.gamepad.quit, vec!["Select".to_string()]);
    }

    #[test]
    fn bad_toml_falls_back_with_warning() {
        let cfg = GameConfig::parse("[timing\nplayer_step_ms = ");
        assert_eq!(cfg.timing.player_step_ms, 120);
        assert_eq!(cfg.warnings.len(), 1);
    }

    #[test]
    fn maze_file_is_kept() {
        let cfg = GameConfig::parse("[general]\nmaze_file = \"/tmp/custom.txt\"\n");
        assert_eq!(cfg.maze_file, Some(PathBuf::from("/tmp/custom.txt")));
    }
}
