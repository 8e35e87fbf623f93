//! External configuration loader.
//!
//! Every tunable of the arcade rules lives here. `GameConfig::load()`
//! reads `gridclaim.toml` from the executable's directory (or CWD) and
//! falls back to sensible defaults if the file is missing or incomplete.
//! Config problems are never fatal: a parse error logs a warning and the
//! defaults take over.

use std::path::PathBuf;

use log::warn;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct GameConfig {
    /// Grid width in cells.
    #[serde(default = "default_grid_cols")]
    pub grid_cols: i32,
    /// Grid height in cells.
    #[serde(default = "default_grid_rows")]
    pub grid_rows: i32,
    /// How many outer rings start as claimed ground (home base + patrol path).
    #[serde(default = "default_border_thickness")]
    pub border_thickness: i32,
    #[serde(default = "default_base_enemy_count")]
    pub base_enemy_count: u32,
    #[serde(default = "default_base_patroller_count")]
    pub base_patroller_count: u32,
    #[serde(default = "default_base_enemy_speed")]
    pub base_enemy_speed: i32,
    #[serde(default = "default_starting_lives")]
    pub starting_lives: u32,
    /// Claimed percentage of the interior that completes a level.
    #[serde(default = "default_target_percentage")]
    pub target_percentage: f64,
    /// Points per newly claimed cell.
    #[serde(default = "default_cell_points")]
    pub cell_points: u32,
    /// Level-clear bonus, multiplied by the level number.
    #[serde(default = "default_level_bonus")]
    pub level_bonus: u32,
    /// Score interval between extra lives. 0 disables extra lives.
    #[serde(default = "default_extra_life_interval")]
    pub extra_life_interval: u32,
    /// Logic tick length in milliseconds. The driving shell accumulates
    /// real time against this; the core itself never reads a clock.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Fixed RNG seed for reproducible enemy spawns. Unset = seeded from
    /// the OS once per session.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

// ── Defaults ──

fn default_grid_cols() -> i32 { 64 }
fn default_grid_rows() -> i32 { 48 }
fn default_border_thickness() -> i32 { 2 }
fn default_base_enemy_count() -> u32 { 2 }
fn default_base_patroller_count() -> u32 { 1 }
fn default_base_enemy_speed() -> i32 { 1 }
fn default_starting_lives() -> u32 { 3 }
fn default_target_percentage() -> f64 { 75.0 }
fn default_cell_points() -> u32 { 10 }
fn default_level_bonus() -> u32 { 1000 }
fn default_extra_life_interval() -> u32 { 10_000 }
fn default_tick_rate_ms() -> u64 { 100 }

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_cols: default_grid_cols(),
            grid_rows: default_grid_rows(),
            border_thickness: default_border_thickness(),
            base_enemy_count: default_base_enemy_count(),
            base_patroller_count: default_base_patroller_count(),
            base_enemy_speed: default_base_enemy_speed(),
            starting_lives: default_starting_lives(),
            target_percentage: default_target_percentage(),
            cell_points: default_cell_points(),
            level_bonus: default_level_bonus(),
            extra_life_interval: default_extra_life_interval(),
            tick_rate_ms: default_tick_rate_ms(),
            rng_seed: None,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `gridclaim.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        for dir in candidate_dirs() {
            let path = dir.join("gridclaim.toml");
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(text) => return Self::from_toml(&text),
                    Err(e) => warn!("could not read {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Parse a TOML document; any error degrades to the defaults.
    pub fn from_toml(text: &str) -> Self {
        match toml::from_str::<GameConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("config parse error: {e}; using default settings");
                Self::default()
            }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_arcade_rules() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.grid_cols, 64);
        assert_eq!(cfg.grid_rows, 48);
        assert_eq!(cfg.border_thickness, 2);
        assert_eq!(cfg.starting_lives, 3);
        assert_eq!(cfg.target_percentage, 75.0);
        assert_eq!(cfg.extra_life_interval, 10_000);
        assert!(cfg.rng_seed.is_none());
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let cfg = GameConfig::from_toml("grid_cols = 32\nstarting_lives = 5\n");
        assert_eq!(cfg.grid_cols, 32);
        assert_eq!(cfg.starting_lives, 5);
        assert_eq!(cfg.grid_rows, 48);
        assert_eq!(cfg.target_percentage, 75.0);
    }

    #[test]
    fn broken_toml_degrades_to_defaults() {
        let cfg = GameConfig::from_toml("grid_cols = \"not a number");
        assert_eq!(cfg.grid_cols, 64);
    }
}
