use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// All tunable game parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub dt: f32,
    pub arena_width: f32,
    pub arena_height: f32,
    pub squad_size: usize,
    pub bot_radius: f32,
    pub projectile_radius: f32,
    pub barrier_count: usize,
    pub barrier_min_size: f32,
    pub barrier_max_size: f32,
    /// Width of the barrier-free spawn column on each side.
    pub spawn_margin: f32,
    pub max_move_distance: f32,
    pub min_move_distance: f32,
    pub shoot_preview_length: f32,
    /// Enemy bots consider shooting within `shoot_preview_length * shoot_range_multiplier`.
    pub shoot_range_multiplier: f32,
    pub sweep_step_deg: f32,
    pub wiggle_min_distance: f32,
    pub wiggle_max_distance: f32,
    pub burst_count: u32,
    /// Half-angle of the shotgun cone.
    pub spread_deg: f32,
    pub bullet_start_offset: f32,
    pub bullet_speed: f32,
    pub round_duration_ms: f32,
    /// Auto-start the round after this long in planning. 0 = wait for the player.
    pub planning_time_limit_ms: f32,
    /// Fixed RNG seed for reproducible games. None = seeded from entropy.
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            arena_width: 960.0,
            arena_height: 640.0,
            squad_size: 5,
            bot_radius: 14.0,
            projectile_radius: 4.0,
            barrier_count: 6,
            barrier_min_size: 40.0,
            barrier_max_size: 120.0,
            spawn_margin: 70.0,
            max_move_distance: 180.0,
            min_move_distance: 60.0,
            shoot_preview_length: 120.0,
            shoot_range_multiplier: 4.0,
            sweep_step_deg: 15.0,
            wiggle_min_distance: 20.0,
            wiggle_max_distance: 40.0,
            burst_count: 3,
            spread_deg: 8.0,
            bullet_start_offset: 18.0,
            bullet_speed: 420.0,
            round_duration_ms: 2000.0,
            planning_time_limit_ms: 0.0,
            seed: None,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("squad_tactics")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    /// Load from file, or create default if not found.
    pub fn load_or_default() -> Self {
        Self::load_from(&Self::file_path())
    }

    /// Load `path`. A missing file is created with defaults; an unreadable
    /// or malformed one is left untouched and defaults are used.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let tuning = Self::default();
            tuning.save_to(path);
            return tuning;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(tuning) => tuning,
                Err(e) => {
                    warn!("Failed to parse tuning.ron: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read tuning.ron: {e}, using defaults");
                Self::default()
            }
        }
    }

    /// Write `self` to `path` as pretty RON.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }

    /// Maximum projectile range: half the shorter arena side.
    pub fn max_bullet_distance(&self) -> f32 {
        self.arena_width.min(self.arena_height) * 0.5
    }

    /// Projectile lifetime derived from range and speed.
    pub fn bullet_lifetime_ms(&self) -> f32 {
        if self.bullet_speed <= 0.0 {
            return 0.0;
        }
        self.max_bullet_distance() / self.bullet_speed * 1000.0
    }

    pub fn round_secs(&self) -> f32 {
        self.round_duration_ms / 1000.0
    }
}
