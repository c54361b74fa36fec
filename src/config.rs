//! Tunable gameplay parameters.
//!
//! Loaded once before the first tick from a flat TOML table. Anything missing
//! or invalid falls back to the built-in default; a broken file never stops
//! the game from starting.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Player speed in tiles per second. Ghosts share it.
    pub player_speed: f64,
    /// Ghost speed multiplier while the player is powered up.
    pub power_up_slowdown: f64,
    pub initial_power_up_time: f64,
    pub power_up_time_decrement: f64,
    /// Seconds of chase between two guard phases.
    pub time_between_guard_mode: f64,
    pub initial_guard_time: f64,
    pub guard_time_decrement: f64,
    pub grid_width: usize,
    pub grid_height: usize,
    pub coin_points: u32,
    pub ghost_points: u32,
    /// Upper bound on a single frame delta, in seconds.
    pub max_frame_delta: f64,
    pub high_score_capacity: usize,
}

impl Config {
    pub const DEFAULT_PLAYER_SPEED: f64 = 4.0;
    pub const DEFAULT_POWER_UP_SLOWDOWN: f64 = 0.75;
    pub const DEFAULT_INITIAL_POWER_UP_TIME: f64 = 5.0;
    pub const DEFAULT_POWER_UP_TIME_DECREMENT: f64 = 1.0;
    pub const DEFAULT_TIME_BETWEEN_GUARD_MODE: f64 = 30.0;
    pub const DEFAULT_INITIAL_GUARD_TIME: f64 = 10.0;
    pub const DEFAULT_GUARD_TIME_DECREMENT: f64 = 1.0;
    pub const DEFAULT_GRID_WIDTH: usize = 28;
    pub const DEFAULT_GRID_HEIGHT: usize = 31;
    pub const DEFAULT_COIN_POINTS: u32 = 10;
    pub const DEFAULT_GHOST_POINTS: u32 = 400;
    pub const DEFAULT_MAX_FRAME_DELTA: f64 = 0.25;
    pub const DEFAULT_HIGH_SCORE_CAPACITY: usize = 10;

    /// Upper bounds that keep the per-frame sub-step count small.
    pub const MAX_PLAYER_SPEED: f64 = 60.0;
    pub const MAX_FRAME_DELTA_LIMIT: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            player_speed: Self::DEFAULT_PLAYER_SPEED,
            power_up_slowdown: Self::DEFAULT_POWER_UP_SLOWDOWN,
            initial_power_up_time: Self::DEFAULT_INITIAL_POWER_UP_TIME,
            power_up_time_decrement: Self::DEFAULT_POWER_UP_TIME_DECREMENT,
            time_between_guard_mode: Self::DEFAULT_TIME_BETWEEN_GUARD_MODE,
            initial_guard_time: Self::DEFAULT_INITIAL_GUARD_TIME,
            guard_time_decrement: Self::DEFAULT_GUARD_TIME_DECREMENT,
            grid_width: Self::DEFAULT_GRID_WIDTH,
            grid_height: Self::DEFAULT_GRID_HEIGHT,
            coin_points: Self::DEFAULT_COIN_POINTS,
            ghost_points: Self::DEFAULT_GHOST_POINTS,
            max_frame_delta: Self::DEFAULT_MAX_FRAME_DELTA,
            high_score_capacity: Self::DEFAULT_HIGH_SCORE_CAPACITY,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config.sanitized())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, or returns the defaults. A missing file is expected and
    /// only logged at debug level.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                warn!("{err}; using default configuration");
                Self::default()
            }
        }
    }

    /// Replaces every out-of-range field with its default.
    pub fn sanitized(mut self) -> Self {
        fn check(field: &str, value: &mut f64, default: f64, ok: impl Fn(f64) -> bool) {
            if !value.is_finite() || !ok(*value) {
                warn!("config field `{field}` = {value} is invalid, using {default}");
                *value = default;
            }
        }
        fn check_count(field: &str, value: &mut usize, default: usize, min: usize) {
            if *value < min {
                warn!("config field `{field}` = {value} is invalid, using {default}");
                *value = default;
            }
        }

        check("player_speed", &mut self.player_speed, Self::DEFAULT_PLAYER_SPEED, |v| {
            v > 0.0 && v <= Self::MAX_PLAYER_SPEED
        });
        check(
            "power_up_slowdown",
            &mut self.power_up_slowdown,
            Self::DEFAULT_POWER_UP_SLOWDOWN,
            |v| v > 0.0 && v <= 1.0,
        );
        check(
            "initial_power_up_time",
            &mut self.initial_power_up_time,
            Self::DEFAULT_INITIAL_POWER_UP_TIME,
            |v| v > 0.0,
        );
        check(
            "power_up_time_decrement",
            &mut self.power_up_time_decrement,
            Self::DEFAULT_POWER_UP_TIME_DECREMENT,
            |v| v >= 0.0,
        );
        check(
            "time_between_guard_mode",
            &mut self.time_between_guard_mode,
            Self::DEFAULT_TIME_BETWEEN_GUARD_MODE,
            |v| v > 0.0,
        );
        check(
            "initial_guard_time",
            &mut self.initial_guard_time,
            Self::DEFAULT_INITIAL_GUARD_TIME,
            |v| v > 0.0,
        );
        check(
            "guard_time_decrement",
            &mut self.guard_time_decrement,
            Self::DEFAULT_GUARD_TIME_DECREMENT,
            |v| v >= 0.0,
        );
        check(
            "max_frame_delta",
            &mut self.max_frame_delta,
            Self::DEFAULT_MAX_FRAME_DELTA,
            |v| v > 0.0 && v <= Self::MAX_FRAME_DELTA_LIMIT,
        );
        // The wrap-around needs at least a 3x3 board to have an interior.
        check_count("grid_width", &mut self.grid_width, Self::DEFAULT_GRID_WIDTH, 3);
        check_count("grid_height", &mut self.grid_height, Self::DEFAULT_GRID_HEIGHT, 3);
        check_count(
            "high_score_capacity",
            &mut self.high_score_capacity,
            Self::DEFAULT_HIGH_SCORE_CAPACITY,
            1,
        );
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = Config::from_toml_str("player_speed = 6.5\ncoin_points = 1\n").unwrap();
        assert_eq!(config.player_speed, 6.5);
        assert_eq!(config.coin_points, 1);
        assert_eq!(config.initial_guard_time, Config::DEFAULT_INITIAL_GUARD_TIME);
        assert_eq!(config.grid_width, 28);
    }

    #[test]
    fn invalid_fields_fall_back_individually() {
        let config =
            Config::from_toml_str("player_speed = -2.0\npower_up_slowdown = 3.0\nghost_points = 7\n")
                .unwrap();
        assert_eq!(config.player_speed, Config::DEFAULT_PLAYER_SPEED);
        assert_eq!(config.power_up_slowdown, Config::DEFAULT_POWER_UP_SLOWDOWN);
        assert_eq!(config.ghost_points, 7);
    }

    #[test]
    fn oversized_speed_and_frame_delta_are_rejected() {
        let config =
            Config::from_toml_str("player_speed = 1e6\nmax_frame_delta = 1e3\n").unwrap();
        assert_eq!(config.player_speed, Config::DEFAULT_PLAYER_SPEED);
        assert_eq!(config.max_frame_delta, Config::DEFAULT_MAX_FRAME_DELTA);

        let config = Config::from_toml_str("player_speed = 60.0\nmax_frame_delta = 1.0\n").unwrap();
        assert_eq!(config.player_speed, 60.0);
        assert_eq!(config.max_frame_delta, 1.0);
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "player_speed = \"fast\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
        assert_eq!(Config::load_or_default(file.path()), Config::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(Config::load(&path), Err(ConfigError::Io { .. })));
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_power_up_time = 8.0").unwrap();
        writeln!(file, "time_between_guard_mode = 12.0").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.initial_power_up_time, 8.0);
        assert_eq!(config.time_between_guard_mode, 12.0);
    }
}
