//! Session configuration
//!
//! Defaults reproduce the classic game. Every field can be overridden from
//! `DUMBLOX_*` environment variables; absent or unparsable values fall back
//! to the default.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::types::{
    DEFAULT_FPS, GRID_COLUMNS, GRID_ROWS, MAX_SPEED, NUM_FADE_CYCLES, ROWS_PER_LEVEL,
    SPEED_INCREMENT, START_SPEED,
};

/// Smallest grid that still fits every rotation state of every kind
pub const MIN_GRID_SIZE: u16 = 4;

/// Largest grid side; keeps cell coordinates and rendered widths in range
pub const MAX_GRID_SIZE: u16 = 1024;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid {rows}x{columns} is smaller than 4x4")]
    GridTooSmall { rows: u16, columns: u16 },
    #[error("grid {rows}x{columns} is larger than 1024x1024")]
    GridTooLarge { rows: u16, columns: u16 },
    #[error("fps must be positive")]
    ZeroFps,
    #[error("max speed {max_speed} must be below fps {fps}")]
    MaxSpeedTooHigh { max_speed: u32, fps: u32 },
    #[error("start speed {start_speed} exceeds max speed {max_speed}")]
    StartAboveMax { start_speed: u32, max_speed: u32 },
    #[error("fade must last at least one tick")]
    ZeroFadeCycles,
    #[error("rows per level must be positive")]
    ZeroRowsPerLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub rows: u16,
    pub columns: u16,
    /// Logical ticks per second
    pub fps: u32,
    pub start_speed: u32,
    pub max_speed: u32,
    pub speed_increment: u32,
    pub rows_per_level: u32,
    /// Ticks a completed row fades before it is deleted
    pub fade_cycles: u32,
    pub seed: u32,
    /// Freeze in-flight fade sequences while paused
    pub pause_freezes_tasks: bool,
    /// Allow `MoveUp`
    pub debug_moves: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            columns: GRID_COLUMNS,
            fps: DEFAULT_FPS,
            start_speed: START_SPEED,
            max_speed: MAX_SPEED,
            speed_increment: SPEED_INCREMENT,
            rows_per_level: ROWS_PER_LEVEL,
            fade_cycles: NUM_FADE_CYCLES,
            seed: 1,
            pause_freezes_tasks: true,
            debug_moves: false,
        }
    }
}

impl SessionConfig {
    /// Default configuration with the given seed
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Read overrides from the process environment.
    ///
    /// Without `DUMBLOX_SEED` the seed is taken from the wall clock.
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| env::var(key).ok());
        if env::var("DUMBLOX_SEED").is_err() {
            config.seed = clock_seed();
        }
        config
    }

    /// Read overrides through `lookup` (a variable name to value map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u32>().ok());
        let dimension = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u16>().ok());
        let flag = |key: &str| lookup(key).and_then(|s| parse_flag(&s));

        Self {
            rows: dimension("DUMBLOX_ROWS").unwrap_or(defaults.rows),
            columns: dimension("DUMBLOX_COLUMNS").unwrap_or(defaults.columns),
            fps: number("DUMBLOX_FPS").unwrap_or(defaults.fps),
            start_speed: defaults.start_speed,
            max_speed: defaults.max_speed,
            speed_increment: defaults.speed_increment,
            rows_per_level: defaults.rows_per_level,
            fade_cycles: number("DUMBLOX_FADE_CYCLES").unwrap_or(defaults.fade_cycles),
            seed: number("DUMBLOX_SEED").unwrap_or(defaults.seed),
            pause_freezes_tasks: flag("DUMBLOX_PAUSE_FREEZES_TASKS")
                .unwrap_or(defaults.pause_freezes_tasks),
            debug_moves: flag("DUMBLOX_DEBUG_MOVES").unwrap_or(defaults.debug_moves),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_GRID_SIZE || self.columns < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.rows > MAX_GRID_SIZE || self.columns > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        // The forced-move interval is fps - speed and must stay positive.
        if self.max_speed >= self.fps {
            return Err(ConfigError::MaxSpeedTooHigh {
                max_speed: self.max_speed,
                fps: self.fps,
            });
        }
        if self.start_speed > self.max_speed {
            return Err(ConfigError::StartAboveMax {
                start_speed: self.start_speed,
                max_speed: self.max_speed,
            });
        }
        if self.fade_cycles == 0 {
            return Err(ConfigError::ZeroFadeCycles);
        }
        if self.rows_per_level == 0 {
            return Err(ConfigError::ZeroRowsPerLevel);
        }
        Ok(())
    }

    /// Pivot column of a freshly spawned piece
    pub fn spawn_column(&self) -> i16 {
        (self.columns / 2) as i16
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
