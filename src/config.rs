//! Generation parameters
//!
//! Every value is fixed for the duration of a run. Configs can be read from
//! RON files; any field left out takes its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest grid, in cells, a config may ask for
pub const MAX_CELLS: i64 = 1 << 24;

/// Construction parameters for a dungeon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: i32,
    pub height: i32,
    /// Target fraction of cells that should be open ground
    pub density: f64,
    /// Room extent range, walls included on one side (x2 - x1)
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub min_doors_per_room: usize,
    pub max_doors_per_room: usize,
    pub min_paths_per_door: usize,
    pub max_paths_per_door: usize,
    pub chance_door_locked: f64,
    /// Room proposals per generation attempt
    pub max_placement_attempts: u32,
    /// Handed to decoration hooks
    pub chance_for_monster: f64,
    pub chance_for_loot: f64,
    /// Full pipeline reruns before giving up
    pub max_generation_attempts: u32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            density: 0.25,
            room_min_size: 6,
            room_max_size: 10,
            min_doors_per_room: 1,
            max_doors_per_room: 2,
            min_paths_per_door: 1,
            max_paths_per_door: 2,
            chance_door_locked: 0.4,
            max_placement_attempts: 200,
            chance_for_monster: 0.3,
            chance_for_loot: 0.05,
            max_generation_attempts: 8,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not within [0, 1]")))
    }
}

impl DungeonConfig {
    /// Default parameters on a grid of the given size
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Reject values the generator cannot work with. Grids are capped at
    /// `MAX_CELLS` cells.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_min_size < 2 {
            return Err(invalid("room_min_size", "rooms need at least one interior cell (minimum 2)"));
        }
        if self.room_min_size > self.room_max_size {
            return Err(invalid(
                "room_max_size",
                format!("{} is smaller than room_min_size {}", self.room_max_size, self.room_min_size),
            ));
        }
        // a lone room must hold both the entrance and the exit
        if self.room_max_size < 3 {
            return Err(invalid("room_max_size", "rooms need two interior cells (minimum 3)"));
        }
        // one border cell on each side plus a room of minimum size
        let min_extent = self.room_min_size.saturating_add(3);
        if self.width < min_extent {
            return Err(invalid("width", format!("{} is too small, need at least {min_extent}", self.width)));
        }
        if self.height < min_extent {
            return Err(invalid("height", format!("{} is too small, need at least {min_extent}", self.height)));
        }
        let cells = i64::from(self.width) * i64::from(self.height);
        if cells > MAX_CELLS {
            return Err(invalid(
                "width",
                format!("{}x{} grid has {cells} cells, limit is {MAX_CELLS}", self.width, self.height),
            ));
        }
        if self.min_doors_per_room == 0 {
            return Err(invalid("min_doors_per_room", "must be at least 1"));
        }
        if self.min_doors_per_room > self.max_doors_per_room {
            return Err(invalid("max_doors_per_room", "smaller than min_doors_per_room"));
        }
        if self.min_paths_per_door == 0 {
            return Err(invalid("min_paths_per_door", "must be at least 1"));
        }
        if self.min_paths_per_door > self.max_paths_per_door {
            return Err(invalid("max_paths_per_door", "smaller than min_paths_per_door"));
        }
        check_probability("density", self.density)?;
        check_probability("chance_door_locked", self.chance_door_locked)?;
        check_probability("chance_for_monster", self.chance_for_monster)?;
        check_probability("chance_for_loot", self.chance_for_loot)?;
        if self.max_placement_attempts == 0 {
            return Err(invalid("max_placement_attempts", "must be at least 1"));
        }
        if self.max_generation_attempts == 0 {
            return Err(invalid("max_generation_attempts", "must be at least 1"));
        }
        Ok(())
    }

    /// Parse a config from RON text and validate it
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it is missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_ron_pretty(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}
