//! Error types
//!
//! Configuration problems and generation failures. Soft degradations that
//! still yield a usable dungeon are not errors; see `GenerationReport`.

use std::path::PathBuf;

use thiserror::Error;

use crate::world::{Point, TileKind};

/// Problems reading or validating a `DungeonConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// A generation attempt that could not produce a valid dungeon
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no room could be placed in {attempts} attempts")]
    NoRooms { attempts: u32 },
    #[error("no free room cell left for the exit")]
    NoExitSpace,
    #[error("{unreached} walkable tiles are unreachable from the entrance (first at {first:?})")]
    Unreachable { unreached: usize, first: Point },
    #[error("locked doors cannot all be opened from the entrance")]
    LocksUnsolvable,
    #[error("door list entry {at:?} is not a door tile")]
    DoorMismatch { at: Point },
    #[error("expected exactly one {kind:?} tile, found {count}")]
    MarkerCount { kind: TileKind, count: usize },
    #[error("gave up after {attempts} generation attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<GenerationError>,
    },
}
