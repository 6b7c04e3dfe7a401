//! Cryptgen - procedural dungeon layouts
//!
//! Rooms joined by corridors, locked doors with reachable keys, and one
//! entrance and exit, all reproducible from a seed.

pub mod config;
pub mod error;
pub mod world;

// Re-export commonly used types
pub use config::DungeonConfig;
pub use error::{ConfigError, GenerationError};
pub use world::generation::{Decorator, DungeonGenerator, GenerationReport, Level};
pub use world::{Dungeon, Point, Tile, TileMap};
