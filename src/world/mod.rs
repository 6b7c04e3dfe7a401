//! World module
//!
//! Grid data structures, reachability queries and dungeon generation.

pub mod connectivity;
pub mod dungeon;
pub mod generation;
pub mod map;
pub mod point;
pub mod tile;

pub use dungeon::Dungeon;
pub use map::TileMap;
pub use point::{Direction, Point};
pub use tile::{KeyId, Tile, TileKind};
