//! Tile definitions
//!
//! Every grid cell holds exactly one `Tile`. Tiles are plain values and are
//! replaced wholesale when the map changes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier tying a locked door to the key that opens it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub u32);

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key#{}", self.0)
    }
}

/// A single tile in the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Void; also what out-of-bounds lookups see
    Empty,
    Floor,
    Wall,
    Door,
    LockedDoor { key: KeyId },
    Entrance,
    Exit,
    Key { id: KeyId },
    Trap { damage: u32 },
}

/// Payload-free discriminant of a `Tile`, used for kind queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Floor,
    Wall,
    Door,
    LockedDoor,
    Entrance,
    Exit,
    Key,
    Trap,
}

impl Tile {
    pub fn kind(&self) -> TileKind {
        match self {
            Tile::Empty => TileKind::Empty,
            Tile::Floor => TileKind::Floor,
            Tile::Wall => TileKind::Wall,
            Tile::Door => TileKind::Door,
            Tile::LockedDoor { .. } => TileKind::LockedDoor,
            Tile::Entrance => TileKind::Entrance,
            Tile::Exit => TileKind::Exit,
            Tile::Key { .. } => TileKind::Key,
            Tile::Trap { .. } => TileKind::Trap,
        }
    }

    /// Can an actor occupy or cross this tile without help
    pub fn is_passable(&self) -> bool {
        matches!(
            self,
            Tile::Floor
                | Tile::Door
                | Tile::Entrance
                | Tile::Exit
                | Tile::Key { .. }
                | Tile::Trap { .. }
        )
    }

    /// Passable once every key has been collected
    pub fn is_traversable(&self) -> bool {
        self.is_passable() || matches!(self, Tile::LockedDoor { .. })
    }

    /// Open ground: counts toward the density target
    pub fn is_floor_kind(&self) -> bool {
        matches!(
            self,
            Tile::Floor | Tile::Entrance | Tile::Exit | Tile::Key { .. } | Tile::Trap { .. }
        )
    }

    pub fn is_door(&self) -> bool {
        matches!(self, Tile::Door | Tile::LockedDoor { .. })
    }

    /// Anything that must be reachable from the entrance
    pub fn is_walkable_kind(&self) -> bool {
        self.is_floor_kind() || self.is_door()
    }

    pub fn damage(&self) -> u32 {
        match self {
            Tile::Trap { damage } => *damage,
            _ => 0,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Door => 'D',
            Tile::LockedDoor { .. } => 'L',
            Tile::Entrance => 'e',
            Tile::Exit => 'E',
            Tile::Key { .. } => 'k',
            Tile::Trap { .. } => 't',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tile::Empty => "Air",
            Tile::Floor => "Floor",
            Tile::Wall => "Wall",
            Tile::Door => "Door",
            Tile::LockedDoor { .. } => "Locked Door",
            Tile::Entrance => "Entrance",
            Tile::Exit => "Exit",
            Tile::Key { .. } => "Key",
            Tile::Trap { .. } => "Trap",
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Wall
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs() {
        let expected = [
            (Tile::Wall, '#'),
            (Tile::Floor, '.'),
            (Tile::Door, 'D'),
            (Tile::LockedDoor { key: KeyId(0) }, 'L'),
            (Tile::Entrance, 'e'),
            (Tile::Exit, 'E'),
            (Tile::Key { id: KeyId(3) }, 'k'),
            (Tile::Trap { damage: 4 }, 't'),
            (Tile::Empty, ' '),
        ];
        for (tile, glyph) in expected {
            assert_eq!(tile.glyph(), glyph, "{}", tile.name());
        }
    }

    #[test]
    fn test_passability() {
        assert!(!Tile::Wall.is_passable());
        assert!(!Tile::Empty.is_passable());
        assert!(Tile::Door.is_passable());
        assert!(!Tile::LockedDoor { key: KeyId(1) }.is_passable());
        assert!(Tile::LockedDoor { key: KeyId(1) }.is_traversable());
        assert!(Tile::Trap { damage: 2 }.is_passable());
    }

    #[test]
    fn test_damage_only_on_traps() {
        assert_eq!(Tile::Trap { damage: 7 }.damage(), 7);
        assert_eq!(Tile::Floor.damage(), 0);
        assert_eq!(Tile::Wall.damage(), 0);
    }

    #[test]
    fn test_kind_ignores_payload() {
        assert_eq!(Tile::LockedDoor { key: KeyId(1) }.kind(), Tile::LockedDoor { key: KeyId(9) }.kind());
        assert_ne!(Tile::Door.kind(), Tile::LockedDoor { key: KeyId(1) }.kind());
    }

    #[test]
    fn test_floor_kind_excludes_doors_and_walls() {
        assert!(Tile::Entrance.is_floor_kind());
        assert!(!Tile::Door.is_floor_kind());
        assert!(!Tile::Wall.is_floor_kind());
        assert!(Tile::Door.is_walkable_kind());
    }
}
