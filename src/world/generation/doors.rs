//! Door placement
//!
//! Turns a few non-corner perimeter walls of a freshly stamped room into
//! doors, some of them locked.

use rand::seq::SliceRandom;
use rand::Rng;

use super::rooms::Room;
use crate::config::DungeonConfig;
use crate::world::{Direction, KeyId, Point, Tile, TileKind, TileMap};

/// Picks door cells on room perimeters and hands out key ids for locked ones
#[derive(Debug, Clone)]
pub struct DoorPlacer {
    min_doors: usize,
    max_doors: usize,
    chance_locked: f64,
    next_key: u32,
}

impl DoorPlacer {
    pub fn new(config: &DungeonConfig) -> Self {
        Self {
            min_doors: config.min_doors_per_room,
            max_doors: config.max_doors_per_room,
            chance_locked: config.chance_door_locked,
            next_key: 0,
        }
    }

    /// Convert perimeter walls of `room` to doors and return their coordinates
    pub fn add_doors(&mut self, map: &mut TileMap, room: &Room, rng: &mut impl Rng) -> Vec<Point> {
        let walls = door_candidates(map, room);
        let wanted = rng.gen_range(self.min_doors..=self.max_doors).min(walls.len());
        let chosen: Vec<Point> = walls.choose_multiple(rng, wanted).copied().collect();

        for &point in &chosen {
            let tile = if rng.gen_bool(self.chance_locked) {
                let key = KeyId(self.next_key);
                self.next_key += 1;
                Tile::LockedDoor { key }
            } else {
                Tile::Door
            };
            map.set_tile(point, tile);
        }

        chosen
    }
}

/// Which side of the room a perimeter cell faces, corners excluded
fn facing(room: &Room, p: Point) -> Option<Direction> {
    if room.is_corner(p) {
        return None;
    }
    if p.y == room.y1() {
        Some(Direction::North)
    } else if p.y == room.y2() {
        Some(Direction::South)
    } else if p.x == room.x1() {
        Some(Direction::West)
    } else if p.x == room.x2() {
        Some(Direction::East)
    } else {
        None
    }
}

/// Perimeter walls that may become doors: never a corner, and the cell
/// outside must not lie on the grid's outer ring
fn door_candidates(map: &TileMap, room: &Room) -> Vec<Point> {
    map.points_of_kind_in(room.topleft, room.bottomright, TileKind::Wall)
        .into_iter()
        .filter(|&p| match facing(room, p) {
            Some(dir) => map.is_interior(p.step(dir)),
            None => false,
        })
        .collect()
}
