//! Room placement
//!
//! Proposes random rectangles and accepts those that sit on untouched wall
//! space with a one-tile margin to every other room.

use rand::Rng;

use crate::config::DungeonConfig;
use crate::world::{Point, Tile, TileMap};
use serde::{Deserialize, Serialize};

/// A rectangular room, walls included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub topleft: Point,
    pub bottomright: Point,
}

impl Room {
    pub fn new(topleft: Point, bottomright: Point) -> Self {
        Self { topleft, bottomright }
    }

    pub fn x1(&self) -> i32 {
        self.topleft.x
    }

    pub fn y1(&self) -> i32 {
        self.topleft.y
    }

    pub fn x2(&self) -> i32 {
        self.bottomright.x
    }

    pub fn y2(&self) -> i32 {
        self.bottomright.y
    }

    /// Both axis ranges overlap (inclusive)
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1() <= other.x2() && self.x2() >= other.x1() && self.y1() <= other.y2() && self.y2() >= other.y1()
    }

    /// The bounding box grown by `margin` on every side
    pub fn expanded(&self, margin: i32) -> Room {
        Room::new(
            Point::new(self.x1() - margin, self.y1() - margin),
            Point::new(self.x2() + margin, self.y2() + margin),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x1() && p.x <= self.x2() && p.y >= self.y1() && p.y <= self.y2()
    }

    pub fn interior_contains(&self, p: Point) -> bool {
        p.x > self.x1() && p.x < self.x2() && p.y > self.y1() && p.y < self.y2()
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.topleft,
            Point::new(self.x2(), self.y1()),
            Point::new(self.x1(), self.y2()),
            self.bottomright,
        ]
    }

    pub fn is_corner(&self, p: Point) -> bool {
        self.corners().contains(&p)
    }

    /// Cells strictly inside the walls, row-major
    pub fn interior(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in self.y1() + 1..self.y2() {
            for x in self.x1() + 1..self.x2() {
                points.push(Point::new(x, y));
            }
        }
        points
    }

    pub fn random_interior_point(&self, rng: &mut impl Rng) -> Point {
        Point::new(
            rng.gen_range(self.x1() + 1..=self.x2() - 1),
            rng.gen_range(self.y1() + 1..=self.y2() - 1),
        )
    }
}

/// Proposes and validates rooms against the map and the rooms already accepted
#[derive(Debug, Clone)]
pub struct RoomPlacer {
    min_size: i32,
    max_size: i32,
}

impl RoomPlacer {
    pub fn new(config: &DungeonConfig) -> Self {
        Self {
            min_size: config.room_min_size,
            max_size: config.room_max_size,
        }
    }

    /// One placement attempt. On success the room is stamped onto the map.
    pub fn try_place_room(&self, map: &mut TileMap, rooms: &[Room], rng: &mut impl Rng) -> Option<Room> {
        let candidate = self.propose(map, rng);
        if !self.is_valid(map, rooms, &candidate) {
            return None;
        }

        map.fill_rect(candidate.topleft, candidate.bottomright, Tile::Floor);
        map.stamp_border(candidate.topleft, candidate.bottomright, Tile::Wall);
        Some(candidate)
    }

    /// Random top-left and size, bottom-right clamped inside the border margin
    fn propose(&self, map: &TileMap, rng: &mut impl Rng) -> Room {
        let x1 = rng.gen_range(1..=(map.width() - self.min_size).max(1));
        let y1 = rng.gen_range(1..=(map.height() - self.min_size).max(1));
        let x2 = x1.saturating_add(rng.gen_range(self.min_size..=self.max_size)).min(map.width() - 2);
        let y2 = y1.saturating_add(rng.gen_range(self.min_size..=self.max_size)).min(map.height() - 2);
        Room::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    fn is_valid(&self, map: &TileMap, rooms: &[Room], candidate: &Room) -> bool {
        // strictly inside the border
        if candidate.x1() <= 0 || candidate.y1() <= 0 {
            return false;
        }
        if candidate.x2() >= map.width() - 1 || candidate.y2() >= map.height() - 1 {
            return false;
        }
        // clamping must not shrink it below the minimum
        if candidate.x2() - candidate.x1() < self.min_size || candidate.y2() - candidate.y1() < self.min_size {
            return false;
        }

        let padded = candidate.expanded(1);
        for y in padded.y1()..=padded.y2() {
            for x in padded.x1()..=padded.x2() {
                if map.tile(Point::new(x, y)) != Tile::Wall {
                    return false;
                }
            }
        }

        !rooms.iter().any(|room| padded.intersects(&room.expanded(1)))
    }
}
