//! Map data structure
//!
//! The 2D tile grid a dungeon is carved into. Dimensions are fixed at
//! construction; every mutation happens in place.

use std::fmt;

use super::point::Point;
use super::tile::{Tile, TileKind};

/// A fixed-size grid of tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a new map filled with walls
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    #[inline]
    fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Flat index of an in-bounds point
    pub fn index_of(&self, p: Point) -> Option<usize> {
        self.in_bounds(p).then(|| self.xy_to_idx(p.x, p.y))
    }

    /// Convert 1D index to a point
    #[inline]
    pub fn idx_to_point(&self, idx: usize) -> Point {
        let width = self.width.max(1) as usize;
        Point::new((idx % width) as i32, (idx / width) as i32)
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    /// Inside the grid and not on its outer ring
    #[inline]
    pub fn is_interior(&self, p: Point) -> bool {
        p.x > 0 && p.x < self.width - 1 && p.y > 0 && p.y < self.height - 1
    }

    /// Get tile at (row, col)
    pub fn get(&self, row: i32, col: i32) -> Option<Tile> {
        let p = Point::new(col, row);
        if self.in_bounds(p) {
            Some(self.tiles[self.xy_to_idx(col, row)])
        } else {
            None
        }
    }

    /// Tile at a point; out-of-bounds reads see `Tile::Empty`, which is impassable
    pub fn tile(&self, p: Point) -> Tile {
        self.get(p.y, p.x).unwrap_or(Tile::Empty)
    }

    /// Set tile at (row, col). Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: i32, col: i32, tile: Tile) {
        if self.in_bounds(Point::new(col, row)) {
            let idx = self.xy_to_idx(col, row);
            self.tiles[idx] = tile;
        }
    }

    pub fn set_tile(&mut self, p: Point, tile: Tile) {
        self.set(p.y, p.x, tile);
    }

    /// False when out of bounds
    pub fn is_kind(&self, row: i32, col: i32, kind: TileKind) -> bool {
        self.get(row, col).is_some_and(|t| t.kind() == kind)
    }

    pub fn is_kind_at(&self, p: Point, kind: TileKind) -> bool {
        self.is_kind(p.y, p.x, kind)
    }

    /// Fill the inclusive rectangle with `tile`, clipped to the grid
    pub fn fill_rect(&mut self, topleft: Point, bottomright: Point, tile: Tile) {
        for y in topleft.y.max(0)..=bottomright.y.min(self.height - 1) {
            for x in topleft.x.max(0)..=bottomright.x.min(self.width - 1) {
                let idx = self.xy_to_idx(x, y);
                self.tiles[idx] = tile;
            }
        }
    }

    /// Write `tile` along the perimeter of the inclusive rectangle
    pub fn stamp_border(&mut self, topleft: Point, bottomright: Point, tile: Tile) {
        for x in topleft.x..=bottomright.x {
            self.set(topleft.y, x, tile);
            self.set(bottomright.y, x, tile);
        }
        for y in topleft.y..=bottomright.y {
            self.set(y, topleft.x, tile);
            self.set(y, bottomright.x, tile);
        }
    }

    /// All points within the inclusive rectangle holding a tile of `kind`
    pub fn points_of_kind_in(&self, topleft: Point, bottomright: Point, kind: TileKind) -> Vec<Point> {
        let mut points = Vec::new();
        for y in topleft.y..=bottomright.y {
            for x in topleft.x..=bottomright.x {
                if self.is_kind(y, x, kind) {
                    points.push(Point::new(x, y));
                }
            }
        }
        points
    }

    pub fn count_where(&self, pred: impl Fn(&Tile) -> bool) -> usize {
        self.tiles.iter().filter(|t| pred(t)).count()
    }

    /// Share of cells that are open ground
    pub fn floor_fraction(&self) -> f64 {
        if self.tiles.is_empty() {
            return 0.0;
        }
        self.count_where(Tile::is_floor_kind) as f64 / self.tiles.len() as f64
    }

    /// Iterate over every cell with its coordinate, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(idx, tile)| (self.idx_to_point(idx), *tile))
    }
}

/// One glyph per tile, rows separated by newlines
impl fmt::Display for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.tiles.chunks(self.width.max(1) as usize).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for tile in row {
                write!(f, "{}", tile.glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_all_wall() {
        let map = TileMap::new(6, 4);
        assert_eq!(map.tiles().len(), 24);
        assert!(map.tiles().iter().all(|t| *t == Tile::Wall));
    }

    #[test]
    fn test_out_of_bounds_fails_closed() {
        let mut map = TileMap::new(5, 5);
        assert_eq!(map.get(-1, 0), None);
        assert_eq!(map.get(0, 5), None);
        assert_eq!(map.tile(Point::new(9, 9)), Tile::Empty);
        assert!(!map.tile(Point::new(-1, 2)).is_passable());
        assert!(!map.is_kind(5, 0, TileKind::Wall));
        // ignored, must not panic
        map.set(10, 10, Tile::Floor);
    }

    #[test]
    fn test_row_col_order() {
        let mut map = TileMap::new(8, 3);
        map.set(2, 7, Tile::Door);
        assert_eq!(map.tile(Point::new(7, 2)), Tile::Door);
        assert!(map.is_kind_at(Point::new(7, 2), TileKind::Door));
    }

    #[test]
    fn test_fill_and_border() {
        let mut map = TileMap::new(10, 10);
        let tl = Point::new(2, 2);
        let br = Point::new(6, 5);
        map.fill_rect(tl, br, Tile::Floor);
        map.stamp_border(tl, br, Tile::Wall);

        assert_eq!(map.count_where(|t| *t == Tile::Floor), 3 * 2);
        assert_eq!(map.tile(Point::new(2, 2)), Tile::Wall);
        assert_eq!(map.tile(Point::new(3, 3)), Tile::Floor);
        assert_eq!(map.tile(Point::new(5, 4)), Tile::Floor);
        assert_eq!(map.tile(Point::new(6, 4)), Tile::Wall);
    }

    #[test]
    fn test_floor_fraction() {
        let mut map = TileMap::new(10, 10);
        map.fill_rect(Point::new(0, 0), Point::new(4, 1), Tile::Floor);
        map.set(9, 9, Tile::Entrance);
        assert!((map.floor_fraction() - 0.11).abs() < 1e-9);
    }

    #[test]
    fn test_render() {
        let mut map = TileMap::new(3, 2);
        map.set(0, 1, Tile::Floor);
        map.set(1, 0, Tile::Exit);
        map.set(1, 2, Tile::Empty);
        assert_eq!(map.to_string(), "#.#\nE# ");
    }

    #[test]
    fn test_index_round_trips_through_point() {
        let map = TileMap::new(7, 5);
        let p = Point::new(6, 4);
        let idx = map.index_of(p).unwrap();
        assert_eq!(idx, 34);
        assert_eq!(map.idx_to_point(idx), p);
        assert_eq!(map.index_of(Point::new(7, 0)), None);
        assert_eq!(map.index_of(Point::new(0, -1)), None);
    }
}
