//! Reachability over the tile grid
//!
//! 4-connected flood fills used to repair and validate generated layouts.

use std::collections::BTreeSet;

use super::map::TileMap;
use super::point::Point;
use super::tile::{KeyId, Tile};

/// The set of cells a flood fill visited
#[derive(Debug, Clone)]
pub struct Reachability {
    width: i32,
    height: i32,
    visited: Vec<bool>,
    count: usize,
}

impl Reachability {
    pub fn contains(&self, p: Point) -> bool {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return false;
        }
        self.visited[p.y as usize * self.width as usize + p.x as usize]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Flood fill from `start` through cells accepted by `can_pass`
///
/// The start cell is included only if it passes itself.
pub fn flood_fill(map: &TileMap, start: Point, can_pass: impl Fn(&Tile) -> bool) -> Reachability {
    let mut visited = vec![false; map.tiles().len()];
    let mut count = 0;
    let mut stack = vec![start];

    while let Some(pos) = stack.pop() {
        let Some(idx) = map.index_of(pos) else {
            continue;
        };
        if visited[idx] || !can_pass(&map.tile(pos)) {
            continue;
        }
        visited[idx] = true;
        count += 1;

        for next in pos.neighbors() {
            stack.push(next);
        }
    }

    Reachability {
        width: map.width(),
        height: map.height(),
        visited,
        count,
    }
}

/// Everything reachable once all locks are open
pub fn reachable_from(map: &TileMap, start: Point) -> Reachability {
    flood_fill(map, start, Tile::is_traversable)
}

/// Walkable tiles the fill did not reach, in row-major order
pub fn unreached(map: &TileMap, reach: &Reachability) -> Vec<Point> {
    map.iter()
        .filter(|(p, tile)| tile.is_walkable_kind() && !reach.contains(*p))
        .map(|(p, _)| p)
        .collect()
}

/// Reachable from `start` while holding only `keys`
pub fn reachable_with_keys(map: &TileMap, start: Point, keys: &BTreeSet<KeyId>) -> Reachability {
    flood_fill(map, start, |tile| match tile {
        Tile::LockedDoor { key } => keys.contains(key),
        other => other.is_passable(),
    })
}

/// Result of playing the lock-and-key structure forward from the entrance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockWalk {
    /// Keys picked up, in collection order
    pub collected: Vec<KeyId>,
    /// Cells reachable at the fixed point
    pub reached: usize,
    pub exit_reached: bool,
}

/// Repeatedly collect every reachable key and open its doors until nothing changes
pub fn walk_locks(map: &TileMap, start: Point, exit: Point) -> LockWalk {
    let mut held = BTreeSet::new();
    let mut collected = Vec::new();

    loop {
        let reach = reachable_with_keys(map, start, &held);
        let mut found = false;
        for (p, tile) in map.iter() {
            if let Tile::Key { id } = tile {
                if reach.contains(p) && held.insert(id) {
                    collected.push(id);
                    found = true;
                }
            }
        }
        if !found {
            return LockWalk {
                collected,
                reached: reach.len(),
                exit_reached: reach.contains(exit),
            };
        }
    }
}

/// True when every locked door's key can be collected and the exit reached
pub fn locks_solvable(map: &TileMap, start: Point, exit: Point) -> bool {
    let walk = walk_locks(map, start, exit);
    if !walk.exit_reached {
        return false;
    }
    let held: BTreeSet<KeyId> = walk.collected.iter().copied().collect();
    map.iter().all(|(_, tile)| match tile {
        Tile::LockedDoor { key } => held.contains(&key),
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two 3x1 pockets joined through a door at (4, 1)
    fn two_pockets(door: Tile) -> TileMap {
        let mut map = TileMap::new(9, 3);
        map.fill_rect(Point::new(1, 1), Point::new(3, 1), Tile::Floor);
        map.fill_rect(Point::new(5, 1), Point::new(7, 1), Tile::Floor);
        map.set(1, 4, door);
        map
    }

    #[test]
    fn test_flood_fill_through_door() {
        let map = two_pockets(Tile::Door);
        let reach = reachable_from(&map, Point::new(1, 1));
        assert_eq!(reach.len(), 7);
        assert!(reach.contains(Point::new(7, 1)));
        assert!(unreached(&map, &reach).is_empty());
    }

    #[test]
    fn test_wall_splits_regions() {
        let map = two_pockets(Tile::Wall);
        let reach = reachable_from(&map, Point::new(1, 1));
        assert_eq!(reach.len(), 3);
        assert_eq!(unreached(&map, &reach), vec![Point::new(5, 1), Point::new(6, 1), Point::new(7, 1)]);
    }

    #[test]
    fn test_start_on_wall_reaches_nothing() {
        let map = two_pockets(Tile::Door);
        let reach = reachable_from(&map, Point::new(0, 0));
        assert!(reach.is_empty());
        assert!(!reach.contains(Point::new(-3, 40)));
    }

    #[test]
    fn test_locked_door_needs_key() {
        let mut map = two_pockets(Tile::LockedDoor { key: KeyId(0) });
        map.set(1, 7, Tile::Exit);
        let start = Point::new(1, 1);
        let exit = Point::new(7, 1);

        assert!(!locks_solvable(&map, start, exit));

        map.set(1, 2, Tile::Key { id: KeyId(0) });
        let walk = walk_locks(&map, start, exit);
        assert_eq!(walk.collected, vec![KeyId(0)]);
        assert!(walk.exit_reached);
        assert!(locks_solvable(&map, start, exit));
    }

    #[test]
    fn test_key_behind_its_own_door_is_unsolvable() {
        let mut map = two_pockets(Tile::LockedDoor { key: KeyId(0) });
        map.set(1, 7, Tile::Key { id: KeyId(0) });
        map.set(1, 2, Tile::Exit);
        assert!(!locks_solvable(&map, Point::new(1, 1), Point::new(2, 1)));
    }
}
