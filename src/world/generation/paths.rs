//! Corridor construction
//!
//! Every door is joined to one or more other doors by a randomized greedy
//! walk. A repair pass afterwards tunnels any region the walks missed back
//! to the entrance.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;

use super::report::Degradation;
use crate::config::DungeonConfig;
use crate::world::connectivity::{reachable_from, unreached, Reachability};
use crate::world::{Direction, Point, Tile, TileMap};

/// How a single corridor walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorOutcome {
    Reached,
    /// Left the grid or hit the step cap before the goal
    Truncated,
}

/// Summary of one `connect` pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionReport {
    pub corridors: usize,
    /// Cells the flanking rule refused to carve
    pub skipped_cells: usize,
    pub issues: Vec<Degradation>,
}

#[derive(Debug, Clone)]
pub struct PathConnector {
    min_paths: usize,
    max_paths: usize,
}

impl PathConnector {
    pub fn new(config: &DungeonConfig) -> Self {
        Self {
            min_paths: config.min_paths_per_door,
            max_paths: config.max_paths_per_door,
        }
    }

    /// Carve corridors from every door to a random set of other doors
    pub fn connect(&self, map: &mut TileMap, doors: &[Point], rng: &mut impl Rng) -> ConnectionReport {
        let mut report = ConnectionReport::default();

        // Corridors change the cells around doors, so work out each door's
        // outside cell while the map still only holds rooms.
        let starts: Vec<Point> = doors.iter().map(|&d| outside_of(map, d)).collect();

        for (i, &door) in doors.iter().enumerate() {
            if doors.len() < 2 {
                report.issues.push(Degradation::SelfOnlyDoorSet { door });
                continue;
            }

            let others: Vec<usize> = (0..doors.len()).filter(|&j| j != i).collect();
            let wanted = rng.gen_range(self.min_paths..=self.max_paths).min(others.len());
            let targets: Vec<usize> = others.choose_multiple(rng, wanted).copied().collect();

            for j in targets {
                let (outcome, skipped) = carve_corridor(map, starts[i], starts[j], rng);
                report.corridors += 1;
                report.skipped_cells += skipped;
                if outcome == CorridorOutcome::Truncated {
                    report.issues.push(Degradation::PathTruncated { from: door, to: doors[j] });
                }
                log::debug!("Corridor {:?} -> {:?}: {:?}", door, doors[j], outcome);
            }
        }

        report
    }

    /// Tunnel every region unreachable from `entrance` to the nearest reached
    /// tile. Returns the number of tunnels dug.
    pub fn repair(&self, map: &mut TileMap, entrance: Point) -> usize {
        let mut tunnels = 0;
        let limit = map.tiles().len();

        while tunnels < limit {
            let reach = reachable_from(map, entrance);
            let Some(&lost) = unreached(map, &reach).first() else {
                break;
            };
            let Some(target) = nearest_reached(map, &reach, lost) else {
                break;
            };
            log::debug!("Repair tunnel {:?} -> {:?}", lost, target);
            carve_tunnel(map, lost, target);
            tunnels += 1;
        }

        tunnels
    }
}

/// The cell just outside a door, away from its room's interior
fn outside_of(map: &TileMap, door: Point) -> Point {
    Direction::ALL
        .into_iter()
        .find(|&dir| map.tile(door.step(dir.opposite())).is_floor_kind())
        .map(|dir| door.step(dir))
        .unwrap_or(door)
}

/// Randomized greedy walk from `from` to `to`, converting walls to floor.
///
/// Only axes that still differ from the goal are chosen, so every step
/// closes the distance by one. A wall is only carved when the cells beside
/// the path (its neighbours other than the previous and next path cells) are
/// all wall or door, which keeps corridors from running alongside open
/// floor. Returns the outcome and the number of cells left standing.
fn carve_corridor(map: &mut TileMap, from: Point, to: Point, rng: &mut impl Rng) -> (CorridorOutcome, usize) {
    let cap = 2 * (map.width() + map.height()) as usize;
    let mut cur = from;
    let mut prev = None;
    let mut skipped = 0;

    for _ in 0..=cap {
        if !map.in_bounds(cur) {
            return (CorridorOutcome::Truncated, skipped);
        }

        let step = next_step(cur, to, rng);
        let next = step.map(|dir| cur.step(dir));

        if map.tile(cur) == Tile::Wall && map.is_interior(cur) {
            if sides_closed(map, cur, prev, next) {
                map.set_tile(cur, Tile::Floor);
            } else {
                skipped += 1;
            }
        }

        match next {
            None => return (CorridorOutcome::Reached, skipped),
            Some(p) => {
                prev = Some(cur);
                cur = p;
            }
        }
    }

    (CorridorOutcome::Truncated, skipped)
}

/// A random move toward the goal, or `None` once there
fn next_step(cur: Point, to: Point, rng: &mut impl Rng) -> Option<Direction> {
    let horizontal = match cur.x.cmp(&to.x) {
        Ordering::Less => Some(Direction::East),
        Ordering::Greater => Some(Direction::West),
        Ordering::Equal => None,
    };
    let vertical = match cur.y.cmp(&to.y) {
        Ordering::Less => Some(Direction::South),
        Ordering::Greater => Some(Direction::North),
        Ordering::Equal => None,
    };

    match (horizontal, vertical) {
        (Some(h), Some(v)) => Some(if rng.gen_bool(0.5) { h } else { v }),
        (h, v) => h.or(v),
    }
}

fn sides_closed(map: &TileMap, p: Point, prev: Option<Point>, next: Option<Point>) -> bool {
    p.neighbors()
        .into_iter()
        .filter(|&n| Some(n) != prev && Some(n) != next)
        .all(|side| {
            let tile = map.tile(side);
            matches!(tile, Tile::Wall | Tile::Empty) || tile.is_door()
        })
}

fn nearest_reached(map: &TileMap, reach: &Reachability, from: Point) -> Option<Point> {
    map.iter()
        .filter(|(p, _)| reach.contains(*p))
        .min_by_key(|(p, _)| p.distance(&from))
        .map(|(p, _)| p)
}

/// Staircase tunnel between two points, converting only walls.
/// Consecutive carved cells share an edge, so the result is 4-connected.
fn carve_tunnel(map: &mut TileMap, from: Point, to: Point) {
    let mut x = from.x;
    let mut y = from.y;

    while x != to.x || y != to.y {
        if x < to.x {
            x += 1;
        } else if x > to.x {
            x -= 1;
        }
        open_wall(map, Point::new(x, y));

        if y < to.y {
            y += 1;
        } else if y > to.y {
            y -= 1;
        }
        open_wall(map, Point::new(x, y));
    }
}

fn open_wall(map: &mut TileMap, p: Point) {
    if map.tile(p) == Tile::Wall {
        map.set_tile(p, Tile::Floor);
    }
}
