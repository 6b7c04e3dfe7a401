//! Key placement for locked doors
//!
//! Keys go down in ascending id order. Each one is dropped somewhere the
//! player can already walk to holding only the keys placed before it, so its
//! own door never stands between the entrance and the key.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::report::Degradation;
use super::rooms::Room;
use crate::world::connectivity::reachable_with_keys;
use crate::world::{KeyId, Point, Tile, TileMap};

/// Place one key per locked door in `doors`. Doors whose key has nowhere to
/// go are turned into plain doors and reported.
pub fn place_keys(
    map: &mut TileMap,
    rooms: &[Room],
    entrance: Point,
    doors: &[Point],
    rng: &mut impl Rng,
) -> Vec<Degradation> {
    let mut locked: Vec<(KeyId, Point)> = doors
        .iter()
        .filter_map(|&door| match map.tile(door) {
            Tile::LockedDoor { key } => Some((key, door)),
            _ => None,
        })
        .collect();
    locked.sort();

    let mut held = BTreeSet::new();
    let mut issues = Vec::new();

    for (key, door) in locked {
        let reach = reachable_with_keys(map, entrance, &held);

        // prefer room floors over corridors
        let mut spots: Vec<Point> = rooms
            .iter()
            .flat_map(Room::interior)
            .filter(|&p| map.tile(p) == Tile::Floor && reach.contains(p))
            .collect();
        if spots.is_empty() {
            spots = map
                .iter()
                .filter(|&(p, tile)| tile == Tile::Floor && reach.contains(p))
                .map(|(p, _)| p)
                .collect();
        }

        match spots.choose(rng) {
            Some(&spot) => {
                log::debug!("Placed {} at {:?} for door {:?}", key, spot, door);
                map.set_tile(spot, Tile::Key { id: key });
                held.insert(key);
            }
            None => {
                log::debug!("No reachable spot for {}, unlocking door {:?}", key, door);
                map.set_tile(door, Tile::Door);
                issues.push(Degradation::LockDowngraded { door, key });
            }
        }
    }

    issues
}
