//! The generated dungeon
//!
//! `Dungeon` is the handle callers keep: it owns the generator and the
//! current layout, answers tile queries and can be asked to regenerate.

use std::fmt;

use super::generation::{Decorator, DungeonGenerator, GenerationReport, Level, Room};
use super::{Point, Tile, TileMap};
use crate::config::DungeonConfig;
use crate::error::GenerationError;

#[derive(Debug)]
pub struct Dungeon {
    level: Level,
    generator: DungeonGenerator,
}

impl Dungeon {
    /// Validate `config` and generate the first layout from `seed`
    pub fn new(config: DungeonConfig, seed: u64) -> Result<Self, GenerationError> {
        Self::from_generator(DungeonGenerator::new(config, seed)?)
    }

    /// Same as `new`, with custom decoration hooks
    pub fn with_decorator(config: DungeonConfig, seed: u64, decorator: Box<dyn Decorator>) -> Result<Self, GenerationError> {
        Self::from_generator(DungeonGenerator::new(config, seed)?.with_decorator(decorator))
    }

    pub fn from_generator(mut generator: DungeonGenerator) -> Result<Self, GenerationError> {
        let level = generator.generate()?;
        Ok(Self { level, generator })
    }

    /// Build a new layout from the generator's continuing random stream.
    /// The current layout is kept if generation fails.
    pub fn regenerate(&mut self) -> Result<(), GenerationError> {
        self.level = self.generator.generate()?;
        Ok(())
    }

    /// Tile at (row, col); `None` outside the grid
    pub fn tile(&self, row: i32, col: i32) -> Option<Tile> {
        self.level.map.get(row, col)
    }

    pub fn map(&self) -> &TileMap {
        &self.level.map
    }

    pub fn width(&self) -> i32 {
        self.level.map.width()
    }

    pub fn height(&self) -> i32 {
        self.level.map.height()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.level.rooms
    }

    pub fn doors(&self) -> &[Point] {
        &self.level.doors
    }

    pub fn entrance(&self) -> Point {
        self.level.entrance
    }

    pub fn exit(&self) -> Point {
        self.level.exit
    }

    /// Monster spawn points left by the decoration hooks
    pub fn mobs(&self) -> &[Point] {
        &self.level.mobs
    }

    pub fn report(&self) -> &GenerationReport {
        &self.level.report
    }

    pub fn config(&self) -> &DungeonConfig {
        self.generator.config()
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level.map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::connectivity::{locks_solvable, reachable_from};
    use crate::world::generation::{DecorationContext, Degradation};
    use crate::world::TileKind;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn dungeon(config: DungeonConfig, seed: u64) -> Dungeon {
        Dungeon::new(config, seed).unwrap()
    }

    /// Layout properties every successful run must satisfy
    fn check_invariants(d: &Dungeon) {
        let map = d.map();

        assert_eq!(map.count_where(|t| t.kind() == TileKind::Entrance), 1);
        assert_eq!(map.count_where(|t| t.kind() == TileKind::Exit), 1);
        assert_ne!(d.entrance(), d.exit());
        assert!(map.is_kind_at(d.entrance(), TileKind::Entrance));
        assert!(map.is_kind_at(d.exit(), TileKind::Exit));

        let reach = reachable_from(map, d.entrance());
        for (p, tile) in map.iter() {
            if tile.is_traversable() {
                assert!(reach.contains(p), "{:?} ({}) unreachable", p, tile.name());
            }
        }
        assert!(locks_solvable(map, d.entrance(), d.exit()));

        for &door in d.doors() {
            assert!(map.tile(door).is_door(), "{:?} is not a door", door);
            assert!(d.rooms().iter().all(|r| !r.is_corner(door)), "{:?} is a room corner", door);
        }

        for (i, a) in d.rooms().iter().enumerate() {
            for b in &d.rooms()[i + 1..] {
                assert!(!a.expanded(1).intersects(&b.expanded(1)), "{:?} and {:?} too close", a, b);
            }
        }

        // the outer ring is never opened up
        for (p, tile) in map.iter() {
            if !map.is_interior(p) {
                assert_eq!(tile, Tile::Wall, "border cell {:?}", p);
            }
        }
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let a = dungeon(DungeonConfig::default(), 42);
        let b = dungeon(DungeonConfig::default(), 42);
        assert_eq!(a.level(), b.level());
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = dungeon(DungeonConfig::default(), 1);
        let b = dungeon(DungeonConfig::default(), 2);
        assert_ne!(a.map(), b.map());
    }

    #[test]
    fn test_default_dungeon_invariants() {
        for seed in 0..10 {
            check_invariants(&dungeon(DungeonConfig::default(), seed));
        }
    }

    #[test]
    fn test_density_met_or_budget_exhausted() {
        for seed in 0..10 {
            let d = dungeon(DungeonConfig::default(), seed);
            let report = d.report();
            if report.density_met() {
                assert!(report.room_density >= d.config().density);
            } else {
                assert_eq!(report.placement_attempts, d.config().max_placement_attempts);
            }
            assert!(report.final_density >= report.room_density);
        }
    }

    #[test]
    fn test_sparse_dungeon() {
        let config = DungeonConfig {
            density: 0.10,
            ..DungeonConfig::with_size(50, 50)
        };
        let d = dungeon(config.clone(), 9);
        check_invariants(&d);
        assert!(d.report().density_met());
        assert!(!d.rooms().is_empty());

        let again = dungeon(config, 9);
        assert_eq!(again.rooms(), d.rooms());
        assert_eq!(again.doors(), d.doors());
        assert_eq!(again.entrance(), d.entrance());
        assert_eq!(again.exit(), d.exit());
    }

    #[test]
    fn test_tiny_grid_fits_one_room() {
        let config = DungeonConfig {
            room_min_size: 6,
            room_max_size: 6,
            ..DungeonConfig::with_size(10, 10)
        };
        let d = dungeon(config, 4);
        check_invariants(&d);
        assert_eq!(d.rooms().len(), 1);
        assert!(!d.report().density_met() || d.report().room_density >= 0.25);
    }

    #[test]
    fn test_lone_door_is_reported() {
        let config = DungeonConfig {
            room_min_size: 6,
            room_max_size: 6,
            max_doors_per_room: 1,
            ..DungeonConfig::with_size(10, 10)
        };
        let d = dungeon(config, 11);
        assert_eq!(d.doors().len(), 1);
        assert!(d
            .report()
            .issues
            .iter()
            .any(|issue| matches!(issue, Degradation::SelfOnlyDoorSet { .. })));
    }

    #[test]
    fn test_out_of_bounds_tile_is_none() {
        let d = dungeon(DungeonConfig::with_size(20, 15), 0);
        assert!(d.tile(-1, 0).is_none());
        assert!(d.tile(0, 20).is_none());
        assert!(d.tile(15, 0).is_none());
        assert_eq!(d.tile(0, 0), Some(Tile::Wall));
        assert_eq!(d.width(), 20);
        assert_eq!(d.height(), 15);
    }

    #[test]
    fn test_regenerate_continues_the_stream() {
        let mut d = dungeon(DungeonConfig::default(), 8);
        let first = d.level().clone();
        d.regenerate().unwrap();
        check_invariants(&d);
        assert_ne!(&first, d.level());
        assert_eq!(d.seed(), 8);
    }

    #[test]
    fn test_invalid_config_surfaces_as_config_error() {
        let config = DungeonConfig::with_size(5, 5);
        let err = Dungeon::new(config, 0).unwrap_err();
        assert!(matches!(err, GenerationError::Config(_)));
    }

    struct CountingDecorator {
        calls: Rc<Cell<u32>>,
    }

    impl Decorator for CountingDecorator {
        fn add_mobs(&mut self, ctx: &mut DecorationContext<'_>) {
            self.calls.set(self.calls.get() + 1);
            if let Some(room) = ctx.rooms.first() {
                let spot = room.random_interior_point(&mut *ctx.rng);
                ctx.mobs.push(spot);
            }
        }

        fn add_traps(&mut self, ctx: &mut DecorationContext<'_>) {
            self.calls.set(self.calls.get() + 1);
            let spot = ctx
                .rooms
                .iter()
                .flat_map(Room::interior)
                .find(|&p| ctx.map.tile(p) == Tile::Floor);
            if let Some(p) = spot {
                ctx.map.set_tile(p, Tile::Trap { damage: 3 });
            }
        }
    }

    #[test]
    fn test_decorator_hooks_run_after_layout() {
        let calls = Rc::new(Cell::new(0));
        let decorator = CountingDecorator { calls: Rc::clone(&calls) };
        let d = Dungeon::with_decorator(DungeonConfig::default(), 3, Box::new(decorator)).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(d.mobs().len(), 1);
        assert_eq!(d.map().count_where(|t| matches!(t, Tile::Trap { .. })), 1);
        // traps stay walkable, so the layout is still fully connected
        check_invariants(&d);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_any_seed_yields_valid_dungeon(seed in any::<u64>(), width in 12i32..40, height in 12i32..40) {
            let d = Dungeon::new(DungeonConfig::with_size(width, height), seed).unwrap();
            check_invariants(&d);
        }
    }
}
