//! Procedural dungeon generation
//!
//! `DungeonGenerator` drives one run through its phases: rooms (with doors
//! and the entrance), the exit, corridors, keys, validation and finally the
//! decoration hooks. A run that fails validation is thrown away and rerun
//! with the same random stream.

pub mod decorate;
pub mod doors;
pub mod keys;
pub mod paths;
pub mod report;
pub mod rooms;

pub use decorate::{DecorationContext, Decorator, NoDecorations};
pub use doors::DoorPlacer;
pub use paths::{ConnectionReport, CorridorOutcome, PathConnector};
pub use report::{Degradation, GenerationReport};
pub use rooms::{Room, RoomPlacer};

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::connectivity::{locks_solvable, reachable_from, unreached};
use super::{Point, Tile, TileKind, TileMap};
use crate::config::DungeonConfig;
use crate::error::{ConfigError, GenerationError};

/// Where a generator is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    NotStarted,
    PlacingRooms,
    PlacingEntranceExit,
    ConnectingPaths,
    PlacingKeys,
    Validating,
    Decorating,
    Done,
}

/// A finished, validated layout
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub map: TileMap,
    pub rooms: Vec<Room>,
    pub doors: Vec<Point>,
    pub entrance: Point,
    pub exit: Point,
    pub mobs: Vec<Point>,
    pub report: GenerationReport,
}

/// Owns the config, the random stream and the decoration hooks
pub struct DungeonGenerator {
    config: DungeonConfig,
    seed: u64,
    rng: StdRng,
    decorator: Box<dyn Decorator>,
    phase: GenerationPhase,
}

impl fmt::Debug for DungeonGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DungeonGenerator")
            .field("config", &self.config)
            .field("seed", &self.seed)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl DungeonGenerator {
    pub fn new(config: DungeonConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
            decorator: Box::new(NoDecorations),
            phase: GenerationPhase::NotStarted,
        })
    }

    /// Replace the default no-op decoration hooks
    pub fn with_decorator(mut self, decorator: Box<dyn Decorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Run the pipeline, retrying failed attempts up to the configured limit.
    /// On error the phase is reset to `NotStarted`.
    pub fn generate(&mut self) -> Result<Level, GenerationError> {
        let mut attempt = 1;
        loop {
            match build_level(&self.config, &mut self.rng, &mut self.phase) {
                Ok(mut level) => {
                    level.report.attempt = attempt;
                    enter(&mut self.phase, GenerationPhase::Decorating);
                    self.decorate(&mut level);
                    enter(&mut self.phase, GenerationPhase::Done);

                    log::info!(
                        "Generated {}x{} dungeon (seed {}): {} rooms, {} doors, entrance {:?}, exit {:?}, attempt {}",
                        self.config.width,
                        self.config.height,
                        self.seed,
                        level.rooms.len(),
                        level.doors.len(),
                        level.entrance,
                        level.exit,
                        attempt
                    );
                    return Ok(level);
                }
                Err(e) if attempt < self.config.max_generation_attempts => {
                    log::warn!("Generation attempt {} failed: {}, retrying", attempt, e);
                    attempt += 1;
                }
                Err(e) => {
                    enter(&mut self.phase, GenerationPhase::NotStarted);
                    return Err(GenerationError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }
    }

    fn decorate(&mut self, level: &mut Level) {
        let mut ctx = DecorationContext {
            map: &mut level.map,
            rooms: &level.rooms,
            entrance: level.entrance,
            exit: level.exit,
            mobs: &mut level.mobs,
            rng: &mut self.rng,
            config: &self.config,
        };
        self.decorator.add_mobs(&mut ctx);
        self.decorator.add_traps(&mut ctx);
        self.decorator.add_hazards(&mut ctx);
    }
}

fn enter(phase: &mut GenerationPhase, next: GenerationPhase) {
    log::debug!("Generation phase: {:?} -> {:?}", phase, next);
    *phase = next;
}

/// One full attempt on a freshly cleared grid
fn build_level(
    config: &DungeonConfig,
    rng: &mut StdRng,
    phase: &mut GenerationPhase,
) -> Result<Level, GenerationError> {
    enter(phase, GenerationPhase::PlacingRooms);
    let mut map = TileMap::new(config.width, config.height);
    let mut rooms: Vec<Room> = Vec::new();
    let mut doors: Vec<Point> = Vec::new();
    let mut entrance = None;
    let mut issues = Vec::new();

    let room_placer = RoomPlacer::new(config);
    let mut door_placer = DoorPlacer::new(config);
    let mut attempts = 0;

    while map.floor_fraction() < config.density && attempts < config.max_placement_attempts {
        attempts += 1;
        let Some(room) = room_placer.try_place_room(&mut map, &rooms, rng) else {
            continue;
        };
        log::debug!("Placed room {:?} - {:?}", room.topleft, room.bottomright);
        rooms.push(room);

        if entrance.is_none() {
            if let Some(host) = rooms.choose(rng) {
                let p = host.random_interior_point(rng);
                map.set_tile(p, Tile::Entrance);
                entrance = Some(p);
            }
        }

        doors.extend(door_placer.add_doors(&mut map, &room, rng));
    }

    let room_density = map.floor_fraction();
    if room_density < config.density {
        issues.push(Degradation::DensityUnmet {
            achieved: room_density,
            target: config.density,
        });
    }
    let entrance = entrance.ok_or(GenerationError::NoRooms { attempts })?;

    enter(phase, GenerationPhase::PlacingEntranceExit);
    let exit = place_exit(&mut map, &rooms, entrance, rng)?;

    enter(phase, GenerationPhase::ConnectingPaths);
    let connector = PathConnector::new(config);
    let connection = connector.connect(&mut map, &doors, rng);
    issues.extend(connection.issues);
    let tunnels = connector.repair(&mut map, entrance);
    if tunnels > 0 {
        issues.push(Degradation::Repaired { tunnels });
    }

    enter(phase, GenerationPhase::PlacingKeys);
    issues.extend(keys::place_keys(&mut map, &rooms, entrance, &doors, rng));

    enter(phase, GenerationPhase::Validating);
    validate(&map, &doors, entrance, exit)?;

    let report = GenerationReport {
        attempt: 0,
        placement_attempts: attempts,
        room_density,
        final_density: map.floor_fraction(),
        corridors: connection.corridors,
        skipped_cells: connection.skipped_cells,
        issues,
    };

    Ok(Level {
        map,
        rooms,
        doors,
        entrance,
        exit,
        mobs: Vec::new(),
        report,
    })
}

/// Exit goes on a random room's interior, never on the entrance
fn place_exit(map: &mut TileMap, rooms: &[Room], entrance: Point, rng: &mut StdRng) -> Result<Point, GenerationError> {
    let free = |room: &Room| -> Vec<Point> { room.interior().into_iter().filter(|&p| p != entrance).collect() };

    let host = rooms.choose(rng).ok_or(GenerationError::NoExitSpace)?;
    let mut spots = free(host);
    if spots.is_empty() {
        spots = rooms.iter().flat_map(free).collect();
    }

    let exit = *spots.choose(rng).ok_or(GenerationError::NoExitSpace)?;
    map.set_tile(exit, Tile::Exit);
    Ok(exit)
}

/// Check the structural invariants of a finished layout
pub fn validate(map: &TileMap, doors: &[Point], entrance: Point, exit: Point) -> Result<(), GenerationError> {
    for (kind, at) in [(TileKind::Entrance, entrance), (TileKind::Exit, exit)] {
        let count = map.count_where(|t| t.kind() == kind);
        if count != 1 || !map.is_kind_at(at, kind) {
            return Err(GenerationError::MarkerCount { kind, count });
        }
    }

    if let Some(&at) = doors.iter().find(|&&d| !map.tile(d).is_door()) {
        return Err(GenerationError::DoorMismatch { at });
    }

    let reach = reachable_from(map, entrance);
    let lost = unreached(map, &reach);
    if let Some(&first) = lost.first() {
        return Err(GenerationError::Unreachable {
            unreached: lost.len(),
            first,
        });
    }

    if !locks_solvable(map, entrance, exit) {
        return Err(GenerationError::LocksUnsolvable);
    }

    Ok(())
}
