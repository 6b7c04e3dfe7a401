//! Decoration hooks
//!
//! Mobs, traps and hazards are left to the embedding game. The generator
//! calls these hooks once the layout has been validated.

use rand::rngs::StdRng;

use super::rooms::Room;
use crate::config::DungeonConfig;
use crate::world::{Point, TileMap};

/// Everything a decorator may read or change
pub struct DecorationContext<'a> {
    pub map: &'a mut TileMap,
    pub rooms: &'a [Room],
    pub entrance: Point,
    pub exit: Point,
    /// Spawn points for monsters
    pub mobs: &'a mut Vec<Point>,
    pub rng: &'a mut StdRng,
    pub config: &'a DungeonConfig,
}

/// Populates a finished layout. Every hook defaults to doing nothing.
pub trait Decorator {
    fn add_mobs(&mut self, _ctx: &mut DecorationContext<'_>) {}

    fn add_traps(&mut self, _ctx: &mut DecorationContext<'_>) {}

    fn add_hazards(&mut self, _ctx: &mut DecorationContext<'_>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecorations;

impl Decorator for NoDecorations {}
