//! What happened during a generation run
//!
//! Degradations are outcomes that still leave a valid dungeon behind, so they
//! are recorded here instead of being raised as errors.

use std::fmt;

use crate::world::{KeyId, Point};

#[derive(Debug, Clone, PartialEq)]
pub enum Degradation {
    /// Placement budget ran out before the room density target was met
    DensityUnmet { achieved: f64, target: f64 },
    /// Only one door exists, so it has nothing to connect to
    SelfOnlyDoorSet { door: Point },
    /// A corridor walk stopped before reaching its target door
    PathTruncated { from: Point, to: Point },
    /// Regions the corridors missed were tunnelled back to the entrance
    Repaired { tunnels: usize },
    /// No reachable cell could hold the key, so the lock was removed
    LockDowngraded { door: Point, key: KeyId },
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::DensityUnmet { achieved, target } => {
                write!(f, "density {:.3} below target {:.3}", achieved, target)
            }
            Degradation::SelfOnlyDoorSet { door } => {
                write!(f, "door at ({}, {}) has no other door to connect to", door.x, door.y)
            }
            Degradation::PathTruncated { from, to } => write!(
                f,
                "corridor ({}, {}) -> ({}, {}) truncated",
                from.x, from.y, to.x, to.y
            ),
            Degradation::Repaired { tunnels } => write!(f, "{} repair tunnels dug", tunnels),
            Degradation::LockDowngraded { door, key } => {
                write!(f, "{} had no reachable spot, door at ({}, {}) unlocked", key, door.x, door.y)
            }
        }
    }
}

/// Statistics and degradations of the generation attempt that succeeded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// 1-based index of the accepted attempt
    pub attempt: u32,
    pub placement_attempts: u32,
    /// Open-ground fraction when room placement stopped
    pub room_density: f64,
    /// Open-ground fraction of the finished grid, corridors included
    pub final_density: f64,
    pub corridors: usize,
    pub skipped_cells: usize,
    pub issues: Vec<Degradation>,
}

impl GenerationReport {
    pub fn density_met(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| matches!(issue, Degradation::DensityUnmet { .. }))
    }

    pub fn repair_tunnels(&self) -> usize {
        self.issues
            .iter()
            .map(|issue| match issue {
                Degradation::Repaired { tunnels } => *tunnels,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_tunnels_sums_repairs() {
        let report = GenerationReport {
            issues: vec![
                Degradation::Repaired { tunnels: 2 },
                Degradation::SelfOnlyDoorSet { door: Point::new(3, 4) },
                Degradation::Repaired { tunnels: 1 },
            ],
            ..GenerationReport::default()
        };
        assert_eq!(report.repair_tunnels(), 3);
        assert!(report.density_met());
        assert_eq!(GenerationReport::default().repair_tunnels(), 0);
    }

    #[test]
    fn test_density_unmet_is_reported() {
        let report = GenerationReport {
            issues: vec![Degradation::DensityUnmet { achieved: 0.1, target: 0.25 }],
            ..GenerationReport::default()
        };
        assert!(!report.density_met());
        assert_eq!(report.issues[0].to_string(), "density 0.100 below target 0.250");
    }
}
