//! Fundamental identifiers, geometric and simulation types.
//!
//! World space uses integer world units: x = East, y = North, z = Up
//! (altitude). One map cell spans `CELL_SIZE` world units on each axis.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{CELL_SIZE, FULL_TURN};

/// Stable handle of a unit in the live-unit registry.
/// Allocated monotonically; ordering is used for deterministic tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Owning player of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// Handle of a squad registered with a squad manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SquadId(pub u32);

impl PlayerId {
    /// Neutral owner: hostile to nobody.
    pub const NEUTRAL: PlayerId = PlayerId(0);

    /// Two distinct, non-neutral players are enemies.
    pub fn is_hostile_to(self, other: PlayerId) -> bool {
        self != other && self != Self::NEUTRAL && other != Self::NEUTRAL
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

impl fmt::Display for SquadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "squad#{}", self.0)
    }
}

/// Position in world space (world units).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Distance in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WDist(pub i32);

/// Map cell coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CPos {
    pub x: i32,
    pub y: i32,
}

/// Angle in 1/1024ths of a full turn. 0 = North, clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WAngle(pub i32);

/// Playable map area in cells, anchored at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: i32,
    pub height: i32,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
}

impl WPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Squared 3D distance. Computed in i64 so map-sized values cannot overflow.
    pub fn distance_sq(&self, other: &WPos) -> i64 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        let dz = (other.z - self.z) as i64;
        dx * dx + dy * dy + dz * dz
    }

    /// Squared distance ignoring altitude.
    pub fn horizontal_distance_sq(&self, other: &WPos) -> i64 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        dx * dx + dy * dy
    }

    /// 3D distance, rounded down.
    pub fn distance_to(&self, other: &WPos) -> WDist {
        WDist((self.distance_sq(other) as f64).sqrt() as i32)
    }

    /// True if `other` lies within `radius` (inclusive, 3D).
    pub fn is_within(&self, other: &WPos, radius: WDist) -> bool {
        self.distance_sq(other) <= radius.length_sq()
    }

    /// True if `other` lies within `radius` on the ground plane (inclusive).
    pub fn is_within_horizontal(&self, other: &WPos, radius: WDist) -> bool {
        self.horizontal_distance_sq(other) <= radius.length_sq()
    }

    /// Bearing to another position (0 = North, clockwise).
    pub fn bearing_to(&self, other: &WPos) -> WAngle {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        WAngle::from_radians(dx.atan2(dy))
    }

    /// Cell containing this position.
    pub fn to_cell(&self) -> CPos {
        CPos::new(self.x.div_euclid(CELL_SIZE), self.y.div_euclid(CELL_SIZE))
    }

    /// Same position at ground level.
    pub fn on_ground(&self) -> WPos {
        WPos::new(self.x, self.y, 0)
    }

    /// Integer mean of a set of positions, or `None` for an empty set.
    pub fn centroid(positions: impl IntoIterator<Item = WPos>) -> Option<WPos> {
        let mut count = 0i64;
        let (mut sx, mut sy, mut sz) = (0i64, 0i64, 0i64);
        for pos in positions {
            sx += pos.x as i64;
            sy += pos.y as i64;
            sz += pos.z as i64;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(WPos::new(
            (sx / count) as i32,
            (sy / count) as i32,
            (sz / count) as i32,
        ))
    }
}

impl WDist {
    pub fn new(length: i32) -> Self {
        Self(length)
    }

    pub fn from_cells(cells: i32) -> Self {
        Self(cells * CELL_SIZE)
    }

    pub fn length(&self) -> i32 {
        self.0
    }

    pub fn length_sq(&self) -> i64 {
        let l = self.0 as i64;
        l * l
    }
}

impl CPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World position of the cell centre at ground level.
    pub fn center(&self) -> WPos {
        WPos::new(
            self.x * CELL_SIZE + CELL_SIZE / 2,
            self.y * CELL_SIZE + CELL_SIZE / 2,
            0,
        )
    }

    pub fn offset(&self, dx: i32, dy: i32) -> CPos {
        CPos::new(self.x + dx, self.y + dy)
    }
}

impl WAngle {
    pub fn new(angle: i32) -> Self {
        Self(angle.rem_euclid(FULL_TURN))
    }

    pub fn from_radians(radians: f64) -> Self {
        let turns = radians.rem_euclid(std::f64::consts::TAU) / std::f64::consts::TAU;
        Self::new((turns * FULL_TURN as f64).round() as i32)
    }

    pub fn to_radians(&self) -> f64 {
        self.0.rem_euclid(FULL_TURN) as f64 / FULL_TURN as f64 * std::f64::consts::TAU
    }

    pub fn angle(&self) -> i32 {
        self.0.rem_euclid(FULL_TURN)
    }

    /// Smallest absolute difference to another angle, in [0, FULL_TURN / 2].
    pub fn difference(&self, other: WAngle) -> i32 {
        let d = (self.angle() - other.angle()).rem_euclid(FULL_TURN);
        d.min(FULL_TURN - d)
    }
}

impl MapBounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, cell: CPos) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Nearest cell inside the bounds.
    pub fn clamp(&self, cell: CPos) -> CPos {
        CPos::new(
            cell.x.clamp(0, (self.width - 1).max(0)),
            cell.y.clamp(0, (self.height - 1).max(0)),
        )
    }
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}
