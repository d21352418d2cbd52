//! Simulation constants and tuning parameters.

/// World units per map cell edge.
pub const CELL_SIZE: i32 = 1024;

/// `WAngle` units per full turn.
pub const FULL_TURN: i32 = 1024;

// --- Squad behaviour ---

/// Consecutive invisible-target ticks an attacking protection squad tolerates
/// (counting down through zero) before it flees.
pub const PROTECTION_BACKOFF_TICKS: i32 = 4;

// --- Squad manager defaults (cells) ---

/// Radius around the squad in which protection squads look for targets.
pub const DEFAULT_PROTECTION_SCAN_RADIUS: i32 = 8;

/// Radius around the base from which idle units are drafted into protection.
pub const DEFAULT_PROTECT_UNIT_SCAN_RADIUS: i32 = 15;

/// Radius around the squad in which threats are considered when fleeing.
pub const DEFAULT_DANGER_SCAN_RADIUS: i32 = 10;

/// Distance of the near rally point from the squad centre.
pub const DEFAULT_NEAR_RALLY_DISTANCE: i32 = 6;

/// Spacing between members when a squad disperses.
pub const DEFAULT_DISPERSE_SPACING: i32 = 2;

/// Largest accepted config distance. Keeps cell-to-world conversions and
/// rally-point offsets well inside `i32`.
pub const MAX_CONFIG_CELLS: i32 = i32::MAX / CELL_SIZE / 4;

// --- Unit defaults ---

/// Ground unit speed (world units per tick).
pub const GROUND_SPEED: i32 = 64;

/// Aircraft speed (world units per tick).
pub const AIRCRAFT_SPEED: i32 = 192;

/// Aircraft cruise altitude (world units).
pub const AIRCRAFT_CRUISE_ALTITUDE: i32 = 2048;

/// Altitude at or above which an aircraft counts as airborne.
pub const AIRCRAFT_MIN_AIRBORNE_ALTITUDE: i32 = 1;

/// Altitude change per tick while taking off or landing.
pub const AIRCRAFT_CLIMB_RATE: i32 = 256;

/// Default facing tolerance of unit weapons (quarter turn = 90 degrees).
pub const DEFAULT_FACING_TOLERANCE: i32 = 256;

/// Default facing tolerance of aircraft against airborne targets (full circle).
pub const DEFAULT_AIR_FACING_TOLERANCE: i32 = 512;

/// Default sight range of units (cells).
pub const DEFAULT_SIGHT_CELLS: i32 = 8;

/// Ticks to restore one round of a rearmable ammo pool at base.
pub const REARM_TICKS_PER_ROUND: u32 = 5;

/// Distance at which a unit counts as having arrived at a destination.
pub const ARRIVAL_THRESHOLD: i32 = CELL_SIZE / 4;
