//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behaviour beyond trivial
//! accessors. Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::Mobility;
use crate::types::{CPos, PlayerId, UnitId, WAngle, WDist};

/// Identity of a unit in the live-unit registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub owner: PlayerId,
    pub mobility: Mobility,
}

/// Current body orientation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Facing {
    pub angle: WAngle,
}

/// Movement capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Locomotor {
    /// World units per tick.
    pub speed: i32,
}

/// Flight capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Aircraft {
    /// Altitude at or above which the aircraft counts as airborne.
    pub min_airborne_altitude: i32,
    /// Altitude held while flying.
    pub cruise_altitude: i32,
}

/// The unit's weapon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Armament {
    /// Maximum 3D engagement range.
    pub range: WDist,
    /// Half-width of the firing arc against ground targets.
    pub facing_tolerance: WAngle,
    /// Half-width of the firing arc against airborne targets (aircraft only).
    pub air_facing_tolerance: WAngle,
    /// Ticks between shots.
    pub reload_ticks: u32,
    /// Ticks until the next shot is possible.
    pub cooldown: u32,
}

/// One ammunition pool of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoPool {
    pub current: u32,
    pub max: u32,
    /// Refilled only by rearming at a base (otherwise the pool self-reloads).
    pub rearmed_at_base: bool,
}

/// All ammunition pools of a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoPools {
    pub pools: Vec<AmmoPool>,
}

/// Ability to rearm at a base.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rearmable {
    pub ticks_per_round: u32,
    /// Ticks accumulated toward the next restored round.
    pub progress: u32,
}

/// Sight range used for visibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vision {
    pub sight: WDist,
}

/// Marks a unit as a base structure (rally and rearm point).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BaseBuilding;

/// Marks a unit for removal at the end of the tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Destroyed;

/// What a unit is currently doing, set by applying bot orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Activity {
    #[default]
    Idle,
    Move { destination: CPos },
    Attack { target: UnitId },
    AttackMove { destination: CPos },
    ReturnToBase,
    Rearming,
}

impl AmmoPools {
    pub fn single(max: u32, rearmed_at_base: bool) -> Self {
        Self {
            pools: vec![AmmoPool {
                current: max,
                max,
                rearmed_at_base,
            }],
        }
    }

    /// Total rounds left across all pools.
    pub fn total(&self) -> u32 {
        self.pools.iter().map(|p| p.current).sum()
    }
}
