//! The battlefield as seen by squads.
//!
//! The simulation substrate implements [`BattleView`]; squads only ever read
//! through it. Every query reflects the current tick and nothing is cached
//! across ticks, so unit handles are re-validated on each use.

use garrison_core::components::AmmoPool;
use garrison_core::types::{CPos, MapBounds, PlayerId, UnitId, WDist, WPos};

use crate::target;

/// Snapshot of the capability traits of one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitCapabilities {
    /// The unit has the aircraft trait.
    pub airborne_capable: bool,
    pub ammo_pools: Vec<AmmoPool>,
    /// The unit can rearm at a base.
    pub rearmable: bool,
    /// The unit is currently rearming.
    pub rearming: bool,
    /// The unit is currently executing an attack.
    pub attacking: bool,
}

/// Read-only queries squads make against the simulation.
pub trait BattleView {
    fn is_alive(&self, unit: UnitId) -> bool;

    fn owner(&self, unit: UnitId) -> Option<PlayerId>;

    fn position(&self, unit: UnitId) -> Option<WPos>;

    /// Whether `player` currently sees `unit`.
    fn is_visible_to(&self, player: PlayerId, unit: UnitId) -> bool;

    /// `None` when the unit is not alive.
    fn capabilities(&self, unit: UnitId) -> Option<UnitCapabilities>;

    /// Unit-level weapon check: range, firing arc, altitude.
    fn can_attack_target(&self, unit: UnitId, target: UnitId) -> bool;

    /// Live units hostile to `player` within horizontal `radius` of `origin`, any order.
    fn hostiles_within(&self, player: PlayerId, origin: WPos, radius: WDist) -> Vec<UnitId>;

    /// Live units owned by `player` within horizontal `radius` of `origin`, any order.
    fn own_units_within(&self, player: PlayerId, origin: WPos, radius: WDist) -> Vec<UnitId>;

    /// Cell of the player's base, if it still has one.
    fn base_location(&self, player: PlayerId) -> Option<CPos>;

    fn map_bounds(&self) -> MapBounds;

    /// Nearest live hostile within `radius` of `origin`.
    /// Equidistant candidates resolve to the lowest `UnitId`.
    fn find_closest_enemy(&self, player: PlayerId, origin: WPos, radius: WDist) -> Option<UnitId> {
        let candidates = self.hostiles_within(player, origin, radius);
        target::closest_within(self, candidates, origin, radius)
    }
}
