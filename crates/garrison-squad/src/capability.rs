//! Unit capability queries. All pure; none mutate.

use garrison_core::components::AmmoPool;
use garrison_core::types::{UnitId, WPos};

use crate::world::{BattleView, UnitCapabilities};

pub fn is_airborne_capable(caps: &UnitCapabilities) -> bool {
    caps.airborne_capable
}

/// Any pool holds at least one round.
pub fn has_ammo(pools: &[AmmoPool]) -> bool {
    pools.iter().any(|pool| pool.current > 0)
}

/// Units that cannot rearm always reload on their own; rearmable units only
/// when none of their pools depends on a base.
pub fn reloads_automatically(pools: &[AmmoPool], rearmable: bool) -> bool {
    !rearmable || pools.iter().all(|pool| !pool.rearmed_at_base)
}

pub fn is_rearming(caps: &UnitCapabilities) -> bool {
    caps.rearming
}

pub fn is_busy_attacking(caps: &UnitCapabilities) -> bool {
    caps.attacking
}

pub fn can_attack_target(view: &dyn BattleView, unit: UnitId, target: UnitId) -> bool {
    view.can_attack_target(unit, target)
}

/// Member closest to `point`. Ties go to the earlier member.
pub fn closest_to(view: &dyn BattleView, members: &[UnitId], point: WPos) -> Option<UnitId> {
    members
        .iter()
        .filter_map(|&unit| view.position(unit).map(|pos| (unit, point.distance_sq(&pos))))
        .min_by_key(|(_, dist_sq)| *dist_sq)
        .map(|(unit, _)| unit)
}
