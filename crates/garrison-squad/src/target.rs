//! Target acquisition.
//!
//! Nearest-of searches are deterministic: distance first, then the lowest
//! `UnitId`, so the result never depends on storage iteration order.

use garrison_core::types::{PlayerId, UnitId, WDist, WPos};

use crate::world::BattleView;

/// Candidate closest to `origin` and inside `radius` (inclusive), measured
/// on the ground plane so altitude never hides a target.
/// Candidates without a position are ignored.
pub fn closest_within<V: BattleView + ?Sized>(
    view: &V,
    candidates: impl IntoIterator<Item = UnitId>,
    origin: WPos,
    radius: WDist,
) -> Option<UnitId> {
    let radius_sq = radius.length_sq();
    candidates
        .into_iter()
        .filter_map(|unit| view.position(unit).map(|pos| (origin.horizontal_distance_sq(&pos), unit)))
        .filter(|(dist_sq, _)| *dist_sq <= radius_sq)
        .min()
        .map(|(_, unit)| unit)
}

/// Nearest live hostile of `player` within `radius` of `origin`.
pub fn find_closest_enemy(
    view: &dyn BattleView,
    player: PlayerId,
    origin: WPos,
    radius: WDist,
) -> Option<UnitId> {
    view.find_closest_enemy(player, origin, radius)
}

/// Whether `unit` is alive and hostile to `player`.
pub fn is_valid_target(view: &dyn BattleView, player: PlayerId, unit: UnitId) -> bool {
    view.is_alive(unit)
        && view
            .owner(unit)
            .is_some_and(|owner| player.is_hostile_to(owner))
}
