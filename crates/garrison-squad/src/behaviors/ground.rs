//! Manoeuvres shared by ground squad behaviours.

use garrison_core::constants::CELL_SIZE;
use garrison_core::types::{CPos, MapBounds, UnitId, WPos};

use crate::orders;
use crate::squad::{Squad, SquadContext};

/// Offsets of the disperse pattern: the rally cell, then its eight
/// neighbours. Later members reuse the neighbours on wider rings.
const DISPERSE_PATTERN: [(i32, i32); 9] = [
    (0, 0),
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
];

/// How a squad withdraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetreatFlags {
    /// Spread members around the rally point instead of stacking them.
    pub disperse: bool,
    /// Rally at the base instead of a point just behind the squad.
    pub far_rally: bool,
    /// Run from every known threat nearby, not only the current target.
    pub flee_all_threats: bool,
}

impl RetreatFlags {
    pub const FULL: RetreatFlags = RetreatFlags {
        disperse: true,
        far_rally: true,
        flee_all_threats: true,
    };
}

/// Order every member away from danger toward a rally point.
pub fn retreat(squad: &Squad, ctx: &mut SquadContext<'_>, flags: RetreatFlags) {
    let Some(center) = squad.center_position(ctx.view) else {
        return;
    };
    let map = ctx.view.map_bounds();
    let threat = threat_origin(squad, ctx, center, flags.flee_all_threats).unwrap_or(center);
    let near = near_rally_cell(center, threat, ctx.config.near_rally_distance, map);
    let rally = if flags.far_rally {
        ctx.view
            .base_location(ctx.player)
            .map(|cell| map.clamp(cell))
            .unwrap_or(near)
    } else {
        near
    };

    let spacing = ctx.config.disperse_spacing;
    let mut slot = 0;
    for &unit in squad.members() {
        let Some(caps) = ctx.view.capabilities(unit) else {
            continue;
        };
        if flags.far_rally && caps.airborne_capable && caps.rearmable {
            ctx.issue(orders::return_to_base(unit));
            continue;
        }
        let cell = if flags.disperse {
            let (dx, dy) = disperse_offset(slot);
            map.clamp(rally.offset(dx * spacing, dy * spacing))
        } else {
            rally
        };
        slot += 1;
        ctx.issue(orders::move_to(unit, cell));
    }
}

/// Where the danger is. `None` when nothing hostile is known.
fn threat_origin(squad: &Squad, ctx: &SquadContext<'_>, center: WPos, all: bool) -> Option<WPos> {
    let target = squad.target().filter(|_| squad.is_target_valid(ctx));
    if !all {
        return target.and_then(|t| ctx.view.position(t));
    }

    let mut threats: Vec<UnitId> =
        ctx.view
            .hostiles_within(ctx.player, center, ctx.config.danger_scan_distance());
    if let Some(t) = target {
        if !threats.contains(&t) {
            threats.push(t);
        }
    }
    WPos::centroid(threats.iter().filter_map(|&t| ctx.view.position(t)))
}

/// Cell `distance` cells from `center`, directly away from `threat`.
/// Due north when the two coincide.
pub fn near_rally_cell(center: WPos, threat: WPos, distance: i32, map: MapBounds) -> CPos {
    let dx = (center.x - threat.x) as f64;
    let dy = (center.y - threat.y) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if len < 1.0 { (0.0, 1.0) } else { (dx / len, dy / len) };
    let reach = (distance * CELL_SIZE) as f64;
    let rally = WPos::new(
        center.x + (ux * reach).round() as i32,
        center.y + (uy * reach).round() as i32,
        0,
    );
    map.clamp(rally.to_cell())
}

/// Offset (in spacing units) of the `slot`-th dispersing member.
pub fn disperse_offset(slot: usize) -> (i32, i32) {
    if slot == 0 {
        return (0, 0);
    }
    let ring = 1 + ((slot - 1) / 8) as i32;
    let (dx, dy) = DISPERSE_PATTERN[1 + (slot - 1) % 8];
    (dx * ring, dy * ring)
}
