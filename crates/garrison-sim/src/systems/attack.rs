//! Unit-level weapon capability: can this unit hit that unit right now?
//!
//! Read-only. Used by the squad view and the weapons system.

use glam::DVec2;
use hecs::{Entity, World};

use garrison_core::components::{Aircraft, Armament, Destroyed, Facing};
use garrison_core::types::{MapBounds, WAngle, WPos};

/// Whether `attacker` can engage `target` this tick.
///
/// The attacker must be alive, armed and within weapon range (3D). Aircraft
/// must also be airborne and over the map. The target must lie inside the
/// firing arc around the attacker's facing; aircraft use the wider air arc
/// against airborne targets.
pub fn can_attack(world: &World, attacker: Entity, target: Entity, map: MapBounds) -> bool {
    if attacker == target || !is_alive(world, attacker) || !is_alive(world, target) {
        return false;
    }
    let Ok(armament) = world.get::<&Armament>(attacker) else {
        return false;
    };
    let (Ok(from), Ok(to)) = (world.get::<&WPos>(attacker), world.get::<&WPos>(target)) else {
        return false;
    };
    if !from.is_within(&to, armament.range) {
        return false;
    }

    let mut tolerance = armament.facing_tolerance;
    if let Ok(aircraft) = world.get::<&Aircraft>(attacker) {
        if from.z < aircraft.min_airborne_altitude || !map.contains(from.to_cell()) {
            return false;
        }
        if to.z >= aircraft.min_airborne_altitude {
            tolerance = armament.air_facing_tolerance;
        }
    }

    let facing = world
        .get::<&Facing>(attacker)
        .map(|f| f.angle)
        .unwrap_or_default();
    within_arc(*from, *to, facing, tolerance)
}

/// Whether `to` lies within `tolerance` of `facing` as seen from `from`.
/// A target directly above or below is always inside the arc.
pub fn within_arc(from: WPos, to: WPos, facing: WAngle, tolerance: WAngle) -> bool {
    let offset = DVec2::new((to.x - from.x) as f64, (to.y - from.y) as f64);
    if offset.length_squared() == 0.0 {
        return true;
    }
    let radians = facing.to_radians();
    // 0 = north (+y), clockwise.
    let heading = DVec2::new(radians.sin(), radians.cos());
    let cos = heading.dot(offset.normalize()).clamp(-1.0, 1.0);
    let off_axis = WAngle::from_radians(cos.acos());
    off_axis.angle() <= tolerance.angle()
}

fn is_alive(world: &World, entity: Entity) -> bool {
    world.contains(entity) && world.get::<&Destroyed>(entity).is_err()
}
