//! Cleanup system: removes destroyed units from the world and the registry.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::debug;

use garrison_core::components::{Destroyed, Unit};
use garrison_core::types::UnitId;

/// Despawn every unit marked `Destroyed`.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, units: &mut BTreeMap<UnitId, Entity>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (unit, _destroyed)) in world.query_mut::<(&Unit, &Destroyed)>() {
        units.remove(&unit.id);
        debug!(unit = %unit.id, "unit removed");
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
