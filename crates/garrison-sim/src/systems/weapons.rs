//! Weapons system: fire bookkeeping for attacking units.
//!
//! There is no damage model. Firing only spends ammunition and starts the
//! reload cooldown, which is what drives aircraft back to base.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::trace;

use garrison_core::components::{Activity, AmmoPools, Armament, Unit};
use garrison_core::types::{MapBounds, UnitId};

use crate::systems::attack;

/// Count down cooldowns, fire at attack targets in reach, and top up
/// self-reloading pools of weapons that did not fire.
pub fn run(world: &mut World, units: &BTreeMap<UnitId, Entity>, map: MapBounds) {
    for (_entity, armament) in world.query_mut::<&mut Armament>() {
        armament.cooldown = armament.cooldown.saturating_sub(1);
    }

    let mut ready = Vec::new();
    for (entity, (unit, armament, activity)) in world.query::<(&Unit, &Armament, &Activity)>().iter() {
        if armament.cooldown > 0 {
            continue;
        }
        let target = match activity {
            Activity::Attack { target } => units.get(target).copied(),
            _ => None,
        };
        let in_reach = target.is_some_and(|t| attack::can_attack(world, entity, t, map));
        ready.push((entity, unit.id, in_reach));
    }

    for (entity, id, in_reach) in ready {
        let Ok((armament, pools)) =
            world.query_one_mut::<(&mut Armament, Option<&mut AmmoPools>)>(entity)
        else {
            continue;
        };

        let Some(pools) = pools else {
            if in_reach {
                armament.cooldown = armament.reload_ticks;
                trace!(unit = %id, "fired");
            }
            continue;
        };

        if in_reach && pools.total() > 0 {
            if let Some(pool) = pools.pools.iter_mut().find(|p| p.current > 0) {
                pool.current -= 1;
            }
            armament.cooldown = armament.reload_ticks;
            trace!(unit = %id, left = pools.total(), "fired");
            continue;
        }

        if let Some(pool) = pools
            .pools
            .iter_mut()
            .find(|p| !p.rearmed_at_base && p.current < p.max)
        {
            pool.current += 1;
            armament.cooldown = armament.reload_ticks;
        }
    }
}
