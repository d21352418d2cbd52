//! Rearming system.
//!
//! Units rearming at base restore one round of a base-rearmed pool every
//! `ticks_per_round` ticks and go idle once every such pool is full.

use hecs::World;

use garrison_core::components::{Activity, AmmoPools, Rearmable};

pub fn run(world: &mut World) {
    for (_entity, (activity, rearmable, pools)) in
        world.query_mut::<(&mut Activity, &mut Rearmable, &mut AmmoPools)>()
    {
        if *activity != Activity::Rearming {
            rearmable.progress = 0;
            continue;
        }

        let Some(pool) = pools
            .pools
            .iter_mut()
            .find(|p| p.rearmed_at_base && p.current < p.max)
        else {
            *activity = Activity::Idle;
            rearmable.progress = 0;
            continue;
        };

        rearmable.progress += 1;
        if rearmable.progress >= rearmable.ticks_per_round {
            pool.current += 1;
            rearmable.progress = 0;
        }
    }
}
