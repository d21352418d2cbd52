//! Snapshot system: queries the ECS world and builds a complete BattleSnapshot.
//!
//! This system is read-only: it never modifies the world.

use hecs::World;

use garrison_core::commands::BotOrder;
use garrison_core::components::{Activity, AmmoPools, Destroyed, Unit};
use garrison_core::enums::SimPhase;
use garrison_core::events::SquadEvent;
use garrison_core::state::{BattleSnapshot, UnitView};
use garrison_core::types::{SimTime, WPos};

use crate::squad_manager::SquadManager;

/// Build a complete BattleSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: SimPhase,
    squads: &SquadManager,
    orders: Vec<BotOrder>,
    events: Vec<SquadEvent>,
) -> BattleSnapshot {
    BattleSnapshot {
        time: *time,
        phase,
        units: build_units(world),
        squads: squads.squads().map(|m| m.view()).collect(),
        orders,
        events,
    }
}

/// Build UnitView list from all live units, sorted by id.
fn build_units(world: &World) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = world
        .query::<(&Unit, &WPos, &Activity, Option<&AmmoPools>)>()
        .without::<&Destroyed>()
        .iter()
        .map(|(_, (unit, pos, activity, ammo))| UnitView {
            id: unit.id,
            owner: unit.owner,
            mobility: unit.mobility,
            position: *pos,
            activity: *activity,
            ammo: ammo.map(|a| a.total()).unwrap_or(0),
        })
        .collect();

    units.sort_by_key(|u| u.id);
    units
}
