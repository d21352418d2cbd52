//! Movement system.
//!
//! Moves every mobile unit toward the destination its activity implies:
//! straight line, no pathfinding, no collisions. Aircraft climb to cruise
//! altitude while travelling and land while rearming. Arrival completes
//! the activity.

use std::collections::BTreeMap;

use glam::DVec2;
use hecs::{Entity, World};

use garrison_core::components::{
    Activity, Aircraft, Armament, BaseBuilding, Destroyed, Facing, Locomotor, Rearmable, Unit,
};
use garrison_core::constants::{AIRCRAFT_CLIMB_RATE, ARRIVAL_THRESHOLD, CELL_SIZE};
use garrison_core::types::{MapBounds, PlayerId, UnitId, WAngle, WDist, WPos};

/// Where a unit is headed this tick.
enum Goal {
    /// Travel to a point; `on_arrival` replaces the activity once there.
    Travel { to: WPos, on_arrival: Activity },
    /// Close on a unit until it is within `range`.
    Pursue { to: WPos, range: WDist },
    /// Aircraft descend in place.
    Land,
    Hold,
    /// The activity can no longer be carried out.
    Abandon,
}

struct Step {
    entity: Entity,
    position: WPos,
    facing: Option<WAngle>,
    activity: Activity,
}

/// Run movement for all units with a locomotor.
pub fn run(world: &mut World, units: &BTreeMap<UnitId, Entity>, map: MapBounds) {
    let mut steps = Vec::new();

    for (entity, (unit, pos, activity, locomotor, aircraft, rearmable)) in world
        .query::<(
            &Unit,
            &WPos,
            &Activity,
            &Locomotor,
            Option<&Aircraft>,
            Option<&Rearmable>,
        )>()
        .iter()
    {
        let goal = goal_for(world, units, unit.owner, *activity, rearmable.is_some(), entity);
        let step = advance(*pos, *activity, goal, locomotor.speed, aircraft, map);
        if step.0 != *pos || step.2 != *activity || step.1.is_some() {
            steps.push(Step {
                entity,
                position: step.0,
                facing: step.1,
                activity: step.2,
            });
        }
    }

    for step in steps {
        if let Ok(mut pos) = world.get::<&mut WPos>(step.entity) {
            *pos = step.position;
        }
        if let Some(angle) = step.facing {
            if let Ok(mut facing) = world.get::<&mut Facing>(step.entity) {
                facing.angle = angle;
            }
        }
        if let Ok(mut activity) = world.get::<&mut Activity>(step.entity) {
            *activity = step.activity;
        }
    }
}

fn goal_for(
    world: &World,
    units: &BTreeMap<UnitId, Entity>,
    owner: PlayerId,
    activity: Activity,
    rearmable: bool,
    entity: Entity,
) -> Goal {
    match activity {
        Activity::Idle => Goal::Hold,
        Activity::Rearming => Goal::Land,
        Activity::Move { destination } | Activity::AttackMove { destination } => Goal::Travel {
            to: destination.center(),
            on_arrival: Activity::Idle,
        },
        Activity::Attack { target } => {
            let target_pos = units
                .get(&target)
                .filter(|&&e| world.get::<&Destroyed>(e).is_err())
                .and_then(|&e| world.get::<&WPos>(e).ok().map(|p| *p));
            let range = world
                .get::<&Armament>(entity)
                .map(|a| a.range)
                .unwrap_or_default();
            match target_pos {
                Some(to) => Goal::Pursue { to, range },
                None => Goal::Abandon,
            }
        }
        Activity::ReturnToBase => match base_position(world, owner) {
            Some(to) => Goal::Travel {
                to,
                on_arrival: if rearmable {
                    Activity::Rearming
                } else {
                    Activity::Idle
                },
            },
            None => Goal::Hold,
        },
    }
}

/// Position of the owner's standing base (lowest id wins).
pub fn base_position(world: &World, owner: PlayerId) -> Option<WPos> {
    world
        .query::<(&Unit, &WPos, &BaseBuilding)>()
        .without::<&Destroyed>()
        .iter()
        .filter(|(_, (unit, _, _))| unit.owner == owner)
        .min_by_key(|(_, (unit, _, _))| unit.id)
        .map(|(_, (_, pos, _))| pos.on_ground())
}

/// New (position, facing, activity) after one tick toward `goal`.
fn advance(
    pos: WPos,
    activity: Activity,
    goal: Goal,
    speed: i32,
    aircraft: Option<&Aircraft>,
    map: MapBounds,
) -> (WPos, Option<WAngle>, Activity) {
    let (to, stop_within, on_arrival) = match goal {
        Goal::Hold => return (pos, None, activity),
        Goal::Land => {
            let mut landed = pos;
            landed.z = (pos.z - AIRCRAFT_CLIMB_RATE).max(0);
            return (landed, None, activity);
        }
        Goal::Abandon => return (pos, None, Activity::Idle),
        Goal::Travel { to, on_arrival } => (to, ARRIVAL_THRESHOLD, on_arrival),
        Goal::Pursue { to, range } => {
            let facing = Some(pos.bearing_to(&to));
            if pos.is_within(&to, range) {
                return (climb(pos, aircraft), facing, activity);
            }
            (to, 0, activity)
        }
    };

    let mut next = climb(pos, aircraft);
    let offset = DVec2::new((to.x - pos.x) as f64, (to.y - pos.y) as f64);
    let remaining = offset.length();
    if remaining <= stop_within as f64 {
        return (next, None, on_arrival);
    }

    let travel = (speed as f64).min(remaining);
    let delta = offset / remaining * travel;
    next.x += delta.x.round() as i32;
    next.y += delta.y.round() as i32;
    next = clamp_to_map(next, map);
    (next, Some(pos.bearing_to(&to)), activity)
}

/// Aircraft hold cruise altitude while active.
fn climb(pos: WPos, aircraft: Option<&Aircraft>) -> WPos {
    let Some(aircraft) = aircraft else {
        return pos;
    };
    let mut next = pos;
    next.z = (pos.z + AIRCRAFT_CLIMB_RATE).min(aircraft.cruise_altitude.max(pos.z));
    next
}

fn clamp_to_map(pos: WPos, map: MapBounds) -> WPos {
    let max_x = map.width * CELL_SIZE - 1;
    let max_y = map.height * CELL_SIZE - 1;
    WPos::new(pos.x.clamp(0, max_x.max(0)), pos.y.clamp(0, max_y.max(0)), pos.z)
}
