//! Tests for the simulation host, the squad manager and end-to-end squad behaviour.

use std::collections::BTreeMap;

use garrison_core::commands::SimCommand;
use garrison_core::components::{Activity, AmmoPool, AmmoPools, Destroyed};
use garrison_core::config::SquadManagerConfig;
use garrison_core::constants::AIRCRAFT_CRUISE_ALTITUDE;
use garrison_core::enums::{SimPhase, SquadKind, StateName};
use garrison_core::events::SquadEvent;
use garrison_core::state::BattleSnapshot;
use garrison_core::types::{CPos, MapBounds, PlayerId, SquadId, UnitId, WAngle, WPos};
use garrison_squad::orders;
use garrison_squad::world::BattleView;

use crate::engine::{SimConfig, SimulationEngine};
use crate::scenario::{self, ScenarioId};
use crate::squad_manager::SquadManager;
use crate::systems::attack;
use crate::systems::movement;
use crate::world_setup::{self, UnitTemplate};

const BOT: PlayerId = PlayerId(1);
const ENEMY: PlayerId = PlayerId(2);

const EAST: WAngle = WAngle(256);
const SOUTH: WAngle = WAngle(512);

struct Outpost {
    rifle: UnitId,
    tank: UnitId,
    enemy: UnitId,
}

/// Bot base at (8, 8) with a rifleman (facing east) and a tank beside it;
/// one enemy tank three cells east of the bot tank.
fn outpost(engine: &mut SimulationEngine) -> Outpost {
    engine.spawn_unit(UnitTemplate::base(BOT, CPos::new(8, 8)));
    let rifle = engine.spawn_unit(UnitTemplate::rifleman(BOT, CPos::new(9, 8)).facing(EAST));
    let tank = engine.spawn_unit(UnitTemplate::tank(BOT, CPos::new(10, 8)));
    let enemy = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(13, 8)));
    Outpost { rifle, tank, enemy }
}

fn engine() -> SimulationEngine {
    SimulationEngine::new(SimConfig::default())
}

fn can_attack(engine: &SimulationEngine, attacker: UnitId, target: UnitId) -> bool {
    attack::can_attack(
        engine.world(),
        engine.entity(attacker).unwrap(),
        engine.entity(target).unwrap(),
        engine.map(),
    )
}

fn squad_one(snap: &BattleSnapshot) -> StateName {
    snap.squad(SquadId(1)).expect("squad 1 exists").state
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    for id in ScenarioId::ALL {
        let mut engine_a = SimulationEngine::new(SimConfig {
            seed: 12345,
            ..Default::default()
        });
        let mut engine_b = SimulationEngine::new(SimConfig {
            seed: 12345,
            ..Default::default()
        });
        scenario::load(&mut engine_a, id);
        scenario::load(&mut engine_b, id);

        for _ in 0..300 {
            let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
            let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
            assert_eq!(json_a, json_b, "{} diverged with same seed", id.name());
        }
    }
}

#[test]
fn test_seed_changes_scenario_layout() {
    let layouts: Vec<String> = (1..=5)
        .map(|seed| {
            let mut engine = SimulationEngine::new(SimConfig {
                seed,
                ..Default::default()
            });
            scenario::load(&mut engine, ScenarioId::Skirmish);
            serde_json::to_string(&engine.tick().units).unwrap()
        })
        .collect();
    assert!(
        layouts.iter().any(|l| *l != layouts[0]),
        "different seeds should jitter enemy positions"
    );
}

// ---- Squad formation and the protection cycle ----

#[test]
fn test_damage_report_forms_protection_squad() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    engine.queue_command(SimCommand::ReportDamage {
        victim: o.rifle,
        attacker: o.enemy,
    });

    let snap = engine.tick();

    assert_eq!(
        snap.events,
        vec![
            SquadEvent::Formed {
                squad: SquadId(1),
                kind: SquadKind::Protection,
                target: Some(o.enemy),
            },
            SquadEvent::MembersAdded {
                squad: SquadId(1),
                units: vec![o.rifle, o.tank],
            },
            SquadEvent::StateChanged {
                squad: SquadId(1),
                from: StateName::Idle,
                to: StateName::Attack,
            },
        ]
    );
    let squad = snap.squad(SquadId(1)).unwrap();
    assert_eq!(squad.members, vec![o.rifle, o.tank], "base never joins a squad");
    assert_eq!(squad.target, Some(o.enemy));
    assert_eq!(squad.backoff, Some(4));
    assert!(snap.orders.is_empty());
}

#[test]
fn test_orders_apply_on_the_next_tick() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    engine.queue_command(SimCommand::ReportDamage {
        victim: o.rifle,
        attacker: o.enemy,
    });
    engine.tick();

    let issued = engine.tick();
    assert_eq!(
        issued.orders,
        vec![orders::attack(o.rifle, o.enemy), orders::attack(o.tank, o.enemy)]
    );
    assert_eq!(issued.unit(o.rifle).unwrap().activity, Activity::Idle);
    assert_eq!(engine.pending_orders(), issued.orders.as_slice());

    let applied = engine.tick();
    assert_eq!(
        applied.unit(o.rifle).unwrap().activity,
        Activity::Attack { target: o.enemy }
    );
    assert_eq!(
        applied.unit(o.tank).unwrap().activity,
        Activity::Attack { target: o.enemy }
    );
    // Same decision, same orders: nothing piles up.
    assert_eq!(applied.orders, issued.orders);
    assert_eq!(squad_one(&applied), StateName::Attack);
}

#[test]
fn test_target_death_flees_then_dissolves() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    engine.queue_command(SimCommand::ReportDamage {
        victim: o.rifle,
        attacker: o.enemy,
    });
    for _ in 0..3 {
        engine.tick();
    }

    engine.queue_command(SimCommand::KillUnit { unit: o.enemy });
    let fled = engine.tick();
    assert!(fled.unit(o.enemy).is_none());
    assert_eq!(squad_one(&fled), StateName::Flee);
    assert_eq!(fled.squad(SquadId(1)).unwrap().target, None);

    let home = engine.tick();
    assert_eq!(
        home.orders,
        vec![
            orders::move_to(o.rifle, CPos::new(8, 8)),
            orders::move_to(o.tank, CPos::new(10, 8)),
        ]
    );
    assert_eq!(
        home.events,
        vec![
            SquadEvent::StateChanged {
                squad: SquadId(1),
                from: StateName::Flee,
                to: StateName::Idle,
            },
            SquadEvent::Dissolved { squad: SquadId(1) },
        ]
    );
    assert!(home.squads.is_empty());
}

#[test]
fn test_squad_dissolves_when_members_die() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    engine.queue_command(SimCommand::ReportDamage {
        victim: o.rifle,
        attacker: o.enemy,
    });
    engine.tick();

    engine.queue_commands([
        SimCommand::KillUnit { unit: o.rifle },
        SimCommand::KillUnit { unit: o.tank },
    ]);
    let snap = engine.tick();

    assert!(snap.squads.is_empty());
    assert_eq!(snap.events, vec![SquadEvent::Dissolved { squad: SquadId(1) }]);
    assert!(snap.orders.is_empty());
}

#[test]
fn test_second_report_replaces_dead_target() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    let second = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(12, 10)));
    engine.queue_command(SimCommand::ReportDamage {
        victim: o.rifle,
        attacker: o.enemy,
    });
    engine.tick();

    engine.queue_commands([
        SimCommand::KillUnit { unit: o.enemy },
        SimCommand::ReportDamage {
            victim: o.tank,
            attacker: second,
        },
    ]);
    let snap = engine.tick();

    // Existing squad reused: no new formation, no new members.
    assert!(snap
        .events
        .iter()
        .all(|e| !matches!(e, SquadEvent::Formed { .. } | SquadEvent::MembersAdded { .. })));
    let squad = snap.squad(SquadId(1)).unwrap();
    assert_eq!(squad.target, Some(second));
    assert_eq!(squad.members, vec![o.rifle, o.tank]);
}

#[test]
fn test_disabled_bot_ignores_damage_and_freezes_squads() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    engine.queue_commands([
        SimCommand::SetBotEnabled { enabled: false },
        SimCommand::ReportDamage {
            victim: o.rifle,
            attacker: o.enemy,
        },
    ]);
    let snap = engine.tick();
    assert!(snap.squads.is_empty());
    assert!(snap.events.is_empty());

    engine.queue_commands([
        SimCommand::SetBotEnabled { enabled: true },
        SimCommand::ReportDamage {
            victim: o.rifle,
            attacker: o.enemy,
        },
    ]);
    engine.tick();
    engine.queue_command(SimCommand::SetBotEnabled { enabled: false });
    for _ in 0..3 {
        let frozen = engine.tick();
        assert!(frozen.orders.is_empty());
        assert_eq!(squad_one(&frozen), StateName::Attack);
        assert_eq!(frozen.squad(SquadId(1)).unwrap().backoff, Some(4));
    }

    engine.queue_command(SimCommand::SetBotEnabled { enabled: true });
    let resumed = engine.tick();
    assert_eq!(resumed.orders.len(), 2);
}

#[test]
fn test_pause_stops_the_clock_and_the_bot() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    engine.queue_command(SimCommand::ReportDamage {
        victim: o.rifle,
        attacker: o.enemy,
    });
    engine.tick();

    engine.queue_command(SimCommand::Pause);
    let paused = engine.tick();
    assert_eq!(paused.phase, SimPhase::Paused);
    assert_eq!(paused.time.tick, 1);
    assert!(paused.orders.is_empty());
    engine.tick();
    assert_eq!(engine.time().tick, 1);

    engine.queue_command(SimCommand::Resume);
    let resumed = engine.tick();
    assert_eq!(resumed.phase, SimPhase::Running);
    assert_eq!(resumed.time.tick, 2);
    assert_eq!(resumed.orders.len(), 2);
}

// ---- Backoff against an unseen target ----

#[test]
fn test_unseen_attacker_exhausts_backoff() {
    let mut engine = engine();
    engine.spawn_unit(UnitTemplate::base(BOT, CPos::new(5, 20)));
    let rifle = engine.spawn_unit(UnitTemplate::rifleman(BOT, CPos::new(6, 20)));
    // Beyond sight and beyond the target scan.
    let sniper = engine.spawn_unit(UnitTemplate::sniper(ENEMY, CPos::new(20, 20)));
    engine.queue_command(SimCommand::ReportDamage {
        victim: rifle,
        attacker: sniper,
    });

    let mut backoffs = Vec::new();
    let mut states = Vec::new();
    for _ in 0..7 {
        let snap = engine.tick();
        if let Some(squad) = snap.squad(SquadId(1)) {
            states.push(squad.state);
            backoffs.extend(squad.backoff);
            assert!(snap.orders.is_empty(), "no orders while waiting");
        } else {
            assert!(snap.events.contains(&SquadEvent::Dissolved { squad: SquadId(1) }));
        }
    }

    assert_eq!(backoffs, vec![4, 3, 2, 1, 0]);
    assert_eq!(states.last(), Some(&StateName::Flee));
    assert!(engine.squad_manager().squad(SquadId(1)).is_none());
}

// ---- Aircraft ----

#[test]
fn test_aircraft_attack_rules() {
    let mut engine = engine();
    let parked = engine.spawn_unit(UnitTemplate::fighter(BOT, CPos::new(10, 10)));
    let flying = engine.spawn_unit(UnitTemplate::fighter(BOT, CPos::new(10, 10)).at_altitude(AIRCRAFT_CRUISE_ALTITUDE));
    let flying_south = engine.spawn_unit(
        UnitTemplate::fighter(BOT, CPos::new(10, 10))
            .at_altitude(AIRCRAFT_CRUISE_ALTITUDE)
            .facing(SOUTH),
    );
    let ground = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(10, 13)));
    let air_behind = engine.spawn_unit(UnitTemplate::gunship(ENEMY, CPos::new(10, 7)));

    assert!(!can_attack(&engine, parked, ground), "not airborne");
    assert!(can_attack(&engine, flying, ground), "ahead and in range");
    assert!(!can_attack(&engine, flying_south, ground), "outside the ground arc");
    assert!(can_attack(&engine, flying, air_behind), "air arc is a full circle");
}

#[test]
fn test_aircraft_off_map_cannot_attack() {
    let mut engine = engine();
    let mut template = UnitTemplate::fighter(BOT, CPos::new(0, 10)).at_altitude(AIRCRAFT_CRUISE_ALTITUDE);
    template.position.x = -600;
    let outside = engine.spawn_unit(template);
    let ground = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(0, 12)));

    assert!(!can_attack(&engine, outside, ground));
}

#[test]
fn test_ground_attack_rules() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    let far = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(30, 8)));
    let north = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(8, 11)));

    assert!(can_attack(&engine, o.rifle, o.enemy));
    assert!(!can_attack(&engine, o.rifle, north), "rifleman faces east");
    assert!(can_attack(&engine, o.tank, north), "turret turns freely");
    assert!(!can_attack(&engine, o.tank, far), "out of range");
    assert!(!can_attack(&engine, o.rifle, o.rifle));
}

#[test]
fn test_empty_fighter_returns_to_base_and_rearms() {
    let mut engine = engine();
    engine.spawn_unit(UnitTemplate::base(BOT, CPos::new(8, 8)));
    let tank = engine.spawn_unit(UnitTemplate::tank(BOT, CPos::new(10, 11)));
    let mut template = UnitTemplate::fighter(BOT, CPos::new(10, 10)).at_altitude(AIRCRAFT_CRUISE_ALTITUDE);
    template.ammo = Some(AmmoPools {
        pools: vec![AmmoPool {
            current: 0,
            max: 4,
            rearmed_at_base: true,
        }],
    });
    let fighter = engine.spawn_unit(template);
    let enemy = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(10, 13)));
    engine.queue_command(SimCommand::ReportDamage {
        victim: tank,
        attacker: enemy,
    });
    engine.tick();

    let snap = engine.tick();
    assert_eq!(
        snap.orders,
        vec![orders::attack(tank, enemy), orders::return_to_base(fighter)]
    );

    let mut saw_rearming = false;
    let mut rearmed = false;
    for _ in 0..120 {
        let snap = engine.tick();
        let unit = snap.unit(fighter).unwrap();
        saw_rearming |= unit.activity == Activity::Rearming;
        rearmed |= saw_rearming && unit.ammo == 4;
        assert_eq!(squad_one(&snap), StateName::Attack, "the tank keeps the squad engaged");
    }
    assert!(saw_rearming);
    assert!(rearmed);
}

// ---- Squad manager ----

#[test]
fn test_manager_ignores_irrelevant_reports() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    let enemy_two = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(14, 9)));
    let mut manager = SquadManager::new(BOT, SquadManagerConfig::default());
    let view = engine.view();

    assert!(manager.on_damaged(&view, o.rifle, o.tank).is_empty(), "friendly fire");
    assert!(manager.on_damaged(&view, o.enemy, enemy_two).is_empty(), "not our unit");
    assert!(manager.on_damaged(&view, o.rifle, UnitId(999)).is_empty(), "unknown attacker");
    assert_eq!(manager.squads().count(), 0);
}

#[test]
fn test_manager_drafts_nearby_free_units_in_id_order() {
    let mut engine = engine();
    let o = outpost(&mut engine);
    let far = engine.spawn_unit(UnitTemplate::rifleman(BOT, CPos::new(40, 40)));
    let mut manager = SquadManager::new(BOT, SquadManagerConfig::default());
    let view = engine.view();

    let events = manager.on_damaged(&view, o.tank, o.enemy);
    assert_eq!(events.len(), 2);
    let squad = &manager.squad(SquadId(1)).unwrap().squad;
    assert_eq!(squad.members(), &[o.rifle, o.tank]);
    assert!(!squad.contains(far));

    // Non-empty squad: later reports draft nobody.
    assert!(manager.on_damaged(&view, o.rifle, o.enemy).is_empty());
    assert_eq!(manager.squads().count(), 1);
}

#[test]
fn test_manager_without_base_drafts_around_victim() {
    let mut engine = engine();
    let rifle = engine.spawn_unit(UnitTemplate::rifleman(BOT, CPos::new(30, 30)));
    let buddy = engine.spawn_unit(UnitTemplate::rifleman(BOT, CPos::new(32, 31)));
    let enemy = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(34, 30)));
    let mut manager = SquadManager::new(BOT, SquadManagerConfig::default());
    let view = engine.view();

    manager.on_damaged(&view, rifle, enemy);

    let squad = &manager.squad(SquadId(1)).unwrap().squad;
    assert_eq!(squad.members(), &[rifle, buddy]);
}

// ---- World view ----

#[test]
fn test_visibility_follows_sight() {
    let mut engine = engine();
    let rifle = engine.spawn_unit(UnitTemplate::rifleman(BOT, CPos::new(10, 10)));
    let near = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(16, 10)));
    let far = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(25, 10)));
    let view = engine.view();

    assert!(view.is_visible_to(BOT, rifle));
    assert!(view.is_visible_to(BOT, near));
    assert!(!view.is_visible_to(BOT, far));
    assert!(view.is_visible_to(ENEMY, far));
}

#[test]
fn test_scans_ignore_altitude() {
    let mut engine = engine();
    let fighter = engine.spawn_unit(UnitTemplate::fighter(BOT, CPos::new(8, 8)).at_altitude(AIRCRAFT_CRUISE_ALTITUDE));
    let tank = engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(16, 8)));
    let view = engine.view();
    let origin = view.position(fighter).unwrap();
    let radius = garrison_core::types::WDist::from_cells(8);

    assert!(view.is_visible_to(BOT, tank));
    assert_eq!(view.hostiles_within(BOT, origin, radius), vec![tank]);
    assert_eq!(view.find_closest_enemy(BOT, origin, radius), Some(tank));
    assert_eq!(view.own_units_within(BOT, CPos::new(8, 8).center(), garrison_core::types::WDist::from_cells(1)), vec![fighter]);
}

#[test]
fn test_view_reports_capabilities() {
    let mut engine = engine();
    let base = engine.spawn_unit(UnitTemplate::base(BOT, CPos::new(3, 3)));
    let fighter = engine.spawn_unit(UnitTemplate::fighter(BOT, CPos::new(3, 3)));
    let gunship = engine.spawn_unit(UnitTemplate::gunship(BOT, CPos::new(4, 3)));
    let view = engine.view();

    let caps = view.capabilities(fighter).unwrap();
    assert!(caps.airborne_capable && caps.rearmable);
    assert_eq!(caps.ammo_pools.len(), 1);
    let caps = view.capabilities(gunship).unwrap();
    assert!(caps.airborne_capable && !caps.rearmable);
    assert_eq!(view.base_location(BOT), Some(CPos::new(3, 3)));
    assert_eq!(view.base_location(ENEMY), None);

    let own = view.own_units_within(BOT, CPos::new(3, 3).center(), garrison_core::types::WDist::from_cells(5));
    assert!(!own.contains(&base));
    assert!(view.capabilities(UnitId(999)).is_none());
}

// ---- Movement ----

#[test]
fn test_move_order_arrives_and_idles() {
    let mut engine = engine();
    let rifle = engine.spawn_unit(UnitTemplate::rifleman(BOT, CPos::new(2, 2)));
    engine.queue_command(SimCommand::MoveUnit {
        unit: rifle,
        cell: CPos::new(5, 2),
    });

    let mut arrived = None;
    for tick in 0..100 {
        let snap = engine.tick();
        let unit = snap.unit(rifle).unwrap();
        if unit.activity == Activity::Idle {
            arrived = Some((tick, unit.position));
            break;
        }
    }

    let (tick, position) = arrived.expect("rifleman arrives");
    assert_eq!(position.to_cell(), CPos::new(5, 2));
    // Three cells at 64 units per tick, less the quarter-cell arrival slack.
    assert_eq!(tick, 44);
}

fn bare_world(templates: &[UnitTemplate]) -> (hecs::World, BTreeMap<UnitId, hecs::Entity>) {
    let mut world = hecs::World::new();
    let mut units = BTreeMap::new();
    for (i, template) in templates.iter().enumerate() {
        let id = UnitId(i as u32 + 1);
        units.insert(id, world_setup::spawn_unit(&mut world, id, template));
    }
    (world, units)
}

#[test]
fn test_attacker_stops_chasing_a_target_killed_this_tick() {
    let (mut world, units) = bare_world(&[
        UnitTemplate::rifleman(BOT, CPos::new(2, 2)),
        UnitTemplate::tank(ENEMY, CPos::new(20, 2)),
    ]);
    let (rifle, enemy) = (units[&UnitId(1)], units[&UnitId(2)]);
    *world.get::<&mut Activity>(rifle).unwrap() = Activity::Attack { target: UnitId(2) };
    world.insert_one(enemy, Destroyed).unwrap();
    let start = *world.get::<&WPos>(rifle).unwrap();

    movement::run(&mut world, &units, MapBounds::new(64, 64));

    assert_eq!(*world.get::<&Activity>(rifle).unwrap(), Activity::Idle);
    assert_eq!(*world.get::<&WPos>(rifle).unwrap(), start);
}

#[test]
fn test_destroyed_base_is_not_a_destination() {
    let (mut world, units) = bare_world(&[
        UnitTemplate::base(BOT, CPos::new(4, 4)),
        UnitTemplate::base(BOT, CPos::new(30, 30)),
        UnitTemplate::rifleman(BOT, CPos::new(10, 10)),
    ]);
    let first = units[&UnitId(1)];
    assert_eq!(movement::base_position(&world, BOT), Some(CPos::new(4, 4).center()));

    world.insert_one(first, Destroyed).unwrap();
    assert_eq!(movement::base_position(&world, BOT), Some(CPos::new(30, 30).center()));

    world.insert_one(units[&UnitId(2)], Destroyed).unwrap();
    assert_eq!(movement::base_position(&world, BOT), None);

    let rifle = units[&UnitId(3)];
    *world.get::<&mut Activity>(rifle).unwrap() = Activity::ReturnToBase;
    let start = *world.get::<&WPos>(rifle).unwrap();
    movement::run(&mut world, &units, MapBounds::new(64, 64));
    assert_eq!(*world.get::<&WPos>(rifle).unwrap(), start, "no base left to head for");
}

// ---- Scenarios ----

#[test]
fn test_ambush_scenario_runs_two_squads() {
    let mut engine = engine();
    let units = scenario::load(&mut engine, ScenarioId::Ambush);

    let mut events = Vec::new();
    for _ in 0..200 {
        events.extend(engine.tick().events);
    }

    assert!(events.contains(&SquadEvent::Formed {
        squad: SquadId(1),
        kind: SquadKind::Protection,
        target: Some(units.attackers[0]),
    }));
    assert!(events.contains(&SquadEvent::StateChanged {
        squad: SquadId(1),
        from: StateName::Attack,
        to: StateName::Flee,
    }));
    assert!(events.contains(&SquadEvent::Dissolved { squad: SquadId(1) }));
    assert!(events.contains(&SquadEvent::Formed {
        squad: SquadId(2),
        kind: SquadKind::Protection,
        target: Some(units.attackers[1]),
    }));
}
