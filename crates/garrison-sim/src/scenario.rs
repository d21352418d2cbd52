//! Scenario definitions: canned battles for the runner and for tests.
//!
//! Each scenario spawns the bot's base and defenders, the opposing force
//! (positions jittered by the seeded RNG), and schedules the damage reports
//! and losses that drive the protection squad through its states.

use rand::Rng;
use serde::{Deserialize, Serialize};

use garrison_core::commands::SimCommand;
use garrison_core::types::{CPos, PlayerId, UnitId};

use crate::engine::SimulationEngine;
use crate::world_setup::UnitTemplate;

/// The player opposing the bot in every scenario.
pub const ENEMY: PlayerId = PlayerId(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioId {
    /// Ground defenders answer a tank raid, lose their target, then fall back.
    Skirmish,
    /// Fighters with limited missiles defend the base, shuttling home to rearm.
    AirRaid,
    /// An unseen sniper, then an approaching rifle group.
    Ambush,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [ScenarioId::Skirmish, ScenarioId::AirRaid, ScenarioId::Ambush];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioId::Skirmish => "skirmish",
            ScenarioId::AirRaid => "air-raid",
            ScenarioId::Ambush => "ambush",
        }
    }
}

/// Units of interest in a loaded scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioUnits {
    pub base: Option<UnitId>,
    pub defenders: Vec<UnitId>,
    pub attackers: Vec<UnitId>,
}

/// Populate `engine` with the given scenario.
pub fn load(engine: &mut SimulationEngine, scenario: ScenarioId) -> ScenarioUnits {
    match scenario {
        ScenarioId::Skirmish => load_skirmish(engine),
        ScenarioId::AirRaid => load_air_raid(engine),
        ScenarioId::Ambush => load_ambush(engine),
    }
}

/// Bot base at (8, 8), four ground defenders around it; three enemy tanks
/// just east of them, in tank range. The tanks are lost one after another.
fn load_skirmish(engine: &mut SimulationEngine) -> ScenarioUnits {
    let bot = engine.squad_manager().player();
    let base = engine.spawn_unit(UnitTemplate::base(bot, CPos::new(8, 8)));
    let defenders = vec![
        engine.spawn_unit(UnitTemplate::rifleman(bot, CPos::new(9, 9))),
        engine.spawn_unit(UnitTemplate::rifleman(bot, CPos::new(10, 9))),
        engine.spawn_unit(UnitTemplate::rifleman(bot, CPos::new(9, 10))),
        engine.spawn_unit(UnitTemplate::tank(bot, CPos::new(10, 10))),
    ];

    let mut attackers = Vec::new();
    for row in 0..3 {
        let cell = jitter(engine, CPos::new(14, 8 + row * 2));
        attackers.push(engine.spawn_unit(UnitTemplate::tank(ENEMY, cell)));
    }

    engine.schedule_command(
        1,
        SimCommand::ReportDamage {
            victim: defenders[1],
            attacker: attackers[0],
        },
    );
    for (i, &tank) in attackers.iter().enumerate() {
        engine.schedule_command(60 + 40 * i as u64, SimCommand::KillUnit { unit: tank });
    }

    ScenarioUnits {
        base: Some(base),
        defenders,
        attackers,
    }
}

/// Two parked fighters and a gunship at the base. A raiding tank has
/// slipped in under the gunship; more armour waits further out.
fn load_air_raid(engine: &mut SimulationEngine) -> ScenarioUnits {
    let bot = engine.squad_manager().player();
    let base = engine.spawn_unit(UnitTemplate::base(bot, CPos::new(6, 6)));
    let defenders = vec![
        engine.spawn_unit(UnitTemplate::fighter(bot, CPos::new(6, 6))),
        engine.spawn_unit(UnitTemplate::fighter(bot, CPos::new(7, 6))),
        engine.spawn_unit(UnitTemplate::gunship(bot, CPos::new(7, 7))),
    ];

    let mut attackers = vec![engine.spawn_unit(UnitTemplate::tank(ENEMY, CPos::new(8, 9)))];
    let tank = jitter(engine, CPos::new(13, 6));
    attackers.push(engine.spawn_unit(UnitTemplate::tank(ENEMY, tank)));
    let boat = jitter(engine, CPos::new(12, 12));
    attackers.push(engine.spawn_unit(UnitTemplate::gunboat(ENEMY, boat)));

    engine.schedule_command(
        1,
        SimCommand::ReportDamage {
            victim: base,
            attacker: attackers[0],
        },
    );
    engine.schedule_command(200, SimCommand::KillUnit { unit: attackers[0] });
    engine.schedule_command(260, SimCommand::KillUnit { unit: attackers[1] });
    engine.schedule_command(300, SimCommand::KillUnit { unit: attackers[2] });

    ScenarioUnits {
        base: Some(base),
        defenders,
        attackers,
    }
}

/// A sniper far out of sight harasses the defenders: the first squad gives
/// chase, loses patience and disbands. Later two riflemen close in and
/// draw a second squad into a real fight.
fn load_ambush(engine: &mut SimulationEngine) -> ScenarioUnits {
    let bot = engine.squad_manager().player();
    let base = engine.spawn_unit(UnitTemplate::base(bot, CPos::new(5, 20)));
    let defenders = vec![
        engine.spawn_unit(UnitTemplate::rifleman(bot, CPos::new(6, 20))),
        engine.spawn_unit(UnitTemplate::rifleman(bot, CPos::new(6, 21))),
        engine.spawn_unit(UnitTemplate::tank(bot, CPos::new(7, 20))),
    ];

    let sniper = engine.spawn_unit(UnitTemplate::sniper(ENEMY, CPos::new(22, 20)));
    let mut attackers = vec![sniper];
    for (row, lane) in [(16, 19), (24, 22)] {
        let cell = jitter(engine, CPos::new(17, row));
        let rifleman = engine.spawn_unit(UnitTemplate::rifleman(ENEMY, cell));
        engine.schedule_command(
            10,
            SimCommand::MoveUnit {
                unit: rifleman,
                cell: CPos::new(10, lane),
            },
        );
        attackers.push(rifleman);
    }

    engine.schedule_command(
        1,
        SimCommand::ReportDamage {
            victim: defenders[0],
            attacker: sniper,
        },
    );
    engine.schedule_command(
        150,
        SimCommand::ReportDamage {
            victim: defenders[2],
            attacker: attackers[1],
        },
    );
    engine.schedule_command(240, SimCommand::KillUnit { unit: attackers[1] });
    engine.schedule_command(250, SimCommand::KillUnit { unit: attackers[2] });

    ScenarioUnits {
        base: Some(base),
        defenders,
        attackers,
    }
}

/// Shift a cell by up to one cell in each axis.
fn jitter(engine: &mut SimulationEngine, cell: CPos) -> CPos {
    let rng = engine.rng();
    let dx = rng.gen_range(-1..=1);
    let dy = rng.gen_range(-1..=1);
    engine.map().clamp(cell.offset(dx, dy))
}
