//! Unit spawn factories.
//!
//! A `UnitTemplate` describes one unit; `spawn_unit` turns it into the
//! matching component bundle. Constructors cover the unit types used by
//! the scenarios; tests tweak the public fields directly.

use hecs::{Entity, EntityBuilder, World};

use garrison_core::components::*;
use garrison_core::constants::*;
use garrison_core::enums::Mobility;
use garrison_core::types::{CPos, PlayerId, UnitId, WAngle, WDist, WPos};

/// Everything needed to spawn one unit.
#[derive(Debug, Clone)]
pub struct UnitTemplate {
    pub owner: PlayerId,
    pub mobility: Mobility,
    pub position: WPos,
    pub facing: WAngle,
    /// World units per tick; 0 for immobile structures.
    pub speed: i32,
    pub sight: WDist,
    pub armament: Option<Armament>,
    pub ammo: Option<AmmoPools>,
    pub rearmable: bool,
    pub base: bool,
}

impl UnitTemplate {
    fn ground(owner: PlayerId, cell: CPos, range_cells: i32, facing_tolerance: i32) -> Self {
        Self {
            owner,
            mobility: Mobility::Ground,
            position: cell.center(),
            facing: WAngle::default(),
            speed: GROUND_SPEED,
            sight: WDist::from_cells(DEFAULT_SIGHT_CELLS),
            armament: Some(weapon(range_cells, facing_tolerance, 8)),
            ammo: None,
            rearmable: false,
            base: false,
        }
    }

    /// Construction yard: rally and rearm point. Immobile, unarmed.
    pub fn base(owner: PlayerId, cell: CPos) -> Self {
        Self {
            speed: 0,
            armament: None,
            base: true,
            ..Self::ground(owner, cell, 0, 0)
        }
    }

    pub fn rifleman(owner: PlayerId, cell: CPos) -> Self {
        Self::ground(owner, cell, 5, DEFAULT_FACING_TOLERANCE)
    }

    /// Turreted: fires in any direction.
    pub fn tank(owner: PlayerId, cell: CPos) -> Self {
        Self::ground(owner, cell, 6, FULL_TURN / 2)
    }

    /// Long-range spotter, used as a harasser that stays out of sight.
    pub fn sniper(owner: PlayerId, cell: CPos) -> Self {
        Self {
            sight: WDist::from_cells(12),
            ..Self::ground(owner, cell, 11, DEFAULT_FACING_TOLERANCE)
        }
    }

    pub fn gunboat(owner: PlayerId, cell: CPos) -> Self {
        Self {
            mobility: Mobility::Naval,
            ..Self::ground(owner, cell, 7, FULL_TURN / 2)
        }
    }

    /// Jet with limited missiles, rearmed at base. Spawns parked.
    pub fn fighter(owner: PlayerId, cell: CPos) -> Self {
        Self {
            mobility: Mobility::Air,
            speed: AIRCRAFT_SPEED,
            armament: Some(Armament {
                air_facing_tolerance: WAngle::new(DEFAULT_AIR_FACING_TOLERANCE),
                ..weapon(5, FULL_TURN / 8, 10)
            }),
            ammo: Some(AmmoPools::single(4, true)),
            rearmable: true,
            ..Self::ground(owner, cell, 0, 0)
        }
    }

    /// Helicopter whose gun pool reloads on its own. Spawns airborne.
    pub fn gunship(owner: PlayerId, cell: CPos) -> Self {
        Self {
            mobility: Mobility::Air,
            speed: AIRCRAFT_SPEED / 2,
            armament: Some(Armament {
                air_facing_tolerance: WAngle::new(DEFAULT_AIR_FACING_TOLERANCE),
                ..weapon(4, DEFAULT_FACING_TOLERANCE, 6)
            }),
            ammo: Some(AmmoPools::single(6, false)),
            rearmable: false,
            ..Self::ground(owner, cell, 0, 0)
        }
        .at_altitude(AIRCRAFT_CRUISE_ALTITUDE)
    }

    pub fn at_altitude(mut self, z: i32) -> Self {
        self.position.z = z;
        self
    }

    pub fn facing(mut self, angle: WAngle) -> Self {
        self.facing = angle;
        self
    }
}

fn weapon(range_cells: i32, facing_tolerance: i32, reload_ticks: u32) -> Armament {
    Armament {
        range: WDist::from_cells(range_cells),
        facing_tolerance: WAngle::new(facing_tolerance),
        air_facing_tolerance: WAngle::new(facing_tolerance),
        reload_ticks,
        cooldown: 0,
    }
}

/// Spawn a unit entity with the component bundle its template describes.
pub fn spawn_unit(world: &mut World, id: UnitId, template: &UnitTemplate) -> Entity {
    let mut builder = EntityBuilder::new();
    builder.add(Unit {
        id,
        owner: template.owner,
        mobility: template.mobility,
    });
    builder.add(template.position);
    builder.add(Facing {
        angle: template.facing,
    });
    builder.add(Activity::Idle);
    builder.add(Vision {
        sight: template.sight,
    });

    if template.speed > 0 {
        builder.add(Locomotor {
            speed: template.speed,
        });
    }
    if template.mobility == Mobility::Air {
        builder.add(Aircraft {
            min_airborne_altitude: AIRCRAFT_MIN_AIRBORNE_ALTITUDE,
            cruise_altitude: AIRCRAFT_CRUISE_ALTITUDE,
        });
    }
    if let Some(armament) = template.armament {
        builder.add(armament);
    }
    if let Some(ammo) = &template.ammo {
        builder.add(ammo.clone());
    }
    if template.rearmable {
        builder.add(Rearmable {
            ticks_per_round: REARM_TICKS_PER_ROUND,
            progress: 0,
        });
    }
    if template.base {
        builder.add(BaseBuilding);
    }

    world.spawn(builder.build())
}
