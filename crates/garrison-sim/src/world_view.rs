//! The hecs world seen through the squad AI's `BattleView`.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use garrison_core::components::{
    Activity, Aircraft, AmmoPools, BaseBuilding, Destroyed, Locomotor, Rearmable, Unit, Vision,
};
use garrison_core::types::{CPos, MapBounds, PlayerId, UnitId, WDist, WPos};
use garrison_squad::world::{BattleView, UnitCapabilities};

use crate::systems::attack;

/// Read-only view over the world for one tick.
pub struct WorldView<'w> {
    world: &'w World,
    units: &'w BTreeMap<UnitId, Entity>,
    map: MapBounds,
}

impl<'w> WorldView<'w> {
    pub fn new(world: &'w World, units: &'w BTreeMap<UnitId, Entity>, map: MapBounds) -> Self {
        Self { world, units, map }
    }

    /// Entity of a live unit.
    fn entity(&self, unit: UnitId) -> Option<Entity> {
        let entity = *self.units.get(&unit)?;
        self.world
            .get::<&Destroyed>(entity)
            .is_err()
            .then_some(entity)
    }

    fn has<T: hecs::Component>(&self, entity: Entity) -> bool {
        self.world.get::<&T>(entity).is_ok()
    }

    /// Live units matching `filter`, within `radius` of `origin` on the ground plane.
    fn units_within(&self, origin: WPos, radius: WDist, filter: impl Fn(&Unit, Entity) -> bool) -> Vec<UnitId> {
        self.world
            .query::<(&Unit, &WPos)>()
            .without::<&Destroyed>()
            .iter()
            .filter(|(entity, (unit, pos))| filter(unit, *entity) && origin.is_within_horizontal(pos, radius))
            .map(|(_, (unit, _))| unit.id)
            .collect()
    }
}

impl BattleView for WorldView<'_> {
    fn is_alive(&self, unit: UnitId) -> bool {
        self.entity(unit).is_some()
    }

    fn owner(&self, unit: UnitId) -> Option<PlayerId> {
        let entity = self.entity(unit)?;
        self.world.get::<&Unit>(entity).ok().map(|u| u.owner)
    }

    fn position(&self, unit: UnitId) -> Option<WPos> {
        let entity = self.entity(unit)?;
        self.world.get::<&WPos>(entity).ok().map(|p| *p)
    }

    fn is_visible_to(&self, player: PlayerId, unit: UnitId) -> bool {
        if self.owner(unit) == Some(player) {
            return true;
        }
        let Some(target) = self.position(unit) else {
            return false;
        };
        self.world
            .query::<(&Unit, &WPos, &Vision)>()
            .without::<&Destroyed>()
            .iter()
            .any(|(_, (viewer, pos, vision))| {
                viewer.owner == player
                    && pos.horizontal_distance_sq(&target) <= vision.sight.length_sq()
            })
    }

    fn capabilities(&self, unit: UnitId) -> Option<UnitCapabilities> {
        let entity = self.entity(unit)?;
        let activity = self
            .world
            .get::<&Activity>(entity)
            .map(|a| *a)
            .unwrap_or_default();
        let ammo_pools = self
            .world
            .get::<&AmmoPools>(entity)
            .map(|p| p.pools.clone())
            .unwrap_or_default();
        Some(UnitCapabilities {
            airborne_capable: self.has::<Aircraft>(entity),
            ammo_pools,
            rearmable: self.has::<Rearmable>(entity),
            rearming: activity == Activity::Rearming,
            attacking: matches!(activity, Activity::Attack { .. }),
        })
    }

    fn can_attack_target(&self, unit: UnitId, target: UnitId) -> bool {
        match (self.entity(unit), self.entity(target)) {
            (Some(a), Some(t)) => attack::can_attack(self.world, a, t, self.map),
            _ => false,
        }
    }

    fn hostiles_within(&self, player: PlayerId, origin: WPos, radius: WDist) -> Vec<UnitId> {
        self.units_within(origin, radius, |unit, _| player.is_hostile_to(unit.owner))
    }

    /// Only mobile units: structures never join squads.
    fn own_units_within(&self, player: PlayerId, origin: WPos, radius: WDist) -> Vec<UnitId> {
        self.units_within(origin, radius, |unit, entity| {
            unit.owner == player && self.has::<Locomotor>(entity)
        })
    }

    fn base_location(&self, player: PlayerId) -> Option<CPos> {
        self.world
            .query::<(&Unit, &WPos, &BaseBuilding)>()
            .without::<&Destroyed>()
            .iter()
            .filter(|(_, (unit, _, _))| unit.owner == player)
            .min_by_key(|(_, (unit, _, _))| unit.id)
            .map(|(_, (_, pos, _))| pos.to_cell())
    }

    fn map_bounds(&self) -> MapBounds {
        self.map
    }
}
