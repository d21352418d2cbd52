//! Battle state snapshot: the complete observable state after each tick.

use serde::{Deserialize, Serialize};

use crate::commands::BotOrder;
use crate::components::Activity;
use crate::enums::{Mobility, SimPhase, SquadKind, StateName};
use crate::events::SquadEvent;
use crate::types::{PlayerId, SimTime, SquadId, UnitId, WPos};

/// Complete battle state produced by the engine after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub phase: SimPhase,
    pub units: Vec<UnitView>,
    pub squads: Vec<SquadView>,
    /// Orders issued by squads during this tick (applied next tick).
    pub orders: Vec<BotOrder>,
    pub events: Vec<SquadEvent>,
}

/// A unit as seen in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub owner: PlayerId,
    pub mobility: Mobility,
    pub position: WPos,
    pub activity: Activity,
    /// Rounds left across all ammo pools (0 for unlimited weapons).
    pub ammo: u32,
}

/// A squad as seen in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadView {
    pub id: SquadId,
    pub kind: SquadKind,
    pub state: StateName,
    pub members: Vec<UnitId>,
    pub target: Option<UnitId>,
    /// Attack backoff counter, when the squad is attacking.
    pub backoff: Option<i32>,
}

impl BattleSnapshot {
    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn squad(&self, id: SquadId) -> Option<&SquadView> {
        self.squads.iter().find(|s| s.id == id)
    }
}
