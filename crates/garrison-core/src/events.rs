//! Events emitted by the squad manager for tooling and tests.

use serde::{Deserialize, Serialize};

use crate::enums::{SquadKind, StateName};
use crate::types::{SquadId, UnitId};

/// Squad lifecycle and decision events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SquadEvent {
    /// A new squad was registered.
    Formed {
        squad: SquadId,
        kind: SquadKind,
        target: Option<UnitId>,
    },
    /// Units were drafted into a squad.
    MembersAdded { squad: SquadId, units: Vec<UnitId> },
    /// The squad's state machine transitioned.
    StateChanged {
        squad: SquadId,
        from: StateName,
        to: StateName,
    },
    /// The squad's member set emptied and it was removed.
    Dissolved { squad: SquadId },
}
