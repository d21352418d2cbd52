//! Commands flowing into the simulation.
//!
//! `BotOrder`s are issued by squads to individual units; `SimCommand`s come
//! from the host (scenario scripts, tests, tooling). Both are queued and
//! processed at a later tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::OrderKind;
use crate::types::{CPos, UnitId};

/// Payload of a bot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OrderTarget {
    None,
    Unit { unit: UnitId },
    Cell { cell: CPos },
}

/// A single fire-and-forget order for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BotOrder {
    pub kind: OrderKind,
    pub unit: UnitId,
    pub target: OrderTarget,
}

/// Host-side actions applied at the next tick boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    /// One of the bot's units was damaged by `attacker`.
    ReportDamage { victim: UnitId, attacker: UnitId },
    /// Remove a unit from the battlefield.
    KillUnit { unit: UnitId },
    /// Scripted move of any unit, bypassing the bot.
    MoveUnit { unit: UnitId, cell: CPos },
    /// Enable or disable the bot's squad manager.
    SetBotEnabled { enabled: bool },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}

impl BotOrder {
    /// Cell named by the order, if any.
    pub fn target_cell(&self) -> Option<CPos> {
        match self.target {
            OrderTarget::Cell { cell } => Some(cell),
            _ => None,
        }
    }

    /// Unit named by the order, if any.
    pub fn target_unit(&self) -> Option<UnitId> {
        match self.target {
            OrderTarget::Unit { unit } => Some(unit),
            _ => None,
        }
    }
}
