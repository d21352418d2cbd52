//! Order dispatch.
//!
//! Orders are fire-and-forget: the sink queues them and the simulation
//! applies them on a later tick. Nothing is acknowledged and nothing is
//! retried here, so callers must only ever issue orders that are safe to
//! repeat on the next tick.

use garrison_core::commands::{BotOrder, OrderTarget};
use garrison_core::enums::OrderKind;
use garrison_core::types::{CPos, UnitId};

/// Destination of bot orders.
pub trait OrderSink {
    fn issue(&mut self, order: BotOrder);
}

impl OrderSink for Vec<BotOrder> {
    fn issue(&mut self, order: BotOrder) {
        self.push(order);
    }
}

pub fn attack(unit: UnitId, target: UnitId) -> BotOrder {
    BotOrder {
        kind: OrderKind::Attack,
        unit,
        target: OrderTarget::Unit { unit: target },
    }
}

pub fn attack_move(unit: UnitId, cell: CPos) -> BotOrder {
    BotOrder {
        kind: OrderKind::AttackMove,
        unit,
        target: OrderTarget::Cell { cell },
    }
}

pub fn return_to_base(unit: UnitId) -> BotOrder {
    BotOrder {
        kind: OrderKind::ReturnToBase,
        unit,
        target: OrderTarget::None,
    }
}

pub fn move_to(unit: UnitId, cell: CPos) -> BotOrder {
    BotOrder {
        kind: OrderKind::Move,
        unit,
        target: OrderTarget::Cell { cell },
    }
}
