//! Order application: turns queued bot orders into unit activities.
//!
//! Orders arrive one tick after they were issued. Orders for units that
//! died in between are dropped. Re-issuing the order a unit is already
//! carrying out leaves it untouched.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use tracing::trace;

use garrison_core::commands::{BotOrder, OrderTarget};
use garrison_core::components::{Activity, Destroyed};
use garrison_core::enums::OrderKind;
use garrison_core::types::UnitId;

/// Apply `orders` in issue order. Returns how many changed an activity.
pub fn apply(world: &mut World, units: &BTreeMap<UnitId, Entity>, orders: &[BotOrder]) -> usize {
    let mut changed = 0;
    for order in orders {
        let Some(&entity) = units.get(&order.unit) else {
            trace!(unit = %order.unit, kind = ?order.kind, "order dropped: unit gone");
            continue;
        };
        if world.get::<&Destroyed>(entity).is_ok() {
            continue;
        }
        let Ok(mut activity) = world.get::<&mut Activity>(entity) else {
            continue;
        };
        let Some(next) = activity_for(order, *activity) else {
            trace!(unit = %order.unit, kind = ?order.kind, "order dropped: malformed");
            continue;
        };
        if *activity != next {
            *activity = next;
            changed += 1;
        }
    }
    changed
}

/// Activity an order asks for, given what the unit is doing now.
fn activity_for(order: &BotOrder, current: Activity) -> Option<Activity> {
    match (order.kind, order.target) {
        (OrderKind::Attack, OrderTarget::Unit { unit }) => Some(Activity::Attack { target: unit }),
        (OrderKind::AttackMove, OrderTarget::Cell { cell }) => {
            Some(Activity::AttackMove { destination: cell })
        }
        (OrderKind::Move, OrderTarget::Cell { cell }) => Some(Activity::Move { destination: cell }),
        // Already home and rearming counts as carrying out the order.
        (OrderKind::ReturnToBase, _) if current == Activity::Rearming => Some(Activity::Rearming),
        (OrderKind::ReturnToBase, _) => Some(Activity::ReturnToBase),
        _ => None,
    }
}
