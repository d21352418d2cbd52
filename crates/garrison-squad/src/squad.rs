//! Per-squad state shared by every behaviour state.

use tracing::trace;

use garrison_core::commands::BotOrder;
use garrison_core::config::SquadManagerConfig;
use garrison_core::enums::SquadKind;
use garrison_core::types::{PlayerId, SquadId, UnitId, WPos};

use crate::capability;
use crate::orders::OrderSink;
use crate::target;
use crate::world::BattleView;

/// Everything a squad borrows from its manager for one tick.
pub struct SquadContext<'a> {
    pub player: PlayerId,
    pub config: &'a SquadManagerConfig,
    pub view: &'a dyn BattleView,
    pub orders: &'a mut dyn OrderSink,
    /// False once the owning manager has been disabled.
    pub manager_active: bool,
}

impl SquadContext<'_> {
    pub fn issue(&mut self, order: BotOrder) {
        trace!(unit = %order.unit, kind = ?order.kind, target = ?order.target, "order issued");
        self.orders.issue(order);
    }
}

/// A group of units driven as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squad {
    id: SquadId,
    kind: SquadKind,
    /// Unique, in insertion order.
    members: Vec<UnitId>,
    /// Weak reference, re-validated on every use.
    target: Option<UnitId>,
}

impl Squad {
    pub fn new(id: SquadId, kind: SquadKind) -> Self {
        Self {
            id,
            kind,
            members: Vec::new(),
            target: None,
        }
    }

    pub fn id(&self) -> SquadId {
        self.id
    }

    pub fn kind(&self) -> SquadKind {
        self.kind
    }

    pub fn members(&self) -> &[UnitId] {
        &self.members
    }

    pub fn target(&self) -> Option<UnitId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<UnitId>) {
        self.target = target;
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.members.contains(&unit)
    }

    /// Returns false if the unit was already a member.
    pub fn add_member(&mut self, unit: UnitId) -> bool {
        if self.contains(unit) {
            return false;
        }
        self.members.push(unit);
        true
    }

    pub fn remove_member(&mut self, unit: UnitId) -> bool {
        let before = self.members.len();
        self.members.retain(|&m| m != unit);
        self.members.len() != before
    }

    pub fn clear_members(&mut self) {
        self.members.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Drop members that are no longer alive. Returns how many were removed.
    pub fn retain_alive(&mut self, view: &dyn BattleView) -> usize {
        let before = self.members.len();
        self.members.retain(|&unit| view.is_alive(unit));
        before - self.members.len()
    }

    pub fn is_valid(&self, ctx: &SquadContext<'_>) -> bool {
        !self.members.is_empty() && ctx.manager_active
    }

    /// Mean position of the members that have one.
    pub fn center_position(&self, view: &dyn BattleView) -> Option<WPos> {
        WPos::centroid(self.members.iter().filter_map(|&unit| view.position(unit)))
    }

    pub fn is_target_valid(&self, ctx: &SquadContext<'_>) -> bool {
        self.target
            .is_some_and(|t| target::is_valid_target(ctx.view, ctx.player, t))
    }

    pub fn is_target_visible(&self, ctx: &SquadContext<'_>) -> bool {
        self.is_target_valid(ctx)
            && self
                .target
                .is_some_and(|t| ctx.view.is_visible_to(ctx.player, t))
    }

    pub fn target_position(&self, view: &dyn BattleView) -> Option<WPos> {
        self.target.and_then(|t| view.position(t))
    }

    /// Member closest to the current target.
    pub fn leader(&self, view: &dyn BattleView) -> Option<UnitId> {
        let target_pos = self.target_position(view)?;
        capability::closest_to(view, &self.members, target_pos)
    }
}
