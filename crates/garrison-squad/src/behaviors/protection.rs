//! Protection squads: retaliate against whoever attacks the bot, and give
//! up (flee, then disband) when the attacker cannot be engaged.
//!
//! Idle -> Attack -> Flee -> Idle. Leaving Flee empties the squad, so the
//! manager dissolves it right after.

use tracing::{debug, trace};

use garrison_core::constants::PROTECTION_BACKOFF_TICKS;
use garrison_core::enums::StateName;
use garrison_core::types::{CPos, UnitId};

use crate::behaviors::ground::{self, RetreatFlags};
use crate::capability;
use crate::fsm::{SquadBehavior, Transition};
use crate::orders;
use crate::squad::{Squad, SquadContext};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProtectionState {
    #[default]
    Idle,
    Attack {
        /// Invisible-target ticks left before fleeing.
        backoff: i32,
    },
    Flee,
}

impl ProtectionState {
    pub fn attack() -> Self {
        ProtectionState::Attack {
            backoff: PROTECTION_BACKOFF_TICKS,
        }
    }

    pub fn backoff(&self) -> Option<i32> {
        match self {
            ProtectionState::Attack { backoff } => Some(*backoff),
            _ => None,
        }
    }
}

impl SquadBehavior for ProtectionState {
    fn name(&self) -> StateName {
        match self {
            ProtectionState::Idle => StateName::Idle,
            ProtectionState::Attack { .. } => StateName::Attack,
            ProtectionState::Flee => StateName::Flee,
        }
    }

    fn activate(&mut self, _squad: &mut Squad, _ctx: &mut SquadContext<'_>, reset: bool) {
        if let ProtectionState::Attack { backoff } = self {
            if reset {
                *backoff = PROTECTION_BACKOFF_TICKS;
            }
        }
    }

    fn tick(&mut self, squad: &mut Squad, ctx: &mut SquadContext<'_>) -> Option<Transition<Self>> {
        match self {
            ProtectionState::Idle => tick_idle(squad, ctx),
            ProtectionState::Attack { backoff } => tick_attack(backoff, squad, ctx),
            ProtectionState::Flee => tick_flee(squad, ctx),
        }
    }

    fn deactivate(&mut self, squad: &mut Squad, _ctx: &mut SquadContext<'_>) {
        match self {
            ProtectionState::Idle => {}
            ProtectionState::Attack { backoff } => *backoff = PROTECTION_BACKOFF_TICKS,
            ProtectionState::Flee => squad.clear_members(),
        }
    }
}

fn tick_idle(squad: &mut Squad, ctx: &mut SquadContext<'_>) -> Option<Transition<ProtectionState>> {
    if !squad.is_valid(ctx) {
        return None;
    }

    if !squad.is_target_valid(ctx) {
        let center = squad.center_position(ctx.view)?;
        let target =
            ctx.view
                .find_closest_enemy(ctx.player, center, ctx.config.protection_scan_distance());
        squad.set_target(target);
        if target.is_none() {
            ground::retreat(squad, ctx, RetreatFlags::FULL);
            return None;
        }
    }

    Some(Transition::to(ProtectionState::attack()))
}

fn tick_attack(
    backoff: &mut i32,
    squad: &mut Squad,
    ctx: &mut SquadContext<'_>,
) -> Option<Transition<ProtectionState>> {
    if !squad.is_valid(ctx) {
        return None;
    }

    let scan = ctx.config.protection_scan_distance();
    if !squad.is_target_valid(ctx) {
        let target = squad
            .center_position(ctx.view)
            .and_then(|center| ctx.view.find_closest_enemy(ctx.player, center, scan));
        squad.set_target(target);
        if target.is_none() {
            return Some(Transition::to(ProtectionState::Flee));
        }
    }

    let leader = squad.leader(ctx.view)?;
    let leader_pos = ctx.view.position(leader)?;

    // Rescan around the leader so an ambush is answered, not ignored.
    if let Some(closest) = ctx.view.find_closest_enemy(ctx.player, leader_pos, scan) {
        if squad.target() != Some(closest) {
            debug!(squad = %squad.id(), from = ?squad.target(), to = %closest, "retargeting");
        }
        squad.set_target(Some(closest));
    }

    if !squad.is_target_visible(ctx) {
        *backoff -= 1;
        if *backoff < 0 {
            return Some(Transition::to(ProtectionState::Flee));
        }
        return None;
    }

    let target = squad.target()?;
    if retaliate(squad, ctx, target, leader_pos.to_cell()) == 0 {
        debug!(squad = %squad.id(), %target, "no member can engage");
        return Some(Transition::to(ProtectionState::Flee));
    }
    None
}

fn tick_flee(squad: &mut Squad, ctx: &mut SquadContext<'_>) -> Option<Transition<ProtectionState>> {
    if !squad.is_valid(ctx) {
        return None;
    }

    ground::retreat(squad, ctx, RetreatFlags::FULL);
    Some(Transition::to(ProtectionState::Idle))
}

/// Order every member against `target`. Returns how many members engaged.
fn retaliate(squad: &Squad, ctx: &mut SquadContext<'_>, target: UnitId, rally: CPos) -> usize {
    let mut engaged = 0;
    for &unit in squad.members() {
        let Some(caps) = ctx.view.capabilities(unit) else {
            continue;
        };

        // Aircraft with limited ammo keep attacking, wait for rearming, or go home.
        if capability::is_airborne_capable(&caps) && !caps.ammo_pools.is_empty() {
            if capability::is_busy_attacking(&caps) {
                engaged += 1;
                continue;
            }
            if !capability::reloads_automatically(&caps.ammo_pools, caps.rearmable) {
                if capability::is_rearming(&caps) {
                    trace!(%unit, "rearming, left alone");
                    continue;
                }
                if !capability::has_ammo(&caps.ammo_pools) {
                    ctx.issue(orders::return_to_base(unit));
                    continue;
                }
            }
        }

        if capability::can_attack_target(ctx.view, unit, target) {
            ctx.issue(orders::attack(unit, target));
            engaged += 1;
        } else {
            ctx.issue(orders::attack_move(unit, rally));
        }
    }
    engaged
}
