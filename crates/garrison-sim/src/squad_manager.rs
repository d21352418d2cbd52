//! The bot's squad manager.
//!
//! Owns every squad of one bot player. Damage reports form (or refill) the
//! protection squad; each tick prunes dead members, runs every squad's
//! state machine once and dissolves squads left without members.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use garrison_core::config::SquadManagerConfig;
use garrison_core::enums::SquadKind;
use garrison_core::events::SquadEvent;
use garrison_core::state::SquadView;
use garrison_core::types::{PlayerId, SquadId, UnitId};
use garrison_squad::behaviors::ProtectionState;
use garrison_squad::fsm::StateMachine;
use garrison_squad::orders::OrderSink;
use garrison_squad::squad::{Squad, SquadContext};
use garrison_squad::target;
use garrison_squad::world::BattleView;

/// A squad together with the state machine driving it.
#[derive(Debug, Clone)]
pub struct ManagedSquad {
    pub squad: Squad,
    pub machine: StateMachine<ProtectionState>,
}

impl ManagedSquad {
    pub fn view(&self) -> SquadView {
        SquadView {
            id: self.squad.id(),
            kind: self.squad.kind(),
            state: self.machine.state_name(),
            members: self.squad.members().to_vec(),
            target: self.squad.target(),
            backoff: self.machine.current().backoff(),
        }
    }
}

#[derive(Debug)]
pub struct SquadManager {
    player: PlayerId,
    config: SquadManagerConfig,
    enabled: bool,
    squads: BTreeMap<SquadId, ManagedSquad>,
    next_squad_id: u32,
}

impl SquadManager {
    pub fn new(player: PlayerId, config: SquadManagerConfig) -> Self {
        Self {
            player,
            config,
            enabled: true,
            squads: BTreeMap::new(),
            next_squad_id: 1,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn config(&self) -> &SquadManagerConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!(player = self.player.0, enabled, "squad manager toggled");
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Squads in id order.
    pub fn squads(&self) -> impl Iterator<Item = &ManagedSquad> {
        self.squads.values()
    }

    pub fn squad(&self, id: SquadId) -> Option<&ManagedSquad> {
        self.squads.get(&id)
    }

    /// React to `victim` being damaged by `attacker`.
    ///
    /// Reports about other players' units, dead or friendly attackers, and
    /// reports received while disabled are ignored.
    pub fn on_damaged(&mut self, view: &dyn BattleView, victim: UnitId, attacker: UnitId) -> Vec<SquadEvent> {
        let mut events = Vec::new();
        if !self.enabled
            || view.owner(victim) != Some(self.player)
            || !target::is_valid_target(view, self.player, attacker)
        {
            return events;
        }

        let drafted: BTreeSet<UnitId> = self
            .squads
            .values()
            .flat_map(|m| m.squad.members().iter().copied())
            .collect();

        let id = match self.protection_squad() {
            Some(id) => id,
            None => {
                let id = self.register(SquadKind::Protection);
                info!(squad = %id, %attacker, "protection squad formed");
                events.push(SquadEvent::Formed {
                    squad: id,
                    kind: SquadKind::Protection,
                    target: Some(attacker),
                });
                id
            }
        };

        let player = self.player;
        let radius = self.config.protect_unit_scan_distance();
        let Some(managed) = self.squads.get_mut(&id) else {
            return events;
        };
        let squad = &mut managed.squad;

        let target_valid = squad
            .target()
            .is_some_and(|t| target::is_valid_target(view, player, t));
        if !target_valid {
            debug!(squad = %id, %attacker, "protection target set");
            squad.set_target(Some(attacker));
        }

        if squad.is_empty() {
            let origin = view
                .base_location(player)
                .map(|cell| cell.center())
                .or_else(|| view.position(victim));
            if let Some(origin) = origin {
                let mut candidates = view.own_units_within(player, origin, radius);
                candidates.sort();
                let mut added = Vec::new();
                for unit in candidates {
                    if !drafted.contains(&unit) && squad.add_member(unit) {
                        added.push(unit);
                    }
                }
                if !added.is_empty() {
                    info!(squad = %id, count = added.len(), "units drafted");
                    events.push(SquadEvent::MembersAdded { squad: id, units: added });
                }
            }
        }

        events
    }

    /// Tick every squad once, in id order. Orders go to `sink`.
    pub fn tick(&mut self, view: &dyn BattleView, sink: &mut dyn OrderSink) -> Vec<SquadEvent> {
        let mut events = Vec::new();
        let mut dissolved = Vec::new();

        for (&id, managed) in self.squads.iter_mut() {
            let lost = managed.squad.retain_alive(view);
            if lost > 0 {
                debug!(squad = %id, lost, "dead members pruned");
            }

            let mut ctx = SquadContext {
                player: self.player,
                config: &self.config,
                view,
                orders: &mut *sink,
                manager_active: self.enabled,
            };
            if !managed.machine.is_started() {
                managed.machine.start(&mut managed.squad, &mut ctx);
            }
            if let Some((from, to)) = managed.machine.tick(&mut managed.squad, &mut ctx) {
                events.push(SquadEvent::StateChanged { squad: id, from, to });
            }

            if managed.squad.is_empty() {
                dissolved.push(id);
            }
        }

        for id in dissolved {
            self.squads.remove(&id);
            info!(squad = %id, "squad dissolved");
            events.push(SquadEvent::Dissolved { squad: id });
        }
        events
    }

    fn protection_squad(&self) -> Option<SquadId> {
        self.squads
            .values()
            .find(|m| m.squad.kind() == SquadKind::Protection)
            .map(|m| m.squad.id())
    }

    fn register(&mut self, kind: SquadKind) -> SquadId {
        let id = SquadId(self.next_squad_id);
        self.next_squad_id += 1;
        self.squads.insert(
            id,
            ManagedSquad {
                squad: Squad::new(id, kind),
                machine: StateMachine::new(ProtectionState::default()),
            },
        );
        id
    }
}
