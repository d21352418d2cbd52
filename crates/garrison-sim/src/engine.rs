//! Simulation engine: the host the bot plays in.
//!
//! `SimulationEngine` owns the hecs ECS world and the bot's squad manager,
//! processes host commands, runs all systems, and produces
//! `BattleSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use garrison_core::commands::{BotOrder, SimCommand};
use garrison_core::components::{Activity, Destroyed};
use garrison_core::config::SquadManagerConfig;
use garrison_core::enums::SimPhase;
use garrison_core::events::SquadEvent;
use garrison_core::state::BattleSnapshot;
use garrison_core::types::{MapBounds, PlayerId, SimTime, UnitId};

use crate::squad_manager::SquadManager;
use crate::systems;
use crate::world_setup::{self, UnitTemplate};
use crate::world_view::WorldView;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub map: MapBounds,
    /// The player the squad manager plays for.
    pub bot: PlayerId,
    pub squad: SquadManagerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            map: MapBounds::new(64, 64),
            bot: PlayerId(1),
            squad: SquadManagerConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    /// Live units by id. Entries are removed when the unit is despawned.
    units: BTreeMap<UnitId, Entity>,
    next_unit_id: u32,
    map: MapBounds,
    time: SimTime,
    phase: SimPhase,
    rng: ChaCha8Rng,
    command_queue: VecDeque<SimCommand>,
    /// Commands held back until their tick comes up.
    scheduled: BTreeMap<u64, Vec<SimCommand>>,
    /// Orders issued last tick, applied at the start of the next one.
    pending_orders: Vec<BotOrder>,
    despawn_buffer: Vec<Entity>,
    squad_events: Vec<SquadEvent>,
    squads: SquadManager,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            units: BTreeMap::new(),
            next_unit_id: 1,
            map: config.map,
            time: SimTime::default(),
            phase: SimPhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            scheduled: BTreeMap::new(),
            pending_orders: Vec::new(),
            despawn_buffer: Vec::new(),
            squad_events: Vec::new(),
            squads: SquadManager::new(config.bot, config.squad),
        }
    }

    /// Spawn a unit and return its freshly allocated id.
    pub fn spawn_unit(&mut self, template: UnitTemplate) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        let entity = world_setup::spawn_unit(&mut self.world, id, &template);
        self.units.insert(id, entity);
        id
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Queue a command for the boundary before tick `tick` runs.
    pub fn schedule_command(&mut self, tick: u64, command: SimCommand) {
        self.scheduled.entry(tick).or_default().push(command);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> BattleSnapshot {
        self.release_scheduled();
        self.process_commands();

        let mut issued = Vec::new();
        if self.phase == SimPhase::Running {
            self.run_systems(&mut issued);
            self.time.advance();
        }

        let events = std::mem::take(&mut self.squad_events);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.phase, &self.squads, issued, events)
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn map(&self) -> MapBounds {
        self.map
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn squad_manager(&self) -> &SquadManager {
        &self.squads
    }

    /// Entity of a unit that has not been despawned yet.
    pub fn entity(&self, unit: UnitId) -> Option<Entity> {
        self.units.get(&unit).copied()
    }

    /// Battlefield view over the current world state.
    pub fn view(&self) -> WorldView<'_> {
        WorldView::new(&self.world, &self.units, self.map)
    }

    /// Seeded RNG shared by scenario setup.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Orders waiting to be applied on the next tick.
    pub fn pending_orders(&self) -> &[BotOrder] {
        &self.pending_orders
    }

    fn release_scheduled(&mut self) {
        let due: Vec<u64> = self
            .scheduled
            .range(..=self.time.tick)
            .map(|(&tick, _)| tick)
            .collect();
        for tick in due {
            if let Some(commands) = self.scheduled.remove(&tick) {
                self.command_queue.extend(commands);
            }
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: SimCommand) {
        match command {
            SimCommand::ReportDamage { victim, attacker } => {
                let view = WorldView::new(&self.world, &self.units, self.map);
                let events = self.squads.on_damaged(&view, victim, attacker);
                self.squad_events.extend(events);
            }
            SimCommand::KillUnit { unit } => {
                if let Some(&entity) = self.units.get(&unit) {
                    debug!(%unit, "unit killed");
                    let _ = self.world.insert_one(entity, Destroyed);
                }
            }
            SimCommand::MoveUnit { unit, cell } => {
                if let Some(&entity) = self.units.get(&unit) {
                    if let Ok(mut activity) = self.world.get::<&mut Activity>(entity) {
                        *activity = Activity::Move { destination: cell };
                    }
                }
            }
            SimCommand::SetBotEnabled { enabled } => {
                self.squads.set_enabled(enabled);
            }
            SimCommand::Pause => {
                if self.phase == SimPhase::Running {
                    self.phase = SimPhase::Paused;
                }
            }
            SimCommand::Resume => {
                if self.phase == SimPhase::Paused {
                    self.phase = SimPhase::Running;
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, issued: &mut Vec<BotOrder>) {
        // 1. Orders issued last tick
        let orders = std::mem::take(&mut self.pending_orders);
        systems::orders::apply(&mut self.world, &self.units, &orders);
        // 2. Movement
        systems::movement::run(&mut self.world, &self.units, self.map);
        // 3. Weapons (ammo bookkeeping)
        systems::weapons::run(&mut self.world, &self.units, self.map);
        // 4. Rearming at base
        systems::rearm::run(&mut self.world);
        // 5. Cleanup (destroyed units)
        systems::cleanup::run(&mut self.world, &mut self.units, &mut self.despawn_buffer);
        // 6. Squad AI; its orders apply next tick
        let view = WorldView::new(&self.world, &self.units, self.map);
        let events = self.squads.tick(&view, issued);
        self.squad_events.extend(events);
        self.pending_orders = issued.clone();
    }
}
