//! Simulation host for GARRISON.
//!
//! Owns the hecs ECS world, applies bot orders, runs systems at a fixed
//! tick rate, drives the bot's squad manager and produces
//! `BattleSnapshot`s. Completely headless, enabling deterministic testing.

pub mod engine;
pub mod scenario;
pub mod squad_manager;
pub mod systems;
pub mod world_setup;
pub mod world_view;

pub use engine::{SimConfig, SimulationEngine};
pub use garrison_core as core;

#[cfg(test)]
mod tests;
