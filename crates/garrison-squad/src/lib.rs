//! Squad-level bot AI for GARRISON.
//!
//! A squad is a set of units the bot drives as one decision-making unit.
//! Each squad runs a finite state machine ticked once per simulation tick;
//! states observe the battlefield through [`world::BattleView`], issue
//! fire-and-forget orders through [`orders::OrderSink`] and request
//! transitions. No ECS dependency: operates on traits and plain data.

pub mod behaviors;
pub mod capability;
pub mod fsm;
pub mod orders;
pub mod squad;
pub mod target;
pub mod world;

pub use garrison_core as core;
