//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components and the unit registry.

pub mod attack;
pub mod cleanup;
pub mod movement;
pub mod orders;
pub mod rearm;
pub mod snapshot;
pub mod weapons;
