//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Kind of order a bot issues to one of its units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Engage a specific unit.
    Attack,
    /// Move to a cell, engaging anything met on the way.
    AttackMove,
    /// Fly back to base to rearm.
    ReturnToBase,
    /// Plain move, used for retreats.
    Move,
}

/// Movement class of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mobility {
    #[default]
    Ground,
    Naval,
    Air,
}

/// Behaviour family a squad runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquadKind {
    /// Reacts to attacks on the bot's own units and base.
    #[default]
    Protection,
}

/// Observable name of a squad's current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateName {
    #[default]
    Idle,
    Attack,
    Flee,
}

/// Host simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    #[default]
    Running,
    Paused,
}
