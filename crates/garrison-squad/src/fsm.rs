//! Squad finite state machine engine.
//!
//! The engine is generic over a behaviour family: a tagged enum whose
//! variants are the states and which implements [`SquadBehavior`]. States
//! never call back into the engine; a tick that wants to transition returns
//! the next state and the engine swaps it in. One transition at most per
//! tick: the incoming state is activated but not ticked until the next call.

use tracing::debug;

use garrison_core::enums::StateName;

use crate::squad::{Squad, SquadContext};

/// Request to replace the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S> {
    pub next: S,
    /// Start fresh bookkeeping in the next state. Opaque to the engine.
    pub reset: bool,
}

impl<S> Transition<S> {
    /// Transition with fresh bookkeeping.
    pub fn to(next: S) -> Self {
        Self { next, reset: true }
    }

    /// Transition that keeps whatever bookkeeping `next` carries.
    pub fn carry(next: S) -> Self {
        Self { next, reset: false }
    }
}

/// Lifecycle of one behaviour state.
///
/// For any state value, `activate` runs exactly once before any `tick`, and
/// `deactivate` exactly once after the last one.
pub trait SquadBehavior: Sized {
    fn name(&self) -> StateName;

    fn activate(&mut self, squad: &mut Squad, ctx: &mut SquadContext<'_>, reset: bool);

    fn tick(&mut self, squad: &mut Squad, ctx: &mut SquadContext<'_>) -> Option<Transition<Self>>;

    fn deactivate(&mut self, squad: &mut Squad, ctx: &mut SquadContext<'_>);
}

/// Holds exactly one active state of a behaviour family.
#[derive(Debug, Clone)]
pub struct StateMachine<S> {
    current: S,
    started: bool,
    transitions: u64,
}

impl<S: SquadBehavior> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            started: false,
            transitions: 0,
        }
    }

    /// Activate the initial state.
    pub fn start(&mut self, squad: &mut Squad, ctx: &mut SquadContext<'_>) {
        assert!(!self.started, "state machine of {} started twice", squad.id());
        self.started = true;
        self.current.activate(squad, ctx, true);
    }

    /// Deactivate the current state, then activate `next` in its place.
    pub fn change_state(&mut self, squad: &mut Squad, ctx: &mut SquadContext<'_>, next: S, reset: bool) {
        assert!(
            self.started,
            "state machine of {} changed state before start",
            squad.id()
        );
        let from = self.current.name();
        self.current.deactivate(squad, ctx);
        self.current = next;
        self.transitions += 1;
        self.current.activate(squad, ctx, reset);
        debug!(squad = %squad.id(), ?from, to = ?self.current.name(), reset, "squad state changed");
    }

    /// Tick the current state and apply the transition it requests, if any.
    /// Returns the (from, to) state names when a transition happened.
    pub fn tick(&mut self, squad: &mut Squad, ctx: &mut SquadContext<'_>) -> Option<(StateName, StateName)> {
        assert!(
            self.started,
            "state machine of {} ticked before start",
            squad.id()
        );
        let Transition { next, reset } = self.current.tick(squad, ctx)?;
        let from = self.current.name();
        self.change_state(squad, ctx, next, reset);
        Some((from, self.current.name()))
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    pub fn state_name(&self) -> StateName {
        self.current.name()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Transitions performed since start.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}
