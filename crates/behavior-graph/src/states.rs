//! Built-in states.
//!
//! Small reusable behaviours that need nothing from the host: [`Idle`]
//! (waits for an external end), [`Instant`] (ends on entry), [`Wait`] (ends
//! after a number of ticks) and [`FnState`] (closure on entry).

use crate::{Outcome, State, StateContext};

/// Does nothing and never ends on its own.
///
/// Useful for nodes finished from outside through
/// [`Agent::end`](crate::Agent::end), and for the any node.
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl<C> State<C> for Idle {}

/// Ends immediately on entry with a fixed outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct Instant(pub Outcome);

impl<C> State<C> for Instant {
    fn on_begin(&self, ctx: &mut StateContext<'_, C>) {
        ctx.end(self.0);
    }
}

/// Ends after the agent has spent `ticks` ticks in the node.
///
/// A zero-tick wait ends on entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wait {
    pub ticks: u32,
    pub outcome: Outcome,
}

impl Wait {
    pub fn new(ticks: u32) -> Self {
        Self {
            ticks,
            outcome: Outcome::Succeeded,
        }
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }
}

impl<C> State<C> for Wait {
    fn on_begin(&self, ctx: &mut StateContext<'_, C>) {
        if self.ticks == 0 {
            ctx.end(self.outcome);
        }
    }

    fn on_tick(&self, ctx: &mut StateContext<'_, C>) {
        if ctx.ticks_in_state() >= self.ticks {
            ctx.end(self.outcome);
        }
    }
}

/// Runs a closure on entry.
///
/// The closure decides whether to end the state through the context.
pub struct FnState<F> {
    begin: F,
}

impl<F> FnState<F> {
    pub fn new(begin: F) -> Self {
        Self { begin }
    }
}

impl<C, F> State<C> for FnState<F>
where
    F: Fn(&mut StateContext<'_, C>) + Send + Sync,
{
    fn on_begin(&self, ctx: &mut StateContext<'_, C>) {
        (self.begin)(ctx);
    }
}
