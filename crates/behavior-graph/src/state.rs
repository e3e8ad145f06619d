//! State behaviour trait.
//!
//! This module defines the [`State`] trait, the seam where gameplay plugs into
//! the graph. Every node owns one state object; the agent calls its lifecycle
//! hooks as it enters, leaves, pauses and resumes the node. The trait is
//! generic over a host context type `C` carrying the game services a state
//! needs (movement, animation, timers).

use crate::{NodeId, Outcome};

/// Lifecycle hooks for one behaviour state. Every hook defaults to a no-op.
///
/// A graph is shared between agents, so hooks take `&self`; anything that
/// varies per agent belongs in the host context.
pub trait State<C>: Send + Sync {
    /// Called when the agent enters the node, and again on every loop
    /// iteration of a [`RepeatMode::Loop`](crate::RepeatMode::Loop) node.
    fn on_begin(&self, _ctx: &mut StateContext<'_, C>) {}

    /// Called once each time the state is marked as ended.
    fn on_end(&self, _ctx: &mut StateContext<'_, C>) {}

    /// Called when the agent is paused while in this node.
    fn on_pause(&self, _ctx: &mut StateContext<'_, C>) {}

    /// Called when the agent resumes while in this node.
    fn on_resume(&self, _ctx: &mut StateContext<'_, C>) {}

    /// Called on every tick while the node is current, running and not yet
    /// ended.
    fn on_tick(&self, _ctx: &mut StateContext<'_, C>) {}
}

/// Blanket implementation for boxed states, enabling heterogeneous node sets.
impl<C> State<C> for Box<dyn State<C>> {
    #[inline]
    fn on_begin(&self, ctx: &mut StateContext<'_, C>) {
        (**self).on_begin(ctx);
    }

    #[inline]
    fn on_end(&self, ctx: &mut StateContext<'_, C>) {
        (**self).on_end(ctx);
    }

    #[inline]
    fn on_pause(&self, ctx: &mut StateContext<'_, C>) {
        (**self).on_pause(ctx);
    }

    #[inline]
    fn on_resume(&self, ctx: &mut StateContext<'_, C>) {
        (**self).on_resume(ctx);
    }

    #[inline]
    fn on_tick(&self, ctx: &mut StateContext<'_, C>) {
        (**self).on_tick(ctx);
    }
}

/// Context handed to state hooks.
///
/// Gives the hook mutable access to the host and lets it finish its own
/// state with [`end`](Self::end). An end requested inside a hook is applied
/// by the agent as soon as the hook returns.
pub struct StateContext<'a, C> {
    host: &'a mut C,
    node: NodeId,
    outcome: Outcome,
    ticks_in_state: u32,
    pending_end: Option<Outcome>,
}

impl<'a, C> StateContext<'a, C> {
    pub(crate) fn new(
        host: &'a mut C,
        node: NodeId,
        outcome: Outcome,
        ticks_in_state: u32,
    ) -> Self {
        Self {
            host,
            node,
            outcome,
            ticks_in_state,
            pending_end: None,
        }
    }

    pub fn host(&self) -> &C {
        self.host
    }

    pub fn host_mut(&mut self) -> &mut C {
        self.host
    }

    /// The node whose hook is running.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Outcome of the most recently ended state.
    pub fn last_outcome(&self) -> Outcome {
        self.outcome
    }

    /// Ticks the agent has spent in this node, counting the current one.
    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    /// Marks this state as finished with `outcome`.
    pub fn end(&mut self, outcome: Outcome) {
        self.pending_end = Some(outcome);
    }

    pub(crate) fn take_end(&mut self) -> Option<Outcome> {
        self.pending_end.take()
    }
}
