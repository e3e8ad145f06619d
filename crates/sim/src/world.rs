//! Host context for simulated villagers and the kinds it registers.

use behavior_content::{LoadResult, Params, Registry};
use behavior_graph::{Condition, Evaluation, FnCondition, Outcome, State, StateContext};

/// Shared village state every agent reads and writes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct World {
    /// Current simulation tick.
    pub tick: u64,
    /// Index of the agent being ticked.
    pub agent: u32,
    /// Food in the village store.
    pub stock: u32,
}

/// Adds `amount` to the store on every tick; ends after `ticks` ticks.
#[derive(Debug, Clone, Copy)]
pub struct Gather {
    pub ticks: u32,
    pub amount: u32,
}

impl State<World> for Gather {
    fn on_begin(&self, ctx: &mut StateContext<'_, World>) {
        if self.ticks == 0 {
            ctx.end(Outcome::Succeeded);
        }
    }

    fn on_tick(&self, ctx: &mut StateContext<'_, World>) {
        let world = ctx.host_mut();
        world.stock = world.stock.saturating_add(self.amount);
        if ctx.ticks_in_state() >= self.ticks {
            ctx.end(Outcome::Succeeded);
        }
    }
}

/// Takes `amount` from the store on entry; fails when there is not enough.
#[derive(Debug, Clone, Copy)]
pub struct Eat {
    pub amount: u32,
}

impl State<World> for Eat {
    fn on_begin(&self, ctx: &mut StateContext<'_, World>) {
        let world = ctx.host_mut();
        let left = world.stock.checked_sub(self.amount);
        if let Some(left) = left {
            world.stock = left;
        }
        ctx.end(Outcome::from(left.is_some()));
    }
}

/// Registry with the built-in kinds plus the village kinds:
///
/// - state `gather { ticks, amount }`
/// - state `eat { amount }`
/// - condition `period { ticks }`: 1 on every `ticks`-th tick, else 0
/// - condition `stock_below { amount }`: 1 while the store holds less than `amount`
pub fn registry() -> Registry<World> {
    let mut registry = Registry::with_builtins();
    registry
        .register_state("gather", |params| {
            Ok(Box::new(Gather {
                ticks: required_count(params, "ticks")?,
                amount: params.count("amount")?.unwrap_or(1),
            }) as Box<dyn State<World>>)
        })
        .register_state("eat", |params| {
            Ok(Box::new(Eat {
                amount: params.count("amount")?.unwrap_or(1),
            }) as Box<dyn State<World>>)
        })
        .register_condition("period", |params| {
            let period = u64::from(required_count(params, "ticks")?.max(1));
            Ok(Box::new(FnCondition::new(move |eval: &mut Evaluation<'_, World>| {
                if eval.host().tick % period == 0 { 1.0 } else { 0.0 }
            })) as Box<dyn Condition<World>>)
        })
        .register_condition("stock_below", |params| {
            let amount = required_count(params, "amount")?;
            Ok(Box::new(FnCondition::new(move |eval: &mut Evaluation<'_, World>| {
                if eval.host().stock < amount { 1.0 } else { 0.0 }
            })) as Box<dyn Condition<World>>)
        });
    registry
}

fn required_count(params: &Params, key: &str) -> LoadResult<u32> {
    params
        .count(key)?
        .ok_or_else(|| anyhow::anyhow!("missing parameter '{}'", key))
}
