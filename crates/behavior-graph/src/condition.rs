//! Scoring conditions.
//!
//! A [`Condition`] turns an agent snapshot into a score. Connections combine
//! the scores of their conditions to decide which transition wins. New
//! condition kinds plug in by implementing the trait; neither connections nor
//! nodes need to know about them.

use crate::{NodeId, Outcome, RandomSource};

/// Read-only view of the evaluating agent, plus its random source.
///
/// Conditions must not change the host or the agent. The random source is the
/// only thing they may advance.
pub struct Evaluation<'a, C> {
    host: &'a C,
    current: Option<NodeId>,
    outcome: Outcome,
    ticks_in_state: u32,
    rng: &'a mut dyn RandomSource,
}

impl<'a, C> Evaluation<'a, C> {
    /// Builds an evaluation over an explicit snapshot.
    pub fn new(
        host: &'a C,
        current: Option<NodeId>,
        outcome: Outcome,
        ticks_in_state: u32,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            host,
            current,
            outcome,
            ticks_in_state,
            rng,
        }
    }

    /// The host context (game services, blackboard).
    pub fn host(&self) -> &C {
        self.host
    }

    /// The node the agent is currently in.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Outcome of the most recently ended state.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Ticks spent in the current node.
    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    /// The agent's random source.
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng
    }
}

/// A scoring predicate evaluated against an agent.
pub trait Condition<C>: Send + Sync {
    /// Score the agent. Higher means the transition is more desirable.
    fn evaluate(&self, eval: &mut Evaluation<'_, C>) -> f32;
}

/// Samples a score uniformly from `[min, max)` on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomRange {
    pub min: f32,
    pub max: f32,
}

impl RandomRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

impl<C> Condition<C> for RandomRange {
    fn evaluate(&self, eval: &mut Evaluation<'_, C>) -> f32 {
        eval.rng().range_f32(self.min, self.max)
    }
}

/// Scores `value` unless the last state failed, in which case it scores 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessCheck {
    pub value: f32,
}

impl SuccessCheck {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl<C> Condition<C> for SuccessCheck {
    fn evaluate(&self, eval: &mut Evaluation<'_, C>) -> f32 {
        if eval.outcome().is_failure() {
            0.0
        } else {
            self.value
        }
    }
}

/// Always scores the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f32);

impl<C> Condition<C> for Constant {
    fn evaluate(&self, _eval: &mut Evaluation<'_, C>) -> f32 {
        self.0
    }
}

/// Adapts a closure into a condition.
pub struct FnCondition<F> {
    score: F,
}

impl<F> FnCondition<F> {
    /// Wraps `score`. The bound pins the closure's return type to `f32`, so
    /// bare float literals in its body need no suffix.
    pub fn new<C>(score: F) -> Self
    where
        F: Fn(&mut Evaluation<'_, C>) -> f32,
    {
        Self { score }
    }
}

impl<C, F> Condition<C> for FnCondition<F>
where
    F: Fn(&mut Evaluation<'_, C>) -> f32 + Send + Sync,
{
    fn evaluate(&self, eval: &mut Evaluation<'_, C>) -> f32 {
        (self.score)(eval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pcg32;

    fn score<K: Condition<()>>(condition: &K, outcome: Outcome) -> f32 {
        let mut rng = Pcg32::new(3);
        let mut eval = Evaluation::new(&(), None, outcome, 0, &mut rng);
        condition.evaluate(&mut eval)
    }

    #[test]
    fn success_check_zero_on_failure() {
        let check = SuccessCheck::new(2.5);
        assert_eq!(score(&check, Outcome::Succeeded), 2.5);
        assert_eq!(score(&check, Outcome::Failed), 0.0);
    }

    #[test]
    fn random_range_within_bounds() {
        let random = RandomRange::new(0.5, 1.5);
        let mut rng = Pcg32::new(11);
        for _ in 0..200 {
            let mut eval = Evaluation::new(&(), None, Outcome::Succeeded, 0, &mut rng);
            let v = Condition::<()>::evaluate(&random, &mut eval);
            assert!((0.5..1.5).contains(&v));
        }
    }

    #[test]
    fn closures_read_the_host() {
        let host = 4_i32;
        let doubled =
            FnCondition::new(|eval: &mut Evaluation<'_, i32>| *eval.host() as f32 * 2.0);
        let mut rng = Pcg32::new(0);
        let mut eval = Evaluation::new(&host, None, Outcome::Succeeded, 0, &mut rng);
        assert_eq!(doubled.evaluate(&mut eval), 8.0);
    }

    #[test]
    fn closure_literals_score_as_f32() {
        let positive: Box<dyn Condition<i32>> =
            Box::new(FnCondition::new(|eval: &mut Evaluation<'_, i32>| {
                if *eval.host() > 0 { 1.0 } else { 0.0 }
            }));
        let mut rng = Pcg32::new(0);

        let mut eval = Evaluation::new(&5, None, Outcome::Succeeded, 0, &mut rng);
        assert_eq!(positive.evaluate(&mut eval), 1.0);
        let mut eval = Evaluation::new(&-5, None, Outcome::Succeeded, 0, &mut rng);
        assert_eq!(positive.evaluate(&mut eval), 0.0);
    }
}
