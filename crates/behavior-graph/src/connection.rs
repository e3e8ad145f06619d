//! Scored transitions between nodes.

use std::fmt;

use crate::{Condition, Evaluation, NodeId};

/// How a connection folds the scores of its conditions into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Combine {
    /// Arithmetic total.
    #[default]
    Sum,
    /// Arithmetic product.
    Product,
    /// Largest score.
    Max,
    /// Smallest score.
    Min,
}

impl Combine {
    /// Starting value of the fold.
    #[inline]
    pub fn identity(self) -> f32 {
        match self {
            Combine::Sum => 0.0,
            Combine::Product => 1.0,
            Combine::Max => f32::NEG_INFINITY,
            Combine::Min => f32::INFINITY,
        }
    }

    /// Folds one more score into the accumulator.
    #[inline]
    pub fn fold(self, acc: f32, score: f32) -> f32 {
        match self {
            Combine::Sum => acc + score,
            Combine::Product => acc * score,
            Combine::Max => acc.max(score),
            Combine::Min => acc.min(score),
        }
    }
}

/// A weighted edge from its owning node to `target`.
///
/// A connection with no conditions is unconditional and scores 1.
pub struct Connection<C> {
    target: NodeId,
    combine: Combine,
    conditions: Vec<Box<dyn Condition<C>>>,
}

impl<C> Connection<C> {
    /// Creates an unconditional connection.
    pub fn new(target: NodeId, combine: Combine) -> Self {
        Self {
            target,
            combine,
            conditions: Vec::new(),
        }
    }

    /// Creates a connection scored by `conditions`.
    pub fn with_conditions(
        target: NodeId,
        combine: Combine,
        conditions: Vec<Box<dyn Condition<C>>>,
    ) -> Self {
        Self {
            target,
            combine,
            conditions,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn combine(&self) -> Combine {
        self.combine
    }

    pub fn set_combine(&mut self, combine: Combine) {
        self.combine = combine;
    }

    pub fn conditions(&self) -> &[Box<dyn Condition<C>>] {
        &self.conditions
    }

    pub fn push_condition(&mut self, condition: Box<dyn Condition<C>>) {
        self.conditions.push(condition);
    }

    /// Removes the condition at `index`, if present.
    pub fn remove_condition(&mut self, index: usize) -> Option<Box<dyn Condition<C>>> {
        (index < self.conditions.len()).then(|| self.conditions.remove(index))
    }

    pub fn clear_conditions(&mut self) {
        self.conditions.clear();
    }

    /// Scores this connection for the evaluating agent.
    pub fn evaluate(&self, eval: &mut Evaluation<'_, C>) -> f32 {
        if self.conditions.is_empty() {
            return 1.0;
        }
        self.conditions
            .iter()
            .fold(self.combine.identity(), |acc, condition| {
                self.combine.fold(acc, condition.evaluate(eval))
            })
    }
}

impl<C> fmt::Debug for Connection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("target", &self.target)
            .field("combine", &self.combine)
            .field("conditions", &self.conditions.len())
            .finish()
    }
}
