//! Builder utilities for ergonomic graph authoring.
//!
//! [`Graph::connect`] takes boxed conditions; these helpers keep authoring
//! code short: `vec![random(0.0, 1.0), success_check(2.0)]` instead of
//! spelling out `Box::new(RandomRange::new(..))` for every entry.

use crate::{Condition, Constant, Evaluation, FnCondition, RandomRange, SuccessCheck};

/// Creates a random-range condition.
///
/// Shorthand for `Box::new(RandomRange::new(min, max))`.
#[inline]
pub fn random<C: 'static>(min: f32, max: f32) -> Box<dyn Condition<C>> {
    Box::new(RandomRange::new(min, max))
}

/// Creates a success-check condition.
///
/// Shorthand for `Box::new(SuccessCheck::new(value))`.
#[inline]
pub fn success_check<C: 'static>(value: f32) -> Box<dyn Condition<C>> {
    Box::new(SuccessCheck::new(value))
}

/// Creates a constant condition.
///
/// Shorthand for `Box::new(Constant(value))`.
#[inline]
pub fn constant<C: 'static>(value: f32) -> Box<dyn Condition<C>> {
    Box::new(Constant(value))
}

/// Creates a condition from a closure.
///
/// Shorthand for `Box::new(FnCondition::new(score))`.
#[inline]
pub fn condition_fn<C, F>(score: F) -> Box<dyn Condition<C>>
where
    C: 'static,
    F: Fn(&mut Evaluation<'_, C>) -> f32 + Send + Sync + 'static,
{
    Box::new(FnCondition::new(score))
}
