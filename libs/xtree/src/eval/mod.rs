//! # Evaluator Contract
//!
//! The tree never looks inside the implicit function. It talks to an
//! [`Evaluator`] that offers:
//!
//! - interval bounds over a 3D box (for pruning),
//! - a stack of "zoomed in" contexts narrowed to the current region,
//! - a batch of point slots evaluated together with their gradients.
//!
//! Contexts are entered through [`Evaluator::scope`], whose guard pops the
//! context when dropped, so no exit path can leak evaluator state.

use std::ops::{Deref, DerefMut};

use crate::core::vec3::Vec3;

pub mod field;

pub use field::{FieldEvaluator, HalfSpace, ImplicitField, Intersection, Sphere, Union};

// =============================================================================
// INTERVALS
// =============================================================================

/// Sign classification of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    /// Entirely outside the surface (`f > 0` everywhere).
    Empty,
    /// Entirely inside the surface (`f < 0` everywhere).
    Filled,
    /// The surface may cross the region.
    Ambiguous,
}

/// Conservative bounds `[lower, upper]` of a function over a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl Interval {
    /// Creates an interval; the bounds are swapped if given out of order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Classifies the interval by sign.
    ///
    /// # Examples
    /// ```
    /// use xtree::eval::{Fill, Interval};
    /// assert_eq!(Interval::new(-2.0, -1.0).state(), Fill::Filled);
    /// assert_eq!(Interval::new(0.5, 1.0).state(), Fill::Empty);
    /// assert_eq!(Interval::new(-1.0, 1.0).state(), Fill::Ambiguous);
    /// ```
    pub fn state(&self) -> Fill {
        if self.upper < 0.0 {
            Fill::Filled
        } else if self.lower > 0.0 {
            Fill::Empty
        } else {
            Fill::Ambiguous
        }
    }

    /// True if `value` lies within the bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Function value and gradient at one sample position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Derivative {
    /// `f(p)`
    pub value: f64,
    /// `∇f(p)`
    pub gradient: Vec3,
}

// =============================================================================
// EVALUATOR TRAIT
// =============================================================================

/// Batched implicit-function sampler with an interval-narrowing context stack.
///
/// Positions are always in 3-space, whatever the tree dimension.
pub trait Evaluator {
    /// Number of point slots available to [`Evaluator::set`].
    fn capacity(&self) -> usize;

    /// Bounds the function over the box `[lower, upper]`.
    ///
    /// The result also becomes the candidate context for the next
    /// [`Evaluator::push`].
    fn eval_interval(&mut self, lower: Vec3, upper: Vec3) -> Interval;

    /// Narrows evaluation to the most recently evaluated interval region.
    ///
    /// Prefer [`Evaluator::scope`], which pairs this with [`Evaluator::pop`].
    fn push(&mut self);

    /// Restores the context that was active before the matching push.
    fn pop(&mut self);

    /// Stages `position` into slot `slot`.
    fn set(&mut self, position: Vec3, slot: usize);

    /// Evaluates slots `0..count`, returning values and gradients in slot order.
    fn derivs(&mut self, count: usize) -> &[Derivative];

    /// Pushes a context and returns a guard that pops it when dropped.
    fn scope(&mut self) -> EvalScope<'_, Self>
    where
        Self: Sized,
    {
        self.push();
        EvalScope { eval: self }
    }
}

/// Scoped evaluator context; derefs to the evaluator and pops on drop.
///
/// ## Example
///
/// ```rust
/// use xtree::eval::{Evaluator, FieldEvaluator, Sphere};
/// use xtree::core::vec3::Vec3;
///
/// let mut eval = FieldEvaluator::new(Sphere::new(Vec3::ZERO, 0.5));
/// eval.eval_interval(Vec3::splat(-1.0), Vec3::splat(1.0));
/// {
///     let scope = eval.scope();
///     assert_eq!(scope.depth(), 1);
/// }
/// assert_eq!(eval.depth(), 0);
/// ```
#[derive(Debug)]
pub struct EvalScope<'a, E: Evaluator> {
    eval: &'a mut E,
}

impl<E: Evaluator> Deref for EvalScope<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.eval
    }
}

impl<E: Evaluator> DerefMut for EvalScope<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.eval
    }
}

impl<E: Evaluator> Drop for EvalScope<'_, E> {
    fn drop(&mut self) {
        self.eval.pop();
    }
}
