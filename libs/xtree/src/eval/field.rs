//! # Field Evaluator
//!
//! Reference [`Evaluator`] over any [`ImplicitField`]. Interval bounds come
//! from the field's Lipschitz constant:
//!
//! ```text
//! f(box) ⊆ [f(c) - L·r, f(c) + L·r]    c = box center, r = half diagonal
//! ```
//!
//! ## Shapes
//!
//! A handful of exact distance fields are provided for building scenes:
//! [`Sphere`], [`HalfSpace`], and the CSG combinators [`Intersection`]
//! (max) and [`Union`] (min).

use log::warn;

use ::config::constants::SAMPLE_CAPACITY;

use crate::core::vec3::Vec3;
use crate::eval::{Derivative, Evaluator, Interval};

/// Step used by the default finite-difference gradient.
const GRADIENT_STEP: f64 = 1e-6;

// =============================================================================
// IMPLICIT FIELD
// =============================================================================

/// A scalar field `f: R³ → R`, negative inside the shape.
pub trait ImplicitField {
    /// Evaluates `f(p)`.
    fn value(&self, p: Vec3) -> f64;

    /// Evaluates `∇f(p)`; defaults to central differences.
    fn gradient(&self, p: Vec3) -> Vec3 {
        let h = GRADIENT_STEP;
        let dx = Vec3::new(h, 0.0, 0.0);
        let dy = Vec3::new(0.0, h, 0.0);
        let dz = Vec3::new(0.0, 0.0, h);
        Vec3::new(
            self.value(p + dx) - self.value(p - dx),
            self.value(p + dy) - self.value(p - dy),
            self.value(p + dz) - self.value(p - dz),
        ) / (2.0 * h)
    }

    /// Upper bound on `|∇f|`; exact distance fields return 1.
    fn lipschitz(&self) -> f64 {
        1.0
    }
}

/// Sphere distance field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center
    pub center: Vec3,
    /// Radius
    pub radius: f64,
}

impl Sphere {
    /// Creates a sphere.
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl ImplicitField for Sphere {
    fn value(&self, p: Vec3) -> f64 {
        (p - self.center).length() - self.radius
    }

    fn gradient(&self, p: Vec3) -> Vec3 {
        (p - self.center).normalize_or_zero()
    }
}

/// Half-space `normal · p <= offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfSpace {
    /// Unit outward normal
    pub normal: Vec3,
    /// Signed distance of the boundary plane from the origin
    pub offset: f64,
}

impl HalfSpace {
    /// Creates a half-space; `normal` is normalized.
    pub fn new(normal: Vec3, offset: f64) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            offset,
        }
    }
}

impl ImplicitField for HalfSpace {
    fn value(&self, p: Vec3) -> f64 {
        self.normal.dot(p) - self.offset
    }

    fn gradient(&self, _p: Vec3) -> Vec3 {
        self.normal
    }
}

/// CSG intersection: `max(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection<A, B> {
    /// First operand
    pub a: A,
    /// Second operand
    pub b: B,
}

impl<A, B> Intersection<A, B> {
    /// Intersects two fields.
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: ImplicitField, B: ImplicitField> ImplicitField for Intersection<A, B> {
    fn value(&self, p: Vec3) -> f64 {
        self.a.value(p).max(self.b.value(p))
    }

    fn gradient(&self, p: Vec3) -> Vec3 {
        if self.a.value(p) >= self.b.value(p) {
            self.a.gradient(p)
        } else {
            self.b.gradient(p)
        }
    }

    fn lipschitz(&self) -> f64 {
        self.a.lipschitz().max(self.b.lipschitz())
    }
}

/// CSG union: `min(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Union<A, B> {
    /// First operand
    pub a: A,
    /// Second operand
    pub b: B,
}

impl<A, B> Union<A, B> {
    /// Unites two fields.
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: ImplicitField, B: ImplicitField> ImplicitField for Union<A, B> {
    fn value(&self, p: Vec3) -> f64 {
        self.a.value(p).min(self.b.value(p))
    }

    fn gradient(&self, p: Vec3) -> Vec3 {
        if self.a.value(p) <= self.b.value(p) {
            self.a.gradient(p)
        } else {
            self.b.gradient(p)
        }
    }

    fn lipschitz(&self) -> f64 {
        self.a.lipschitz().max(self.b.lipschitz())
    }
}

// =============================================================================
// FIELD EVALUATOR
// =============================================================================

/// A region context: the box most recently bounded and its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    /// Lower corner of the bounded box
    pub lower: Vec3,
    /// Upper corner of the bounded box
    pub upper: Vec3,
    /// Bounds of the field over the box
    pub interval: Interval,
}

/// [`Evaluator`] backed by an [`ImplicitField`].
///
/// Cloning produces an independent evaluator with its own slots and
/// context stack, which is what parallel builds hand to each branch.
///
/// ## Example
///
/// ```rust
/// use xtree::eval::{Evaluator, FieldEvaluator, Sphere};
/// use xtree::core::vec3::Vec3;
///
/// let mut eval = FieldEvaluator::new(Sphere::new(Vec3::ZERO, 1.0));
/// eval.set(Vec3::new(2.0, 0.0, 0.0), 0);
/// let d = eval.derivs(1)[0];
/// assert_eq!(d.value, 1.0);
/// assert_eq!(d.gradient, Vec3::X);
/// ```
#[derive(Debug, Clone)]
pub struct FieldEvaluator<F> {
    field: F,
    slots: Vec<Vec3>,
    results: Vec<Derivative>,
    pending: Option<Context>,
    stack: Vec<Context>,
}

impl<F: ImplicitField> FieldEvaluator<F> {
    /// Creates an evaluator with the default slot capacity.
    pub fn new(field: F) -> Self {
        Self::with_capacity(field, SAMPLE_CAPACITY)
    }

    /// Creates an evaluator with `capacity` point slots.
    pub fn with_capacity(field: F, capacity: usize) -> Self {
        Self {
            field,
            slots: vec![Vec3::ZERO; capacity],
            results: vec![Derivative::default(); capacity],
            pending: None,
            stack: Vec::new(),
        }
    }

    /// The wrapped field.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Number of pushed contexts.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost pushed context, if any.
    pub fn context(&self) -> Option<&Context> {
        self.stack.last()
    }
}

impl<F: ImplicitField> Evaluator for FieldEvaluator<F> {
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn eval_interval(&mut self, lower: Vec3, upper: Vec3) -> Interval {
        let center = (lower + upper) * 0.5;
        let radius = (upper - lower).length() * 0.5;
        let value = self.field.value(center);
        let spread = self.field.lipschitz() * radius;
        let interval = Interval::new(value - spread, value + spread);
        self.pending = Some(Context {
            lower,
            upper,
            interval,
        });
        interval
    }

    fn push(&mut self) {
        let context = self.pending.take().unwrap_or(Context {
            lower: Vec3::splat(f64::NEG_INFINITY),
            upper: Vec3::splat(f64::INFINITY),
            interval: Interval::new(f64::NEG_INFINITY, f64::INFINITY),
        });
        self.stack.push(context);
    }

    fn pop(&mut self) {
        if self.stack.pop().is_none() {
            warn!("FieldEvaluator::pop with no pushed context");
        }
    }

    fn set(&mut self, position: Vec3, slot: usize) {
        match self.slots.get_mut(slot) {
            Some(s) => *s = position,
            None => warn!("slot {slot} exceeds capacity {}", self.slots.len()),
        }
    }

    fn derivs(&mut self, count: usize) -> &[Derivative] {
        let count = count.min(self.slots.len());
        for (out, &p) in self.results.iter_mut().zip(&self.slots).take(count) {
            *out = Derivative {
                value: self.field.value(p),
                gradient: self.field.gradient(p),
            };
        }
        &self.results[..count]
    }
}
