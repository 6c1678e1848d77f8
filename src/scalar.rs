//! The wrapper scalar: a value-like handle whose arithmetic records onto
//! its originating context.
//!
//! A [`Var`] is either a node of an active recording (context handle plus
//! slot index) or a context-less constant leaf. Mixing a constant with a
//! node materializes the constant as a `Const` op in the node's context;
//! constant-only arithmetic folds eagerly and records nothing. Cloning a
//! `Var` aliases the same tape slot — no identity op is recorded.

use std::cell::RefCell;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

use crate::context::Recording;
use crate::float::Float;
use crate::op::Op;

/// A recorded scalar, or a constant leaf awaiting a context.
#[derive(Clone, Debug)]
pub struct Var<F: Float> {
    repr: Repr<F>,
}

#[derive(Clone, Debug)]
enum Repr<F: Float> {
    Node {
        rec: Rc<RefCell<Recording<F>>>,
        index: u32,
    },
    Const(F),
}

impl<F: Float> Var<F> {
    pub(crate) fn from_node(rec: Rc<RefCell<Recording<F>>>, index: u32) -> Self {
        Var {
            repr: Repr::Node { rec, index },
        }
    }

    /// A context-less constant leaf.
    pub fn constant(c: F) -> Self {
        Var {
            repr: Repr::Const(c),
        }
    }

    /// Slot index of this wrapper, or `None` for a constant leaf.
    pub fn index(&self) -> Option<u32> {
        match self.repr {
            Repr::Node { index, .. } => Some(index),
            Repr::Const(_) => None,
        }
    }

    /// Constant value of this wrapper, or `None` for a recorded node.
    pub fn constant_value(&self) -> Option<F> {
        match self.repr {
            Repr::Const(c) => Some(c),
            Repr::Node { .. } => None,
        }
    }

    fn recording(&self) -> Option<&Rc<RefCell<Recording<F>>>> {
        match &self.repr {
            Repr::Node { rec, .. } => Some(rec),
            Repr::Const(_) => None,
        }
    }

    /// Slot index in `rec`, materializing a constant leaf as a `Const` op.
    ///
    /// Panics if this wrapper is a node of a different context.
    pub(crate) fn materialize(&self, rec: &Rc<RefCell<Recording<F>>>) -> u32 {
        match &self.repr {
            Repr::Node { rec: own, index } => {
                assert!(
                    Rc::ptr_eq(own, rec),
                    "cannot mix Vars from different contexts"
                );
                *index
            }
            Repr::Const(c) => rec.borrow_mut().push(Op::Const(*c)),
        }
    }

    fn unary_with(&self, fold: impl FnOnce(F) -> F, build: impl FnOnce(u32) -> Op<F>) -> Var<F> {
        match &self.repr {
            Repr::Const(c) => Var::constant(fold(*c)),
            Repr::Node { rec, index } => {
                let result = rec.borrow_mut().push(build(*index));
                Var::from_node(Rc::clone(rec), result)
            }
        }
    }

    fn binary_with(
        &self,
        rhs: &Var<F>,
        fold: impl FnOnce(F, F) -> F,
        build: impl FnOnce(u32, u32) -> Op<F>,
    ) -> Var<F> {
        match (&self.repr, &rhs.repr) {
            (Repr::Const(a), Repr::Const(b)) => Var::constant(fold(*a, *b)),
            _ => {
                let rec = self
                    .recording()
                    .or_else(|| rhs.recording())
                    .expect("at least one operand is a node");
                let rec = Rc::clone(rec);
                let i = self.materialize(&rec);
                let j = rhs.materialize(&rec);
                let result = rec.borrow_mut().push(build(i, j));
                Var::from_node(rec, result)
            }
        }
    }

    // ── Elementary functions ──

    pub fn sin(&self) -> Var<F> {
        self.unary_with(|a| a.sin(), Op::Sin)
    }

    pub fn cos(&self) -> Var<F> {
        self.unary_with(|a| a.cos(), Op::Cos)
    }

    pub fn tan(&self) -> Var<F> {
        self.unary_with(|a| a.tan(), Op::Tan)
    }

    pub fn exp(&self) -> Var<F> {
        self.unary_with(|a| a.exp(), Op::Exp)
    }

    pub fn ln(&self) -> Var<F> {
        self.unary_with(|a| a.ln(), Op::Ln)
    }

    pub fn sqrt(&self) -> Var<F> {
        self.unary_with(|a| a.sqrt(), Op::Sqrt)
    }

    pub fn asin(&self) -> Var<F> {
        self.unary_with(|a| a.asin(), Op::Asin)
    }

    pub fn acos(&self) -> Var<F> {
        self.unary_with(|a| a.acos(), Op::Acos)
    }

    pub fn atan(&self) -> Var<F> {
        self.unary_with(|a| a.atan(), Op::Atan)
    }

    /// Absolute value — the switching primitive.
    pub fn abs(&self) -> Var<F> {
        self.unary_with(|a| a.abs(), Op::Abs)
    }

    /// `self` raised to the power `e`.
    pub fn powf(&self, e: impl Into<Var<F>>) -> Var<F> {
        let e = e.into();
        self.binary_with(&e, |a, b| a.powf(b), Op::Powf)
    }

    /// Minimum of `self` and `other`. A tie selects `self`.
    pub fn min(&self, other: impl Into<Var<F>>) -> Var<F> {
        let other = other.into();
        self.binary_with(&other, |a, b| if a <= b { a } else { b }, Op::Min)
    }

    /// Maximum of `self` and `other`. A tie selects `other`.
    pub fn max(&self, other: impl Into<Var<F>>) -> Var<F> {
        let other = other.into();
        self.binary_with(&other, |a, b| if a > b { a } else { b }, Op::Max)
    }
}

impl<F: Float> From<F> for Var<F> {
    fn from(c: F) -> Self {
        Var::constant(c)
    }
}

impl<F: Float> From<&Var<F>> for Var<F> {
    fn from(v: &Var<F>) -> Self {
        v.clone()
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $variant:ident, $fold:expr) => {
        impl<F: Float> $trait for &Var<F> {
            type Output = Var<F>;
            fn $method(self, rhs: &Var<F>) -> Var<F> {
                self.binary_with(rhs, $fold, Op::$variant)
            }
        }

        impl<F: Float> $trait for Var<F> {
            type Output = Var<F>;
            fn $method(self, rhs: Var<F>) -> Var<F> {
                (&self).$method(&rhs)
            }
        }

        impl<F: Float> $trait<&Var<F>> for Var<F> {
            type Output = Var<F>;
            fn $method(self, rhs: &Var<F>) -> Var<F> {
                (&self).$method(rhs)
            }
        }

        impl<F: Float> $trait<Var<F>> for &Var<F> {
            type Output = Var<F>;
            fn $method(self, rhs: Var<F>) -> Var<F> {
                self.$method(&rhs)
            }
        }

        impl<F: Float> $trait<F> for Var<F> {
            type Output = Var<F>;
            fn $method(self, rhs: F) -> Var<F> {
                (&self).$method(&Var::constant(rhs))
            }
        }

        impl<F: Float> $trait<F> for &Var<F> {
            type Output = Var<F>;
            fn $method(self, rhs: F) -> Var<F> {
                self.$method(&Var::constant(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add, Add, |a, b| a + b);
impl_binary_op!(Sub, sub, Sub, |a, b| a - b);
impl_binary_op!(Mul, mul, Mul, |a, b| a * b);
impl_binary_op!(Div, div, Div, |a, b| a / b);

/// `float ⊕ Var` with the float on the left. Orphan rules require concrete
/// float types here.
macro_rules! impl_scalar_lhs {
    ($f:ty) => {
        impl Add<Var<$f>> for $f {
            type Output = Var<$f>;
            fn add(self, rhs: Var<$f>) -> Var<$f> {
                &Var::constant(self) + &rhs
            }
        }
        impl<'a> Add<&'a Var<$f>> for $f {
            type Output = Var<$f>;
            fn add(self, rhs: &Var<$f>) -> Var<$f> {
                &Var::constant(self) + rhs
            }
        }
        impl Sub<Var<$f>> for $f {
            type Output = Var<$f>;
            fn sub(self, rhs: Var<$f>) -> Var<$f> {
                &Var::constant(self) - &rhs
            }
        }
        impl<'a> Sub<&'a Var<$f>> for $f {
            type Output = Var<$f>;
            fn sub(self, rhs: &Var<$f>) -> Var<$f> {
                &Var::constant(self) - rhs
            }
        }
        impl Mul<Var<$f>> for $f {
            type Output = Var<$f>;
            fn mul(self, rhs: Var<$f>) -> Var<$f> {
                &Var::constant(self) * &rhs
            }
        }
        impl<'a> Mul<&'a Var<$f>> for $f {
            type Output = Var<$f>;
            fn mul(self, rhs: &Var<$f>) -> Var<$f> {
                &Var::constant(self) * rhs
            }
        }
        impl Div<Var<$f>> for $f {
            type Output = Var<$f>;
            fn div(self, rhs: Var<$f>) -> Var<$f> {
                &Var::constant(self) / &rhs
            }
        }
        impl<'a> Div<&'a Var<$f>> for $f {
            type Output = Var<$f>;
            fn div(self, rhs: &Var<$f>) -> Var<$f> {
                &Var::constant(self) / rhs
            }
        }
    };
}

impl_scalar_lhs!(f32);
impl_scalar_lhs!(f64);

impl<F: Float> Neg for &Var<F> {
    type Output = Var<F>;
    fn neg(self) -> Var<F> {
        self.unary_with(|a| -a, Op::Neg)
    }
}

impl<F: Float> Neg for Var<F> {
    type Output = Var<F>;
    fn neg(self) -> Var<F> {
        -&self
    }
}
