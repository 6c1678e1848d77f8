//! The immutable tape and its sweep drivers.
//!
//! A [`Tape`] is a finalized recording: the linear op stream plus the
//! ordered independent and dependent index sets. It is plain owned data —
//! sweeps are pure functions of the tape and their inputs, each allocating
//! its own scratch buffers, so a tape can be shared by reference across
//! threads.
//!
//! Submodules add one driver family each as `impl Tape` blocks.

mod decompose;
mod forward;
mod jacobian;
mod reverse;
mod value;

#[cfg(feature = "serde")]
mod serde_support;

use crate::error::Error;
use crate::float::Float;
use crate::op::Op;

/// A finalized recording with independent/dependent index sets.
///
/// Created by [`Context::finish`](crate::Context::finish); read-only from
/// then on.
#[derive(Clone, Debug, PartialEq)]
pub struct Tape<F: Float> {
    ops: Vec<Op<F>>,
    indeps: Vec<u32>,
    deps: Vec<u32>,
    /// Cached count of switching ops (`Abs`, `Min`, `Max`).
    num_switch: usize,
}

impl<F: Float> Tape<F> {
    /// Build a tape, validating the structural invariants.
    ///
    /// Returns a description of the first violated invariant instead of
    /// panicking, so deserialization can reject bad data gracefully.
    pub(crate) fn try_from_parts(
        ops: Vec<Op<F>>,
        indeps: Vec<u32>,
        deps: Vec<u32>,
    ) -> Result<Self, &'static str> {
        let mut num_indep_ops = 0usize;
        for (k, op) in ops.iter().enumerate() {
            if matches!(op, Op::Indep) {
                num_indep_ops += 1;
            }
            let (a, b) = op.args();
            for arg in a.into_iter().chain(b) {
                if (arg as usize) >= k {
                    return Err("operand index does not precede its op");
                }
            }
        }

        let mut seen = vec![false; ops.len()];
        for &i in &indeps {
            match ops.get(i as usize) {
                Some(Op::Indep) => {}
                _ => return Err("independent index does not refer to an Indep op"),
            }
            if seen[i as usize] {
                return Err("duplicate independent index");
            }
            seen[i as usize] = true;
        }
        if indeps.len() != num_indep_ops {
            return Err("unregistered Indep slot");
        }

        for &d in &deps {
            if (d as usize) >= ops.len() {
                return Err("dependent index out of range");
            }
        }

        let num_switch = ops.iter().filter(|op| op.is_switching()).count();
        Ok(Tape {
            ops,
            indeps,
            deps,
            num_switch,
        })
    }

    /// Build a tape from already-validated recorder output.
    pub(crate) fn from_parts(ops: Vec<Op<F>>, indeps: Vec<u32>, deps: Vec<u32>) -> Self {
        match Self::try_from_parts(ops, indeps, deps) {
            Ok(tape) => tape,
            Err(what) => panic!("invalid tape: {}", what),
        }
    }

    /// Number of independent variables `n`.
    pub fn num_indeps(&self) -> usize {
        self.indeps.len()
    }

    /// Number of dependent variables `m`.
    pub fn num_deps(&self) -> usize {
        self.deps.len()
    }

    /// Number of switching ops `s` (`Abs`, `Min`, `Max`).
    pub fn num_abs(&self) -> usize {
        self.num_switch
    }

    /// Number of tape slots (ops), including `Indep` and `Const` entries.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True for a tape with no ops at all.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The op stream; the op at position k defines the value at index k.
    pub fn ops(&self) -> &[Op<F>] {
        &self.ops
    }

    /// Independent slot indices, in allocation order.
    pub fn indeps(&self) -> &[u32] {
        &self.indeps
    }

    /// Dependent slot indices, in marking order.
    pub fn deps(&self) -> &[u32] {
        &self.deps
    }

    /// Shape precondition shared by every driver.
    pub(crate) fn check_shape(
        &self,
        what: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), Error> {
        if expected == found {
            Ok(())
        } else {
            Err(Error::Shape {
                what,
                expected,
                found,
            })
        }
    }

    /// Extract the entries of `buf` selected by `indices`.
    pub(crate) fn gather(buf: &[F], indices: &[u32]) -> Vec<F> {
        indices.iter().map(|&i| buf[i as usize]).collect()
    }
}
