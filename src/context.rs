//! The recording context: a mutable builder that assigns variable indices
//! and appends ops.
//!
//! A [`Context`] hands out [`Var`]s whose arithmetic records onto the
//! shared op stream. Recording is purely structural — no values are
//! evaluated until a sweep runs — so the finished [`Tape`] can be driven at
//! any input point. `finish` consumes the context; wrappers that survive it
//! hold an inert recording and panic if they try to record further.

use std::cell::RefCell;
use std::rc::Rc;

use crate::float::Float;
use crate::op::Op;
use crate::scalar::Var;
use crate::tape::Tape;

/// Mutable recording state shared between a [`Context`] and its [`Var`]s.
#[derive(Debug)]
pub(crate) struct Recording<F: Float> {
    pub(crate) ops: Vec<Op<F>>,
    pub(crate) indeps: Vec<u32>,
    pub(crate) deps: Vec<u32>,
    pub(crate) finished: bool,
}

impl<F: Float> Recording<F> {
    /// Append `op`, returning the slot index it defines.
    ///
    /// Panics on a finished recording or an out-of-range operand index —
    /// both are programmer errors.
    pub(crate) fn push(&mut self, op: Op<F>) -> u32 {
        assert!(!self.finished, "recording through a finished context");
        let next = self.ops.len();
        assert!(next < u32::MAX as usize, "tape is full");
        let (a, b) = op.args();
        for arg in a.into_iter().chain(b) {
            assert!(
                (arg as usize) < next,
                "operand index {} out of range for op at slot {}",
                arg,
                next
            );
        }
        self.ops.push(op);
        next as u32
    }

    /// Mark a slot as dependent. A second marking of the same slot is a
    /// no-op.
    pub(crate) fn mark_dependent(&mut self, index: u32) {
        assert!(!self.finished, "recording through a finished context");
        assert!(
            (index as usize) < self.ops.len(),
            "dependent index {} was never defined",
            index
        );
        if !self.deps.contains(&index) {
            self.deps.push(index);
        }
    }
}

/// Records a function evaluation as a linear op stream.
///
/// Draw inputs with [`new_independent`](Self::new_independent), compute
/// with the returned [`Var`]s, mark outputs with
/// [`set_dependent`](Self::set_dependent), then consume the context with
/// [`finish`](Self::finish) to obtain an immutable [`Tape`].
///
/// ```
/// use abstape::Context;
///
/// let mut ctx = Context::<f64>::new();
/// let x = ctx.new_independent();
/// let y = x.sin() + 2.0;
/// ctx.set_dependent(&y);
/// let tape = ctx.finish();
/// assert_eq!(tape.num_indeps(), 1);
/// assert_eq!(tape.num_deps(), 1);
/// ```
pub struct Context<F: Float> {
    inner: Rc<RefCell<Recording<F>>>,
}

impl<F: Float> Context<F> {
    /// Create an empty recording context.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a context with pre-allocated op-stream capacity.
    pub fn with_capacity(est_ops: usize) -> Self {
        Context {
            inner: Rc::new(RefCell::new(Recording {
                ops: Vec::with_capacity(est_ops),
                indeps: Vec::new(),
                deps: Vec::new(),
                finished: false,
            })),
        }
    }

    /// Draw a fresh independent variable.
    ///
    /// Appends an `Indep` op at a new slot and registers the slot in the
    /// independents list; the variable's value is supplied per driver call.
    pub fn new_independent(&mut self) -> Var<F> {
        let index = {
            let mut rec = self.inner.borrow_mut();
            let index = rec.push(Op::Indep);
            rec.indeps.push(index);
            index
        };
        Var::from_node(Rc::clone(&self.inner), index)
    }

    /// Draw `n` fresh independent variables.
    pub fn new_independent_vec(&mut self, n: usize) -> Vec<Var<F>> {
        (0..n).map(|_| self.new_independent()).collect()
    }

    /// Record a raw op, returning the slot index it defines.
    ///
    /// This is the surface the wrapper facade records through; operand
    /// indices must already exist on the stream.
    pub fn record(&mut self, op: Op<F>) -> u32 {
        self.inner.borrow_mut().push(op)
    }

    /// Mark a slot as dependent by index. Duplicate markings are ignored.
    pub fn mark_dependent(&mut self, index: u32) {
        self.inner.borrow_mut().mark_dependent(index);
    }

    /// Mark a wrapper's slot as dependent.
    ///
    /// A context-less constant is first materialized as a `Const` op.
    pub fn set_dependent(&mut self, x: &Var<F>) {
        let index = x.materialize(&self.inner);
        self.inner.borrow_mut().mark_dependent(index);
    }

    /// Consume the context, producing the immutable [`Tape`].
    ///
    /// Wrappers that outlive the context keep a handle to the now-inert
    /// recording; any attempt to record through them panics.
    pub fn finish(self) -> Tape<F> {
        let mut rec = self.inner.borrow_mut();
        rec.finished = true;
        let ops = std::mem::take(&mut rec.ops);
        let indeps = std::mem::take(&mut rec.indeps);
        let deps = std::mem::take(&mut rec.deps);
        drop(rec);
        Tape::from_parts(ops, indeps, deps)
    }
}

impl<F: Float> Default for Context<F> {
    fn default() -> Self {
        Self::new()
    }
}
