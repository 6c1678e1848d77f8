//! Closure-recording conveniences.
//!
//! Wraps the context lifecycle — create, draw independents, run the
//! closure, mark outputs, finish — for the common case where the function
//! is available as Rust code.

use crate::context::Context;
use crate::float::Float;
use crate::scalar::Var;
use crate::tape::Tape;

/// Record a scalar function `f : Rⁿ → R` as a tape.
///
/// ```
/// use abstape::Var64;
///
/// let tape = abstape::record(2, |x: &[Var64]| &x[0] * &x[1]);
/// assert_eq!(tape.num_indeps(), 2);
/// assert_eq!(tape.zero_order(&[3.0, 4.0]).unwrap(), vec![12.0]);
/// ```
pub fn record<F: Float>(n: usize, f: impl FnOnce(&[Var<F>]) -> Var<F>) -> Tape<F> {
    let mut ctx = Context::new();
    let inputs = ctx.new_independent_vec(n);
    let output = f(&inputs);
    ctx.set_dependent(&output);
    ctx.finish()
}

/// Record a vector function `f : Rⁿ → Rᵐ` as a tape.
///
/// The output order of the closure fixes the dependent order of the tape.
pub fn record_multi<F: Float>(n: usize, f: impl FnOnce(&[Var<F>]) -> Vec<Var<F>>) -> Tape<F> {
    let mut ctx = Context::new();
    let inputs = ctx.new_independent_vec(n);
    let outputs = f(&inputs);
    for output in &outputs {
        ctx.set_dependent(output);
    }
    ctx.finish()
}
