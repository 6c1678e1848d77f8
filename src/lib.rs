//! Tape-based automatic differentiation for abs-factorable functions.
//!
//! Record a function built from the smooth elementaries plus
//! `abs`/`min`/`max` onto a linear tape, then drive the tape: re-evaluate
//! at new points, push tangents forward, pull adjoints back, assemble
//! dense Jacobians, or extract the abs-normal form that makes the
//! non-smooth structure explicit.
//!
//! ```
//! use abstape::Var64;
//!
//! let tape = abstape::record(1, |x: &[Var64]| x[0].abs() + 1.0);
//! assert_eq!(tape.zero_order(&[-2.0]).unwrap(), vec![3.0]);
//! // sign(-2) = -1
//! assert_eq!(tape.jacobian(&[-2.0]).unwrap(), vec![-1.0]);
//!
//! let anf = tape.abs_normal(&[-2.0]).unwrap();
//! assert_eq!(anf.s, 1);
//! assert_eq!(anf.a, vec![-2.0]);
//! ```

pub mod absnormal;
pub mod api;
pub mod context;
pub mod error;
pub mod float;
pub mod op;
pub mod scalar;
pub mod tape;

#[cfg(feature = "nalgebra")]
pub mod nalgebra_support;

pub use absnormal::AbsNormalForm;
pub use api::{record, record_multi};
pub use context::Context;
pub use error::Error;
pub use float::Float;
pub use op::Op;
pub use scalar::Var;
pub use tape::Tape;

/// Type alias for wrapper scalars over `f64`.
pub type Var64 = Var<f64>;
/// Type alias for wrapper scalars over `f32`.
pub type Var32 = Var<f32>;
/// Type alias for tapes over `f64`.
pub type Tape64 = Tape<f64>;
/// Type alias for tapes over `f32`.
pub type Tape32 = Tape<f32>;
