//! Errors surfaced by the sweep drivers.

use std::fmt;

/// A driver call failed before or during a sweep.
///
/// Drivers are atomic: either the full output vectors are produced or one
/// of these is returned with no observable partial state. Usage errors
/// (recording through a finished context, mixing wrappers from different
/// contexts, out-of-range operand indices) are programmer errors and panic
/// instead of returning a value of this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A value sweep left the domain of an elementary operation
    /// (division by zero, `ln` of a non-positive value, ...).
    Domain {
        /// Tape position of the offending op.
        index: usize,
        /// What went wrong.
        what: &'static str,
    },
    /// An input or seed vector does not match the tape's dimensions.
    /// Detected before any sweep work.
    Shape {
        /// Which argument was mis-sized (`"x"`, `"dx"`, `"ybar"`).
        what: &'static str,
        /// Length the tape requires.
        expected: usize,
        /// Length that was passed.
        found: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Domain { index, what } => {
                write!(f, "{} at tape position {}", what, index)
            }
            Error::Shape {
                what,
                expected,
                found,
            } => {
                write!(
                    f,
                    "`{}` has length {} but the tape requires {}",
                    what, found, expected
                )
            }
        }
    }
}

impl std::error::Error for Error {}
