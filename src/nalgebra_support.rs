//! nalgebra adapters: thin wrappers accepting `DVector` and returning
//! `DVector`/`DMatrix`.

use nalgebra::{DMatrix, DVector, Scalar};

use crate::absnormal::AbsNormalForm;
use crate::error::Error;
use crate::float::Float;
use crate::tape::Tape;

/// Re-evaluate a tape, returning the outputs as a `DVector`.
pub fn zero_order_nalgebra<F: Float + Scalar>(
    tape: &Tape<F>,
    x: &DVector<F>,
) -> Result<DVector<F>, Error> {
    Ok(DVector::from_vec(tape.zero_order(x.as_slice())?))
}

/// Dense Jacobian (forward mode) as a `DMatrix`.
pub fn jacobian_nalgebra<F: Float + Scalar>(
    tape: &Tape<F>,
    x: &DVector<F>,
) -> Result<DMatrix<F>, Error> {
    let jac = tape.jacobian(x.as_slice())?;
    Ok(DMatrix::from_row_slice(
        tape.num_deps(),
        tape.num_indeps(),
        &jac,
    ))
}

/// Dense Jacobian (reverse mode) as a `DMatrix`.
pub fn jacobian_reverse_nalgebra<F: Float + Scalar>(
    tape: &Tape<F>,
    x: &DVector<F>,
) -> Result<DMatrix<F>, Error> {
    let jac = tape.jacobian_reverse(x.as_slice())?;
    Ok(DMatrix::from_row_slice(
        tape.num_deps(),
        tape.num_indeps(),
        &jac,
    ))
}

impl<F: Float + Scalar> AbsNormalForm<F> {
    /// `a` as a `DVector`.
    pub fn a_vector(&self) -> DVector<F> {
        DVector::from_row_slice(&self.a)
    }

    /// `b` as a `DVector`.
    pub fn b_vector(&self) -> DVector<F> {
        DVector::from_row_slice(&self.b)
    }

    /// `Z` as an `s×n` `DMatrix`.
    pub fn z_matrix(&self) -> DMatrix<F> {
        DMatrix::from_row_slice(self.s, self.n, &self.zmat)
    }

    /// `L` as an `s×s` `DMatrix`.
    pub fn l_matrix(&self) -> DMatrix<F> {
        DMatrix::from_row_slice(self.s, self.s, &self.lmat)
    }

    /// `J` as an `m×n` `DMatrix`.
    pub fn j_matrix(&self) -> DMatrix<F> {
        DMatrix::from_row_slice(self.m, self.n, &self.jmat)
    }

    /// `Y` as an `m×s` `DMatrix`.
    pub fn y_matrix(&self) -> DMatrix<F> {
        DMatrix::from_row_slice(self.m, self.s, &self.ymat)
    }
}
