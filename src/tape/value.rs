use crate::error::Error;
use crate::float::Float;
use crate::op::{self, Op};

impl<F: Float> super::Tape<F> {
    /// Full value buffer at `x`, one entry per tape slot.
    ///
    /// `Indep` slots are seeded from `x` in independents order, then every
    /// op is evaluated in stream order. The first domain violation aborts
    /// the sweep with its op position.
    pub(crate) fn value_sweep(&self, x: &[F]) -> Result<Vec<F>, Error> {
        self.check_shape("x", self.num_indeps(), x.len())?;

        let mut v = vec![F::zero(); self.len()];
        for (p, &k) in self.indeps().iter().enumerate() {
            v[k as usize] = x[p];
        }
        for (k, op) in self.ops().iter().enumerate() {
            if matches!(op, Op::Indep) {
                continue;
            }
            v[k] = op::eval_value(op, &v).map_err(|what| Error::Domain { index: k, what })?;
        }
        Ok(v)
    }

    /// Re-evaluate the tape at a new input point (zero-order sweep).
    ///
    /// Returns the dependent values `y` (length [`num_deps`](Self::num_deps)).
    pub fn zero_order(&self, x: &[F]) -> Result<Vec<F>, Error> {
        let v = self.value_sweep(x)?;
        Ok(Self::gather(&v, self.deps()))
    }
}
