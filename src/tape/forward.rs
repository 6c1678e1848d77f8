use crate::error::Error;
use crate::float::Float;
use crate::op::{self, Op};

impl<F: Float> super::Tape<F> {
    /// Tangent buffer for direction `dx`, given a populated value buffer.
    pub(crate) fn tangent_sweep(&self, v: &[F], dx: &[F]) -> Vec<F> {
        let mut d = vec![F::zero(); self.len()];
        for (p, &k) in self.indeps().iter().enumerate() {
            d[k as usize] = dx[p];
        }
        for (k, op) in self.ops().iter().enumerate() {
            if matches!(op, Op::Indep) {
                continue;
            }
            d[k] = op::eval_tangent(op, k, v, &d);
        }
        d
    }

    /// First-order forward sweep: value and directional derivative.
    ///
    /// Returns `(y, dy)` where `dy = J(x) · dx` on the selection region of
    /// `x` (switching ops linearize with `sign(0) = +1` and the min/max tie
    /// rules).
    pub fn first_order(&self, x: &[F], dx: &[F]) -> Result<(Vec<F>, Vec<F>), Error> {
        self.check_shape("dx", self.num_indeps(), dx.len())?;
        let v = self.value_sweep(x)?;
        let d = self.tangent_sweep(&v, dx);
        Ok((Self::gather(&v, self.deps()), Self::gather(&d, self.deps())))
    }
}
