use crate::error::Error;
use crate::float::Float;
use crate::op;

impl<F: Float> super::Tape<F> {
    /// Adjoint buffer for output seed `ybar`, given a populated value
    /// buffer.
    ///
    /// Dependents are seeded with accumulation, so an index that appears
    /// twice in the dependents list (legal on residual tapes) collects both
    /// seed contributions.
    pub(crate) fn adjoint_sweep(&self, v: &[F], ybar: &[F]) -> Vec<F> {
        let mut adj = vec![F::zero(); self.len()];
        for (r, &k) in self.deps().iter().enumerate() {
            adj[k as usize] = adj[k as usize] + ybar[r];
        }
        for (k, op) in self.ops().iter().enumerate().rev() {
            if adj[k] == F::zero() {
                continue;
            }
            op::propagate_adjoint(op, k, v, &mut adj);
        }
        adj
    }

    /// First-order reverse sweep: value and adjoint.
    ///
    /// Returns `(y, xbar)` where `xbar = ybarᵀ · J(x)`, using the same
    /// switching conventions as [`first_order`](Self::first_order) so the
    /// adjoint identity `⟨ybar, J·dx⟩ = ⟨xbar, dx⟩` holds on each selection
    /// region.
    pub fn first_order_reverse(&self, x: &[F], ybar: &[F]) -> Result<(Vec<F>, Vec<F>), Error> {
        self.check_shape("ybar", self.num_deps(), ybar.len())?;
        let v = self.value_sweep(x)?;
        let adj = self.adjoint_sweep(&v, ybar);
        Ok((
            Self::gather(&v, self.deps()),
            Self::gather(&adj, self.indeps()),
        ))
    }
}
