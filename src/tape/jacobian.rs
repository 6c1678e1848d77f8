use crate::error::Error;
use crate::float::Float;

impl<F: Float> super::Tape<F> {
    /// Dense Jacobian via forward mode: one tangent sweep per input over a
    /// shared value sweep.
    ///
    /// Returns a flat row-major `m×n` matrix, `jac[r·n + p] = ∂y_r/∂x_p`.
    pub fn jacobian(&self, x: &[F]) -> Result<Vec<F>, Error> {
        let n = self.num_indeps();
        let m = self.num_deps();
        let v = self.value_sweep(x)?;

        let mut jac = vec![F::zero(); m * n];
        let mut dx = vec![F::zero(); n];
        for col in 0..n {
            dx[col] = F::one();
            let d = self.tangent_sweep(&v, &dx);
            dx[col] = F::zero();
            for (row, &k) in self.deps().iter().enumerate() {
                jac[row * n + col] = d[k as usize];
            }
        }
        Ok(jac)
    }

    /// Dense Jacobian via reverse mode: one adjoint sweep per output over a
    /// shared value sweep.
    ///
    /// Identical to [`jacobian`](Self::jacobian) up to rounding on smooth
    /// tapes; prefer it when `m < n`.
    pub fn jacobian_reverse(&self, x: &[F]) -> Result<Vec<F>, Error> {
        let n = self.num_indeps();
        let m = self.num_deps();
        let v = self.value_sweep(x)?;

        let mut jac = vec![F::zero(); m * n];
        let mut ybar = vec![F::zero(); m];
        for row in 0..m {
            ybar[row] = F::one();
            let adj = self.adjoint_sweep(&v, &ybar);
            ybar[row] = F::zero();
            for (col, &k) in self.indeps().iter().enumerate() {
                jac[row * n + col] = adj[k as usize];
            }
        }
        Ok(jac)
    }
}
