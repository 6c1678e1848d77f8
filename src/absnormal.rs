//! Abs-normal form extraction.
//!
//! An abs-factorable `y = f(x)` with `s` switching ops can be written as a
//! smooth system coupled to one switching variable per `abs`:
//!
//! ```text
//! z = a + Z·Δx + L·|z|        (L strictly lower triangular)
//! y = b + J·Δx + Y·|z|
//! ```
//!
//! The driver first rewrites `min`/`max` into `abs`
//! ([`Tape::abs_decompose`]), then promotes every `abs` argument to an
//! auxiliary dependent and every `abs` result to an auxiliary independent.
//! The leftover tape is smooth in the extended inputs `(x, |z|)`; one
//! Jacobian over it yields the four matrices in a single block.

use crate::error::Error;
use crate::float::Float;
use crate::op::Op;
use crate::tape::Tape;

/// Dense abs-normal form of a tape at a point.
///
/// Matrices are flat row-major: `zmat` is `s×n`, `lmat` is `s×s` (strictly
/// lower triangular), `jmat` is `m×n`, `ymat` is `m×s`. The offsets absorb
/// the evaluation point: at the switching fixed point `z*` of
/// `z = a + L·|z|` (which [`evaluate`](Self::evaluate) computes for
/// `dx = 0`), `a + L·|z*|` reproduces the switching-argument values and
/// `b + Y·|z*|` reproduces `y(x)`.
#[derive(Clone, Debug, PartialEq)]
pub struct AbsNormalForm<F: Float> {
    /// Number of independents.
    pub n: usize,
    /// Number of dependents.
    pub m: usize,
    /// Number of switching variables.
    pub s: usize,
    /// Switching offsets, length `s`.
    pub a: Vec<F>,
    /// Dependent offsets, length `m`.
    pub b: Vec<F>,
    /// `∂z/∂x` holding `|z|` fixed, row-major `s×n`.
    pub zmat: Vec<F>,
    /// `∂z/∂|z|`, row-major `s×s`, strictly lower triangular.
    pub lmat: Vec<F>,
    /// `∂y/∂x` holding `|z|` fixed, row-major `m×n`.
    pub jmat: Vec<F>,
    /// `∂y/∂|z|`, row-major `m×s`.
    pub ymat: Vec<F>,
}

/// `mat · x` for a flat row-major matrix.
fn mat_vec<F: Float>(mat: &[F], rows: usize, cols: usize, x: &[F]) -> Vec<F> {
    debug_assert_eq!(mat.len(), rows * cols);
    debug_assert_eq!(x.len(), cols);
    (0..rows)
        .map(|r| {
            let row = &mat[r * cols..(r + 1) * cols];
            row.iter()
                .zip(x)
                .fold(F::zero(), |acc, (&m, &xi)| acc + m * xi)
        })
        .collect()
}

impl<F: Float> AbsNormalForm<F> {
    /// Evaluate the piecewise-linear model at displacement `dx`.
    ///
    /// Solves `z = a + Z·dx + L·|z|` by fixed-point iteration — at most
    /// `s` rounds settle it because `L` is strictly lower triangular — and
    /// returns `(z, y)` with `y = b + J·dx + Y·|z|`. At `dx = 0` this
    /// reproduces the switching-argument values and `y(x)` of the recorded
    /// point exactly.
    pub fn evaluate(&self, dx: &[F]) -> (Vec<F>, Vec<F>) {
        assert_eq!(dx.len(), self.n, "displacement has wrong length");

        let mut base = mat_vec(&self.zmat, self.s, self.n, dx);
        for (bi, &ai) in base.iter_mut().zip(&self.a) {
            *bi = *bi + ai;
        }

        let mut z = base.clone();
        for _ in 0..self.s {
            let z_abs: Vec<F> = z.iter().map(|&zi| zi.abs()).collect();
            let correction = mat_vec(&self.lmat, self.s, self.s, &z_abs);
            let next: Vec<F> = base
                .iter()
                .zip(&correction)
                .map(|(&b, &c)| b + c)
                .collect();
            if next == z {
                break;
            }
            z = next;
        }

        let z_abs: Vec<F> = z.iter().map(|&zi| zi.abs()).collect();
        let mut y = mat_vec(&self.jmat, self.m, self.n, dx);
        let y_switch = mat_vec(&self.ymat, self.m, self.s, &z_abs);
        for ((yi, &bi), &si) in y.iter_mut().zip(&self.b).zip(&y_switch) {
            *yi = *yi + bi + si;
        }
        (z, y)
    }
}

impl<F: Float> Tape<F> {
    /// Smooth residual of an abs-decomposed tape.
    ///
    /// Every `Abs` slot becomes an `Indep` (fed with the abs *result* as a
    /// switching input), appended to the independents in tape order; the
    /// abs *arguments* become auxiliary dependents ahead of the original
    /// outputs.
    fn residual(&self) -> Tape<F> {
        let mut ops = self.ops().to_vec();
        let mut z_slots: Vec<u32> = Vec::with_capacity(self.num_abs());
        let mut z_args: Vec<u32> = Vec::with_capacity(self.num_abs());
        for (k, op) in self.ops().iter().enumerate() {
            if let Op::Abs(i) = *op {
                ops[k] = Op::Indep;
                z_slots.push(k as u32);
                z_args.push(i);
            }
        }

        let mut indeps = self.indeps().to_vec();
        indeps.extend_from_slice(&z_slots);
        let mut deps = z_args;
        deps.extend_from_slice(self.deps());
        Tape::from_parts(ops, indeps, deps)
    }

    /// Extract the dense abs-normal form at `x`.
    ///
    /// Runs [`abs_decompose`](Self::abs_decompose), one value sweep, and one
    /// Jacobian over the smooth residual (forward or reverse, whichever
    /// needs fewer sweeps — they agree on smooth tapes).
    pub fn abs_normal(&self, x: &[F]) -> Result<AbsNormalForm<F>, Error> {
        let dec = self.abs_decompose();
        let n = dec.num_indeps();
        let m = dec.num_deps();
        let s = dec.num_abs();

        // Switching-argument values, abs results, and outputs at x.
        let v = dec.value_sweep(x)?;
        let mut arg_vals = Vec::with_capacity(s);
        let mut z_abs = Vec::with_capacity(s);
        for (k, op) in dec.ops().iter().enumerate() {
            if let Op::Abs(i) = *op {
                arg_vals.push(v[i as usize]);
                z_abs.push(v[k]);
            }
        }
        let y_vals = Tape::gather(&v, dec.deps());

        let res = dec.residual();
        assert_eq!(
            res.num_abs(),
            0,
            "residual tape still contains switching ops"
        );

        let mut extended = x.to_vec();
        extended.extend_from_slice(&z_abs);
        let cols = n + s;
        let jac = if cols <= s + m {
            res.jacobian(&extended)?
        } else {
            res.jacobian_reverse(&extended)?
        };

        // Block slicing: rows 0..s are the switching arguments, rows s..s+m
        // the outputs; columns 0..n differentiate by x, columns n..n+s by z.
        let mut zmat = vec![F::zero(); s * n];
        let mut lmat = vec![F::zero(); s * s];
        let mut jmat = vec![F::zero(); m * n];
        let mut ymat = vec![F::zero(); m * s];
        for r in 0..s {
            let row = &jac[r * cols..(r + 1) * cols];
            zmat[r * n..(r + 1) * n].copy_from_slice(&row[..n]);
            lmat[r * s..(r + 1) * s].copy_from_slice(&row[n..]);
        }
        for r in 0..m {
            let row = &jac[(s + r) * cols..(s + r + 1) * cols];
            jmat[r * n..(r + 1) * n].copy_from_slice(&row[..n]);
            ymat[r * s..(r + 1) * s].copy_from_slice(&row[n..]);
        }

        // Offsets absorb the evaluation point.
        let l_zabs = mat_vec(&lmat, s, s, &z_abs);
        let a: Vec<F> = arg_vals
            .iter()
            .zip(&l_zabs)
            .map(|(&v, &c)| v - c)
            .collect();
        let y_zabs = mat_vec(&ymat, m, s, &z_abs);
        let b: Vec<F> = y_vals.iter().zip(&y_zabs).map(|(&v, &c)| v - c).collect();

        Ok(AbsNormalForm {
            n,
            m,
            s,
            a,
            b,
            zmat,
            lmat,
            jmat,
            ymat,
        })
    }
}
