//! Elementary operations of the tape IR.
//!
//! Each [`Op`] occupies exactly one tape slot: the k-th op of the stream
//! defines the value at index k, and operand indices always point strictly
//! below k. The [`eval_value`], [`eval_tangent`] and [`propagate_adjoint`]
//! kernels hold the per-op semantics shared by every sweep driver, so the
//! kink conventions cannot drift between directions.

use crate::float::Float;

/// A single elementary operation, tagged with its operand indices.
///
/// `Const` carries its value inline; `Indep` slots receive their value per
/// sweep. All other variants reference earlier slots by index.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Op<F> {
    // ── Structural ──
    /// Free input; its value is supplied per driver call.
    Indep,
    /// Scalar constant.
    Const(F),

    // ── Binary smooth ──
    Add(u32, u32),
    Sub(u32, u32),
    Mul(u32, u32),
    Div(u32, u32),
    Powf(u32, u32),

    // ── Unary smooth ──
    Neg(u32),
    Sin(u32),
    Cos(u32),
    Tan(u32),
    Exp(u32),
    Ln(u32),
    Sqrt(u32),
    Asin(u32),
    Acos(u32),
    Atan(u32),

    // ── Switching primitives ──
    Abs(u32),
    Min(u32, u32),
    Max(u32, u32),
}

impl<F> Op<F> {
    /// Operand indices as `(first, second)`.
    pub fn args(&self) -> (Option<u32>, Option<u32>) {
        match *self {
            Op::Indep | Op::Const(_) => (None, None),
            Op::Neg(i)
            | Op::Sin(i)
            | Op::Cos(i)
            | Op::Tan(i)
            | Op::Exp(i)
            | Op::Ln(i)
            | Op::Sqrt(i)
            | Op::Asin(i)
            | Op::Acos(i)
            | Op::Atan(i)
            | Op::Abs(i) => (Some(i), None),
            Op::Add(i, j)
            | Op::Sub(i, j)
            | Op::Mul(i, j)
            | Op::Div(i, j)
            | Op::Powf(i, j)
            | Op::Min(i, j)
            | Op::Max(i, j) => (Some(i), Some(j)),
        }
    }

    /// True for the non-smooth switching primitives (`Abs`, `Min`, `Max`).
    pub fn is_switching(&self) -> bool {
        matches!(self, Op::Abs(_) | Op::Min(_, _) | Op::Max(_, _))
    }

    /// Copy of this op with every operand index passed through `f`.
    pub(crate) fn map_args(&self, mut f: impl FnMut(u32) -> u32) -> Self
    where
        F: Copy,
    {
        match *self {
            Op::Indep => Op::Indep,
            Op::Const(c) => Op::Const(c),
            Op::Add(i, j) => Op::Add(f(i), f(j)),
            Op::Sub(i, j) => Op::Sub(f(i), f(j)),
            Op::Mul(i, j) => Op::Mul(f(i), f(j)),
            Op::Div(i, j) => Op::Div(f(i), f(j)),
            Op::Powf(i, j) => Op::Powf(f(i), f(j)),
            Op::Neg(i) => Op::Neg(f(i)),
            Op::Sin(i) => Op::Sin(f(i)),
            Op::Cos(i) => Op::Cos(f(i)),
            Op::Tan(i) => Op::Tan(f(i)),
            Op::Exp(i) => Op::Exp(f(i)),
            Op::Ln(i) => Op::Ln(f(i)),
            Op::Sqrt(i) => Op::Sqrt(f(i)),
            Op::Asin(i) => Op::Asin(f(i)),
            Op::Acos(i) => Op::Acos(f(i)),
            Op::Atan(i) => Op::Atan(f(i)),
            Op::Abs(i) => Op::Abs(f(i)),
            Op::Min(i, j) => Op::Min(f(i), f(j)),
            Op::Max(i, j) => Op::Max(f(i), f(j)),
        }
    }
}

/// Kink-sign convention shared by both sweep directions: `sign(0) = +1`.
#[inline]
pub(crate) fn kink_sign<F: Float>(x: F) -> F {
    if x >= F::zero() {
        F::one()
    } else {
        -F::one()
    }
}

/// True iff `Min(i, j)` selects its first argument. Ties go to the first.
#[inline]
fn min_takes_first<F: Float>(vi: F, vj: F) -> bool {
    vi <= vj
}

/// True iff `Max(i, j)` selects its first argument. Ties go to the second.
#[inline]
fn max_takes_first<F: Float>(vi: F, vj: F) -> bool {
    vi > vj
}

/// Evaluate a single op against the value buffer `v`.
///
/// `Indep` slots are seeded by the caller and never reach this function.
/// Domain violations are reported as a static description; the sweep
/// attaches the op position.
pub(crate) fn eval_value<F: Float>(op: &Op<F>, v: &[F]) -> Result<F, &'static str> {
    let val = |i: u32| v[i as usize];
    Ok(match *op {
        Op::Indep => unreachable!("Indep slots are seeded before the sweep"),
        Op::Const(c) => c,

        Op::Add(i, j) => val(i) + val(j),
        Op::Sub(i, j) => val(i) - val(j),
        Op::Mul(i, j) => val(i) * val(j),
        Op::Div(i, j) => {
            if val(j) == F::zero() {
                return Err("division by zero");
            }
            val(i) / val(j)
        }
        Op::Powf(i, j) => {
            let r = val(i).powf(val(j));
            if r.is_nan() && !val(i).is_nan() && !val(j).is_nan() {
                return Err("fractional power of a negative base");
            }
            r
        }

        Op::Neg(i) => -val(i),
        Op::Sin(i) => val(i).sin(),
        Op::Cos(i) => val(i).cos(),
        Op::Tan(i) => {
            if val(i).cos() == F::zero() {
                return Err("tangent at a pole");
            }
            val(i).tan()
        }
        Op::Exp(i) => val(i).exp(),
        Op::Ln(i) => {
            if val(i) <= F::zero() {
                return Err("logarithm of a non-positive value");
            }
            val(i).ln()
        }
        Op::Sqrt(i) => {
            if val(i) < F::zero() {
                return Err("square root of a negative value");
            }
            val(i).sqrt()
        }
        Op::Asin(i) => {
            if val(i).abs() > F::one() {
                return Err("inverse sine outside [-1, 1]");
            }
            val(i).asin()
        }
        Op::Acos(i) => {
            if val(i).abs() > F::one() {
                return Err("inverse cosine outside [-1, 1]");
            }
            val(i).acos()
        }
        Op::Atan(i) => val(i).atan(),

        Op::Abs(i) => val(i).abs(),
        Op::Min(i, j) => {
            if min_takes_first(val(i), val(j)) {
                val(i)
            } else {
                val(j)
            }
        }
        Op::Max(i, j) => {
            if max_takes_first(val(i), val(j)) {
                val(i)
            } else {
                val(j)
            }
        }
    })
}

/// Tangent of the op at slot `k`, given a fully-populated value buffer `v`
/// and the operand tangents in `d`.
///
/// The value sweep has already rejected domain violations, so divisors and
/// logarithm arguments are valid here.
pub(crate) fn eval_tangent<F: Float>(op: &Op<F>, k: usize, v: &[F], d: &[F]) -> F {
    let val = |i: u32| v[i as usize];
    let dot = |i: u32| d[i as usize];
    match *op {
        Op::Indep => d[k],
        Op::Const(_) => F::zero(),

        Op::Add(i, j) => dot(i) + dot(j),
        Op::Sub(i, j) => dot(i) - dot(j),
        Op::Mul(i, j) => dot(i) * val(j) + val(i) * dot(j),
        Op::Div(i, j) => (dot(i) * val(j) - val(i) * dot(j)) / (val(j) * val(j)),
        Op::Powf(i, j) => {
            let (x, y) = (val(i), val(j));
            let (dx, dy) = (dot(i), dot(j));
            let mut t = F::zero();
            if dx != F::zero() {
                t = t + y * x.powf(y - F::one()) * dx;
            }
            // exponent partial only where ln(x) exists
            if dy != F::zero() && x > F::zero() {
                t = t + x.ln() * v[k] * dy;
            }
            t
        }

        Op::Neg(i) => -dot(i),
        Op::Sin(i) => dot(i) * val(i).cos(),
        Op::Cos(i) => -dot(i) * val(i).sin(),
        Op::Tan(i) => {
            let c = val(i).cos();
            dot(i) / (c * c)
        }
        Op::Exp(i) => dot(i) * v[k],
        Op::Ln(i) => dot(i) / val(i),
        Op::Sqrt(i) => {
            let two = F::one() + F::one();
            dot(i) / (two * v[k])
        }
        Op::Asin(i) => dot(i) / (F::one() - val(i) * val(i)).sqrt(),
        Op::Acos(i) => -dot(i) / (F::one() - val(i) * val(i)).sqrt(),
        Op::Atan(i) => dot(i) / (F::one() + val(i) * val(i)),

        Op::Abs(i) => kink_sign(val(i)) * dot(i),
        Op::Min(i, j) => {
            if min_takes_first(val(i), val(j)) {
                dot(i)
            } else {
                dot(j)
            }
        }
        Op::Max(i, j) => {
            if max_takes_first(val(i), val(j)) {
                dot(i)
            } else {
                dot(j)
            }
        }
    }
}

/// Distribute the adjoint at slot `k` into the op's operand slots.
///
/// Uses the same local partials and kink conventions as [`eval_tangent`];
/// this symmetry is what makes `<ybar, J dx> = <xbar, dx>` hold on each
/// selection region.
pub(crate) fn propagate_adjoint<F: Float>(op: &Op<F>, k: usize, v: &[F], adj: &mut [F]) {
    let w = adj[k];
    let val = |i: u32| v[i as usize];
    match *op {
        Op::Indep | Op::Const(_) => {}

        Op::Add(i, j) => {
            adj[i as usize] = adj[i as usize] + w;
            adj[j as usize] = adj[j as usize] + w;
        }
        Op::Sub(i, j) => {
            adj[i as usize] = adj[i as usize] + w;
            adj[j as usize] = adj[j as usize] - w;
        }
        Op::Mul(i, j) => {
            adj[i as usize] = adj[i as usize] + w * val(j);
            adj[j as usize] = adj[j as usize] + w * val(i);
        }
        Op::Div(i, j) => {
            let inv = F::one() / val(j);
            adj[i as usize] = adj[i as usize] + w * inv;
            adj[j as usize] = adj[j as usize] - w * val(i) * inv * inv;
        }
        Op::Powf(i, j) => {
            let (x, y) = (val(i), val(j));
            adj[i as usize] = adj[i as usize] + w * y * x.powf(y - F::one());
            if x > F::zero() {
                adj[j as usize] = adj[j as usize] + w * x.ln() * v[k];
            }
        }

        Op::Neg(i) => adj[i as usize] = adj[i as usize] - w,
        Op::Sin(i) => adj[i as usize] = adj[i as usize] + w * val(i).cos(),
        Op::Cos(i) => adj[i as usize] = adj[i as usize] - w * val(i).sin(),
        Op::Tan(i) => {
            let c = val(i).cos();
            adj[i as usize] = adj[i as usize] + w / (c * c);
        }
        Op::Exp(i) => adj[i as usize] = adj[i as usize] + w * v[k],
        Op::Ln(i) => adj[i as usize] = adj[i as usize] + w / val(i),
        Op::Sqrt(i) => {
            let two = F::one() + F::one();
            adj[i as usize] = adj[i as usize] + w / (two * v[k]);
        }
        Op::Asin(i) => {
            adj[i as usize] = adj[i as usize] + w / (F::one() - val(i) * val(i)).sqrt();
        }
        Op::Acos(i) => {
            adj[i as usize] = adj[i as usize] - w / (F::one() - val(i) * val(i)).sqrt();
        }
        Op::Atan(i) => {
            adj[i as usize] = adj[i as usize] + w / (F::one() + val(i) * val(i));
        }

        Op::Abs(i) => {
            adj[i as usize] = adj[i as usize] + kink_sign(val(i)) * w;
        }
        Op::Min(i, j) => {
            if min_takes_first(val(i), val(j)) {
                adj[i as usize] = adj[i as usize] + w;
            } else {
                adj[j as usize] = adj[j as usize] + w;
            }
        }
        Op::Max(i, j) => {
            if max_takes_first(val(i), val(j)) {
                adj[i as usize] = adj[i as usize] + w;
            } else {
                adj[j as usize] = adj[j as usize] + w;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_classification() {
        assert!(Op::<f64>::Abs(0).is_switching());
        assert!(Op::<f64>::Min(0, 1).is_switching());
        assert!(Op::<f64>::Max(0, 1).is_switching());
        assert!(!Op::<f64>::Add(0, 1).is_switching());
        assert!(!Op::<f64>::Indep.is_switching());
    }

    #[test]
    fn sign_convention_at_zero() {
        assert_eq!(kink_sign(0.0_f64), 1.0);
        assert_eq!(kink_sign(-0.0_f64), 1.0); // -0.0 >= 0.0
        assert_eq!(kink_sign(3.0_f64), 1.0);
        assert_eq!(kink_sign(-3.0_f64), -1.0);
    }

    #[test]
    fn tie_conventions() {
        // min tie -> first argument, max tie -> second argument
        let v = [2.0_f64, 2.0];
        let d = [1.0_f64, -1.0];
        assert_eq!(eval_tangent(&Op::Min(0, 1), 2, &v, &d), 1.0);
        assert_eq!(eval_tangent(&Op::Max(0, 1), 2, &v, &d), -1.0);
    }
}
