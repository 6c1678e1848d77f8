use crate::float::Float;
use crate::op::Op;

fn push<F: Float>(ops: &mut Vec<Op<F>>, op: Op<F>) -> u32 {
    let k = ops.len() as u32;
    ops.push(op);
    k
}

impl<F: Float> super::Tape<F> {
    /// Rewrite every `Min`/`Max` into its abs-expressed form.
    ///
    /// Uses the identities `min(u,v) = (u + v − |u − v|)/2` and
    /// `max(u,v) = (u + v + |u − v|)/2`, so the only switching ops left are
    /// `Abs` — the precondition for abs-normal extraction. Each rewritten
    /// op expands into six slots; all downstream operand, independent and
    /// dependent indices are remapped. The rewrite is exact in real
    /// arithmetic; floating-point results can differ from the direct
    /// `min`/`max` in the last ulp.
    pub fn abs_decompose(&self) -> Self {
        let half = F::from(0.5).expect("0.5 is representable");

        let mut ops: Vec<Op<F>> = Vec::with_capacity(self.len());
        // old slot -> slot holding the same value in the rewritten stream
        let mut map = vec![0u32; self.len()];

        for (k, op) in self.ops().iter().enumerate() {
            map[k] = match *op {
                Op::Min(i, j) | Op::Max(i, j) => {
                    let u = map[i as usize];
                    let v = map[j as usize];
                    let diff = push(&mut ops, Op::Sub(u, v));
                    let mag = push(&mut ops, Op::Abs(diff));
                    let sum = push(&mut ops, Op::Add(u, v));
                    let num = match op {
                        Op::Min(_, _) => push(&mut ops, Op::Sub(sum, mag)),
                        _ => push(&mut ops, Op::Add(sum, mag)),
                    };
                    let scale = push(&mut ops, Op::Const(half));
                    push(&mut ops, Op::Mul(num, scale))
                }
                _ => {
                    let remapped = op.map_args(|i| map[i as usize]);
                    push(&mut ops, remapped)
                }
            };
        }

        let indeps = self.indeps().iter().map(|&i| map[i as usize]).collect();
        let deps = self.deps().iter().map(|&d| map[d as usize]).collect();
        Self::from_parts(ops, indeps, deps)
    }
}
