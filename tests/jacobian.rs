//! Dense Jacobian driver tests (both directions).

use abstape::{record, record_multi, Tape64, Var64};
use approx::assert_relative_eq;

fn polar_tape() -> Tape64 {
    record_multi(2, |v: &[Var64]| {
        vec![&v[0] * v[1].cos(), &v[0] * v[1].sin()]
    })
}

fn polar_reference(r: f64, phi: f64) -> [f64; 4] {
    [phi.cos(), -r * phi.sin(), phi.sin(), r * phi.cos()]
}

#[test]
fn scalar_square() {
    let tape = record(1, |x: &[Var64]| &x[0] * &x[0]);
    assert_eq!(tape.jacobian(&[3.0]).unwrap(), vec![6.0]);
    assert_eq!(tape.jacobian_reverse(&[3.0]).unwrap(), vec![6.0]);
}

#[test]
fn max_jacobian() {
    let tape = record(2, |v: &[Var64]| v[0].max(&v[1]));
    assert_eq!(tape.jacobian(&[1.0, 3.0]).unwrap(), vec![0.0, 1.0]);
    assert_eq!(tape.jacobian_reverse(&[1.0, 3.0]).unwrap(), vec![0.0, 1.0]);
}

#[test]
fn logistic_slope() {
    let tape = record(1, |x: &[Var64]| x[0].exp() / (x[0].exp() + 1.0));
    let jac = tape.jacobian(&[0.0]).unwrap();
    assert_relative_eq!(jac[0], 0.25, max_relative = 1e-12);
    let jac = tape.jacobian_reverse(&[0.0]).unwrap();
    assert_relative_eq!(jac[0], 0.25, max_relative = 1e-12);
}

#[test]
fn polar_against_reference() {
    let tape = polar_tape();
    let (r, phi) = (2.0, std::f64::consts::PI);
    let reference = polar_reference(r, phi);
    let jac = tape.jacobian(&[r, phi]).unwrap();
    for (j, re) in jac.iter().zip(&reference) {
        assert_relative_eq!(*j, *re, epsilon = 1e-12);
    }
}

#[test]
fn forward_and_reverse_agree() {
    let tape = polar_tape();
    for &(r, phi) in &[(2.0, 0.3), (0.5, -1.2), (3.0, 2.8)] {
        let jf = tape.jacobian(&[r, phi]).unwrap();
        let jr = tape.jacobian_reverse(&[r, phi]).unwrap();
        for (a, b) in jf.iter().zip(&jr) {
            assert_relative_eq!(*a, *b, max_relative = 1e-13);
        }
    }
}

#[test]
fn forward_columns_match_tangent_sweeps() {
    let tape = record_multi(3, |v: &[Var64]| {
        vec![
            v[0].sin() * &v[1],
            &v[1] * &v[2] + v[0].exp(),
        ]
    });
    let x = [0.4, 1.7, -0.6];
    let n = tape.num_indeps();
    let jac = tape.jacobian(&x).unwrap();
    for p in 0..n {
        let mut dx = vec![0.0; n];
        dx[p] = 1.0;
        let (_, dy) = tape.first_order(&x, &dx).unwrap();
        for (r, dyr) in dy.iter().enumerate() {
            assert_eq!(jac[r * n + p], *dyr);
        }
    }
}

#[test]
fn reverse_rows_match_adjoint_sweeps() {
    let tape = record_multi(3, |v: &[Var64]| {
        vec![
            v[0].sin() * &v[1],
            &v[1] * &v[2] + v[0].exp(),
        ]
    });
    let x = [0.4, 1.7, -0.6];
    let n = tape.num_indeps();
    let m = tape.num_deps();
    let jac = tape.jacobian_reverse(&x).unwrap();
    for r in 0..m {
        let mut ybar = vec![0.0; m];
        ybar[r] = 1.0;
        let (_, xbar) = tape.first_order_reverse(&x, &ybar).unwrap();
        for (p, xb) in xbar.iter().enumerate() {
            assert_eq!(jac[r * n + p], *xb);
        }
    }
}

#[test]
fn gradient_of_rosenbrock() {
    let n = 6;
    let tape = record(n, |x: &[Var64]| {
        let mut sum = Var64::constant(0.0);
        for i in 0..n - 1 {
            let t1 = 1.0 - &x[i];
            let t2 = &x[i + 1] - &x[i] * &x[i];
            sum = sum + &t1 * &t1 + 100.0 * &t2 * &t2;
        }
        sum
    });

    fn rosenbrock(x: &[f64]) -> f64 {
        let mut sum = 0.0;
        for i in 0..x.len() - 1 {
            let t1 = 1.0 - x[i];
            let t2 = x[i + 1] - x[i] * x[i];
            sum += t1 * t1 + 100.0 * t2 * t2;
        }
        sum
    }

    let x: Vec<f64> = (0..n).map(|i| -1.0 + 0.37 * i as f64).collect();
    let grad = tape.jacobian_reverse(&x).unwrap();

    let h = 1e-6;
    for p in 0..n {
        let mut xp = x.clone();
        let mut xm = x.clone();
        xp[p] += h;
        xm[p] -= h;
        let fd = (rosenbrock(&xp) - rosenbrock(&xm)) / (2.0 * h);
        assert_relative_eq!(grad[p], fd, max_relative = 1e-4);
    }
}

#[test]
fn empty_direction_counts() {
    // a tape with no dependents yields an empty Jacobian
    let mut ctx = abstape::Context::<f64>::new();
    let _ = ctx.new_independent();
    let tape = ctx.finish();
    assert_eq!(tape.jacobian(&[1.0]).unwrap(), Vec::<f64>::new());
    assert_eq!(tape.jacobian_reverse(&[1.0]).unwrap(), Vec::<f64>::new());
}
