//! First-order forward (tangent) sweep tests.

use abstape::{record, record_multi, Var64};
use approx::assert_relative_eq;

/// Derivative of a univariate function via one forward sweep.
fn forward_derivative(f: impl FnOnce(&Var64) -> Var64, x: f64) -> f64 {
    let tape = record(1, |v: &[Var64]| f(&v[0]));
    let (_, dy) = tape.first_order(&[x], &[1.0]).unwrap();
    dy[0]
}

/// Central finite difference for comparison.
fn finite_diff(f: impl Fn(f64) -> f64, x: f64) -> f64 {
    let h = 1e-7;
    (f(x + h) - f(x - h)) / (2.0 * h)
}

fn check_forward_elemental(
    f_var: impl FnOnce(&Var64) -> Var64,
    f_f64: impl Fn(f64) -> f64,
    x: f64,
    tol: f64,
) {
    let d = forward_derivative(f_var, x);
    let expected = finite_diff(&f_f64, x);
    assert_relative_eq!(d, expected, max_relative = tol);
}

// ── Arithmetic ──

#[test]
fn x_squared() {
    let d = forward_derivative(|x| x * x, 3.0);
    assert_relative_eq!(d, 6.0, max_relative = 1e-12);
}

#[test]
fn quotient_rule() {
    // d/dx x/(1+x²) at 0.7
    check_forward_elemental(
        |x| x / (x * x + 1.0),
        |x| x / (x * x + 1.0),
        0.7,
        1e-5,
    );
}

#[test]
fn composite_chain() {
    check_forward_elemental(
        |x| (x.sin() * x.exp()).ln(),
        |x| (x.sin() * x.exp()).ln(),
        1.1,
        1e-5,
    );
}

// ── Elementals ──

#[test]
fn sin() {
    check_forward_elemental(|x| x.sin(), |x| x.sin(), 0.5, 1e-5);
}

#[test]
fn cos() {
    check_forward_elemental(|x| x.cos(), |x| x.cos(), 0.5, 1e-5);
}

#[test]
fn tan() {
    check_forward_elemental(|x| x.tan(), |x| x.tan(), 0.5, 1e-5);
}

#[test]
fn exp() {
    check_forward_elemental(|x| x.exp(), |x| x.exp(), 0.5, 1e-5);
}

#[test]
fn ln() {
    check_forward_elemental(|x| x.ln(), |x| x.ln(), 0.5, 1e-5);
}

#[test]
fn sqrt() {
    check_forward_elemental(|x| x.sqrt(), |x| x.sqrt(), 0.5, 1e-5);
}

#[test]
fn asin() {
    check_forward_elemental(|x| x.asin(), |x| x.asin(), 0.5, 1e-5);
}

#[test]
fn acos() {
    check_forward_elemental(|x| x.acos(), |x| x.acos(), 0.5, 1e-5);
}

#[test]
fn atan() {
    check_forward_elemental(|x| x.atan(), |x| x.atan(), 0.5, 1e-5);
}

#[test]
fn powf() {
    check_forward_elemental(|x| x.powf(2.5), |x| x.powf(2.5), 0.5, 1e-5);
}

#[test]
fn neg() {
    let d = forward_derivative(|x| -x, 0.5);
    assert_relative_eq!(d, -1.0, max_relative = 1e-12);
}

// ── Scenarios ──

#[test]
fn sin_plus_second_input() {
    let tape = record(2, |v: &[Var64]| v[0].sin() + &v[1]);
    let (y, dy) = tape.first_order(&[0.0, 2.0], &[1.0, 0.0]).unwrap();
    assert_relative_eq!(y[0], 2.0);
    assert_relative_eq!(dy[0], 1.0);
    let (_, dy) = tape.first_order(&[0.0, 2.0], &[0.0, 1.0]).unwrap();
    assert_relative_eq!(dy[0], 1.0);
}

#[test]
fn abs_at_negative_point() {
    let tape = record(1, |v: &[Var64]| v[0].abs() + 1.0);
    let (y, dy) = tape.first_order(&[-2.0], &[1.0]).unwrap();
    assert_eq!(y[0], 3.0);
    assert_eq!(dy[0], -1.0);
}

#[test]
fn abs_kink_uses_positive_sign() {
    // sign(0) = +1
    let tape = record(2, |v: &[Var64]| (&v[0] - &v[1]).abs());
    let (y, dy) = tape.first_order(&[1.0, 1.0], &[1.0, 0.0]).unwrap();
    assert_eq!(y[0], 0.0);
    assert_eq!(dy[0], 1.0);
}

// ── Min/max selection ──

#[test]
fn min_follows_the_smaller_branch() {
    let tape = record(2, |v: &[Var64]| v[0].min(&v[1]));
    let (_, dy) = tape.first_order(&[1.0, 3.0], &[1.0, 0.0]).unwrap();
    assert_eq!(dy[0], 1.0);
    let (_, dy) = tape.first_order(&[5.0, 3.0], &[1.0, 0.0]).unwrap();
    assert_eq!(dy[0], 0.0);
}

#[test]
fn min_tie_takes_first_argument() {
    let tape = record(2, |v: &[Var64]| v[0].min(&v[1]));
    let (_, dy) = tape.first_order(&[2.0, 2.0], &[1.0, 0.0]).unwrap();
    assert_eq!(dy[0], 1.0);
    let (_, dy) = tape.first_order(&[2.0, 2.0], &[0.0, 1.0]).unwrap();
    assert_eq!(dy[0], 0.0);
}

#[test]
fn max_tie_takes_second_argument() {
    let tape = record(2, |v: &[Var64]| v[0].max(&v[1]));
    let (_, dy) = tape.first_order(&[2.0, 2.0], &[1.0, 0.0]).unwrap();
    assert_eq!(dy[0], 0.0);
    let (_, dy) = tape.first_order(&[2.0, 2.0], &[0.0, 1.0]).unwrap();
    assert_eq!(dy[0], 1.0);
}

// ── Multi-output ──

#[test]
fn polar_tangents() {
    let tape = record_multi(2, |v: &[Var64]| {
        vec![&v[0] * v[1].cos(), &v[0] * v[1].sin()]
    });
    let (y, dy) = tape
        .first_order(&[2.0, std::f64::consts::PI], &[1.0, 0.0])
        .unwrap();
    assert_relative_eq!(y[0], -2.0, max_relative = 1e-12);
    assert_relative_eq!(y[1], 0.0, epsilon = 1e-12);
    assert_relative_eq!(dy[0], -1.0, max_relative = 1e-12);
    assert_relative_eq!(dy[1], 0.0, epsilon = 1e-12);
}
