//! Tape serialization round-trips (feature `serde`).

#![cfg(feature = "serde")]

use abstape::{record, Tape64, Var64};

#[test]
fn tape_round_trips_through_json() {
    let tape = record(2, |v: &[Var64]| (v[0].sin() * &v[1]).abs().min(&v[1]));
    let json = serde_json::to_string(&tape).unwrap();
    let back: Tape64 = serde_json::from_str(&json).unwrap();

    assert_eq!(tape, back);
    assert_eq!(back.num_abs(), 2);
    assert_eq!(
        tape.zero_order(&[0.3, 0.7]).unwrap(),
        back.zero_order(&[0.3, 0.7]).unwrap(),
    );
    assert_eq!(
        tape.jacobian(&[0.3, 0.7]).unwrap(),
        back.jacobian(&[0.3, 0.7]).unwrap(),
    );
}

#[test]
fn corrupted_streams_are_rejected() {
    // operand index not below its slot
    let json = r#"{"ops":[{"Neg":0}],"indeps":[],"deps":[]}"#;
    assert!(serde_json::from_str::<Tape64>(json).is_err());

    // independents pointing at a non-Indep op
    let json = r#"{"ops":["Indep",{"Const":1.0}],"indeps":[1],"deps":[]}"#;
    assert!(serde_json::from_str::<Tape64>(json).is_err());

    // dependent out of range
    let json = r#"{"ops":["Indep"],"indeps":[0],"deps":[3]}"#;
    assert!(serde_json::from_str::<Tape64>(json).is_err());
}
