use crate::util;
use cgmath::{InnerSpace, Vector3};
use assert_approx_eq::assert_approx_eq;

#[test]
fn direction_between_should_be_unit_length() {
    let dir = util::direction_between(Vector3::new(1.0, 1.0, 1.0), Vector3::new(4.0, 5.0, 1.0)).unwrap();
    assert_approx_eq!(dir.magnitude(), 1.0);
    assert_approx_eq!(dir.x, 0.6);
    assert_approx_eq!(dir.y, 0.8);
    assert_approx_eq!(dir.z, 0.0);
}

#[test]
fn direction_between_coincident_points_is_none() {
    let p = Vector3::new(0.5, -2.0, 3.0);
    assert!(util::direction_between(p, p).is_none());
}

#[test]
fn safe_normalize_rejects_nan() {
    assert!(util::safe_normalize(Vector3::new(f32::NAN, 0.0, 0.0)).is_none());
}

#[test]
fn distance_between_should_be_5() {
    let d = util::distance_between(Vector3::new(0.0, 0.0, 0.0), Vector3::new(3.0, 0.0, 4.0));
    assert_approx_eq!(d, 5.0);
}

#[test]
fn v_approximately_equals_checks_every_component() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    assert!(util::v_approximately_equals(a, Vector3::new(1.0005, 2.0, 2.9995), 0.001));
    assert!(!util::v_approximately_equals(a, Vector3::new(1.0, 2.0, 3.1), 0.001));
}

//should hold for the axis-aligned special case too.
#[test]
fn perpendicular_to_should_be_perpendicular() {
    for u in [Vector3::unit_x(), Vector3::unit_y(), -Vector3::unit_y(), Vector3::new(1.0f32, 1.0, 1.0).normalize()].iter() {
        let p = util::perpendicular_to(*u);
        assert_approx_eq!(p.dot(*u), 0.0);
        assert_approx_eq!(p.magnitude(), 1.0);
    }
}
