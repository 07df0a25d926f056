//! Helpers shared by the integration tests.

#![allow(dead_code)]

use cgmath::{InnerSpace, Quaternion, Vector3};
use std::path::PathBuf;

pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// `q` and `-q` describe the same rotation.
pub fn assert_same_rotation(actual: Quaternion<f64>, expected: Quaternion<f64>) {
    assert!(
        actual.dot(expected).abs() > 1.0 - 1e-9,
        "rotation mismatch: {:?} != {:?}",
        actual,
        expected
    );
}

pub fn assert_close(actual: Vector3<f64>, expected: Vector3<f64>) {
    assert!(
        (actual - expected).magnitude() < 1e-9,
        "vector mismatch: {:?} != {:?}",
        actual,
        expected
    );
}
