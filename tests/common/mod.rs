#![allow(dead_code)]

use std::fs;
use std::path::Path;

use approx::abs_diff_eq;
use btm_infer::{ModelParameters, ProbVec};
use ndarray::{arr1, arr2};

/// K=2, W=2: p(z) = [0.5, 0.5], p(w|z) = [[0.8, 0.2], [0.3, 0.7]]
pub fn two_topic_model() -> ModelParameters {
    ModelParameters::new(arr1(&[0.5, 0.5]), arr2(&[[0.8, 0.2], [0.3, 0.7]])).unwrap()
}

pub fn write_model(dir: &Path, k: usize, suffix: &str, pz: &str, pw_z: &str) {
    fs::write(dir.join(format!("k{}.pz{}", k, suffix)), pz).unwrap();
    fs::write(dir.join(format!("k{}.pw_z{}", k, suffix)), pw_z).unwrap();
}

pub fn assert_close(actual: &ProbVec, expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{} vs {:?}", actual, expected);
    for (idx, e) in expected.iter().enumerate() {
        assert!(abs_diff_eq!(actual[idx], *e, epsilon = 1e-6), "{} vs {:?}", actual, expected);
    }
}
