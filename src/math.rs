use std::fmt::{Display, Error as FmtError, Formatter};
use std::ops::{Index, IndexMut};

use ndarray::{Array1, ArrayView1};

use crate::error::InferError;

/// A dense vector of non-negative reals over the K topics.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbVec {
    p: Array1<f64>,
}

impl ProbVec {
    pub fn new(k: usize) -> Self {
        Self::zeros(k)
    }

    pub fn zeros(k: usize) -> Self {
        Self { p: Array1::zeros(k) }
    }

    pub fn uniform(k: usize) -> Self {
        Self { p: Array1::from_elem(k, 1.0 / k as f64) }
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Self { p: Array1::from(values) }
    }

    pub fn assign(&mut self, k: usize, value: f64) {
        self.p = Array1::from_elem(k, value);
    }

    // Contents after a resize are zero, callers overwrite them anyway.
    pub fn resize(&mut self, k: usize) {
        if self.p.len() != k {
            self.p = Array1::zeros(k);
        }
    }

    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.p.sum()
    }

    /// Scales the vector to unit mass. A vector without positive finite mass
    /// is left untouched and reported as [InferError::DegenerateNormalization].
    pub fn normalize(&mut self) -> Result<(), InferError> {
        let sum = self.sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(InferError::DegenerateNormalization(sum));
        }
        self.p.mapv_inplace(|x| x / sum);
        Ok(())
    }

    /// Index of the largest entry, the first one on ties.
    pub fn max_idx(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &value) in self.p.iter().enumerate() {
            match best {
                Some((_, max)) if value <= max => {}
                _ => best = Some((idx, value)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Adds `other` entry-wise.
    pub fn accumulate(&mut self, other: &ProbVec) {
        self.p += &other.p;
    }

    /// Multiplies entry-wise by `factors`, each scaled by `scale`.
    pub fn scale_by(&mut self, factors: ArrayView1<f64>, scale: f64) {
        self.p.zip_mut_with(&factors, |a, &b| *a *= b * scale);
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.p
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.p.to_vec()
    }
}

impl From<Array1<f64>> for ProbVec {
    fn from(p: Array1<f64>) -> Self {
        Self { p }
    }
}

impl Index<usize> for ProbVec {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.p[idx]
    }
}

impl IndexMut<usize> for ProbVec {
    fn index_mut(&mut self, idx: usize) -> &mut f64 {
        &mut self.p[idx]
    }
}

impl Display for ProbVec {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FmtError> {
        for (idx, p) in self.p.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}
