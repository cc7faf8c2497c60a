extern crate indexmap;
extern crate itertools;
extern crate ndarray;
extern crate rayon;
extern crate strum;
extern crate thiserror;
#[macro_use]
extern crate log;

use indexmap::IndexMap;
use itertools::Itertools;
use std::iter::FromIterator;

pub mod driver;
pub mod error;
pub mod infer;
pub mod math;
pub mod model;

pub use driver::{infer_stream, run, InferConfig, InferConfigBuilder, OutputMode, STREAM_CHUNK};
pub use error::{ErrorClass, InferError};
pub use infer::{Inferencer, Strategy};
pub use math::ProbVec;
pub use model::ModelParameters;

/// An unordered pair of words co-occurring in one document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Biterm {
    wi: usize,
    wj: usize,
}

impl Biterm {
    /// Stores the pair with the smaller word index first.
    pub fn new(w1: usize, w2: usize) -> Self {
        Self {
            wi: w1.min(w2),
            wj: w1.max(w2),
        }
    }

    pub fn get_wi(&self) -> usize {
        self.wi
    }

    pub fn get_wj(&self) -> usize {
        self.wj
    }
}

/// A tokenized document: word indices in their original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub ws: Vec<usize>,
}

impl Document {
    pub fn new() -> Self {
        Self { ws: Vec::new() }
    }

    /// Parses whitespace separated word indices. `line_no` is only used
    /// for error reporting.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, InferError> {
        line.split_whitespace()
            .enumerate()
            .map(|(position, token)| {
                token.parse::<usize>().map_err(|err| InferError::ParseInt { line: line_no, position, err })
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.ws.len()
    }

    pub fn get_w(&self, i: usize) -> usize {
        self.ws[i]
    }

    pub fn get_ws(&self) -> &[usize] {
        &self.ws
    }

    /// Every pair of token positions `i < j`, without deduplicating equal words.
    pub fn gen_biterms(&self) -> Vec<Biterm> {
        self.ws
            .iter()
            .tuple_combinations()
            .map(|(&w1, &w2)| Biterm::new(w1, w2))
            .collect()
    }

    /// Bag of words in first-occurrence order.
    pub fn word_counts(&self) -> IndexMap<usize, f64> {
        let mut words = IndexMap::new();
        for &w in self.ws.iter() {
            *words.entry(w).or_insert(0_f64) += 1_f64;
        }
        words
    }
}

impl From<Vec<usize>> for Document {
    fn from(ws: Vec<usize>) -> Self {
        Self { ws }
    }
}

impl FromIterator<usize> for Document {
    fn from_iter<I: IntoIterator<Item=usize>>(iter: I) -> Self {
        Self { ws: iter.into_iter().collect() }
    }
}

impl<'a> FromIterator<&'a usize> for Document {
    fn from_iter<I: IntoIterator<Item=&'a usize>>(iter: I) -> Self {
        iter.into_iter().cloned().collect()
    }
}
