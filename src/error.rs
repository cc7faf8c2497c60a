use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad failure classes, so batch drivers can react without matching every variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    Configuration,
    Io,
    ModelConsistency,
    Data,
}

#[derive(Debug, Error)]
pub enum InferError {
    #[error("Unknown inference strategy: {0} (expected sum_b, sum_w or mix)")]
    UnknownStrategy(String),
    #[error("Unknown output mode: {0} (expected max_idx or prob)")]
    UnknownOutputMode(String),
    #[error("The number of topics must be positive!")]
    InvalidTopicCount,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed at {line}:{position} with {err:?}")]
    ParseFloat {
        line: usize,
        position: usize,
        #[source]
        err: std::num::ParseFloatError,
    },
    #[error("Failed at {line}:{position} with {err:?}")]
    ParseInt {
        line: usize,
        position: usize,
        #[source]
        err: std::num::ParseIntError,
    },
    #[error("{what} sums to {sum}, expected 1 within {tolerance}")]
    NotNormalized {
        what: &'static str,
        sum: f64,
        tolerance: f64,
    },
    #[error("{what} has shape {found:?}, expected {expected:?}")]
    Shape {
        what: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error(transparent)]
    Matrix(#[from] ndarray::ShapeError),
    #[error("Word {word} has zero probability under topic {topic}")]
    ZeroProbability { word: usize, topic: usize },
    #[error("Word {word} is outside the vocabulary of size {vocab_size}")]
    OutOfVocabulary { word: usize, vocab_size: usize },
    #[error("Cannot normalize a vector with total mass {0}")]
    DegenerateNormalization(f64),
}

impl InferError {
    pub fn class(&self) -> ErrorClass {
        match self {
            InferError::UnknownStrategy(_)
            | InferError::UnknownOutputMode(_)
            | InferError::InvalidTopicCount => ErrorClass::Configuration,
            InferError::Io(_)
            | InferError::Open { .. }
            | InferError::ParseFloat { .. }
            | InferError::ParseInt { .. } => ErrorClass::Io,
            InferError::NotNormalized { .. }
            | InferError::Shape { .. }
            | InferError::Matrix(_) => ErrorClass::ModelConsistency,
            InferError::ZeroProbability { .. }
            | InferError::OutOfVocabulary { .. }
            | InferError::DegenerateNormalization(_) => ErrorClass::Data,
        }
    }
}
