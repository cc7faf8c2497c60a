use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::InferError;

/// Allowed deviation of a loaded distribution's mass from 1.
pub const SUM_TOLERANCE: f64 = 1e-4;

/// Parameters of a trained biterm topic model.
#[derive(Debug, Clone)]
pub struct ModelParameters {
    // p(z), length K
    pz: Array1<f64>,
    // p(w|z), K x W, indexed [topic, word]
    pw_z: Array2<f64>,
}

impl ModelParameters {
    /// Validates the parameters the same way [ModelParameters::load] does.
    ///
    /// Only the first row of `pw_z` is checked for unit mass; the other rows are
    /// trusted to be normalized by training.
    pub fn new(pz: Array1<f64>, pw_z: Array2<f64>) -> Result<Self, InferError> {
        let k = pz.len();
        if k == 0 {
            return Err(InferError::InvalidTopicCount);
        }
        if pw_z.nrows() != k {
            return Err(InferError::Shape {
                what: "p(w|z)",
                expected: vec![k, pw_z.ncols()],
                found: pw_z.shape().to_vec(),
            });
        }
        check_sum("p(z)", pz.sum())?;
        check_sum("p(w|z=0)", pw_z.row(0).sum())?;

        Ok(Self { pz, pw_z })
    }

    /// Loads `k{K}.pz` and `k{K}.pw_z` from `model_dir`. A positive
    /// `iteration` selects the checkpoint files `k{K}.pz.{iteration}` and
    /// `k{K}.pw_z.{iteration}`.
    pub fn load<P: AsRef<Path>>(model_dir: P, k: usize, iteration: Option<usize>) -> Result<Self, InferError> {
        if k == 0 {
            return Err(InferError::InvalidTopicCount);
        }
        let it_suffix = match iteration {
            Some(it) if it > 0 => format!(".{}", it),
            _ => String::new(),
        };
        let dir = model_dir.as_ref();

        let pz_path = dir.join(format!("k{}.pz{}", k, it_suffix));
        info!("load p(z): {}", pz_path.display());
        let pz = Array1::from(read_values(&pz_path)?);
        if pz.len() != k {
            return Err(InferError::Shape {
                what: "p(z)",
                expected: vec![k],
                found: vec![pz.len()],
            });
        }
        check_sum("p(z)", pz.sum())?;

        let pw_z_path = dir.join(format!("k{}.pw_z{}", k, it_suffix));
        info!("load p(w|z): {}", pw_z_path.display());
        let pw_z = read_matrix(&pw_z_path)?;
        info!("n(z)={}, n(w)={}", pw_z.nrows(), pw_z.ncols());

        Self::new(pz, pw_z)
    }

    /// Number of topics K.
    pub fn num_topics(&self) -> usize {
        self.pw_z.nrows()
    }

    /// Vocabulary size W.
    pub fn vocab_size(&self) -> usize {
        self.pw_z.ncols()
    }

    pub fn contains(&self, w: usize) -> bool {
        w < self.vocab_size()
    }

    pub fn pz(&self) -> &Array1<f64> {
        &self.pz
    }

    pub fn pw_z(&self) -> &Array2<f64> {
        &self.pw_z
    }

    /// p(w|z) for all topics; `w` must be in the vocabulary.
    pub fn word_column(&self, w: usize) -> ArrayView1<f64> {
        self.pw_z.column(w)
    }
}

fn check_sum(what: &'static str, sum: f64) -> Result<(), InferError> {
    if (sum - 1.0).abs() < SUM_TOLERANCE {
        Ok(())
    } else {
        Err(InferError::NotNormalized { what, sum, tolerance: SUM_TOLERANCE })
    }
}

fn open(path: &Path) -> Result<BufReader<File>, InferError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| InferError::Open { path: PathBuf::from(path), source })
}

fn parse_line(line: &str, line_no: usize) -> Result<Vec<f64>, InferError> {
    line.split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token.parse::<f64>().map_err(|err| InferError::ParseFloat { line: line_no, position, err })
        })
        .collect()
}

// All values of the file, regardless of how they are spread over lines.
fn read_values(path: &Path) -> Result<Vec<f64>, InferError> {
    let mut values = Vec::new();
    for (idx, line) in open(path)?.lines().enumerate() {
        values.extend(parse_line(&line?, idx + 1)?);
    }
    Ok(values)
}

// One row per non-empty line.
fn read_matrix(path: &Path) -> Result<Array2<f64>, InferError> {
    let mut data = Vec::new();
    let mut rows = 0;
    let mut cols = None;
    for (idx, line) in open(path)?.lines().enumerate() {
        let row = parse_line(&line?, idx + 1)?;
        if row.is_empty() {
            continue;
        }
        match cols {
            None => cols = Some(row.len()),
            Some(c) if c != row.len() => {
                return Err(InferError::Shape {
                    what: "p(w|z) row",
                    expected: vec![c],
                    found: vec![row.len()],
                });
            }
            _ => {}
        }
        data.extend(row);
        rows += 1;
    }

    Ok(Array2::from_shape_vec((rows, cols.unwrap_or(0)), data)?)
}
