use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use strum::{AsRefStr, Display, EnumString};

use crate::error::InferError;
use crate::infer::{Inferencer, Strategy};
use crate::math::ProbVec;
use crate::model::ModelParameters;
use crate::Document;

/// What is written for each document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum OutputMode {
    /// the most probable topic
    #[strum(serialize = "max_idx")]
    MaxIdx,
    /// the whole p(z|d)
    #[strum(serialize = "prob")]
    Prob,
}

impl OutputMode {
    pub fn from_name(name: &str) -> Result<Self, InferError> {
        name.parse().map_err(|_| InferError::UnknownOutputMode(name.to_owned()))
    }

    fn write_line<W: Write>(&self, writer: &mut W, pz_d: &ProbVec) -> Result<(), InferError> {
        match self {
            OutputMode::MaxIdx => match pz_d.max_idx() {
                Some(idx) => writeln!(writer, "{}", idx)?,
                None => writeln!(writer)?,
            },
            OutputMode::Prob => writeln!(writer, "{}", pz_d)?,
        }
        Ok(())
    }
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Prob
    }
}

#[derive(Debug, Clone)]
pub struct InferConfig {
    // tokenized documents, one per line
    docs: PathBuf,
    // holds k{K}.pz and k{K}.pw_z, receives the output
    model_dir: PathBuf,
    // Number of topics
    k: usize,
    // appended to k{K} to name the output file
    suffix: String,
    strategy: Strategy,
    output: OutputMode,
    // training checkpoint to load, None for the final model
    iteration: Option<usize>,
}

pub struct InferConfigBuilder {
    docs: PathBuf,
    model_dir: PathBuf,
    k: usize,
    suffix: String,
    strategy: Strategy,
    output: OutputMode,
    iteration: Option<usize>,
}

impl InferConfigBuilder {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(docs: P, model_dir: Q, k: usize) -> Self {
        Self {
            docs: docs.as_ref().to_path_buf(),
            model_dir: model_dir.as_ref().to_path_buf(),
            k,
            suffix: ".pz_d".to_owned(),
            strategy: Strategy::default(),
            output: OutputMode::default(),
            iteration: None,
        }
    }

    pub fn suffix<'a>(&'a mut self, suffix: &str) -> &'a mut Self {
        self.suffix = suffix.to_owned();
        self
    }

    pub fn strategy<'a>(&'a mut self, strategy: Strategy) -> &'a mut Self {
        self.strategy = strategy;
        self
    }

    pub fn output<'a>(&'a mut self, output: OutputMode) -> &'a mut Self {
        self.output = output;
        self
    }

    pub fn iteration<'a>(&'a mut self, iteration: Option<usize>) -> &'a mut Self {
        self.iteration = iteration;
        self
    }

    pub fn build(&mut self) -> Result<InferConfig, InferError> {
        if self.k == 0 {
            return Err(InferError::InvalidTopicCount);
        }

        Ok(InferConfig {
            docs: self.docs.clone(),
            model_dir: self.model_dir.clone(),
            k: self.k,
            suffix: self.suffix.clone(),
            strategy: self.strategy,
            output: self.output,
            iteration: self.iteration,
        })
    }
}

impl InferConfig {
    pub fn docs(&self) -> &Path {
        &self.docs
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }

    pub fn iteration(&self) -> Option<usize> {
        self.iteration
    }

    /// `model_dir/k{K}{suffix}`
    pub fn output_path(&self) -> PathBuf {
        self.model_dir.join(format!("k{}{}", self.k, self.suffix))
    }
}

/// Documents inferred together by [infer_stream] before their results are written.
pub const STREAM_CHUNK: usize = 4096;

/// Infers every line of `reader` and writes one result line per input line,
/// in input order. Lines are processed in chunks of [STREAM_CHUNK] documents,
/// so memory does not grow with the input. Returns the number of documents.
pub fn infer_stream<R: BufRead, W: Write>(
    inferencer: &Inferencer,
    mode: OutputMode,
    reader: R,
    mut writer: W,
) -> Result<usize, InferError> {
    let mut docs = Vec::with_capacity(STREAM_CHUNK);
    let mut n = 0;
    for (idx, line) in reader.lines().enumerate() {
        docs.push(Document::parse_line(&line?, idx + 1)?);
        if docs.len() == STREAM_CHUNK {
            n += write_chunk(inferencer, mode, &docs, &mut writer)?;
            docs.clear();
        }
    }
    n += write_chunk(inferencer, mode, &docs, &mut writer)?;
    writer.flush()?;

    Ok(n)
}

fn write_chunk<W: Write>(
    inferencer: &Inferencer,
    mode: OutputMode,
    docs: &[Document],
    writer: &mut W,
) -> Result<usize, InferError> {
    let results = inferencer.infer_all(docs)?;
    for pz_d in results.iter() {
        mode.write_line(writer, pz_d)?;
    }
    Ok(results.len())
}

/// Loads the model, infers p(z|d) for every document of the input file and
/// writes the results to [InferConfig::output_path].
pub fn run(config: &InferConfig) -> Result<PathBuf, InferError> {
    let model = ModelParameters::load(&config.model_dir, config.k, config.iteration)?;
    let inferencer = Inferencer::new(&model, config.strategy);

    info!("Infer p(z|d) for docs in: {}", config.docs.display());
    let reader = File::open(&config.docs)
        .map(BufReader::new)
        .map_err(|source| InferError::Open { path: config.docs.clone(), source })?;

    let out_path = config.output_path();
    info!("write p(z|d): {}", out_path.display());
    let writer = File::create(&out_path)
        .map(BufWriter::new)
        .map_err(|source| InferError::Open { path: out_path.clone(), source })?;

    let n = infer_stream(&inferencer, config.output, reader, writer)?;
    info!("inferred {} documents with {}", n, inferencer.strategy());

    Ok(out_path)
}
