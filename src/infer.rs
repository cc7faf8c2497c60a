use rayon::prelude::*;
use strum::{AsRefStr, Display, EnumString};

use crate::error::InferError;
use crate::math::ProbVec;
use crate::model::ModelParameters;
use crate::Document;

// The running product of `mix` is renormalized once its mass leaves this range.
const MIX_MIN_MASS: f64 = 1e-100;
const MIX_MAX_MASS: f64 = 1e100;

/// How the evidence of a document is folded into p(z|d).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, AsRefStr, EnumString)]
pub enum Strategy {
    /// p(z|d) = sum_b p(z|b) p(b|d)
    #[strum(serialize = "sum_b")]
    SumB,
    /// p(z|d) = sum_w p(z|w) p(w|d)
    #[strum(serialize = "sum_w")]
    SumW,
    /// p(z|d) propto p(z) prod_w p(w|z)
    #[strum(serialize = "mix")]
    Mix,
}

impl Strategy {
    pub fn from_name(name: &str) -> Result<Self, InferError> {
        name.parse().map_err(|_| InferError::UnknownStrategy(name.to_owned()))
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::SumB
    }
}

/// Infers topic proportions of unseen documents under a fixed model.
#[derive(Debug, Copy, Clone)]
pub struct Inferencer<'a> {
    model: &'a ModelParameters,
    strategy: Strategy,
}

impl<'a> Inferencer<'a> {
    pub fn new(model: &'a ModelParameters, strategy: Strategy) -> Self {
        Self { model, strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// p(z|d) for a single document.
    pub fn doc_infer(&self, doc: &Document) -> Result<ProbVec, InferError> {
        match self.strategy {
            Strategy::SumB => self.doc_infer_sum_b(doc),
            Strategy::SumW => self.doc_infer_sum_w(doc),
            Strategy::Mix => self.doc_infer_mix(doc),
        }
    }

    /// p(z|d) for every document, in input order. Documents are processed in
    /// parallel; the first failure aborts the batch.
    pub fn infer_all(&self, docs: &[Document]) -> Result<Vec<ProbVec>, InferError> {
        docs.par_iter().map(|doc| self.doc_infer(doc)).collect()
    }

    fn doc_infer_sum_b(&self, doc: &Document) -> Result<ProbVec, InferError> {
        let k = self.model.num_topics();
        let pz = self.model.pz();
        let pw_z = self.model.pw_z();
        let mut pz_d = ProbVec::zeros(k);

        if doc.size() == 1 {
            // a single word has no biterms, p(z|d) = p(z|w) propto p(z)p(w|z)
            let w = doc.get_w(0);
            if !self.model.contains(w) {
                return Ok(self.no_evidence());
            }
            for z in 0..k {
                pz_d[z] = pz[z] * pw_z[[z, w]];
            }
        } else {
            let mut retained = 0;
            for b in doc.gen_biterms() {
                let w1 = b.get_wi();
                let w2 = b.get_wj();
                // out-of-vocabulary filter looks at the second word only
                if !self.model.contains(w2) {
                    continue;
                }

                // p(z|b) propto p(z)p(w1|z)p(w2|z)
                let mut pz_b = ProbVec::zeros(k);
                for z in 0..k {
                    let (p1, p2) = (pw_z[[z, w1]], pw_z[[z, w2]]);
                    if !(p1 > 0.0) {
                        return Err(InferError::ZeroProbability { word: w1, topic: z });
                    }
                    if !(p2 > 0.0) {
                        return Err(InferError::ZeroProbability { word: w2, topic: z });
                    }
                    pz_b[z] = pz[z] * p1 * p2;
                }
                pz_b.normalize()?;

                // p(b|d) is uniform
                pz_d.accumulate(&pz_b);
                retained += 1;
            }
            if retained == 0 {
                return Ok(self.no_evidence());
            }
        }

        pz_d.normalize()?;
        Ok(pz_d)
    }

    fn doc_infer_sum_w(&self, doc: &Document) -> Result<ProbVec, InferError> {
        let k = self.model.num_topics();
        let pz = self.model.pz();
        let mut pz_d = ProbVec::zeros(k);

        let mut retained = 0;
        for (&w, &count) in doc.word_counts().iter() {
            if !self.model.contains(w) {
                continue;
            }

            // p(z|w) propto p(z)p(w|z)
            let mut pz_w = ProbVec::from(pz * &self.model.word_column(w));
            pz_w.normalize()?;

            // p(w|d) is uniform over tokens, repeated words count repeatedly
            for z in 0..k {
                pz_d[z] += count * pz_w[z];
            }
            retained += 1;
        }
        if retained == 0 {
            return Ok(self.no_evidence());
        }

        pz_d.normalize()?;
        Ok(pz_d)
    }

    fn doc_infer_mix(&self, doc: &Document) -> Result<ProbVec, InferError> {
        let mut pz_d = ProbVec::from(self.model.pz().clone());

        // scaling by W keeps the running product away from underflow, the
        // occasional renormalization from overflow on long documents
        let scale = self.model.vocab_size() as f64;
        for &w in doc.get_ws() {
            if !self.model.contains(w) {
                continue;
            }
            pz_d.scale_by(self.model.word_column(w), scale);

            let mass = pz_d.sum();
            if mass < MIX_MIN_MASS || mass > MIX_MAX_MASS {
                pz_d.normalize()?;
            }
        }

        pz_d.normalize()?;
        Ok(pz_d)
    }

    /// p(z|d,w) propto p(w|z)p(z|d), the topic posterior of one word inside a
    /// document whose p(z|d) is already known.
    pub fn compute_pz_dw(&self, w: usize, pz_d: &ProbVec) -> Result<ProbVec, InferError> {
        let k = self.model.num_topics();
        if !self.model.contains(w) {
            return Err(InferError::OutOfVocabulary { word: w, vocab_size: self.model.vocab_size() });
        }
        if pz_d.len() != k {
            return Err(InferError::Shape {
                what: "p(z|d)",
                expected: vec![k],
                found: vec![pz_d.len()],
            });
        }

        let mut p = ProbVec::from(pz_d.as_array() * &self.model.word_column(w));
        p.normalize()?;
        Ok(p)
    }

    fn no_evidence(&self) -> ProbVec {
        debug!("no in-vocabulary evidence, falling back to a uniform p(z|d)");
        ProbVec::uniform(self.model.num_topics())
    }
}
