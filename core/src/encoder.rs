use crate::sparse::SparseVector;
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub type TermId = u32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncoderError {
    #[error("encoder has not been fitted; fit it on a corpus first")]
    NotFitted,
    #[error("cannot fit on an empty corpus")]
    EmptyCorpus,
}

/// The two BM25 tuning knobs: `k1` bounds how far repeated occurrences of a
/// term can push its weight, `b` controls how strongly weights are discounted
/// for documents longer than the corpus average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FittedState {
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
    avgdl: f32,
    num_docs: u32,
}

impl FittedState {
    fn idf(&self, tid: TermId) -> f32 {
        let n = self.num_docs as f32;
        let df = self.df[tid as usize] as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }
}

/// Sparse lexical encoder: fits BM25 term statistics over a corpus and turns
/// free text into a [`SparseVector`] against the fitted vocabulary.
///
/// Term indices are dense, assigned in first-seen order at fit time, and
/// stable until the next `fit` (which replaces the state wholesale and may
/// reassign them). Terms outside the fitted vocabulary carry no lexical
/// signal and are silently dropped at encode time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bm25Encoder {
    params: Bm25Params,
    tokenizer: Tokenizer,
    state: Option<FittedState>,
}

impl Default for Bm25Encoder {
    fn default() -> Self {
        Self::new(Bm25Params::default())
    }
}

impl Bm25Encoder {
    pub fn new(params: Bm25Params) -> Self {
        Self { params, tokenizer: Tokenizer::default(), state: None }
    }

    pub fn with_tokenizer(params: Bm25Params, tokenizer: Tokenizer) -> Self {
        Self { params, tokenizer, state: None }
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    pub fn num_docs(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.num_docs)
    }

    pub fn vocab_size(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.dictionary.len())
    }

    pub fn avgdl(&self) -> f32 {
        self.state.as_ref().map_or(0.0, |s| s.avgdl)
    }

    /// Index assigned to a term, after running it through the same analysis
    /// chain used at fit time. `None` when unfitted or out of vocabulary.
    pub fn term_index(&self, term: &str) -> Option<TermId> {
        let state = self.state.as_ref()?;
        let tokens = self.tokenizer.tokenize(term);
        tokens.first().and_then(|t| state.dictionary.get(t).copied())
    }

    /// Fit term statistics over the full corpus. Replaces any previously
    /// fitted state; last fit wins.
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<(), EncoderError> {
        if docs.is_empty() {
            self.state = None;
            return Err(EncoderError::EmptyCorpus);
        }
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        let mut total_len: u64 = 0;
        for doc in docs {
            let tokens = self.tokenizer.tokenize(doc.as_ref());
            total_len += tokens.len() as u64;
            let mut seen: HashSet<TermId> = HashSet::new();
            for term in tokens {
                let next = dictionary.len() as TermId;
                let tid = *dictionary.entry(term).or_insert(next);
                if tid as usize == df.len() {
                    df.push(0);
                }
                if seen.insert(tid) {
                    df[tid as usize] += 1;
                }
            }
        }
        let num_docs = docs.len() as u32;
        // avgdl > 0 whenever the vocabulary is non-empty, which is the only
        // case where it is read back.
        let avgdl = if total_len == 0 { 0.0 } else { total_len as f32 / num_docs as f32 };
        tracing::debug!(num_docs, vocab_size = dictionary.len(), avgdl, "fitted sparse encoder");
        self.state = Some(FittedState { dictionary, df, avgdl, num_docs });
        Ok(())
    }

    fn fitted(&self) -> Result<&FittedState, EncoderError> {
        self.state.as_ref().ok_or(EncoderError::NotFitted)
    }

    /// Document-side encoding: saturating term frequency scaled by inverse
    /// document frequency and normalized by document length relative to the
    /// corpus average. Weight for term t with raw frequency tf in a document
    /// of length dl:
    ///
    ///   idf(t) * tf * (k1 + 1) / (tf + k1 * (1 - b + b * dl / avgdl))
    pub fn encode_document(&self, text: &str) -> Result<SparseVector, EncoderError> {
        let state = self.fitted()?;
        let tokens = self.tokenizer.tokenize(text);
        let dl = tokens.len() as f32;
        let mut tf: HashMap<TermId, u32> = HashMap::new();
        for term in &tokens {
            if let Some(&tid) = state.dictionary.get(term) {
                *tf.entry(tid).or_insert(0) += 1;
            }
        }
        let Bm25Params { k1, b } = self.params;
        let norm = 1.0 - b + b * dl / state.avgdl;
        let weights = tf.into_iter().map(|(tid, count)| {
            let tf = count as f32;
            let saturated = tf * (k1 + 1.0) / (tf + k1 * norm);
            (tid, state.idf(tid) * saturated)
        });
        Ok(SparseVector::from_weights(weights))
    }

    /// Query-side encoding: raw in-query term frequencies, no document
    /// frequency or length scaling. The hosted index scores sparse pairs by
    /// dot product, so keeping idf and saturation on the document side makes
    /// query . document reproduce the classical two-parameter ranking sum;
    /// applying document-side weighting to queries as well would count idf
    /// twice.
    pub fn encode_query(&self, text: &str) -> Result<SparseVector, EncoderError> {
        let state = self.fitted()?;
        let mut tf: HashMap<TermId, u32> = HashMap::new();
        for term in self.tokenizer.tokenize(text) {
            if let Some(&tid) = state.dictionary.get(&term) {
                *tf.entry(tid).or_insert(0) += 1;
            }
        }
        Ok(SparseVector::from_weights(tf.into_iter().map(|(tid, count)| (tid, count as f32))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_before_fit_is_an_error() {
        let enc = Bm25Encoder::default();
        assert_eq!(enc.encode_document("anything").unwrap_err(), EncoderError::NotFitted);
        assert_eq!(enc.encode_query("anything").unwrap_err(), EncoderError::NotFitted);
    }

    #[test]
    fn fit_on_empty_corpus_is_an_error() {
        let mut enc = Bm25Encoder::default();
        let docs: [&str; 0] = [];
        assert_eq!(enc.fit(&docs).unwrap_err(), EncoderError::EmptyCorpus);
        assert!(!enc.is_fitted());
    }

    #[test]
    fn refit_replaces_state() {
        let mut enc = Bm25Encoder::default();
        enc.fit(&["apple banana"]).unwrap();
        assert!(enc.term_index("banana").is_some());
        enc.fit(&["cherry"]).unwrap();
        assert!(enc.term_index("banana").is_none());
        assert!(enc.term_index("cherry").is_some());
    }
}
