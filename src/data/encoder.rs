// ============================================================
// Layer 4: Sequence Encoder
// ============================================================
// Turns raw documents into a fixed-shape integer matrix that
// the embedding layer can consume.
//
// Pipeline per document:
//
//   "I love you very much"
//       │  Tokenize
//       ▼
//   [i, love, you, very, much]
//       │  Vocabulary lookup (out-of-vocabulary tokens are DROPPED)
//       ▼
//   [4, 5, 3, 6, 7]
//       │  pad_and_truncate(seq_len = 6, padding = pre)
//       ▼
//   [0, 4, 5, 3, 6, 7]
//
// Dropping unknown tokens means a document can come out with
// less content than it went in with; a document with no known
// tokens at all becomes a row of zeros. Neither is an error.
//
// Lifecycle:
//   1. SequenceEncoder::new(config)   : no vocabulary yet
//   2. encoder.fit(training_texts)    : vocabulary frozen
//   3. encoder.encode / encode_batch  : any number of times
//
// A second fit() is refused. To encode with a saved vocabulary
// use with_vocabulary() instead of fitting again.
//
// Reference: Rust Book §16 (Shared-State Concurrency with Arc)
//            rayon crate documentation

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::error::EncoderError;
use crate::data::padding::{pad_and_truncate, PadSide};
use crate::data::tokenizer::WordTokenizer;
use crate::data::vocabulary::Vocabulary;
use crate::domain::traits::Tokenize;

// ─── EncoderConfig ────────────────────────────────────────────────────────────
/// Shape and policy of the encoded output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Maximum number of tokens kept in the vocabulary (inclusive)
    pub vocab_size: usize,

    /// Width of every encoded row
    pub seq_len: usize,

    /// Where zeros go when a document is too short
    pub padding: PadSide,

    /// Which end is cut when a document is too long
    pub truncating: PadSide,
}

impl EncoderConfig {
    pub fn new(vocab_size: usize, seq_len: usize, padding: PadSide, truncating: PadSide) -> Self {
        Self { vocab_size, seq_len, padding, truncating }
    }

    /// Check that both sizes are positive.
    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.seq_len == 0 {
            return Err(EncoderError::invalid_configuration(
                "sequence length must be greater than 0",
            ));
        }
        if self.vocab_size == 0 {
            return Err(EncoderError::invalid_configuration(
                "vocabulary size must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            vocab_size: 5000,
            seq_len:    100,
            padding:    PadSide::Pre,
            truncating: PadSide::Pre,
        }
    }
}

// ─── EncodedMatrix ────────────────────────────────────────────────────────────
/// Row-major `[rows, seq_len]` matrix of token indices.
/// Row order matches the order of the input documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMatrix {
    seq_len: usize,
    data:    Vec<u32>,
}

impl EncodedMatrix {
    pub fn rows(&self) -> usize {
        self.data.len() / self.seq_len
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// Row `i`, or None if out of range.
    pub fn row(&self, i: usize) -> Option<&[u32]> {
        let start = i.checked_mul(self.seq_len)?;
        self.data.get(start..start + self.seq_len)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.data.chunks_exact(self.seq_len)
    }

    /// The whole matrix as one flat slice.
    pub fn as_flat(&self) -> &[u32] {
        &self.data
    }
}

// ─── SequenceEncoder ──────────────────────────────────────────────────────────
/// Tokenizer + frozen vocabulary + length policy.
#[derive(Debug, Clone)]
pub struct SequenceEncoder<T: Tokenize = WordTokenizer> {
    config:     EncoderConfig,
    tokenizer:  T,
    vocabulary: Option<Arc<Vocabulary>>,
}

impl SequenceEncoder<WordTokenizer> {
    /// Create an unfitted encoder using the default word tokenizer.
    pub fn new(config: EncoderConfig) -> Result<Self, EncoderError> {
        Self::with_tokenizer(config, WordTokenizer::new())
    }
}

impl<T: Tokenize> SequenceEncoder<T> {
    /// Create an unfitted encoder with a custom tokenizer.
    pub fn with_tokenizer(config: EncoderConfig, tokenizer: T) -> Result<Self, EncoderError> {
        config.validate()?;
        Ok(Self { config, tokenizer, vocabulary: None })
    }

    /// Attach an already fitted vocabulary (e.g. one loaded from disk).
    /// Its cap may not exceed `vocab_size`, or indices would run past
    /// the embedding table sized from this config.
    pub fn with_vocabulary(mut self, vocabulary: Arc<Vocabulary>) -> Result<Self, EncoderError> {
        if self.vocabulary.is_some() {
            return Err(EncoderError::VocabularyFrozen);
        }
        if vocabulary.max_size() > self.config.vocab_size {
            return Err(EncoderError::invalid_configuration(format!(
                "vocabulary cap {} exceeds the configured vocab_size {}",
                vocabulary.max_size(),
                self.config.vocab_size,
            )));
        }
        self.vocabulary = Some(vocabulary);
        Ok(self)
    }

    /// Fit the vocabulary on the TRAINING corpus. Allowed once.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<Arc<Vocabulary>, EncoderError> {
        if self.vocabulary.is_some() {
            return Err(EncoderError::VocabularyFrozen);
        }
        let vocab = Arc::new(Vocabulary::fit(corpus, self.config.vocab_size, &self.tokenizer)?);
        tracing::info!(
            "Fitted vocabulary on {} documents: {} tokens",
            corpus.len(),
            vocab.len()
        );
        self.vocabulary = Some(Arc::clone(&vocab));
        Ok(vocab)
    }

    pub fn vocabulary(&self) -> Option<&Arc<Vocabulary>> {
        self.vocabulary.as_ref()
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Encode one document into exactly `seq_len` indices.
    pub fn encode(&self, doc: &str) -> Result<Vec<u32>, EncoderError> {
        let vocab = self.fitted()?;
        Ok(self.encode_with(vocab, doc))
    }

    /// Encode many documents. Rows are computed in parallel and
    /// returned in input order.
    pub fn encode_batch<S>(&self, docs: &[S]) -> Result<EncodedMatrix, EncoderError>
    where
        S: AsRef<str> + Sync,
    {
        let vocab = self.fitted()?;
        let rows: Vec<Vec<u32>> = docs
            .par_iter()
            .map(|doc| self.encode_with(vocab, doc.as_ref()))
            .collect();

        Ok(EncodedMatrix {
            seq_len: self.config.seq_len,
            data:    rows.concat(),
        })
    }

    fn fitted(&self) -> Result<&Vocabulary, EncoderError> {
        self.vocabulary
            .as_deref()
            .ok_or(EncoderError::UnfitVocabulary)
    }

    fn encode_with(&self, vocab: &Vocabulary, doc: &str) -> Vec<u32> {
        let ids = vocab.indices_for(&self.tokenizer.tokenize(doc));
        pad_and_truncate(ids, self.config.seq_len, self.config.padding, self.config.truncating)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use PadSide::{Post, Pre};

    const CORPUS: [&str; 2] = ["Hello there, you!", "I love very much"];

    fn fitted(seq_len: usize, padding: PadSide, truncating: PadSide) -> SequenceEncoder {
        let mut enc = SequenceEncoder::new(EncoderConfig::new(100, seq_len, padding, truncating)).unwrap();
        enc.fit(&CORPUS).unwrap();
        enc
    }

    fn alphabet_encoder(seq_len: usize, padding: PadSide, truncating: PadSide) -> SequenceEncoder {
        // one occurrence each, so a=1, b=2, ... in first-seen order
        let mut enc = SequenceEncoder::new(EncoderConfig::new(26, seq_len, padding, truncating)).unwrap();
        enc.fit(&["a b c d e f g h i j k l m n o p q r s t u v w x y z"]).unwrap();
        enc
    }

    fn first_content_column(row: &[u32]) -> Option<usize> {
        row.iter().position(|&i| i != 0)
    }

    #[test]
    fn test_worked_example() {
        let enc = fitted(6, Pre, Pre);
        assert_eq!(enc.encode("I love you very much").unwrap(), vec![0, 4, 5, 3, 6, 7]);
    }

    #[test]
    fn test_default_config() {
        let cfg = EncoderConfig::default();
        assert_eq!(cfg.seq_len, 100);
        assert_eq!(cfg.padding, Pre);
        assert_eq!(cfg.truncating, Pre);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_every_row_has_seq_len() {
        let docs = [
            "",
            "a",
            "a b c",
            "z y x w v u t s r q p o n m l k j i h g f e d c b a",
            "unknown words only",
        ];
        for seq_len in [1, 2, 5, 6, 10, 40] {
            for padding in [Pre, Post] {
                for truncating in [Pre, Post] {
                    let enc = alphabet_encoder(seq_len, padding, truncating);
                    let m   = enc.encode_batch(&docs).unwrap();
                    assert_eq!(m.rows(), docs.len());
                    assert!(m.iter().all(|row| row.len() == seq_len));
                }
            }
        }
    }

    #[test]
    fn test_exact_length_has_no_padding() {
        let enc = alphabet_encoder(6, Post, Post);
        assert_eq!(enc.encode("a b c d e f").unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let enc = fitted(6, Pre, Post);
        let doc = "you there, I love hello";
        assert_eq!(enc.encode(doc).unwrap(), enc.encode(doc).unwrap());
        assert_eq!(enc.encode_batch(&[doc]).unwrap(), enc.encode_batch(&[doc]).unwrap());
    }

    #[test]
    fn test_post_padding_aligns_first_token_at_column_zero() {
        let docs = ["c", "d e", "f g h i", "j k l m n o p q r s"];
        for truncating in [Pre, Post] {
            let enc = alphabet_encoder(6, Post, truncating);
            for doc in docs {
                let ids = enc.vocabulary().unwrap().indices_for(&enc.tokenizer().tokenize(doc));
                let first_retained = match truncating {
                    Pre  => ids[ids.len().saturating_sub(6)],
                    Post => ids[0],
                };
                assert_eq!(enc.encode(doc).unwrap()[0], first_retained, "doc {doc:?}");
            }
        }
    }

    #[test]
    fn test_pre_padding_misaligns_first_token() {
        let enc   = alphabet_encoder(6, Pre, Post);
        let short = enc.encode("a b").unwrap();
        let long  = enc.encode("a b c d e f g h").unwrap();
        assert_eq!(short, vec![0, 0, 0, 0, 1, 2]);
        assert_eq!(long,  vec![1, 2, 3, 4, 5, 6]);
        // Same first token, different columns
        assert_eq!(first_content_column(&short), Some(4));
        assert_eq!(first_content_column(&long),  Some(0));
    }

    #[test]
    fn test_post_padding_keeps_same_documents_aligned() {
        let enc   = alphabet_encoder(6, Post, Post);
        let short = enc.encode("a b").unwrap();
        let long  = enc.encode("a b c d e f g h").unwrap();
        assert_eq!(first_content_column(&short), Some(0));
        assert_eq!(first_content_column(&long),  Some(0));
    }

    #[test]
    fn test_oov_only_document_is_all_zeros() {
        for padding in [Pre, Post] {
            let enc = fitted(4, padding, Pre);
            assert_eq!(enc.encode("zebra quantum").unwrap(), vec![0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_empty_document_is_all_padding() {
        let enc = fitted(3, Post, Post);
        assert_eq!(enc.encode("").unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_oov_tokens_shorten_content() {
        let enc = fitted(5, Post, Post);
        assert_eq!(enc.encode("hello zebra you").unwrap(), vec![1, 3, 0, 0, 0]);
    }

    #[test]
    fn test_encode_before_fit_fails() {
        let enc = SequenceEncoder::new(EncoderConfig::default()).unwrap();
        assert_eq!(enc.encode("hello").unwrap_err(), EncoderError::UnfitVocabulary);
        assert_eq!(enc.encode_batch(&["hello"]).unwrap_err(), EncoderError::UnfitVocabulary);
    }

    #[test]
    fn test_refit_is_refused() {
        let mut enc = fitted(6, Pre, Pre);
        assert_eq!(enc.fit(&["other corpus"]).unwrap_err(), EncoderError::VocabularyFrozen);
        // the original vocabulary survives
        assert_eq!(enc.vocabulary().unwrap().index_of("hello"), Some(1));
    }

    #[test]
    fn test_invalid_sizes() {
        for cfg in [
            EncoderConfig::new(10, 0, Pre, Pre),
            EncoderConfig::new(0, 10, Pre, Pre),
        ] {
            let err = SequenceEncoder::new(cfg).unwrap_err();
            assert!(matches!(err, EncoderError::InvalidConfiguration { .. }));
        }
    }

    #[test]
    fn test_shared_vocabulary_with_different_shape() {
        let train = fitted(6, Pre, Pre);
        let vocab = Arc::clone(train.vocabulary().unwrap());
        let wide  = SequenceEncoder::new(EncoderConfig::new(100, 8, Post, Post))
            .unwrap()
            .with_vocabulary(vocab)
            .unwrap();
        assert_eq!(wide.encode("I love you").unwrap(), vec![4, 5, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_with_vocabulary_rejects_larger_cap() {
        let vocab = Arc::clone(fitted(6, Pre, Pre).vocabulary().unwrap());
        let err   = SequenceEncoder::new(EncoderConfig::new(3, 6, Pre, Pre))
            .unwrap()
            .with_vocabulary(vocab)
            .unwrap_err();
        assert!(matches!(err, EncoderError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_with_vocabulary_on_fitted_encoder_fails() {
        let enc   = fitted(6, Pre, Pre);
        let vocab = Arc::clone(enc.vocabulary().unwrap());
        assert_eq!(enc.with_vocabulary(vocab).unwrap_err(), EncoderError::VocabularyFrozen);
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let enc  = alphabet_encoder(2, Post, Post);
        let docs: Vec<String> = ('a'..='z').map(|c| c.to_string()).collect();
        let m    = enc.encode_batch(&docs).unwrap();
        for (i, row) in m.iter().enumerate() {
            assert_eq!(row, &[i as u32 + 1, 0]);
        }
        assert_eq!(m.row(25), Some(&[26u32, 0][..]));
        assert_eq!(m.row(26), None);
    }

    #[test]
    fn test_encoders_share_vocabulary_across_threads() {
        let enc = fitted(6, Pre, Pre);
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| enc.encode("I love you very much").unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), vec![0, 4, 5, 3, 6, 7]);
            }
        });
    }
}
