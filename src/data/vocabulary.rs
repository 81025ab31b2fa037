// ============================================================
// Layer 4: Frozen Vocabulary
// ============================================================
// Maps tokens to integer indices, built ONCE from the training
// split and never changed afterwards.
//
// How fitting works:
//   1. Tokenise every training document
//   2. Count how often each token occurs across the corpus
//   3. Rank tokens by count, highest first
//   4. Keep the top `max_size` tokens (the cap is inclusive)
//   5. Assign indices 1..=max_size in rank order
//
// Index 0 is never assigned: it is the padding value.
//
// Ties: tokens with equal counts keep the order in which they
// were FIRST SEEN in the corpus (documents in order, tokens
// left to right). This also decides which tokens survive when
// a tie straddles the cap.
//
// Example:
//   corpus = ["Hello there, you!", "I love very much"]
//   every token occurs once, so first-seen order decides:
//   hello=1 there=2 you=3 i=4 love=5 very=6 much=7
//
// Why frozen?
//   Re-fitting on evaluation data leaks information about the
//   held-out set into the features. A Vocabulary has no
//   mutating methods; to change it you build a new one.
//
// Reference: Rust Book §8 (Hash Maps)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::error::EncoderError;
use crate::domain::traits::Tokenize;

/// Index reserved for padding. Never assigned to a token.
pub const PAD_INDEX: u32 = 0;

/// Immutable token ↔ index mapping fitted on a training corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyFile", into = "VocabularyFile")]
pub struct Vocabulary {
    /// The cap this vocabulary was fitted with
    max_size: usize,

    /// tokens[i] has index i + 1
    tokens: Vec<String>,

    /// counts[i] is the training-corpus frequency of tokens[i]
    counts: Vec<u64>,

    /// Forward lookup token → index
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Fit a vocabulary on a training corpus.
    ///
    /// Fails with InvalidConfiguration if `max_size` is zero.
    pub fn fit<S, T>(corpus: &[S], max_size: usize, tokenizer: &T) -> Result<Self, EncoderError>
    where
        S: AsRef<str>,
        T: Tokenize + ?Sized,
    {
        if max_size == 0 {
            return Err(EncoderError::invalid_configuration(
                "vocabulary size must be greater than 0",
            ));
        }

        // ── Step 1 + 2: Count tokens, remembering first-seen order ───────────
        // value = (count, first_seen_position)
        let mut freq: HashMap<String, (u64, usize)> = HashMap::new();
        for doc in corpus {
            for token in tokenizer.tokenize(doc.as_ref()) {
                let order = freq.len();
                freq.entry(token)
                    .and_modify(|(count, _)| *count += 1)
                    .or_insert((1, order));
            }
        }

        // ── Step 3 + 4: Rank and cap ─────────────────────────────────────────
        let mut ranked: Vec<(String, u64, usize)> = freq
            .into_iter()
            .map(|(token, (count, order))| (token, count, order))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let distinct = ranked.len();
        ranked.truncate(max_size);

        // ── Step 5: Assign indices ───────────────────────────────────────────
        let (tokens, counts): (Vec<String>, Vec<u64>) = ranked
            .into_iter()
            .map(|(token, count, _)| (token, count))
            .unzip();

        tracing::debug!(
            "Vocabulary fitted: {} distinct tokens, kept {} (cap {})",
            distinct,
            tokens.len(),
            max_size,
        );

        Ok(Self::from_parts(max_size, tokens, counts))
    }

    fn from_parts(max_size: usize, tokens: Vec<String>, counts: Vec<u64>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32 + 1))
            .collect();
        Self { max_size, tokens, counts, index }
    }

    /// Index of a token, or None if it is out of vocabulary.
    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    /// Token for an index. Index 0 (padding) and unassigned indices give None.
    pub fn token_of(&self, index: u32) -> Option<&str> {
        if index == PAD_INDEX {
            return None;
        }
        self.tokens.get(index as usize - 1).map(String::as_str)
    }

    /// Training-corpus frequency of a token.
    pub fn count_of(&self, token: &str) -> Option<u64> {
        self.index_of(token).map(|i| self.counts[i as usize - 1])
    }

    /// Number of tokens actually assigned an index (≤ max_size).
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The cap this vocabulary was fitted with.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Tokens in index order (position 0 holds index 1).
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Map tokens to indices, DROPPING out-of-vocabulary tokens.
    ///
    /// Dropped tokens vanish instead of mapping to a sentinel, so the
    /// result can be shorter than the input.
    pub fn indices_for<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens
            .iter()
            .filter_map(|t| self.index_of(t.as_ref()))
            .collect()
    }

    /// Map indices back to tokens, skipping padding and unknown indices.
    pub fn decode(&self, indices: &[u32]) -> Vec<&str> {
        indices.iter().filter_map(|&i| self.token_of(i)).collect()
    }
}

// ─── On-disk format ───────────────────────────────────────────────────────────
// Only the ranked entries are stored; the lookup table is rebuilt on load.
// Loading validates the entries so a hand-edited file cannot produce
// two tokens with the same index.

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyFile {
    max_size: usize,
    entries:  Vec<VocabEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabEntry {
    token: String,
    count: u64,
}

impl From<Vocabulary> for VocabularyFile {
    fn from(v: Vocabulary) -> Self {
        let entries = v.tokens
            .into_iter()
            .zip(v.counts)
            .map(|(token, count)| VocabEntry { token, count })
            .collect();
        Self { max_size: v.max_size, entries }
    }
}

impl TryFrom<VocabularyFile> for Vocabulary {
    type Error = EncoderError;

    fn try_from(file: VocabularyFile) -> Result<Self, Self::Error> {
        if file.max_size == 0 {
            return Err(EncoderError::corrupt_vocabulary("max_size is 0"));
        }
        if file.entries.len() > file.max_size {
            return Err(EncoderError::corrupt_vocabulary(format!(
                "{} entries exceed max_size {}",
                file.entries.len(),
                file.max_size
            )));
        }

        let mut tokens = Vec::with_capacity(file.entries.len());
        let mut counts = Vec::with_capacity(file.entries.len());
        for (i, entry) in file.entries.into_iter().enumerate() {
            if entry.token.is_empty() {
                return Err(EncoderError::corrupt_vocabulary(format!(
                    "entry {} has an empty token", i + 1
                )));
            }
            tokens.push(entry.token);
            counts.push(entry.count);
        }

        let vocab = Self::from_parts(file.max_size, tokens, counts);
        if vocab.index.len() != vocab.tokens.len() {
            return Err(EncoderError::corrupt_vocabulary("duplicate tokens"));
        }
        Ok(vocab)
    }
}
