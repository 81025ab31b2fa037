// ============================================================
// Layer 4: Encoder Errors
// ============================================================
// Typed failures of the sequence encoding pipeline.
//
// The rest of the application works with anyhow::Result, but
// callers of the encoder need to tell these cases apart
// (e.g. the CLI reports a bad --padding value differently from
// a missing vocabulary), so they get their own enum.

use thiserror::Error;

/// Errors raised while configuring, fitting or using a sequence encoder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncoderError {
    /// Sequence length or vocabulary cap is zero, or a side value
    /// is neither `pre` nor `post`.
    #[error("Invalid encoder configuration: {message}")]
    InvalidConfiguration {
        /// What is wrong with the configuration
        message: String,
    },

    /// `encode` was called before a vocabulary was fitted or loaded.
    #[error("Vocabulary has not been fitted; call fit() on the training corpus first")]
    UnfitVocabulary,

    /// `fit` was called on an encoder that already holds a vocabulary.
    #[error("Vocabulary is frozen; build a new encoder to fit a different corpus")]
    VocabularyFrozen,

    /// A persisted vocabulary failed validation when loaded.
    #[error("Corrupt vocabulary: {message}")]
    CorruptVocabulary {
        /// Which entry is broken and why
        message: String,
    },
}

impl EncoderError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration { message: message.into() }
    }

    /// Create a CorruptVocabulary error.
    pub fn corrupt_vocabulary(message: impl Into<String>) -> Self {
        Self::CorruptVocabulary { message: message.into() }
    }
}
