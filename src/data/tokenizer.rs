// ============================================================
// Layer 4: Word Tokenizer
// ============================================================
// Splits a blurb into lowercase word tokens.
//
// Cleaning steps (applied in order):
//   1. Lowercase the text (optional, on by default)
//   2. Replace every filter character with a space
//   3. Split on any run of whitespace
//
// The default filter set strips ASCII punctuation plus tab and
// newline, so "Hello, world!" becomes ["hello", "world"].
// Apostrophes are kept: "don't" stays one token.
//
// The SAME tokenizer must be used at fit time and at encode
// time, otherwise indices silently stop lining up.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

use crate::domain::traits::Tokenize;

/// Characters removed before splitting.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Lowercasing, punctuation-stripping whitespace splitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTokenizer {
    /// Characters replaced by a space before splitting
    pub filters: String,

    /// Fold text to lowercase before splitting
    pub lowercase: bool,
}

impl WordTokenizer {
    /// Create a tokenizer with the default filters and lowercasing on.
    pub fn new() -> Self {
        Self {
            filters:   DEFAULT_FILTERS.to_string(),
            lowercase: true,
        }
    }

    /// Replace the filter character set.
    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = filters.into();
        self
    }

    /// Turn lowercasing on or off.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenize for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        // ── Step 2: Blank out filter characters ───────────────────────────────
        let cleaned: String = text
            .chars()
            .map(|c| if self.filters.contains(c) { ' ' } else { c })
            .collect();

        // ── Step 3: Split on whitespace ───────────────────────────────────────
        cleaned
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
