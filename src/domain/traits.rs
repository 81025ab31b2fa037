// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The seams between layers. The application layer only talks
// to these traits, so a different data source or tokenizer can
// be swapped in without touching the pipeline:
//   - CsvLoader implements DocumentSource
//   - WordTokenizer implements Tokenize
//   - Vocabulary implements Persistable
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::blurb::Blurb;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can load labelled blurbs.
pub trait DocumentSource {
    /// Load all available blurbs from this source, in source order.
    fn load_all(&self) -> Result<Vec<Blurb>>;
}

// ─── Tokenize ─────────────────────────────────────────────────────────────────
/// Splits a document into an ordered list of tokens.
///
/// Implementations must be deterministic: the same text always
/// yields the same tokens. `Send + Sync` so one tokenizer can be
/// shared by parallel encode calls.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - Vocabulary → saves/loads its token table as JSON
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &str) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &str) -> Result<Self>;
}
