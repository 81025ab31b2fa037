// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything from a raw CSV file to tensor batches.
//
//   blurbs.csv
//       │
//       ▼
//   CsvLoader         → reads rows, parses outcome labels
//       │
//       ▼
//   split_train_val   → training / test (test text never seen below)
//       │
//       ▼
//   SequenceEncoder   → tokenize, fit Vocabulary on TRAINING text,
//       │               map to indices, pad/truncate to seq_len
//       ▼
//   BlurbDataset      → implements Burn's Dataset trait
//       │
//       ▼
//   BlurbBatcher      → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads labelled blurbs from CSV
pub mod loader;

/// Word tokenizer used at fit and encode time
pub mod tokenizer;

/// Frozen token → index mapping
pub mod vocabulary;

/// Fixed-length padding and truncation
pub mod padding;

/// Text → fixed-shape index matrix
pub mod encoder;

/// Typed encoder failures
pub mod error;

/// Implements Burn's Dataset trait for encoded blurbs
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded shuffle and split
pub mod splitter;
