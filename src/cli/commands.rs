// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the subcommands `train`, `evaluate`, `predict` and
// `encode` and all their configurable flags.
//
// clap's derive macros generate help text, error messages for
// missing args and type conversion. `--padding`, `--truncating`
// and `--optimizer` are parsed through their FromStr impls, so
// a bad value is rejected with the same message the library
// gives.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::encode_use_case::EncodeOverrides;
use crate::application::train_use_case::TrainConfig;
use crate::data::encoder::EncoderConfig;
use crate::data::padding::PadSide;
use crate::ml::trainer::OptimizerKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the vocabulary and train the classifier on a labelled CSV file
    Train(TrainArgs),

    /// Score a trained checkpoint on a labelled CSV file
    Evaluate(EvaluateArgs),

    /// Predict campaign success for one or more blurbs
    Predict(PredictArgs),

    /// Show the encoded rows for one or more documents
    Encode(EncodeArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with a header row
    #[arg(long)]
    pub data: String,

    /// Column holding the blurb text
    #[arg(long, default_value = "blurb")]
    pub text_column: String,

    /// Column holding the outcome (successful/failed, 1/0, true/false)
    #[arg(long, default_value = "state")]
    pub label_column: String,

    /// Directory to save checkpoints, config and vocabulary
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Maximum number of distinct tokens kept in the vocabulary
    #[arg(long, default_value_t = 5000)]
    pub vocab_size: usize,

    /// Width of every encoded row
    #[arg(long, default_value_t = 100)]
    pub seq_len: usize,

    /// Where zeros are inserted for short blurbs (pre | post)
    #[arg(long, default_value = "pre")]
    pub padding: PadSide,

    /// Which end is cut for long blurbs (pre | post)
    #[arg(long, default_value = "pre")]
    pub truncating: PadSide,

    /// Size of each token embedding vector
    #[arg(long, default_value_t = 8)]
    pub embed_dim: usize,

    /// Width of the dense hidden layer
    #[arg(long, default_value_t = 32)]
    pub hidden_dim: usize,

    /// Dropout probability after the hidden layer
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Optimiser (adam | sgd)
    #[arg(long, default_value = "adam")]
    pub optimizer: OptimizerKind,

    /// Learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Fraction of the training split held out for per-epoch validation
    #[arg(long, default_value_t = 0.2)]
    pub validation_split: f64,

    /// Fraction of all blurbs held out as the final test set
    #[arg(long, default_value_t = 0.2)]
    pub test_split: f64,

    /// Seed for the shuffles behind both splits
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:        a.data,
            text_column:      a.text_column,
            label_column:     a.label_column,
            checkpoint_dir:   a.checkpoint_dir,
            encoder:          EncoderConfig::new(a.vocab_size, a.seq_len, a.padding, a.truncating),
            embed_dim:        a.embed_dim,
            hidden_dim:       a.hidden_dim,
            dropout:          a.dropout,
            optimizer:        a.optimizer,
            lr:               a.lr,
            batch_size:       a.batch_size,
            epochs:           a.epochs,
            validation_split: a.validation_split,
            test_split:       a.test_split,
            seed:             a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Labelled CSV file to score
    #[arg(long)]
    pub data: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Defaults to the column used at training time
    #[arg(long)]
    pub text_column: Option<String>,

    /// Defaults to the column used at training time
    #[arg(long)]
    pub label_column: Option<String>,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Blurb to score; repeat for several
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Document to encode; repeat for several
    #[arg(long = "text", required = true)]
    pub texts: Vec<String>,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Override the trained row width
    #[arg(long)]
    pub seq_len: Option<usize>,

    /// Override the trained padding side (pre | post)
    #[arg(long)]
    pub padding: Option<PadSide>,

    /// Override the trained truncating side (pre | post)
    #[arg(long)]
    pub truncating: Option<PadSide>,
}

impl From<&EncodeArgs> for EncodeOverrides {
    fn from(a: &EncodeArgs) -> Self {
        EncodeOverrides {
            seq_len:    a.seq_len,
            padding:    a.padding,
            truncating: a.truncating,
        }
    }
}
