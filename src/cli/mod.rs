// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, hands off to a Layer 2 use case and prints the result.
// No business logic lives here.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EncodeArgs, EvaluateArgs, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "blurb-classifier",
    version,
    about = "Encode campaign blurbs into fixed-length sequences and train a success classifier on them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Predict(args)  => run_predict(args),
            Commands::Encode(args)   => run_encode(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on '{}'", args.data);
    let outcome = TrainUseCase::new(args.into()).execute()?;

    if let Some(best) = outcome.history.best_epoch() {
        println!(
            "Best epoch {}: val_loss={:.4}, val_acc={:.1}%",
            best.epoch, best.val_loss, best.val_acc * 100.0
        );
    }
    println!(
        "Test set ({} blurbs): loss={:.4}, accuracy={:.1}%",
        outcome.test_report.samples,
        outcome.test_report.loss,
        outcome.test_report.accuracy * 100.0,
    );
    println!("Vocabulary: {} tokens. Checkpoint saved.", outcome.vocabulary_size);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let report = EvaluateUseCase::new(
        args.checkpoint_dir,
        args.data,
        args.text_column,
        args.label_column,
        args.batch_size,
    ).execute()?;

    println!(
        "Evaluated {} blurbs: loss={:.4}, accuracy={:.1}%",
        report.samples, report.loss, report.accuracy * 100.0
    );
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(args.checkpoint_dir)?;
    for p in use_case.predict(&args.texts)? {
        let verdict = if p.successful { "successful" } else { "failed" };
        println!("{:>6.1}%  {:<10}  {}", p.probability * 100.0, verdict, p.text);
    }
    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    use crate::application::encode_use_case::EncodeUseCase;

    let use_case = EncodeUseCase::from_checkpoint(args.checkpoint_dir.clone(), &(&args).into())?;
    let cfg      = use_case.config();
    println!(
        "seq_len={} padding={} truncating={}",
        cfg.seq_len, cfg.padding, cfg.truncating
    );

    for row in use_case.execute(&args.texts)? {
        println!("{:?}  {:?}", row.indices, row.text);
        println!("    kept: {}", row.retained.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::data::padding::PadSide;
    use crate::ml::trainer::OptimizerKind;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_train_defaults_map_to_config() {
        let cli = Cli::try_parse_from(["blurb-classifier", "train", "--data", "x.csv"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.data_path, "x.csv");
        assert_eq!(cfg.encoder.seq_len, 100);
        assert_eq!(cfg.encoder.padding, PadSide::Pre);
        assert_eq!(cfg.encoder.truncating, PadSide::Pre);
        assert_eq!(cfg.optimizer, OptimizerKind::Adam);
    }

    #[test]
    fn test_sides_and_optimizer_are_parsed() {
        let cli = Cli::try_parse_from([
            "blurb-classifier", "train", "--data", "x.csv",
            "--padding", "post", "--truncating", "post", "--optimizer", "sgd",
        ]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(args.padding, PadSide::Post);
        assert_eq!(args.truncating, PadSide::Post);
        assert_eq!(args.optimizer, OptimizerKind::Sgd);
    }

    #[test]
    fn test_bad_side_is_rejected() {
        let err = Cli::try_parse_from(["blurb-classifier", "train", "--data", "x.csv", "--padding", "middle"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_encode_collects_repeated_text() {
        let cli = Cli::try_parse_from([
            "blurb-classifier", "encode", "--text", "a b", "--text", "c", "--seq-len", "6",
        ]).unwrap();
        let Commands::Encode(args) = cli.command else { panic!("expected encode") };
        assert_eq!(args.texts, vec!["a b", "c"]);
        assert_eq!(args.seq_len, Some(6));
        assert_eq!(args.padding, None);
    }
}
