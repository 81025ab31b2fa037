// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// All Burn model and optimiser code lives here. The data layer
// only touches Burn for its Dataset and Batcher traits.
//
//   model.rs     : Embedding classifier:
//                   • Token embeddings (index 0 = padding)
//                   • Flatten over positions
//                   • Dense + ReLU, dropout
//                   • Two-class output head
//
//   trainer.rs   : The training loop: forward pass, loss,
//                   backward pass, optimiser step, validation
//                   and checkpoint per epoch
//
//   evaluator.rs : Loss and accuracy on held-out data
//
//   inferencer.rs: Loads a checkpoint and scores new blurbs
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Embedding + dense classifier architecture
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Held-out evaluation
pub mod evaluator;

/// Inference engine: loads checkpoint and predicts outcomes
pub mod inferencer;
