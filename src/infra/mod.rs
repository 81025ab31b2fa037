// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Handles the cross-cutting concerns that don't belong in any
// specific business layer:
//
//   checkpoint.rs      : Model weights (Burn CompactRecorder),
//                         train_config.json and the pointer to
//                         the latest epoch. Inference rebuilds
//                         the exact model from these.
//
//   vocabulary_store.rs: Persistable impl for the frozen
//                         Vocabulary. Guarantees training and
//                         inference use the same token indices.
//
//   metrics.rs         : Per-epoch metrics appended to a CSV
//                         file for later plotting.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vocabulary saving and loading
pub mod vocabulary_store;

/// Training metrics CSV logger
pub mod metrics;
