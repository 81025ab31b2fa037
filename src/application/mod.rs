// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern

// Load, split, fit vocabulary, encode, train, test
pub mod train_use_case;

// Score a checkpoint on a labelled file
pub mod evaluate_use_case;

// Score new blurbs
pub mod predict_use_case;

// Inspect encoded rows
pub mod encode_use_case;
