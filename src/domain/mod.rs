// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A labelled campaign blurb
pub mod blurb;

// Core abstractions (traits) that other layers implement
pub mod traits;
