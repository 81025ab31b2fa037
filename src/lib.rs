#![recursion_limit = "256"]

//! Campaign blurb success classifier.
//!
//! Blurbs are encoded into fixed-length rows through a vocabulary
//! fitted once on the training split, then fed to a small Burn
//! embedding classifier. `main.rs` only wires the CLI to these layers.

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
