//! Integration tests for certora-ci
//!
//! These drive the real executor against small shell scripts standing in
//! for prover rule scripts, resolve change sets from throwaway git
//! repositories, and run the binary end to end.

pub mod changeset_diff;
pub mod cli;
pub mod helpers;
