//! errblast: batch evaluation harness for the compiler error explosion
//! contest.
//!
//! Submissions are judged by how many diagnostic bytes they provoke from the
//! compiler relative to their own size. Each category carries its own
//! compiled-in policy; one category additionally gates entries behind a
//! byte-reversing reference program verified against generated data.
//!
//! # Architecture
//!
//! - [`config`]: error taxonomy, shared records, and the immutable
//!   per-category policy table
//! - [`contest`]: contest-tree scanning plus the metadata and package
//!   collaborators
//! - [`exec`]: resource-limited compiler invocation and diagnostic capture
//! - [`judge`]: category rule validation and the round-trip verifier
//! - [`scoring`]: ratio computation and composite-key ranking
//! - [`harness`]: the sequential category loop tying the stages together
//! - [`cli`]: command-line entry points
//!
//! A run is one-shot and strictly sequential: entries are evaluated one at a
//! time, every child process is bounded by CPU and address-space ceilings,
//! and per-entry failures never abort the rest of the run.

pub mod cli;
pub mod config;
pub mod contest;
pub mod exec;
pub mod harness;
pub mod judge;
pub mod scoring;
