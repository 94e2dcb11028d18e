//! Choice-graph generation
//!
//! Two ways of producing candidate parses for a question:
//!
//! - [`StagedSearch::generate_with_gold`]: depth-first worklist search that
//!   restricts, grounds against a knowledge-base oracle, scores denotations
//!   against gold answers, and keeps derivation paths with positive F1.
//! - [`generate_without_gold`]: the same operator walk with no oracle and no
//!   feedback, enumerating every reachable ungrounded graph.
//!
//! Oracle failures never abort a search: a failed query is logged and
//! treated as returning no bindings.

pub mod eval;
pub mod staged;

pub use eval::RetrievalScore;
pub use staged::{generate_without_gold, ScoredGraph, StagedSearch};
