//! Knowledge-base access for choice-graph search
//!
//! Turns (partially) grounded graphs into SPARQL text, runs it against a
//! Wikidata-style endpoint over blocking HTTP, and maps the JSON results
//! back into the positional binding rows the search layer consumes.
//!
//! ```text
//! Graph ──graph_to_query──► SparqlQuery ──KbOracle::query──► Vec<GroundingMap>
//!                                │                                 ▲
//!                                ▼                                 │
//!                          QueryCache (SIEVE) ────── cached rows ──┘
//! ```
//!
//! The cache is an explicit collaborator owned by the endpoint, keyed by
//! query text and size-bounded. There is no TTL: one run is assumed to see
//! a stable knowledge-base snapshot.

pub mod cache;
pub mod endpoint;
pub mod query;
pub mod results;

pub use cache::{CacheStats, QueryCache};
pub use endpoint::WikidataEndpoint;
pub use query::{
    graph_to_query, graph_to_query_with, QueryKind, SparqlQuery, DEFAULT_RESULT_LIMIT,
    QUESTION_LABEL_VAR, QUESTION_VALUE_VAR,
};
pub use results::{map_query_results, parse_sparql_json};

use choicegraph_graph::GroundingMap;
use thiserror::Error;

/// Errors from the knowledge-base access layer.
#[derive(Debug, Error)]
pub enum KbError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode SPARQL results: {0}")]
    Decode(String),

    #[error("query cache failure: {0}")]
    Cache(String),

    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(String),
}

/// A source of binding rows for SPARQL queries.
///
/// Implementations resolve the query text against a knowledge base and
/// return one row per solution, keyed by variable name without the leading
/// `?`. An empty row set means "no groundings". Transport failures surface
/// as [`KbError`]; the search layer downgrades them to empty results rather
/// than aborting a search.
pub trait KbOracle {
    fn query(&self, query: &SparqlQuery) -> Result<Vec<GroundingMap>, KbError>;
}
