//! Blocking SPARQL endpoint client

use std::sync::Mutex;
use std::time::Duration;

use choicegraph_graph::GroundingMap;
use url::Url;

use crate::cache::{CacheStats, QueryCache};
use crate::query::SparqlQuery;
use crate::results::parse_sparql_json;
use crate::{KbError, KbOracle};

const USER_AGENT: &str = concat!("choicegraph/", env!("CARGO_PKG_VERSION"));

/// A Wikidata-style SPARQL endpoint reached over blocking HTTP.
///
/// Queries go out as form-encoded POST requests asking for
/// `application/sparql-results+json`; results pass through the injected
/// [`QueryCache`] keyed by query text.
pub struct WikidataEndpoint {
    url: Url,
    client: reqwest::blocking::Client,
    cache: Mutex<QueryCache>,
}

impl WikidataEndpoint {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        cache_capacity: usize,
    ) -> Result<Self, KbError> {
        let url = Url::parse(endpoint)
            .map_err(|error| KbError::InvalidEndpoint(format!("{endpoint}: {error}")))?;
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url,
            client,
            cache: Mutex::new(QueryCache::new(cache_capacity)?),
        })
    }

    /// Counters of the injected cache, for end-of-run summaries.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache
            .lock()
            .map(|cache| cache.stats())
            .unwrap_or_default()
    }

    fn execute(&self, query: &SparqlQuery) -> Result<Vec<GroundingMap>, KbError> {
        tracing::debug!(kind = ?query.kind, bytes = query.text.len(), "executing sparql query");
        let response = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .form(&[("query", query.text.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(KbError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text()?;
        parse_sparql_json(&body)
    }
}

impl KbOracle for WikidataEndpoint {
    fn query(&self, query: &SparqlQuery) -> Result<Vec<GroundingMap>, KbError> {
        {
            let mut cache = self
                .cache
                .lock()
                .map_err(|_| KbError::Cache("cache lock poisoned".to_string()))?;
            if let Some(rows) = cache.get(&query.text) {
                return Ok(rows);
            }
        }

        let rows = self.execute(query)?;

        let mut cache = self
            .cache
            .lock()
            .map_err(|_| KbError::Cache("cache lock poisoned".to_string()))?;
        cache.insert(&query.text, rows.clone());
        Ok(rows)
    }
}
