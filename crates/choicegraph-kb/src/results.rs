//! SPARQL JSON result decoding and answer mapping

use std::collections::{HashMap, HashSet};

use choicegraph_graph::GroundingMap;
use serde::Deserialize;

use crate::query::{QUESTION_LABEL_VAR, QUESTION_VALUE_VAR};
use crate::KbError;

#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: ResultSet,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    bindings: Vec<HashMap<String, Term>>,
}

#[derive(Debug, Deserialize)]
struct Term {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    value: String,
}

/// Decodes a `application/sparql-results+json` body into binding rows.
///
/// URI values are shortened to their local identifier (the last `/` or `#`
/// segment), so a direct-property URI becomes `P17` and an entity URI
/// becomes `Q866345`. Literals keep their lexical form.
pub fn parse_sparql_json(body: &str) -> Result<Vec<GroundingMap>, KbError> {
    let parsed: SparqlResults =
        serde_json::from_str(body).map_err(|error| KbError::Decode(error.to_string()))?;
    let rows = parsed
        .results
        .bindings
        .into_iter()
        .map(|binding| {
            binding
                .into_iter()
                .map(|(var, term)| (var, term_value(term)))
                .collect::<GroundingMap>()
        })
        .collect();
    Ok(rows)
}

/// Maps denotation rows to an answer list.
///
/// Prefers the question variable's label binding and falls back to the
/// question variable itself; rows carrying neither are skipped. Duplicates
/// are dropped, keeping first-seen order.
pub fn map_query_results(rows: &[GroundingMap]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut answers = Vec::new();
    for row in rows {
        let answer = row
            .get(QUESTION_LABEL_VAR)
            .or_else(|| row.get(QUESTION_VALUE_VAR));
        if let Some(answer) = answer {
            if seen.insert(answer.clone()) {
                answers.push(answer.clone());
            }
        }
    }
    answers
}

fn term_value(term: Term) -> String {
    if term.kind.as_deref() == Some("uri") {
        local_identifier(&term.value).to_string()
    } else {
        term.value
    }
}

fn local_identifier(uri: &str) -> &str {
    uri.rsplit(['#', '/']).next().unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_identifier_takes_the_last_segment() {
        assert_eq!(
            local_identifier("http://www.wikidata.org/prop/direct/P17"),
            "P17"
        );
        assert_eq!(local_identifier("http://example.org/onto#Country"), "Country");
        assert_eq!(local_identifier("Q5"), "Q5");
    }
}
