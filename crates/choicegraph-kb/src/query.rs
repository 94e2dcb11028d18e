//! SPARQL text generation for choice graphs
//!
//! Query construction is deterministic: the same graph always yields the
//! same text, which doubles as the cache key. Each ungrounded edge
//! contributes a UNION over the three ways a relation can connect the
//! question variable to the edge object (direct, reverse, v-structure);
//! grounded edges contribute the single concrete pattern recorded on the
//! edge. `hopUp` inserts one unconstrained hop between the mention entity
//! and the object position used by the relation pattern.

use choicegraph_graph::{EdgeType, Graph};

/// Default cap on result rows per query.
pub const DEFAULT_RESULT_LIMIT: usize = 2000;

/// Binding name of the question variable in result rows.
pub const QUESTION_VALUE_VAR: &str = "e1";

/// Binding name of the question variable's English label.
pub const QUESTION_LABEL_VAR: &str = "e1Label";

const PREFIXES: &str = "\
PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wdt: <http://www.wikidata.org/prop/direct/>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>";

/// What a query asks the endpoint for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    /// Rows binding relation and object variables of ungrounded edges.
    Groundings,
    /// Rows binding the question variable and its label.
    Denotation,
}

/// SPARQL text plus the kind of rows it produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparqlQuery {
    pub kind: QueryKind,
    pub text: String,
}

/// Builds the query for `g` with the default result limit.
///
/// `return_var_values = false` selects the grounding variables of every
/// ungrounded edge (`?r{i}d ?r{i}r ?r{i}v ?e2{i}`); `true` selects the
/// question variable and its label instead.
pub fn graph_to_query(g: &Graph, return_var_values: bool) -> SparqlQuery {
    graph_to_query_with(g, return_var_values, DEFAULT_RESULT_LIMIT)
}

/// Builds the query for `g` with an explicit result limit.
pub fn graph_to_query_with(g: &Graph, return_var_values: bool, limit: usize) -> SparqlQuery {
    let mut select_vars: Vec<String> = Vec::new();
    let mut lines: Vec<String> = Vec::new();

    for (i, edge) in g.edge_set.iter().enumerate() {
        let mention_term = match &edge.right_kb_id {
            Some(id) => entity_term(id),
            None => {
                let var = format!("?e2{i}");
                lines.push(format!(
                    "  {var} rdfs:label \"{}\"@en .",
                    escape_literal(&g.span_text(&edge.right))
                ));
                var
            }
        };

        // The hop moves the relation pattern one node away from the mention.
        let object_term = if edge.hop_up {
            let hopped = format!("?o{i}");
            lines.push(format!("  {mention_term} ?hp{i} {hopped} ."));
            hopped
        } else {
            mention_term
        };

        match (&edge.kb_id, edge.edge_type) {
            (Some(id), Some(EdgeType::Direct)) => {
                lines.push(format!("  ?e1 {} {object_term} .", relation_term(id)));
            }
            (Some(id), Some(EdgeType::Reverse)) => {
                lines.push(format!("  {object_term} {} ?e1 .", relation_term(id)));
            }
            (Some(id), Some(EdgeType::VStructure)) => {
                let relation = relation_term(id);
                lines.push(format!("  ?m{i} {relation} {object_term} ."));
                lines.push(format!("  ?m{i} {relation} ?e1 ."));
                lines.push(format!("  FILTER(?e1 != {object_term})"));
            }
            _ => {
                lines.push("  {".to_string());
                lines.push(format!("    ?e1 ?r{i}d {object_term} ."));
                lines.push("  } UNION {".to_string());
                lines.push(format!("    {object_term} ?r{i}r ?e1 ."));
                lines.push("  } UNION {".to_string());
                lines.push(format!("    ?m{i} ?r{i}v {object_term} ."));
                lines.push(format!("    ?m{i} ?r{i}v ?e1 ."));
                lines.push(format!("    FILTER(?e1 != {object_term})"));
                lines.push("  }".to_string());
                select_vars.push(format!("?r{i}d"));
                select_vars.push(format!("?r{i}r"));
                select_vars.push(format!("?r{i}v"));
            }
        }

        if edge.right_kb_id.is_none() {
            select_vars.push(format!("?e2{i}"));
        }
    }

    let (kind, select) = if return_var_values {
        lines.push(format!(
            "  OPTIONAL {{ ?e1 rdfs:label ?{QUESTION_LABEL_VAR} . \
             FILTER(LANG(?{QUESTION_LABEL_VAR}) = \"en\") }}"
        ));
        (
            QueryKind::Denotation,
            format!("?{QUESTION_VALUE_VAR} ?{QUESTION_LABEL_VAR}"),
        )
    } else if select_vars.is_empty() {
        (QueryKind::Groundings, format!("?{QUESTION_VALUE_VAR}"))
    } else {
        (QueryKind::Groundings, select_vars.join(" "))
    };

    let body = if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    };
    let text = format!(
        "{PREFIXES}\n\nSELECT DISTINCT {select} WHERE {{\n{body}}}\nLIMIT {limit}\n"
    );
    SparqlQuery { kind, text }
}

fn entity_term(id: &str) -> String {
    if id.starts_with("http://") || id.starts_with("https://") {
        format!("<{id}>")
    } else {
        format!("wd:{id}")
    }
}

fn relation_term(id: &str) -> String {
    if id.starts_with("http://") || id.starts_with("https://") {
        format!("<{id}>")
    } else {
        format!("wdt:{id}")
    }
}

fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}
