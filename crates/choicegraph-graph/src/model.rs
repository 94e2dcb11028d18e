//! Graph and edge records.
//!
//! The JSON field names (`edgeSet`, `hopUp`, `kbID`, `rightkbID`, `type`)
//! are a compatibility contract with downstream consumers of persisted
//! choice-graph files and must not be renamed. Struct fields are declared
//! in sorted-key order so that serialized objects come out with sorted keys
//! without a custom serializer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// A span of token positions into a graph's `tokens` sequence.
pub type TokenSpan = Vec<usize>;

/// Sentinel token index standing for the implicit question variable.
///
/// Every edge's `left` span is `[QUESTION_VAR]`: the subject of each relation
/// constraint is the (single) variable the question asks for, never a token
/// of the question text itself.
pub const QUESTION_VAR: usize = 0;

// ============================================================================
// Edge
// ============================================================================

/// Syntactic pattern used when a relation was bound in the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "reverse")]
    Reverse,
    /// Relation inferred through an intermediate value node rather than a
    /// direct or reverse edge between the question variable and the entity.
    #[serde(rename = "v-structure")]
    VStructure,
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeType::Direct => write!(f, "direct"),
            EdgeType::Reverse => write!(f, "reverse"),
            EdgeType::VStructure => write!(f, "v-structure"),
        }
    }
}

/// One relation constraint of a parse.
///
/// `left` and `right` are token spans; the optional fields are filled in by
/// grounding (`kbID`, `type`, `rightkbID`) or by the hop-up expansion
/// (`hopUp`). An edge with none of the optional fields set is ungrounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Denotation is widened by one extra relation hop from the entity.
    /// Serialized as the integer `1` for wire compatibility.
    #[serde(
        rename = "hopUp",
        default,
        skip_serializing_if = "hop_flag_is_unset",
        serialize_with = "serialize_hop_flag",
        deserialize_with = "deserialize_hop_flag"
    )]
    pub hop_up: bool,
    /// Knowledge-base relation identifier, set by grounding.
    #[serde(rename = "kbID", default, skip_serializing_if = "Option::is_none")]
    pub kb_id: Option<String>,
    /// Subject span; always `[QUESTION_VAR]` for constructed edges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub left: TokenSpan,
    /// Object span: token positions of the entity mention this edge
    /// constrains. May be narrowed to a sub-span by the trimming operator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub right: TokenSpan,
    /// Knowledge-base identifier of the object entity, set by grounding.
    #[serde(rename = "rightkbID", default, skip_serializing_if = "Option::is_none")]
    pub right_kb_id: Option<String>,
    /// Binding pattern, set together with `kbID`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<EdgeType>,
}

impl Edge {
    /// New ungrounded edge constraining the question variable against the
    /// given entity mention span.
    pub fn new(right: TokenSpan) -> Self {
        Edge {
            left: vec![QUESTION_VAR],
            right,
            ..Edge::default()
        }
    }

    /// True once grounding has bound a relation to this edge.
    pub fn is_grounded(&self) -> bool {
        self.kb_id.is_some()
    }
}

fn hop_flag_is_unset(flag: &bool) -> bool {
    !*flag
}

fn serialize_hop_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u8(u8::from(*flag))
}

fn deserialize_hop_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct HopFlag;

    impl<'de> serde::de::Visitor<'de> for HopFlag {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a hop-up flag (integer or boolean)")
        }

        fn visit_bool<E>(self, v: bool) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            Ok(v)
        }

        fn visit_u64<E>(self, v: u64) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            Ok(v != 0)
        }

        fn visit_i64<E>(self, v: i64) -> Result<bool, E>
        where
            E: serde::de::Error,
        {
            Ok(v != 0)
        }
    }

    deserializer.deserialize_any(HopFlag)
}

// ============================================================================
// Graph
// ============================================================================

/// One candidate semantic parse of a question.
///
/// Invariants maintained by the operator library:
/// - `edgeSet` is only extended, mutated in its last element (hop-up) or
///   rewritten in its first element's `right` span (trimming); edges are
///   never reordered or deleted, because grounding-variable names encode
///   edge positions.
/// - `entities` shrinks by exactly one mention per restriction step and is
///   consumed left to right.
/// - `tokens` is shared read-only across all graphs derived from the same
///   question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(rename = "edgeSet", default)]
    pub edge_set: Vec<Edge>,
    /// Entity mentions not yet consumed by restriction, each an ordered
    /// sequence of token positions.
    #[serde(default)]
    pub entities: Vec<TokenSpan>,
    #[serde(default)]
    pub tokens: Arc<Vec<String>>,
}

impl Graph {
    /// Initial ungrounded state for a question: tokens plus candidate entity
    /// mentions, no relation constraints yet.
    pub fn ungrounded(tokens: Vec<String>, entities: Vec<TokenSpan>) -> Self {
        Graph {
            edge_set: Vec::new(),
            entities,
            tokens: Arc::new(tokens),
        }
    }

    /// Text of a token span, joined with single spaces.
    ///
    /// Out-of-range positions are skipped; validation is `ensure_valid`'s
    /// job, not the accessor's.
    pub fn span_text(&self, span: &[usize]) -> String {
        span.iter()
            .filter_map(|&i| self.tokens.get(i))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Structural validation for graphs arriving from outside the operator
    /// library (deserialized files, upstream pipelines).
    ///
    /// Operators themselves treat empty `entities`/`edgeSet` as "nothing to
    /// do" and return no children; this check exists to catch graphs that are
    /// malformed rather than merely exhausted, and is invoked once at the
    /// search entry points.
    pub fn ensure_valid(&self) -> Result<(), GraphError> {
        for (m, mention) in self.entities.iter().enumerate() {
            if mention.is_empty() {
                return Err(GraphError::InvalidState {
                    reason: format!("entity mention {m} is empty"),
                });
            }
            if let Some(&bad) = mention.iter().find(|&&i| i >= self.tokens.len()) {
                return Err(GraphError::InvalidState {
                    reason: format!(
                        "entity mention {m} references token {bad} but the graph has {} tokens",
                        self.tokens.len()
                    ),
                });
            }
        }
        for (e, edge) in self.edge_set.iter().enumerate() {
            if edge.right.is_empty() && edge.right_kb_id.is_none() {
                return Err(GraphError::InvalidState {
                    reason: format!("edge {e} has neither an object span nor a KB identifier"),
                });
            }
            if let Some(&bad) = edge.right.iter().find(|&&i| i >= self.tokens.len()) {
                return Err(GraphError::InvalidState {
                    reason: format!(
                        "edge {e} references token {bad} but the graph has {} tokens",
                        self.tokens.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::ungrounded(Vec::new(), Vec::new())
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum GraphError {
    /// A graph reached an entry point with fields that cannot describe a
    /// parse: a mention or edge span pointing outside the token sequence,
    /// or an empty mention. Exhausted graphs (no entities left, nothing to
    /// expand) are not errors.
    #[error("invalid graph state: {reason}")]
    InvalidState { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bahama_tokens() -> Vec<String> {
        ["what", "country", "is", "the", "grand", "bahama", "island", "in", "?"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn serialized_graph_uses_wire_names_in_sorted_order() {
        let mut g = Graph::ungrounded(vec!["who".into(), "?".into()], vec![]);
        g.edge_set.push(Edge {
            hop_up: true,
            kb_id: Some("P31".into()),
            edge_type: Some(EdgeType::Direct),
            ..Edge::new(vec![1])
        });

        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(
            json,
            r#"{"edgeSet":[{"hopUp":1,"kbID":"P31","left":[0],"right":[1],"type":"direct"}],"entities":[],"tokens":["who","?"]}"#
        );
    }

    #[test]
    fn hop_flag_roundtrips_from_integer_and_bool() {
        let from_int: Edge = serde_json::from_str(r#"{"hopUp": 1, "right": [2]}"#).unwrap();
        assert!(from_int.hop_up);
        let from_bool: Edge = serde_json::from_str(r#"{"hopUp": true, "right": [2]}"#).unwrap();
        assert!(from_bool.hop_up);
        let absent: Edge = serde_json::from_str(r#"{"right": [2]}"#).unwrap();
        assert!(!absent.hop_up);
    }

    #[test]
    fn v_structure_type_uses_hyphenated_wire_name() {
        let json = serde_json::to_string(&EdgeType::VStructure).unwrap();
        assert_eq!(json, r#""v-structure""#);
        let back: EdgeType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EdgeType::VStructure);
    }

    #[test]
    fn ensure_valid_accepts_well_formed_graph() {
        let g = Graph::ungrounded(bahama_tokens(), vec![vec![4, 5, 6]]);
        assert!(g.ensure_valid().is_ok());
    }

    #[test]
    fn ensure_valid_rejects_out_of_range_mention() {
        let g = Graph::ungrounded(bahama_tokens(), vec![vec![4, 99]]);
        let err = g.ensure_valid().unwrap_err();
        assert!(err.to_string().contains("references token 99"));
    }

    #[test]
    fn ensure_valid_rejects_empty_mention() {
        let g = Graph::ungrounded(bahama_tokens(), vec![vec![]]);
        assert!(g.ensure_valid().is_err());
    }

    #[test]
    fn ensure_valid_rejects_edge_without_object() {
        let mut g = Graph::ungrounded(bahama_tokens(), vec![]);
        g.edge_set.push(Edge::new(vec![]));
        assert!(g.ensure_valid().is_err());

        // A grounded edge may legitimately carry only the KB identifier.
        g.edge_set[0].right_kb_id = Some("Q866345".into());
        assert!(g.ensure_valid().is_ok());
    }

    #[test]
    fn span_text_joins_tokens() {
        let g = Graph::ungrounded(bahama_tokens(), vec![]);
        assert_eq!(g.span_text(&[4, 5, 6]), "grand bahama island");
    }
}
