//! Grounding bindings and their application to graphs
//!
//! A knowledge-base query returns one binding row per way the ungrounded
//! edges of a graph can be matched. Rows use positional variable names:
//! relation variables `r{i}d`, `r{i}r` and `r{i}v` for edge `i` matched in
//! direct, reverse or v-structure orientation, and `e2{i}` for the entity
//! the mention of edge `i` resolved to.

use std::collections::HashMap;

use crate::model::{EdgeType, Graph};

/// One row of knowledge-base bindings, keyed by positional variable name.
pub type GroundingMap = HashMap<String, String>;

/// Relation variable for edge `i` matched in direct orientation.
pub fn direct_var(i: usize) -> String {
    format!("r{i}d")
}

/// Relation variable for edge `i` matched in reverse orientation.
pub fn reverse_var(i: usize) -> String {
    format!("r{i}r")
}

/// Relation variable for edge `i` matched through a shared v-structure node.
pub fn v_structure_var(i: usize) -> String {
    format!("r{i}v")
}

/// Entity variable for the resolved mention of edge `i`.
pub fn object_var(i: usize) -> String {
    format!("e2{i}")
}

/// Copies `g` and writes the bindings in `grounding` onto its edges.
///
/// For edge `i`, `e2{i}` fills the right entity identifier, and the first
/// relation variable present fills the relation identifier together with
/// the matching edge type, checked in priority order direct, then reverse,
/// then v-structure. Variables that do not appear leave the corresponding
/// fields untouched, so applying an empty map returns an unchanged copy.
pub fn apply_grounding(g: &Graph, grounding: &GroundingMap) -> Graph {
    let mut grounded = g.clone();
    for (i, edge) in grounded.edge_set.iter_mut().enumerate() {
        if let Some(entity) = grounding.get(&object_var(i)) {
            edge.right_kb_id = Some(entity.clone());
        }
        if let Some(relation) = grounding.get(&direct_var(i)) {
            edge.kb_id = Some(relation.clone());
            edge.edge_type = Some(EdgeType::Direct);
        } else if let Some(relation) = grounding.get(&reverse_var(i)) {
            edge.kb_id = Some(relation.clone());
            edge.edge_type = Some(EdgeType::Reverse);
        } else if let Some(relation) = grounding.get(&v_structure_var(i)) {
            edge.kb_id = Some(relation.clone());
            edge.edge_type = Some(EdgeType::VStructure);
        }
    }
    grounded
}
