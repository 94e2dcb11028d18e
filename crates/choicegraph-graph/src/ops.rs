//! Operator library: restrict and expand moves over ungrounded graphs
//!
//! Restrictions consume a free entity mention and attach it to the question
//! variable, narrowing the denotation. Expansions loosen an existing edge so
//! that more knowledge-base groundings can match. Both families are pure:
//! operators take the parent by reference and return freshly built children,
//! never mutating their input.

use crate::model::{Edge, Graph};

/// Expansion operators.
///
/// [`ExpandOp::HopUp`] is the default repertoire consulted by [`expand`].
/// [`ExpandOp::TrimEntitySpan`] is opt-in: search drivers that want shorter
/// mention spans considered walk [`ExpandOp::ALL`] instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandOp {
    /// Mark the most recent edge as hopped up one node.
    HopUp,
    /// Replace the first edge's mention span with each strict sub-span.
    TrimEntitySpan,
}

impl ExpandOp {
    /// Every expansion operator, in application order.
    pub const ALL: [ExpandOp; 2] = [ExpandOp::HopUp, ExpandOp::TrimEntitySpan];

    /// The operators [`expand`] consults.
    pub const DEFAULT: [ExpandOp; 1] = [ExpandOp::HopUp];

    /// Whether applying this operator to `g` can produce any children.
    pub fn is_available(&self, g: &Graph) -> bool {
        match self {
            ExpandOp::HopUp => g.edge_set.last().is_some_and(|edge| !edge.hop_up),
            ExpandOp::TrimEntitySpan => {
                g.edge_set.first().is_some_and(|edge| edge.right.len() > 1)
            }
        }
    }

    pub fn apply(&self, g: &Graph) -> Vec<Graph> {
        match self {
            ExpandOp::HopUp => hop_up(g),
            ExpandOp::TrimEntitySpan => remove_token_from_entity(g),
        }
    }
}

/// Restriction operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestrictOp {
    /// Pop the first free entity mention and add an ungrounded edge for it.
    AddEntityAndRelation,
}

impl RestrictOp {
    /// Every restriction operator, in application order.
    pub const ALL: [RestrictOp; 1] = [RestrictOp::AddEntityAndRelation];

    /// Whether applying this operator to `g` can produce any children.
    pub fn is_available(&self, g: &Graph) -> bool {
        match self {
            RestrictOp::AddEntityAndRelation => !g.entities.is_empty(),
        }
    }

    pub fn apply(&self, g: &Graph) -> Vec<Graph> {
        match self {
            RestrictOp::AddEntityAndRelation => add_entity_and_relation(g),
        }
    }
}

/// Default-repertoire expansions applicable to `g`.
///
/// Non-empty exactly when the graph has at least one edge and the most
/// recent edge has not already been hopped up.
pub fn available_expansions(g: &Graph) -> Vec<ExpandOp> {
    ExpandOp::DEFAULT
        .iter()
        .copied()
        .filter(|op| op.is_available(g))
        .collect()
}

/// Restrictions applicable to `g`. Non-empty exactly when free entity
/// mentions remain.
pub fn available_restrictions(g: &Graph) -> Vec<RestrictOp> {
    RestrictOp::ALL
        .iter()
        .copied()
        .filter(|op| op.is_available(g))
        .collect()
}

/// All children reachable from `g` by one default expansion.
pub fn expand(g: &Graph) -> Vec<Graph> {
    available_expansions(g)
        .iter()
        .flat_map(|op| op.apply(g))
        .collect()
}

/// All children reachable from `g` by one restriction.
pub fn restrict(g: &Graph) -> Vec<Graph> {
    available_restrictions(g)
        .iter()
        .flat_map(|op| op.apply(g))
        .collect()
}

/// Marks the most recent edge as hopped up one node, so that grounding
/// matches entities one relation away from the mention instead of the
/// mention itself. Yields no children when the graph has no edges.
pub fn hop_up(g: &Graph) -> Vec<Graph> {
    if g.edge_set.is_empty() {
        return Vec::new();
    }
    let mut child = g.clone();
    if let Some(last) = child.edge_set.last_mut() {
        last.hop_up = true;
    }
    vec![child]
}

/// Generates one child per contiguous strict sub-span of the first edge's
/// mention, shortest spans first. A two-token mention therefore yields two
/// children and a single-token mention yields none.
pub fn remove_token_from_entity(g: &Graph) -> Vec<Graph> {
    let right = match g.edge_set.first() {
        Some(edge) if edge.right.len() > 1 => edge.right.clone(),
        _ => return Vec::new(),
    };
    let mut children = Vec::new();
    for window in 1..right.len() {
        for start in 0..=(right.len() - window) {
            let mut child = g.clone();
            if let Some(first) = child.edge_set.first_mut() {
                first.right = right[start..start + window].to_vec();
            }
            children.push(child);
        }
    }
    children
}

/// Pops the first free entity mention and appends an ungrounded edge
/// linking it to the question variable.
pub fn add_entity_and_relation(g: &Graph) -> Vec<Graph> {
    if g.entities.is_empty() {
        return Vec::new();
    }
    let mut child = g.clone();
    let mention = child.entities.remove(0);
    child.edge_set.push(Edge::new(mention));
    vec![child]
}
