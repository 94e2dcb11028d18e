//! Choice graphs: partial logical-form graphs over a knowledge base.
//!
//! A choice graph is one candidate semantic parse of a natural-language
//! question. It starts ungrounded (question tokens plus detected entity
//! mentions, no relation constraints) and is refined by two families of
//! pure transformation operators:
//!
//! - **restrict** operators add constraints and so shrink the graph's
//!   denotation (currently: consume the next entity mention into a new
//!   relation edge), and
//! - **expand** operators broaden the denotation (hop one relation further
//!   up from an entity, or trim an over-long mention span).
//!
//! Grounding binds the abstract relation/entity slots of a graph to concrete
//! knowledge-base identifiers. The binding arrives as a flat variable map
//! whose names encode edge positions (`r0d`, `r1v`, `e20`, ...); that naming
//! is a wire contract with the query layer and is reproduced exactly here.
//!
//! Everything in this crate is deterministic and allocation-only: operators
//! never mutate their input, never touch I/O, and return plain `Vec`s of
//! freshly built graphs.

pub mod grounding;
pub mod model;
pub mod ops;

pub use grounding::{
    apply_grounding, direct_var, object_var, reverse_var, v_structure_var, GroundingMap,
};
pub use model::{Edge, EdgeType, Graph, GraphError, TokenSpan, QUESTION_VAR};
pub use ops::{
    add_entity_and_relation, available_expansions, available_restrictions, expand, hop_up,
    remove_token_from_entity, restrict, ExpandOp, RestrictOp,
};
