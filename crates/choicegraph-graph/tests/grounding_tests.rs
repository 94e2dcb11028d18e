use choicegraph_graph::{
    apply_grounding, restrict, Edge, EdgeType, Graph, GroundingMap, QUESTION_VAR,
};

fn bahama_graph() -> Graph {
    let tokens = "what country is the grand bahama island in ?"
        .split_whitespace()
        .map(str::to_string)
        .collect();
    Graph::ungrounded(tokens, vec![vec![4, 5, 6]])
}

fn binding(pairs: &[(&str, &str)]) -> GroundingMap {
    pairs
        .iter()
        .map(|(var, value)| (var.to_string(), value.to_string()))
        .collect()
}

#[test]
fn reverse_binding_grounds_relation_and_entity() {
    let parent = restrict(&bahama_graph()).remove(0);
    let grounded = apply_grounding(&parent, &binding(&[("r0r", "P17"), ("e20", "Q866345")]));

    let edge = &grounded.edge_set[0];
    assert_eq!(edge.kb_id.as_deref(), Some("P17"));
    assert_eq!(edge.edge_type, Some(EdgeType::Reverse));
    assert_eq!(edge.right_kb_id.as_deref(), Some("Q866345"));
    assert!(edge.is_grounded());
    assert_eq!(edge.left, vec![QUESTION_VAR]);
    assert_eq!(edge.right, vec![4, 5, 6]);
    assert!(grounded.entities.is_empty());
}

#[test]
fn bindings_target_edges_by_position() {
    let mut g = bahama_graph();
    g.entities.clear();
    g.edge_set.push(Edge::new(vec![4, 5, 6]));
    g.edge_set.push(Edge::new(vec![1]));

    let grounded = apply_grounding(
        &g,
        &binding(&[("r0d", "P31"), ("r1v", "P361"), ("e21", "Q6256")]),
    );

    assert_eq!(grounded.edge_set[0].kb_id.as_deref(), Some("P31"));
    assert_eq!(grounded.edge_set[0].edge_type, Some(EdgeType::Direct));
    assert_eq!(grounded.edge_set[0].right_kb_id, None);

    assert_eq!(grounded.edge_set[1].kb_id.as_deref(), Some("P361"));
    assert_eq!(grounded.edge_set[1].edge_type, Some(EdgeType::VStructure));
    assert_eq!(grounded.edge_set[1].right_kb_id.as_deref(), Some("Q6256"));
}

#[test]
fn empty_binding_returns_an_unchanged_copy() {
    let parent = restrict(&bahama_graph()).remove(0);
    let grounded = apply_grounding(&parent, &GroundingMap::new());
    assert_eq!(grounded, parent);
}

#[test]
fn variables_for_absent_edges_are_ignored() {
    let parent = restrict(&bahama_graph()).remove(0);
    let grounded = apply_grounding(&parent, &binding(&[("r5d", "P17"), ("e25", "Q42")]));
    assert_eq!(grounded, parent);
}

#[test]
fn grounding_preserves_the_hop_flag() {
    let mut g = bahama_graph();
    g.entities.clear();
    let mut edge = Edge::new(vec![4, 5, 6]);
    edge.hop_up = true;
    g.edge_set.push(edge);

    let grounded = apply_grounding(&g, &binding(&[("r0d", "P17")]));
    assert!(grounded.edge_set[0].hop_up);
    assert_eq!(grounded.edge_set[0].edge_type, Some(EdgeType::Direct));
}

#[test]
fn grounding_never_mutates_the_parent() {
    let parent = restrict(&bahama_graph()).remove(0);
    let snapshot = parent.clone();
    let _ = apply_grounding(&parent, &binding(&[("r0r", "P17"), ("e20", "Q866345")]));
    assert_eq!(parent, snapshot);
}
