//! Staged worklist search over choice graphs
//!
//! The pool is a stack, so derivation is depth-first: the most recently
//! chosen grounding is explored first. Restriction is always attempted
//! before expansion, and expansion applies to the restriction candidates
//! rather than the popped graph, mirroring the staged construction order
//! restrict, ground, expand, ground.

use choicegraph_graph::{
    apply_grounding, expand, restrict, ExpandOp, Graph, GraphError, GroundingMap,
};
use choicegraph_kb::{graph_to_query_with, map_query_results, KbOracle, SparqlQuery};
use serde::{Deserialize, Serialize};

use crate::eval::RetrievalScore;

/// A pool entry: a graph with the score and answers of its grounding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredGraph {
    pub graph: Graph,
    #[serde(rename = "retrievedAnswers")]
    pub retrieved: Vec<String>,
    pub score: RetrievalScore,
}

impl ScoredGraph {
    fn seed(graph: Graph) -> Self {
        Self {
            graph,
            retrieved: Vec::new(),
            score: RetrievalScore::zero(),
        }
    }
}

/// Gold-guided search over choice graphs.
///
/// Holds the oracle and the search knobs; per-question state lives inside
/// [`StagedSearch::generate_with_gold`].
pub struct StagedSearch<'a, O: KbOracle> {
    oracle: &'a O,
    f1_threshold: f64,
    use_trimming: bool,
    result_limit: usize,
}

impl<'a, O: KbOracle> StagedSearch<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            f1_threshold: 0.5,
            use_trimming: false,
            result_limit: choicegraph_kb::DEFAULT_RESULT_LIMIT,
        }
    }

    /// F1 at which a pool entry is emitted without further derivation.
    pub fn f1_threshold(mut self, threshold: f64) -> Self {
        self.f1_threshold = threshold;
        self
    }

    /// Also consider mention-span trimming when expanding candidates.
    pub fn use_trimming(mut self, enabled: bool) -> Self {
        self.use_trimming = enabled;
        self
    }

    /// Row cap passed through to the query builder.
    pub fn result_limit(mut self, limit: usize) -> Self {
        self.result_limit = limit;
        self
    }

    /// Searches depth-first for groundings of `ungrounded` whose denotations
    /// overlap `gold_answers`.
    ///
    /// A popped entry at or above the F1 threshold is emitted as-is.
    /// Otherwise its restriction candidates are grounded and scored; when
    /// none survives, the expansions of those candidates are grounded
    /// instead; when that fails too, the entry is emitted as a dead end.
    /// Gold answers are lowercased on entry.
    pub fn generate_with_gold(
        &self,
        ungrounded: &Graph,
        gold_answers: &[String],
    ) -> Result<Vec<ScoredGraph>, GraphError> {
        ungrounded.ensure_valid()?;
        let gold: Vec<String> = gold_answers
            .iter()
            .map(|answer| answer.to_lowercase())
            .collect();

        let mut pool = vec![ScoredGraph::seed(ungrounded.clone())];
        let mut generated = Vec::new();

        while let Some(entry) = pool.pop() {
            tracing::debug!(pool = pool.len(), f1 = entry.score.f1, "popped pool entry");
            if entry.score.f1 >= self.f1_threshold {
                generated.push(entry);
                continue;
            }

            let suggested = restrict(&entry.graph);
            let mut chosen = self.ground_with_gold(&suggested, &gold);
            if chosen.is_empty() {
                let expanded: Vec<Graph> = suggested
                    .iter()
                    .flat_map(|candidate| self.expansions(candidate))
                    .collect();
                chosen = self.ground_with_gold(&expanded, &gold);
            }

            if chosen.is_empty() {
                generated.push(entry);
            } else {
                pool.extend(chosen);
            }
        }
        Ok(generated)
    }

    /// Grounds every candidate against the oracle and keeps the groundings
    /// whose denotation overlaps gold (F1 > 0).
    pub fn ground_with_gold(&self, candidates: &[Graph], gold: &[String]) -> Vec<ScoredGraph> {
        let mut chosen = Vec::new();
        for candidate in candidates {
            let groundings = self.run(&graph_to_query_with(candidate, false, self.result_limit));
            tracing::debug!(count = groundings.len(), "possible groundings");
            for grounding in &groundings {
                let grounded = apply_grounding(candidate, grounding);
                let rows = self.run(&graph_to_query_with(&grounded, true, self.result_limit));
                let retrieved = map_query_results(&rows);
                let score = RetrievalScore::compute(gold, &retrieved);
                if score.f1 > 0.0 {
                    chosen.push(ScoredGraph {
                        graph: grounded,
                        retrieved,
                        score,
                    });
                }
            }
        }
        tracing::debug!(count = chosen.len(), "chosen groundings");
        chosen
    }

    fn expansions(&self, g: &Graph) -> Vec<Graph> {
        if self.use_trimming {
            ExpandOp::ALL
                .iter()
                .filter(|op| op.is_available(g))
                .flat_map(|op| op.apply(g))
                .collect()
        } else {
            expand(g)
        }
    }

    fn run(&self, query: &SparqlQuery) -> Vec<GroundingMap> {
        match self.oracle.query(query) {
            Ok(rows) => rows,
            Err(error) => {
                tracing::warn!(%error, kind = ?query.kind, "oracle query failed, treating as empty");
                Vec::new()
            }
        }
    }
}

/// Enumerates choice graphs for `ungrounded` with no oracle and no feedback.
///
/// Depth-first worklist: restriction children are preferred, and a graph
/// with no restriction children contributes its expansions instead. Every
/// child joins both the choice set and the pool. Terminates because
/// restriction strictly shrinks the mention list and hop-up applies at most
/// once per edge.
pub fn generate_without_gold(ungrounded: &Graph) -> Result<Vec<Graph>, GraphError> {
    ungrounded.ensure_valid()?;
    let mut pool = vec![ungrounded.clone()];
    let mut choices = Vec::new();

    while let Some(g) = pool.pop() {
        let mut children = restrict(&g);
        if children.is_empty() {
            children = expand(&g);
        }
        for child in children {
            choices.push(child.clone());
            pool.push(child);
        }
    }
    Ok(choices)
}
