//! Precision/recall/F1 scoring of retrieved answers

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Precision, recall and F1 of a retrieved answer set against gold answers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl RetrievalScore {
    /// The all-zero score carried by unscored pool entries.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Case-insensitive set overlap between `gold` and `retrieved`.
    ///
    /// Conventions: empty `retrieved` gives precision 0, empty `gold` gives
    /// recall 0, and F1 is 0 whenever precision and recall sum to 0.
    pub fn compute(gold: &[String], retrieved: &[String]) -> Self {
        let gold: HashSet<String> = gold.iter().map(|answer| answer.to_lowercase()).collect();
        let retrieved: HashSet<String> = retrieved
            .iter()
            .map(|answer| answer.to_lowercase())
            .collect();
        let overlap = gold.intersection(&retrieved).count() as f64;

        let precision = if retrieved.is_empty() {
            0.0
        } else {
            overlap / retrieved.len() as f64
        };
        let recall = if gold.is_empty() {
            0.0
        } else {
            overlap / gold.len() as f64
        };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
        }
    }
}
