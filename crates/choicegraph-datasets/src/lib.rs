//! WebQuestions-style corpus access
//!
//! A corpus file is a JSON array of question records. Each record carries
//! the raw utterance and, for training splits, an s-expression target
//! value holding the gold answers. Tokenization and mention extraction are
//! deterministic heuristics, not NLU: search quality comes from grounding
//! against the knowledge base, and the dataset layer only has to feed it
//! stable token spans.

pub mod mentions;
pub mod target_value;
pub mod tokenize;

pub use mentions::extract_entity_mentions;
pub use target_value::parse_target_value;
pub use tokenize::tokenize_question;

use std::fs;
use std::path::Path;

use choicegraph_graph::TokenSpan;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the dataset layer.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read corpus file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode corpus json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unparseable target value `{value}`: {message}")]
    TargetValue { value: String, message: String },
}

/// One question record. Unknown fields are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct Question {
    pub utterance: String,
    #[serde(rename = "targetValue", default)]
    pub target_value: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Pre-linked mention spans; overrides the heuristic when present.
    #[serde(default)]
    pub entities: Option<Vec<TokenSpan>>,
}

impl Question {
    pub fn tokens(&self) -> Vec<String> {
        tokenize_question(&self.utterance)
    }

    /// Candidate entity mentions, longest span first.
    pub fn mentions(&self) -> Vec<TokenSpan> {
        match &self.entities {
            Some(spans) => spans.clone(),
            None => extract_entity_mentions(&self.tokens()),
        }
    }

    /// Gold answers parsed from the target value; empty when absent.
    pub fn answers(&self) -> Result<Vec<String>, DatasetError> {
        match &self.target_value {
            Some(value) => parse_target_value(value),
            None => Ok(Vec::new()),
        }
    }
}

/// The full corpus, in file order.
#[derive(Clone, Debug)]
pub struct QuestionCorpus {
    questions: Vec<Question>,
}

impl QuestionCorpus {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let text = fs::read_to_string(path)?;
        let questions = serde_json::from_str(&text)?;
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
