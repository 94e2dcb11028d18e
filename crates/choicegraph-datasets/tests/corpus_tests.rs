//! Corpus loading through the public API: read a JSON file, tokenize,
//! surface mentions and gold answers.

use std::fs;
use std::path::PathBuf;

use choicegraph_datasets::{DatasetError, QuestionCorpus};
use tempfile::TempDir;

const CORPUS: &str = r#"[
    {
        "url": "http://www.freebase.com/view/en/grand_bahama",
        "utterance": "what country is the grand bahama island in?",
        "targetValue": "(list (description \"The Bahamas\"))"
    },
    {
        "utterance": "who is obama to michelle?"
    }
]"#;

fn write_corpus(text: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questions.json");
    fs::write(&path, text).unwrap();
    (dir, path)
}

#[test]
fn a_corpus_file_loads_in_order() {
    let (_dir, path) = write_corpus(CORPUS);

    let corpus = QuestionCorpus::load(&path).unwrap();

    assert_eq!(corpus.len(), 2);
    assert!(!corpus.is_empty());
    assert_eq!(
        corpus.questions()[0].utterance,
        "what country is the grand bahama island in?"
    );
    assert_eq!(
        corpus.questions()[0].url.as_deref(),
        Some("http://www.freebase.com/view/en/grand_bahama")
    );
}

#[test]
fn questions_tokenize_and_surface_their_mentions() {
    let (_dir, path) = write_corpus(CORPUS);
    let corpus = QuestionCorpus::load(&path).unwrap();

    let question = &corpus.questions()[0];
    let tokens = question.tokens();

    assert_eq!(tokens.len(), 9);
    assert_eq!(tokens[4..7], ["grand", "bahama", "island"]);
    assert_eq!(question.mentions(), vec![vec![4, 5, 6], vec![1]]);
}

#[test]
fn answers_come_from_the_target_value() {
    let (_dir, path) = write_corpus(CORPUS);
    let corpus = QuestionCorpus::load(&path).unwrap();

    let answers = corpus.questions()[0].answers().unwrap();
    assert_eq!(answers, vec!["The Bahamas".to_string()]);
    assert!(corpus.questions()[1].answers().unwrap().is_empty());
}

#[test]
fn pre_linked_entities_override_the_heuristic() {
    let (_dir, path) = write_corpus(
        r#"[{"utterance": "what country is the grand bahama island in?", "entities": [[5]]}]"#,
    );
    let corpus = QuestionCorpus::load(&path).unwrap();

    assert_eq!(corpus.questions()[0].mentions(), vec![vec![5]]);
}

#[test]
fn unknown_fields_are_ignored() {
    let (_dir, path) =
        write_corpus(r#"[{"utterance": "who is he?", "annotator": 3, "split": "train"}]"#);
    let corpus = QuestionCorpus::load(&path).unwrap();

    assert_eq!(corpus.len(), 1);
    assert!(corpus.questions()[0].mentions().is_empty());
}

#[test]
fn a_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let error = QuestionCorpus::load(dir.path().join("missing.json")).unwrap_err();

    assert!(matches!(error, DatasetError::Io(_)));
}

#[test]
fn malformed_json_is_a_decode_error() {
    let (_dir, path) = write_corpus(r#"{"not": "an array"}"#);

    let error = QuestionCorpus::load(&path).unwrap_err();

    assert!(matches!(error, DatasetError::Json(_)));
}

#[test]
fn a_bad_target_value_names_the_offending_text() {
    let (_dir, path) =
        write_corpus(r#"[{"utterance": "who?", "targetValue": "(list (description Nassau"}]"#);
    let corpus = QuestionCorpus::load(&path).unwrap();

    let error = corpus.questions()[0].answers().unwrap_err();

    assert!(matches!(error, DatasetError::TargetValue { .. }));
    assert!(error.to_string().contains("(list (description Nassau"));
}
