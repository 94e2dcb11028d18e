//! Entity-mention candidates
//!
//! A deterministic heuristic, not entity linking: contiguous runs of
//! content tokens form the candidate mentions, and grounding against the
//! knowledge base decides which of them survive. Longer spans come first
//! so the most specific reading is tried before its fragments.

use choicegraph_graph::TokenSpan;

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "dare", "what", "when", "where", "which", "who", "whom", "whose", "why", "how",
    "this", "that", "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him",
    "her", "us", "them", "my", "your", "his", "its", "our", "their", "and", "or", "but", "if",
    "then", "than", "so", "as", "for", "with", "about", "to", "from", "in", "on", "at", "by",
    "of", "up", "out", "into", "onto",
];

/// Collect candidate mention spans, longest first, ties in question order.
pub fn extract_entity_mentions(tokens: &[String]) -> Vec<TokenSpan> {
    let mut mentions: Vec<TokenSpan> = Vec::new();
    let mut run: Vec<usize> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        if is_content_token(token) {
            run.push(index);
            continue;
        }
        if !run.is_empty() {
            mentions.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        mentions.push(run);
    }

    mentions.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    mentions
}

fn is_content_token(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric) && !STOPWORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::extract_entity_mentions;

    fn tokens(text: &str) -> Vec<String> {
        crate::tokenize_question(text)
    }

    #[test]
    fn content_runs_become_mentions_longest_first() {
        let mentions = extract_entity_mentions(&tokens(
            "what country is the grand bahama island in?",
        ));
        assert_eq!(mentions, vec![vec![4, 5, 6], vec![1]]);
    }

    #[test]
    fn stopword_only_questions_have_no_mentions() {
        assert!(extract_entity_mentions(&tokens("who is he?")).is_empty());
    }

    #[test]
    fn punctuation_breaks_a_run() {
        let mentions = extract_entity_mentions(&tokens("justin bieber's brother"));
        assert_eq!(mentions, vec![vec![0, 1], vec![3, 4]]);
    }

    #[test]
    fn equal_length_mentions_keep_question_order() {
        let mentions = extract_entity_mentions(&tokens("who is obama to michelle?"));
        assert_eq!(mentions, vec![vec![2], vec![4]]);
    }
}
