//! Question tokenization
//!
//! Token indices are load-bearing: entity mentions, edge spans and the
//! surface text sent to the knowledge base all address tokens by position,
//! so the walk below must stay deterministic. Lowercased alphanumeric runs
//! become word tokens and every non-whitespace punctuation character is a
//! token of its own (a trailing `?` is its own token).

/// Split an utterance into lowercase tokens.
pub fn tokenize_question(utterance: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in utterance.chars() {
        if c.is_alphanumeric() {
            for lc in c.to_lowercase() {
                current.push(lc);
            }
            continue;
        }

        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        if !c.is_whitespace() {
            tokens.push(c.to_string());
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
