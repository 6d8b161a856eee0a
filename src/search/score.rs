// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tiered lexical scoring.
//!
//! A query is tokenized and every entry is scored independently. Each token
//! must match the entry somewhere (AND across tokens); the token's
//! contribution is the best match class it hits (OR within a token). On top
//! of that, multi-token queries that read like a prefix of the key or the
//! content earn a sequential bonus. Zero means "no match, exclude".

use crate::catalog::{tokenize, Entry};

/// Score weights. Only the relative order across tiers is contractual;
/// the values just keep the tiers from overlapping under summation.
pub mod weight {
    pub const SEQUENTIAL_KEY: i32 = 5000;
    pub const SEQUENTIAL_CONTENT: i32 = 3000;
    pub const KEY_PREFIX: i32 = 2000;
    pub const KEY_CONTAINS: i32 = 1000;
    pub const WORD_PREFIX: i32 = 100;
    pub const WORD_CONTAINS: i32 = 50;
    pub const CONTENT: i32 = 10;
    pub const DEFAULT: i32 = 1;
    pub const NONE: i32 = 0;
}

/// True when every token occurs in `text_lower` in order, each match
/// searched only after the end of the previous one.
fn has_sequential_match(text_lower: &str, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }

    let mut pos = 0;
    for token in tokens {
        match text_lower[pos..].find(token.as_str()) {
            Some(found) => pos += found + token.len(),
            None => return false,
        }
    }
    true
}

/// Scores `entry` against a raw query string.
pub fn score(entry: &Entry, query: &str) -> i32 {
    score_tokens(entry, &tokenize(query))
}

/// Scores `entry` against pre-tokenized query words.
///
/// An empty token list (empty or punctuation-only query) yields the default
/// score so the cleared view lists everything.
pub fn score_tokens(entry: &Entry, tokens: &[String]) -> i32 {
    if tokens.is_empty() {
        return weight::DEFAULT;
    }

    let mut result = weight::NONE;

    // Sequential matching bonus
    if tokens.len() > 1 {
        if has_sequential_match(&entry.key_lower, tokens) {
            result += weight::SEQUENTIAL_KEY;
        } else if has_sequential_match(&entry.content_lower, tokens) {
            result += weight::SEQUENTIAL_CONTENT;
        }
    }

    // Per-token matching: best class wins, any unmatched token disqualifies.
    for token in tokens {
        let mut token_score = weight::NONE;

        if entry.key_lower.starts_with(token.as_str()) {
            token_score = weight::KEY_PREFIX;
        } else if entry.key_lower.contains(token.as_str()) {
            token_score = weight::KEY_CONTAINS;
        }

        for word in &entry.words {
            if word.starts_with(token.as_str()) {
                token_score = token_score.max(weight::WORD_PREFIX);
            } else if word.contains(token.as_str()) {
                token_score = token_score.max(weight::WORD_CONTAINS);
            }
        }

        if entry.content_lower.contains(token.as_str()) {
            token_score = token_score.max(weight::CONTENT);
        }

        if token_score == weight::NONE {
            return weight::NONE;
        }
        result += token_score;
    }

    result
}
