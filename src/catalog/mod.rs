// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory entry store shared by the search core.
//!
//! Entries are built once at startup by the XML loader and never mutated;
//! everything downstream refers to them by index.

pub mod xml;

/// A single searchable catalog entry.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Unique launch identifier (the game's root folder).
    pub key: String,
    /// Searchable description: title, alternate names, year, developer, publisher.
    pub content: String,
    /// Lowercased `key`, precomputed so scoring passes never re-lowercase.
    pub key_lower: String,
    /// Lowercased `content`.
    pub content_lower: String,
    /// Lowercased alphanumeric-only tokens of `content`. Empty tokens are never stored.
    pub words: Vec<String>,
}

impl Entry {
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        let key = key.into();
        let content = content.into();
        Self {
            key_lower: key.to_lowercase(),
            content_lower: content.to_lowercase(),
            words: tokenize(&content),
            key,
            content,
        }
    }
}

/// Splits on whitespace, strips non-alphanumerics, lowercases, drops empties.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|word| {
            let token: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(|c| c.to_lowercase())
                .collect();
            (!token.is_empty()).then_some(token)
        })
        .collect()
}
