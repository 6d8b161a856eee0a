// SPDX-License-Identifier: MIT OR Apache-2.0

//! Incremental concurrent fuzzy search: tiered lexical scoring, trailing-word
//! completion, and the background core that publishes ranked snapshots.

pub mod completion;
pub mod core;
pub mod score;

pub use self::core::{SearchCore, SearchResult, DEFAULT_MAX_RESULTS, SEARCH_TICK};
