// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file support for lbsearch
//!
//! Loads configuration from .lbsearchrc.toml in current directory or
//! ~/.config/lbsearch/config.toml

use serde::Deserialize;
use std::path::PathBuf;

use crate::display::metrics::MAX_PREVIEW_LENGTH;
use crate::search::DEFAULT_MAX_RESULTS;

/// Configuration loaded from .lbsearchrc.toml or ~/.config/lbsearch/config.toml
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of ranked results kept per search pass
    pub max_results: Option<usize>,
    /// Content preview width before truncation
    pub preview_length: Option<usize>,
}

impl Config {
    /// Load configuration from files
    ///
    /// Precedence (highest to lowest):
    /// 1. .lbsearchrc.toml in current directory
    /// 2. ~/.config/lbsearch/config.toml
    pub fn load() -> Self {
        let mut candidates = vec![PathBuf::from(".lbsearchrc.toml")];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".config").join("lbsearch").join("config.toml"));
        }
        Self::load_first(&candidates)
    }

    /// First candidate that exists and parses wins; unreadable or absent
    /// files fall through to the next.
    fn load_first(candidates: &[PathBuf]) -> Self {
        candidates
            .iter()
            .find_map(|path| Self::load_from_path(path))
            .unwrap_or_default()
    }

    fn load_from_path(path: &PathBuf) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge CLI options with config (CLI wins)
    pub fn merge_max_results(&self, cli_value: Option<usize>) -> usize {
        cli_value.or(self.max_results).unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn merge_preview_length(&self) -> usize {
        self.preview_length.unwrap_or(MAX_PREVIEW_LENGTH)
    }
}
