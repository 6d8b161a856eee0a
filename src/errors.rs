// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup error types with actionable suggestions.
//!
//! Once the interactive loop is running nothing here applies: per-keystroke
//! and per-pass failures are absorbed locally and never crash the process.

use thiserror::Error;

/// Process exit contract shared with the launcher script.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    /// Entry indexes double as exit codes, capped to the 8-bit range a shell sees.
    pub const MAX_ENTRY_CODE: i32 = 255;
}

/// Fatal catalog-loading errors, reported once at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(
        "cannot read catalog file '{path}': {source}\n\n\
         Suggestion: pass the path to a LaunchBox platform XML file.\n\
         Example: lbsearch ~/eXoDOS/Data/Platforms/MS-DOS.xml"
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error(
        "no <LaunchBox> root element found\n\n\
         Suggestion: this does not look like a LaunchBox platform file;\n\
         expected <LaunchBox><Game>...</Game></LaunchBox>"
    )]
    MissingRoot,

    #[error(
        "catalog contains no loadable entries\n\n\
         Suggestion: every game needs both <RootFolder> and <Title>;\n\
         check that the file lists games for an installed platform"
    )]
    Empty,
}
