// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// lbsearch - Interactive fuzzy search over a LaunchBox game catalog
///
/// Loads a platform XML catalog, then runs a live terminal search with
/// incremental scoring, Tab completion, and keyboard navigation.
#[derive(Parser, Debug)]
#[command(name = "lbsearch")]
#[command(
    author,
    version,
    about,
    long_about = None,
    override_usage = "lbsearch [OPTIONS] <CATALOG>",
    after_help = "Exit codes:\n  The selected entry's catalog index (capped at 255) on confirm,\n  0 on cancel (Esc / Ctrl-C), 1 on error.\n\nExample:\n  lbsearch ~/eXoDOS/Data/Platforms/MS-DOS.xml -q doom"
)]
pub struct Cli {
    /// Path to the LaunchBox platform XML file
    pub catalog: PathBuf,

    /// Initial search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Maximum number of ranked results to keep per pass
    #[arg(short = 'm', long)]
    pub max_results: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_path_is_required() {
        assert!(Cli::try_parse_from(["lbsearch"]).is_err());
        let cli = Cli::try_parse_from(["lbsearch", "games.xml"]).unwrap();
        assert_eq!(cli.catalog, PathBuf::from("games.xml"));
        assert!(cli.query.is_none());
        assert!(cli.max_results.is_none());
    }

    #[test]
    fn options_parse() {
        let cli =
            Cli::try_parse_from(["lbsearch", "games.xml", "-q", "doom", "-m", "50"]).unwrap();
        assert_eq!(cli.query.as_deref(), Some("doom"));
        assert_eq!(cli.max_results, Some(50));
    }
}
