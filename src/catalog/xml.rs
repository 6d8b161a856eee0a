// SPDX-License-Identifier: MIT OR Apache-2.0

//! LaunchBox platform XML loader.
//!
//! Turns a LaunchBox catalog file into the flat `Vec<Entry>` the search core
//! consumes. `<AlternateName>` elements are folded into the content of the
//! game they belong to, along with the release year, developer and publisher,
//! so a query can match any of them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use roxmltree::{Document, Node};

use super::Entry;
use crate::errors::CatalogError;

/// Reads and parses a catalog file.
pub fn load(path: &Path) -> Result<Vec<Entry>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_str(&text)
}

/// Parses catalog XML from a string.
pub fn parse_str(text: &str) -> Result<Vec<Entry>, CatalogError> {
    let doc = Document::parse(text)?;
    let root = doc.root_element();
    if root.tag_name().name() != "LaunchBox" {
        return Err(CatalogError::MissingRoot);
    }

    let alt_names = parse_alternate_names(root);
    let entries = parse_games(root, &alt_names);
    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(entries)
}

fn child_text<'input>(node: Node<'input, 'input>, name: &str) -> Option<&'input str> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .and_then(|n| n.text())
}

/// Collects `<AlternateName>` entries keyed by game id. The set keeps them
/// deduplicated and in a stable order.
fn parse_alternate_names(root: Node) -> BTreeMap<String, BTreeSet<String>> {
    let mut names: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for elem in root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "AlternateName")
    {
        if let (Some(id), Some(name)) = (child_text(elem, "GameId"), child_text(elem, "Name")) {
            names.entry(id.to_string()).or_default().insert(name.to_string());
        }
    }

    names
}

fn parse_games(root: Node, alt_names: &BTreeMap<String, BTreeSet<String>>) -> Vec<Entry> {
    let mut entries = Vec::new();

    for game in root
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "Game")
    {
        // Both fields are required; games missing either are skipped, never fatal.
        let (Some(key), Some(title)) = (child_text(game, "RootFolder"), child_text(game, "Title"))
        else {
            continue;
        };

        let mut content = title.to_string();

        if let Some(id) = child_text(game, "ID") {
            if let Some(alts) = alt_names.get(id) {
                for alt in alts {
                    content.push(' ');
                    content.push_str(alt);
                }
            }
        }

        // Release year, unless the title already carries it. `get` rather
        // than slicing: a multi-byte character at the boundary of a mangled
        // date must skip the year, not abort the load.
        if let Some(date) = child_text(game, "ReleaseDate") {
            if let Some(year) = date.get(..4) {
                if !content.contains(year) {
                    content.push(' ');
                    content.push_str(year);
                }
            }
        }

        let developer = child_text(game, "Developer");
        let publisher = child_text(game, "Publisher");

        if let Some(dev) = developer {
            content.push(' ');
            content.push_str(dev);
        }
        if let Some(pub_) = publisher {
            if developer != Some(pub_) {
                content.push(' ');
                content.push_str(pub_);
            }
        }

        entries.push(Entry::new(key, content));
    }

    entries
}
