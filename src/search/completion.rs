// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trailing-word completion.
//!
//! Candidates are entry keys and content words that case-insensitively
//! extend the word currently being typed. The hint offered on Tab is the
//! longest common prefix of all candidates; when that collapses back to the
//! typed word there is nothing actionable to offer, even if candidates exist.

use std::collections::BTreeSet;

use crate::catalog::Entry;

/// Splits `query` at the last whitespace into (leading portion including the
/// separator, trailing word being typed).
fn split_trailing_word(query: &str) -> (&str, &str) {
    match query.rfind([' ', '\t']) {
        Some(idx) => (&query[..idx + 1], &query[idx + 1..]),
        None => ("", query),
    }
}

/// Collects every candidate that starts with the trailing query word and is
/// strictly longer than it, deduplicated and sorted.
pub fn find_completions(entries: &[Entry], query: &str) -> Vec<String> {
    if query.is_empty() || entries.is_empty() {
        return Vec::new();
    }

    let (_, word) = split_trailing_word(query);
    if word.is_empty() {
        return Vec::new();
    }
    let word_lower = word.to_lowercase();

    let mut completions: BTreeSet<String> = BTreeSet::new();
    {
        let mut check = |candidate: &str| {
            if candidate.is_empty() {
                return;
            }
            let lower = candidate.to_lowercase();
            if lower.starts_with(&word_lower) && lower.len() > word.len() {
                completions.insert(candidate.to_string());
            }
        };

        for entry in entries {
            check(&entry.key);
            for w in &entry.words {
                check(w);
            }
        }
    }

    completions.into_iter().collect()
}

/// The single completion offered to the user: the longest common
/// (case-insensitive) prefix across all candidates, re-attached to the
/// leading portion of the query. `None` when the common prefix is not a
/// strict extension of the typed word.
pub fn best_completion(query: &str, completions: &[String]) -> Option<String> {
    if completions.is_empty() || query.is_empty() {
        return None;
    }

    let (prefix, word) = split_trailing_word(query);
    if word.is_empty() {
        return None;
    }
    let word_lower = word.to_lowercase();

    let mut common = completions[0].clone();
    for candidate in &completions[1..] {
        if common.is_empty() {
            break;
        }
        if candidate.is_empty() {
            continue;
        }

        let common_lower = common.to_lowercase();
        let candidate_lower = candidate.to_lowercase();
        let mut match_len = common_lower
            .bytes()
            .zip(candidate_lower.bytes())
            .take_while(|(a, b)| a == b)
            .count();

        if match_len < common.len() {
            while !common.is_char_boundary(match_len) {
                match_len -= 1;
            }
            common.truncate(match_len);
        }
    }

    if common.is_empty() {
        return None;
    }
    let common_lower = common.to_lowercase();
    if common_lower.starts_with(&word_lower) && common.len() > word.len() {
        Some(format!("{prefix}{common}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new("DOOM", "Doom 1993 id Software"),
            Entry::new("DOOM2", "Doom II 1994 id Software"),
            Entry::new("DESCENT", "Descent 1995 Parallax"),
        ]
    }

    #[test]
    fn empty_query_has_no_completions() {
        assert!(find_completions(&entries(), "").is_empty());
        assert!(best_completion("", &["doom".to_string()]).is_none());
    }

    #[test]
    fn trailing_space_means_no_word_to_complete() {
        assert!(find_completions(&entries(), "doom ").is_empty());
    }

    #[test]
    fn candidates_extend_the_trailing_word() {
        let comps = find_completions(&entries(), "doo");
        // Keys and content words, deduplicated, sorted, all longer than "doo".
        assert_eq!(comps, vec!["DOOM", "DOOM2", "doom"]);
    }

    #[test]
    fn hint_is_longest_common_prefix() {
        let comps = find_completions(&entries(), "doo");
        let hint = best_completion("doo", &comps).unwrap();
        assert_eq!(hint, "DOOM");
    }

    #[test]
    fn hint_keeps_leading_query_portion() {
        let comps = find_completions(&entries(), "id desc");
        let hint = best_completion("id desc", &comps).unwrap();
        assert!(hint.starts_with("id "));
        assert!(hint.to_lowercase().ends_with("descent"));
    }

    #[test]
    fn many_candidates_but_no_usable_hint() {
        // "d" matches both the doom family and descent: the common prefix
        // collapses to "d" itself, so there is no actionable completion.
        let comps = find_completions(&entries(), "d");
        assert!(comps.len() > 1);
        assert!(best_completion("d", &comps).is_none());
    }

    #[test]
    fn hint_must_be_strictly_longer_than_typed_word() {
        let e = vec![Entry::new("AB", "ab")];
        let comps = find_completions(&e, "ab");
        assert!(comps.is_empty());
        assert!(best_completion("ab", &comps).is_none());
    }
}
