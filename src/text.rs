//! Text normalization and entity extraction
//!
//! The normalizer is a pure, total function; everything downstream of it
//! works on its output except the IATA token scan, which runs over the raw
//! message so that token boundaries are not disturbed.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static THREE_LETTER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]{3}\b").expect("valid token pattern"));

/// Common English 3-letter words that collide with real IATA codes.
///
/// Tokens on this list are never treated as airport codes inside a longer
/// message. A message that consists of nothing but the three letters is
/// still accepted, since typing only "was" can only mean the code.
const CODE_STOP_WORDS: &[&str] = &[
    "all", "and", "any", "are", "but", "can", "day", "did", "for", "get", "had", "has", "her",
    "him", "his", "how", "its", "let", "man", "may", "new", "not", "now", "off", "old", "one",
    "our", "out", "say", "see", "she", "the", "too", "two", "use", "was", "way", "who", "why",
    "yes", "you",
];

/// Prepositions that introduce a location phrase
const PHRASE_HEADS: &[&str] = &["near", "around", "in", "at"];

/// Trim, collapse whitespace runs to single spaces, and lowercase.
///
/// Idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whole-word containment check.
///
/// A match counts only when the characters adjacent to it are not
/// alphabetic, so "wh" is found in "500wh" and "is 20 wh ok" but not in
/// "what", and "aa" is not found inside "aardvark". The needle itself may
/// contain spaces, digits or hyphens ("carry on", "3-1-1", "100ml").
/// When a needle edge is itself a digit, an adjacent digit also blocks
/// the match, so "100ml" is not found inside "3100ml".
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    let (Some(first), Some(last)) = (needle.chars().next(), needle.chars().next_back()) else {
        return false;
    };
    for (start, matched) in haystack.match_indices(needle) {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !blocks_boundary(c, first));
        let after_ok = haystack[start + matched.len()..]
            .chars()
            .next()
            .is_none_or(|c| !blocks_boundary(c, last));
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

/// Whether an adjacent character merges with the needle's edge character
fn blocks_boundary(adjacent: char, edge: char) -> bool {
    adjacent.is_ascii_alphabetic() || (edge.is_ascii_digit() && adjacent.is_ascii_digit())
}

/// First-match check over a trigger set, word-boundary anchored.
pub fn contains_any_word(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| contains_word(haystack, needle))
}

/// Extract airport-code candidates from the raw message.
///
/// Scans for 3-letter alphabetic tokens, matched case-insensitively
/// against the known IATA set, minus the stop-list. If nothing hits and
/// the whole trimmed message is exactly three letters, that string is
/// tested directly against the set without the stop-list.
pub fn extract_iata_tokens(raw: &str, iata_codes: &HashSet<String>) -> Vec<String> {
    let mut hits: Vec<String> = Vec::new();

    for token in THREE_LETTER_TOKEN.find_iter(raw) {
        let lower = token.as_str().to_lowercase();
        if CODE_STOP_WORDS.contains(&lower.as_str()) {
            continue;
        }
        let upper = token.as_str().to_uppercase();
        if iata_codes.contains(&upper) && !hits.contains(&upper) {
            hits.push(upper);
        }
    }

    if hits.is_empty() {
        let trimmed = raw.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            let upper = trimmed.to_uppercase();
            if iata_codes.contains(&upper) {
                hits.push(upper);
            }
        }
    }

    hits
}

/// Locate a free-text location phrase in a normalized message.
///
/// Looks for a preposition ("near", "around", "in", "at") and returns the
/// span that follows it; without one, the whole message is the candidate.
pub fn extract_location_phrase(normalized: &str) -> &str {
    for head in PHRASE_HEADS {
        for (start, _) in normalized.match_indices(head) {
            let before_ok = normalized[..start]
                .chars()
                .next_back()
                .is_none_or(|c| c == ' ');
            let rest = &normalized[start + head.len()..];
            if before_ok && rest.starts_with(' ') {
                let phrase = rest.trim_start();
                if !phrase.is_empty() {
                    return phrase;
                }
            }
        }
    }
    normalized
}
