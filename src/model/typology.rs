//! Typology token sorting for badge display.

use std::cmp::Ordering;

/// Sorts the tokens of a typology label for display.
///
/// The label is split on commas, whitespace and slashes; empty tokens are
/// dropped and the rest are sorted ascending, numeric tokens compared
/// numerically (lexicographic tiebreak on equal values) and everything else
/// lexicographically. Tokens are rejoined with ", ".
///
/// Sorting an already-sorted label yields the same string, so the function is
/// safe to apply at every draw call.
pub fn sort_typology(typology: &str) -> String {
    let mut tokens: Vec<&str> = typology
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    tokens.sort_by(|a, b| compare_tokens(a, b));
    tokens.join(", ")
}

fn compare_tokens(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(na), Ok(nb)) => na.cmp(&nb).then_with(|| a.cmp(b)),
        // Mixed or non-numeric pairs fall back to plain string order
        _ => a.cmp(b),
    }
}
