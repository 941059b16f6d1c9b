//! Locating an author within publication author lists.

use crate::models::AuthorPosition;

/// Truncation markers the site puts in long author lists
const ELLIPSES: [&str; 2] = ["...", "\u{2026}"];

fn is_truncation(entry: &str) -> bool {
    ELLIPSES.iter().any(|e| entry.contains(e))
}

fn strip_truncation(entry: &str) -> String {
    ELLIPSES
        .iter()
        .fold(entry.to_string(), |acc, e| acc.replace(e, ""))
        .trim()
        .to_string()
}

/// Find `author_name` in a comma-separated author list.
///
/// Matching uses the last word of `author_name`, lower-cased, as a substring
/// of each author's last word. Ellipsis entries mark a truncated list: they
/// are not counted as authors, and a truncated list has no author count or
/// normalized position.
pub fn author_position(authors: &str, author_name: &str) -> AuthorPosition {
    let query = author_name
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_lowercase();

    let entries: Vec<&str> = authors.split(',').map(str::trim).collect();
    let truncated = entries.iter().any(|e| is_truncation(e));

    // Blank entries still hold a place; bare ellipses do not.
    let surnames: Vec<String> = entries
        .iter()
        .filter(|e| !(is_truncation(e) && strip_truncation(e).is_empty()))
        .map(|e| strip_truncation(e))
        .map(|e| {
            e.split_whitespace()
                .last()
                .unwrap_or_default()
                .to_lowercase()
        })
        .collect();

    let count = surnames.len();
    let matches: Vec<usize> = if query.is_empty() {
        Vec::new()
    } else {
        surnames
            .iter()
            .enumerate()
            .filter(|(_, surname)| surname.contains(&query))
            .map(|(i, _)| i + 1)
            .collect()
    };

    let position = match matches.as_slice() {
        [only] => Some(*only),
        _ => None,
    };

    let position_normalized = match (position, truncated) {
        (Some(_), false) if count == 1 => Some(1.0),
        (Some(pos), false) => Some((pos - 1) as f64 / (count - 1) as f64),
        _ => None,
    };

    AuthorPosition {
        authors: authors.to_string(),
        position,
        n_authors: (!truncated).then_some(count),
        position_normalized,
    }
}

/// [`author_position`] for every author list, in order
pub fn author_positions<S: AsRef<str>>(author_lists: &[S], author_name: &str) -> Vec<AuthorPosition> {
    author_lists
        .iter()
        .map(|authors| author_position(authors.as_ref(), author_name))
        .collect()
}
