//! Small text helpers shared by the extractors and analyses.

use regex::Regex;
use std::sync::LazyLock;

static USER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"user=([A-Za-z0-9_-]+)").expect("valid regex"));

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)").expect("valid regex"));

/// Reduce a scholar identifier to its canonical form.
///
/// Anything after the first `&` is a stray query fragment and is dropped.
pub fn tidy_id(scholar_id: &str) -> String {
    scholar_id
        .split('&')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Extract the scholar identifier from a profile link
pub fn grab_id(url: &str) -> Option<String> {
    USER_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Every distinct scholar identifier in `text`, in order of first appearance
pub fn all_ids(text: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for caps in USER_ID.captures_iter(text) {
        let id = &caps[1];
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Parse a count that must be all ASCII digits; anything else is 0
pub fn parse_count(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.parse().unwrap_or(0)
}

/// The number a text starts with, if any
pub fn leading_number(text: &str) -> Option<u64> {
    LEADING_NUMBER
        .captures(text.trim_start())
        .and_then(|caps| caps[1].parse().ok())
}

/// Title-case a name: upper-case the first letter of every alphabetic run,
/// lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

/// Abbreviate given names: "Ada King Lovelace, Charles Babbage" → "AK Lovelace, C Babbage"
pub fn to_initials(authors: &str) -> String {
    authors
        .split(',')
        .filter_map(|author| {
            let parts: Vec<&str> = author.split_whitespace().collect();
            let (last, given) = parts.split_last()?;
            let initials: String = given.iter().filter_map(|p| p.chars().next()).collect();
            Some(format!("{} {}", initials, last).trim().to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a site-relative link against `base`
pub fn absolute_url(base: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}
