//! Participant list clean-up for whoever collects usernames.

use std::cmp::Ordering;

/// Case-insensitive order with a byte-order tiebreak, so names differing only
/// in case still sort the same way on every client.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Trim, drop empty names and exact duplicates, then sort with [`compare_names`].
pub fn sanitize<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    out.sort_by(|a, b| compare_names(a, b));
    out.dedup();
    out
}
