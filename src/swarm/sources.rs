use std::collections::HashSet;

use crate::llm::Source;

/// Collapse sources sharing a URI, keeping the first occurrence and its position.
pub fn dedup_by_uri(sources: &[Source]) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .filter(|s| seen.insert(s.uri.as_str()))
        .cloned()
        .collect()
}
