//! Item name resolution.
//!
//! Maps what the player typed ("potion", "silver key", "healing_potion") to
//! an item id from a candidate list, so commands never require knowledge of
//! internal ids. Matching is case-insensitive and whitespace-normalized;
//! partial matches are allowed and ambiguity is reported rather than guessed.

use crate::engine::catalog::Catalog;

/// Result of resolving a typed item name.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResult {
    /// Single unambiguous match.
    Found(String),
    /// Multiple distinct items match; the player must clarify.
    Ambiguous(Vec<String>),
    /// Nothing in scope matches.
    NotFound,
}

/// Normalize a name for comparison: lowercase, trimmed, spaces collapsed,
/// underscores treated as spaces so typed names match ids.
fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn name_matches(query: &str, name: &str) -> bool {
    let query_norm = normalize_name(query);
    let name_norm = normalize_name(name);
    if query_norm == name_norm {
        return true;
    }
    name_norm.contains(&query_norm)
}

/// Resolve `query` against the given candidate item ids.
///
/// Exact matches (by id or display name) beat partial matches; among
/// partials, distinct ids are reported as ambiguous. Duplicate copies of the
/// same id collapse to a single match.
pub fn resolve_item(catalog: &Catalog, candidates: &[String], query: &str) -> ResolveResult {
    let query = query.trim();
    if query.is_empty() {
        return ResolveResult::NotFound;
    }

    let mut exact: Vec<String> = Vec::new();
    let mut partial: Vec<String> = Vec::new();
    for id in candidates {
        if exact.contains(id) || partial.contains(id) {
            continue;
        }
        let display = catalog.item_name(id);
        let qn = normalize_name(query);
        if qn == normalize_name(id) || qn == normalize_name(display) {
            exact.push(id.clone());
        } else if name_matches(query, id) || name_matches(query, display) {
            partial.push(id.clone());
        }
    }

    let hits = if exact.is_empty() { partial } else { exact };
    match hits.len() {
        0 => ResolveResult::NotFound,
        1 => ResolveResult::Found(hits.into_iter().next().unwrap_or_default()),
        _ => ResolveResult::Ambiguous(hits),
    }
}

/// Format an ambiguity report listing the candidate display names.
pub fn format_ambiguous(catalog: &Catalog, matches: &[String]) -> String {
    let names: Vec<&str> = matches.iter().map(|id| catalog.item_name(id)).collect();
    format!(
        "Which one? That could mean: {}. Try the full name.",
        names.join(", ")
    )
}
