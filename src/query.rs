use crate::catalog::Entry;

/// Synthetic facet matching every entry.
pub const FACET_ALL: &str = "All";
/// Synthetic facet matching entries with no category, processed or not.
pub const FACET_UNCATEGORIZED: &str = "Uncategorized";

/// Distinct category names present in the catalog, sorted case-sensitively,
/// bracketed by the two synthetic facets: "All" first, "Uncategorized" last.
pub fn category_facets(entries: &[Entry]) -> Vec<String> {
    let mut names: Vec<String> = entries
        .iter()
        .filter_map(|e| e.category.map(|c| c.to_string()))
        .collect();
    names.sort();
    names.dedup();

    let mut facets = Vec::with_capacity(names.len() + 2);
    facets.push(FACET_ALL.to_string());
    facets.extend(names);
    facets.push(FACET_UNCATEGORIZED.to_string());
    facets
}

/// Recomputed-on-read filtered view: the facet must match AND the free-text
/// query (case-insensitive) must appear in title, description or a tag.
/// Catalog iteration order is preserved; there is no ranking.
pub fn filter(entries: &[Entry], facet: &str, query: &str) -> Vec<Entry> {
    let needle = query.trim().to_lowercase();

    entries
        .iter()
        .filter(|e| facet_matches(e, facet) && query_matches(e, &needle))
        .cloned()
        .collect()
}

fn facet_matches(entry: &Entry, facet: &str) -> bool {
    match facet {
        FACET_ALL => true,
        FACET_UNCATEGORIZED => entry.category.is_none(),
        name => entry
            .category
            .map(|c| c.as_str() == name)
            .unwrap_or(false),
    }
}

fn query_matches(entry: &Entry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    if entry.title.to_lowercase().contains(needle) {
        return true;
    }

    if let Some(description) = &entry.description {
        if description.to_lowercase().contains(needle) {
            return true;
        }
    }

    if let Some(tags) = &entry.tags {
        if tags.iter().any(|tag| tag.to_lowercase().contains(needle)) {
            return true;
        }
    }

    false
}
