use crate::catalog::Entry;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Raw (title, url) pair extracted from a bookmark export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBookmark {
    pub title: String,
    pub url: String,
}

/// Extract anchors from a Netscape-format bookmark export. Anchors without an
/// href are skipped; anything beyond `limit` records is dropped with a warning
/// rather than failing the import.
pub fn parse_export(html: &str, limit: usize) -> Vec<RawBookmark> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a").expect("static selector");

    let mut records = vec![];
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let url = href.trim();
        if url.is_empty() {
            continue;
        }

        let title = anchor.text().collect::<String>().trim().to_string();
        records.push(RawBookmark {
            title,
            url: url.to_string(),
        });
    }

    if records.len() > limit {
        log::warn!(
            "import capped at {limit} records, dropping {}",
            records.len() - limit
        );
        records.truncate(limit);
    }

    records
}

/// Wrap candidates whose url is not yet in the catalog into fresh unprocessed
/// entries. Repeats of the same url within one import are collapsed too,
/// first occurrence wins.
pub fn dedup_candidates(existing: &[Entry], candidates: Vec<RawBookmark>) -> Vec<Entry> {
    let mut seen: HashSet<String> = existing.iter().map(|e| e.url.clone()).collect();

    let mut fresh = vec![];
    for raw in candidates {
        if !seen.insert(raw.url.clone()) {
            log::debug!("already have {}, skipping", raw.url);
            continue;
        }

        let title = if raw.title.is_empty() {
            None
        } else {
            Some(raw.title)
        };
        fresh.push(Entry::new(title, raw.url));
    }

    fresh
}
