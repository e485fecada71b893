//! Dual-field search emulated on the client.
//!
//! Used by sources that cannot express `text ILIKE t OR author ILIKE t`
//! themselves: one query per field, merged in memory. Both reads are capped
//! so a broad term never pulls the whole table.

use std::collections::HashSet;

use quotevault_shared::{Quote, Result, SearchQuery, SortOrder};
use tracing::debug;
use uuid::Uuid;

use crate::backend::QuoteSource;

/// Runs the text and author queries concurrently and slices the merged set.
pub async fn merged_search<S>(source: &S, search: &SearchQuery, cap: usize) -> Result<Vec<Quote>>
where
    S: QuoteSource + ?Sized,
{
    let base = search.field_query().ordered(SortOrder::NewestFirst);
    let by_text = base.clone().text_contains(&search.term).range(0, cap);
    let by_author = base.author_contains(&search.term).range(0, cap);

    let (first, second) = futures::try_join!(
        source.fetch_quotes(&by_text),
        source.fetch_quotes(&by_author)
    )?;
    debug!(
        term = %search.term,
        text_hits = first.len(),
        author_hits = second.len(),
        "merging search results"
    );

    let merged = merge_by_recency(first, second, cap);
    Ok(merged
        .into_iter()
        .skip(search.offset)
        .take(search.limit)
        .collect())
}

/// Concatenates both sets, keeps the first row seen per id, orders newest
/// first and truncates to `cap`.
pub fn merge_by_recency(first: Vec<Quote>, second: Vec<Quote>, cap: usize) -> Vec<Quote> {
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(first.len() + second.len());
    let mut merged: Vec<Quote> = first
        .into_iter()
        .chain(second)
        .filter(|q| seen.insert(q.id))
        .collect();
    // Stable sort keeps first-seen order among equal timestamps.
    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged.truncate(cap);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use quotevault_shared::{Category, QuoteQuery};

    fn quote(n: u128, text: &str, author: &str) -> Quote {
        Quote {
            id: Uuid::from_u128(n),
            text: text.into(),
            author: author.into(),
            category_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()
                + Duration::hours(n as i64),
        }
    }

    #[test]
    fn overlapping_sets_merge_to_unique_rows() {
        let first = vec![quote(1, "a", "x"), quote(2, "b", "x"), quote(3, "c", "x")];
        let second = vec![quote(2, "b", "x"), quote(3, "c", "x"), quote(4, "d", "x")];
        let merged = merge_by_recency(first, second, 500);
        let ids: Vec<u128> = merged.iter().map(|q| q.id.as_u128()).collect();
        assert_eq!(ids, [4, 3, 2, 1]);
    }

    #[test]
    fn first_seen_copy_wins() {
        let first = vec![quote(1, "from text query", "x")];
        let second = vec![quote(1, "from author query", "x")];
        let merged = merge_by_recency(first, second, 500);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "from text query");
    }

    #[test]
    fn cap_bounds_the_merged_set() {
        let first: Vec<_> = (1..=6).map(|n| quote(n, "t", "a")).collect();
        let second: Vec<_> = (4..=9).map(|n| quote(n, "t", "a")).collect();
        let merged = merge_by_recency(first, second, 5);
        let ids: Vec<u128> = merged.iter().map(|q| q.id.as_u128()).collect();
        assert_eq!(ids, [9, 8, 7, 6, 5]);
    }

    /// Answers single-field queries from a fixed table.
    struct FieldOnly(Vec<Quote>);

    #[async_trait]
    impl QuoteSource for FieldOnly {
        async fn fetch_quotes(&self, query: &QuoteQuery) -> Result<Vec<Quote>> {
            assert!(!query.match_any);
            let contains = |hay: &str, needle: &Option<String>| {
                needle
                    .as_ref()
                    .map_or(true, |n| hay.to_lowercase().contains(&n.to_lowercase()))
            };
            let mut rows: Vec<Quote> = self
                .0
                .iter()
                .filter(|q| contains(&q.text, &query.text_contains))
                .filter(|q| contains(&q.author, &query.author_contains))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows
                .into_iter()
                .skip(query.offset)
                .take(query.limit.unwrap_or(usize::MAX))
                .collect())
        }

        async fn count_quotes(&self, _query: &QuoteQuery) -> Result<u64> {
            Ok(self.0.len() as u64)
        }

        async fn list_categories(&self) -> Result<Vec<Category>> {
            Ok(Vec::new())
        }

        async fn list_authors(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn default_search_pages_the_merged_set() {
        let source = FieldOnly(vec![
            quote(1, "Stay hungry", "Steve Jobs"),
            quote(2, "Hungry minds", "Anon"),
            quote(3, "Be water", "Bruce Lee"),
            quote(4, "Nothing", "Hungry Ghost"),
        ]);

        let page = source
            .search_quotes(&SearchQuery::new("hungry", 0, 2))
            .await
            .unwrap();
        let ids: Vec<u128> = page.iter().map(|q| q.id.as_u128()).collect();
        assert_eq!(ids, [4, 2]);

        let page = source
            .search_quotes(&SearchQuery::new("hungry", 2, 2))
            .await
            .unwrap();
        let ids: Vec<u128> = page.iter().map(|q| q.id.as_u128()).collect();
        assert_eq!(ids, [1]);
    }
}
