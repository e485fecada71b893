use quotevault_shared::{Quote, QuoteQuery, SortOrder};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::rows::{collect, fmt_ts, like_pattern, opt_uuid_at, ts_at, uuid_at, FOLD_CASE};

const QUOTE_COLUMNS: &str = "id, text, author, category_id, created_at";

impl Database {
    pub fn insert_quote(&self, quote: &Quote) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO quotes (id, text, author, category_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    quote.id.to_string(),
                    quote.text,
                    quote.author,
                    quote.category_id.map(|c| c.to_string()),
                    fmt_ts(&quote.created_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "Quote"))?;
        Ok(())
    }

    pub fn get_quote(&self, id: Uuid) -> Result<Quote> {
        self.conn()
            .query_row(
                &format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1"),
                params![id.to_string()],
                row_to_quote,
            )
            .map_err(StoreError::from_query)
    }

    /// Filtered, ordered, offset-limited read.
    pub fn query_quotes(&self, query: &QuoteQuery) -> Result<Vec<Quote>> {
        let Some((where_sql, mut values)) = where_clause(query) else {
            return Ok(Vec::new());
        };

        let direction = match query.order {
            SortOrder::NewestFirst => "DESC",
            SortOrder::OldestFirst => "ASC",
        };
        // SQLite needs a LIMIT to accept OFFSET; -1 means unbounded.
        let limit = query
            .limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);
        values.push(Value::Integer(limit));
        values.push(Value::Integer(
            i64::try_from(query.offset).unwrap_or(i64::MAX),
        ));

        let sql = format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes{where_sql}
             ORDER BY created_at {direction}, id {direction}
             LIMIT ? OFFSET ?"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), row_to_quote)?;
        Ok(collect(rows)?)
    }

    /// Number of rows matching the query's predicates (range ignored).
    pub fn count_quotes(&self, query: &QuoteQuery) -> Result<u64> {
        let Some((where_sql, values)) = where_clause(query) else {
            return Ok(0);
        };
        let count: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM quotes{where_sql}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Distinct author names, alphabetically.
    pub fn list_authors(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT DISTINCT author FROM quotes ORDER BY author COLLATE NOCASE ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(collect(rows)?)
    }
}

/// Builds the `WHERE` clause and its positional values.
///
/// Returns `None` when the query can match nothing (empty `IN` list).
fn where_clause(query: &QuoteQuery) -> Option<(String, Vec<Value>)> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(category_id) = query.category_id {
        clauses.push("category_id = ?".into());
        values.push(Value::Text(category_id.to_string()));
    }
    if let Some(author) = &query.author {
        clauses.push("author = ?".into());
        values.push(Value::Text(author.clone()));
    }

    let mut text_clauses: Vec<String> = Vec::new();
    if let Some(term) = &query.text_contains {
        text_clauses.push(format!("{FOLD_CASE}(text) LIKE ? ESCAPE '\\'"));
        values.push(Value::Text(like_pattern(term)));
    }
    if let Some(term) = &query.author_contains {
        text_clauses.push(format!("{FOLD_CASE}(author) LIKE ? ESCAPE '\\'"));
        values.push(Value::Text(like_pattern(term)));
    }
    if !text_clauses.is_empty() {
        let joiner = if query.match_any { " OR " } else { " AND " };
        clauses.push(format!("({})", text_clauses.join(joiner)));
    }

    if let Some(ids) = &query.ids {
        if ids.is_empty() {
            return None;
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        clauses.push(format!("id IN ({placeholders})"));
        values.extend(ids.iter().map(|id| Value::Text(id.to_string())));
    }

    let sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    Some((sql, values))
}

pub(crate) fn row_to_quote(row: &rusqlite::Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: uuid_at(row, 0)?,
        text: row.get(1)?,
        author: row.get(2)?,
        category_id: opt_uuid_at(row, 3)?,
        created_at: ts_at(row, 4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use quotevault_shared::Category;

    fn quote(n: i64, text: &str, author: &str, category: Option<Uuid>) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            text: text.into(),
            author: author.into(),
            category_id: category,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n),
        }
    }

    fn seeded() -> (Database, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let category = Category {
            id: Uuid::new_v4(),
            name: "Wisdom".into(),
            created_at: Utc::now(),
        };
        db.insert_category(&category).unwrap();
        db.insert_quote(&quote(1, "The unexamined life is not worth living", "Socrates", Some(category.id)))
            .unwrap();
        db.insert_quote(&quote(2, "Love is the bridge", "Thornton Wilder", None)).unwrap();
        db.insert_quote(&quote(3, "Where there is love there is life", "Gandhi", Some(category.id)))
            .unwrap();
        db.insert_quote(&quote(4, "Lovely day", "Bill Withers", None)).unwrap();
        (db, category.id)
    }

    #[test]
    fn newest_first_with_range() {
        let (db, _) = seeded();
        let page = db.query_quotes(&QuoteQuery::default().range(1, 2)).unwrap();
        let authors: Vec<_> = page.iter().map(|q| q.author.as_str()).collect();
        assert_eq!(authors, ["Gandhi", "Thornton Wilder"]);

        let all = db
            .query_quotes(&QuoteQuery::default().ordered(SortOrder::OldestFirst))
            .unwrap();
        assert_eq!(all.first().unwrap().author, "Socrates");
    }

    #[test]
    fn text_match_is_case_insensitive() {
        let (db, _) = seeded();
        let hits = db
            .query_quotes(&QuoteQuery::default().text_contains("LOVE"))
            .unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn contains_folds_non_ascii_case() {
        let db = Database::open_in_memory().unwrap();
        db.insert_quote(&quote(1, "Élan vital is the engine of life", "Émile Zola", None))
            .unwrap();

        for term in ["élan", "ÉLAN", "Élan"] {
            let hits = db
                .query_quotes(&QuoteQuery::default().text_contains(term))
                .unwrap();
            assert_eq!(hits.len(), 1, "text term {term}");
        }
        let q = QuoteQuery::default().matching_any("émile");
        assert_eq!(db.count_quotes(&q).unwrap(), 1);
    }

    #[test]
    fn or_matches_text_or_author() {
        let (db, _) = seeded();
        let q = QuoteQuery::default().matching_any("so");
        // "Socrates" by author, nothing else contains "so".
        assert_eq!(db.query_quotes(&q).unwrap().len(), 1);

        // Only authors contain "wi": Thornton Wilder, Bill Withers.
        let hits = db.query_quotes(&QuoteQuery::default().matching_any("wi")).unwrap();
        assert_eq!(hits.len(), 2);

        // AND semantics without match_any.
        let q = QuoteQuery::default().text_contains("love").author_contains("gan");
        assert_eq!(db.query_quotes(&q).unwrap().len(), 1);
    }

    #[test]
    fn category_and_author_filters() {
        let (db, category) = seeded();
        let q = QuoteQuery {
            category_id: Some(category),
            ..QuoteQuery::default()
        };
        assert_eq!(db.count_quotes(&q).unwrap(), 2);

        let q = QuoteQuery {
            author: Some("Gandhi".into()),
            ..QuoteQuery::default()
        };
        assert_eq!(db.query_quotes(&q).unwrap().len(), 1);
    }

    #[test]
    fn id_list_filter() {
        let (db, _) = seeded();
        let all = db.query_quotes(&QuoteQuery::default()).unwrap();
        let wanted = vec![all[0].id, all[2].id];
        let hits = db
            .query_quotes(&QuoteQuery::default().ids_in(wanted.clone()))
            .unwrap();
        assert_eq!(hits.iter().map(|q| q.id).collect::<Vec<_>>(), wanted);

        assert!(db
            .query_quotes(&QuoteQuery::default().ids_in(Vec::new()))
            .unwrap()
            .is_empty());
        assert_eq!(
            db.count_quotes(&QuoteQuery::default().ids_in(Vec::new())).unwrap(),
            0
        );
    }

    #[test]
    fn get_missing_quote() {
        let (db, _) = seeded();
        assert!(matches!(db.get_quote(Uuid::new_v4()), Err(StoreError::NotFound)));
    }

    #[test]
    fn duplicate_id_rejected() {
        let db = Database::open_in_memory().unwrap();
        let q = quote(1, "a", "b", None);
        db.insert_quote(&q).unwrap();
        assert!(matches!(db.insert_quote(&q), Err(StoreError::Duplicate("Quote"))));
    }

    #[test]
    fn authors_are_distinct_and_sorted() {
        let (db, _) = seeded();
        db.insert_quote(&quote(9, "Know thyself", "Socrates", None)).unwrap();
        assert_eq!(
            db.list_authors().unwrap(),
            ["Bill Withers", "Gandhi", "Socrates", "Thornton Wilder"]
        );
    }
}
