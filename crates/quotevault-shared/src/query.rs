//! Description of a filtered, ordered, offset-limited quote read.
//!
//! Both the remote adapter and the local store translate a [`QuoteQuery`]
//! into their own query language, so the coordinator code never has to know
//! which one it is talking to.

use uuid::Uuid;

use crate::models::QuoteFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteQuery {
    pub category_id: Option<Uuid>,
    /// Case-insensitive substring of the quote text.
    pub text_contains: Option<String>,
    /// Case-insensitive substring of the author name.
    pub author_contains: Option<String>,
    /// When set, `text_contains` and `author_contains` are OR-ed instead of
    /// AND-ed.
    pub match_any: bool,
    /// Exact author.
    pub author: Option<String>,
    /// Restrict to these ids (`IN` list). An empty list matches nothing.
    pub ids: Option<Vec<Uuid>>,
    pub order: SortOrder,
    pub offset: usize,
    /// `None` reads every matching row.
    pub limit: Option<usize>,
}

impl QuoteQuery {
    /// Non-search part of a feed filter (category and exact author).
    pub fn from_filter(filter: &QuoteFilter) -> Self {
        Self {
            category_id: filter.category_id,
            author: filter.author.clone(),
            ..Self::default()
        }
    }

    /// Quotes whose text OR author contains `term`.
    pub fn matching_any(mut self, term: &str) -> Self {
        self.text_contains = Some(term.to_string());
        self.author_contains = Some(term.to_string());
        self.match_any = true;
        self
    }

    pub fn text_contains(mut self, term: &str) -> Self {
        self.text_contains = Some(term.to_string());
        self
    }

    pub fn author_contains(mut self, term: &str) -> Self {
        self.author_contains = Some(term.to_string());
        self
    }

    pub fn ids_in(mut self, ids: Vec<Uuid>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn ordered(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn range(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }
}

/// A single user-entered term matched against text OR author, with the rest
/// of the feed filter applied on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub category_id: Option<Uuid>,
    pub author: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, offset: usize, limit: usize) -> Self {
        Self {
            term: term.into(),
            category_id: None,
            author: None,
            offset,
            limit,
        }
    }

    /// Builds a search from a feed filter; `None` when the filter has no
    /// search text.
    pub fn from_filter(filter: &QuoteFilter, offset: usize, limit: usize) -> Option<Self> {
        let term = filter.search_text.clone()?;
        Some(Self {
            term,
            category_id: filter.category_id,
            author: filter.author.clone(),
            offset,
            limit,
        })
    }

    /// Unbounded query for one of the two fields, carrying the other filters.
    pub fn field_query(&self) -> QuoteQuery {
        QuoteQuery {
            category_id: self.category_id,
            author: self.author.clone(),
            ..QuoteQuery::default()
        }
    }
}
