//! The remote data boundary.
//!
//! Each trait covers one group of tables so that a service only depends on
//! what it reads or writes. [`Backend`] bundles all of them for adapters
//! that serve the whole schema.

pub mod local;
pub mod rest;

use async_trait::async_trait;
use quotevault_shared::constants::SEARCH_MERGE_CAP;
use quotevault_shared::{
    Category, Collection, CollectionQuote, Quote, QuoteQuery, Result, SearchQuery, UserFavorite,
    UserProfile, UserSettings,
};
use uuid::Uuid;

pub use local::LocalBackend;
pub use rest::RestBackend;

/// Reads from the `quotes` and `categories` tables.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quotes(&self, query: &QuoteQuery) -> Result<Vec<Quote>>;

    /// Rows matching the query's predicates; offset and limit are ignored.
    async fn count_quotes(&self, query: &QuoteQuery) -> Result<u64>;

    /// One term matched against text OR author.
    ///
    /// The default issues one query per field and merges them in memory.
    /// Adapters that can express the OR predicate themselves override this.
    async fn search_quotes(&self, search: &SearchQuery) -> Result<Vec<Quote>> {
        crate::search::merged_search(self, search, self.search_cap()).await
    }

    /// Bound on rows merged in memory by the default `search_quotes`.
    fn search_cap(&self) -> usize {
        SEARCH_MERGE_CAP
    }

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn list_authors(&self) -> Result<Vec<String>>;
}

/// The `user_favorites` junction table.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Newest first.
    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<UserFavorite>>;

    async fn insert_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<UserFavorite>;

    /// `false` when no row matched.
    async fn delete_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool>;
}

/// The `collections` and `collection_quotes` tables.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn list_collections(&self, user_id: Uuid) -> Result<Vec<Collection>>;

    async fn insert_collection(&self, user_id: Uuid, name: &str) -> Result<Collection>;

    async fn rename_collection(&self, collection_id: Uuid, name: &str) -> Result<()>;

    async fn delete_collection(&self, collection_id: Uuid) -> Result<bool>;

    async fn list_collection_quotes(&self, collection_id: Uuid) -> Result<Vec<CollectionQuote>>;

    async fn insert_collection_quote(
        &self,
        collection_id: Uuid,
        quote_id: Uuid,
    ) -> Result<CollectionQuote>;

    async fn delete_collection_quote(&self, collection_id: Uuid, quote_id: Uuid) -> Result<bool>;
}

/// The `profiles` and `user_settings` tables.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()>;

    async fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>>;

    async fn upsert_settings(&self, settings: &UserSettings) -> Result<()>;
}

/// An adapter serving every table.
pub trait Backend: QuoteSource + FavoriteStore + CollectionStore + AccountStore {}

impl<T> Backend for T where T: QuoteSource + FavoriteStore + CollectionStore + AccountStore {}
