//! Backend over the local SQLite mirror.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quotevault_shared::{
    Category, Collection, CollectionQuote, Quote, QuoteQuery, QuoteVaultError, Result,
    SearchQuery, UserFavorite, UserProfile, UserSettings,
};
use quotevault_store::{Database, SeedFile, SeedReport};
use uuid::Uuid;

use super::{AccountStore, CollectionStore, FavoriteStore, QuoteSource};

#[derive(Clone)]
pub struct LocalBackend {
    db: Arc<Mutex<Database>>,
}

impl LocalBackend {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::open_at(path)?))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Database::new()?))
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn import_seed(&self, seed: &SeedFile) -> Result<SeedReport> {
        let mut db = self.lock()?;
        Ok(db.import_seed(seed)?)
    }

    /// Runs `f` with the database locked, converting store errors.
    pub fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> quotevault_store::Result<T>,
    ) -> Result<T> {
        let db = self.lock()?;
        Ok(f(&*db)?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|e| QuoteVaultError::Storage(format!("Lock poisoned: {e}")))
    }
}

#[async_trait]
impl QuoteSource for LocalBackend {
    async fn fetch_quotes(&self, query: &QuoteQuery) -> Result<Vec<Quote>> {
        self.with_db(|db| db.query_quotes(query))
    }

    async fn count_quotes(&self, query: &QuoteQuery) -> Result<u64> {
        self.with_db(|db| db.count_quotes(query))
    }

    /// SQLite evaluates the OR itself, so no client-side merge is needed.
    async fn search_quotes(&self, search: &SearchQuery) -> Result<Vec<Quote>> {
        let query = search
            .field_query()
            .matching_any(&search.term)
            .range(search.offset, search.limit);
        self.with_db(|db| db.query_quotes(&query))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.with_db(|db| db.list_categories())
    }

    async fn list_authors(&self) -> Result<Vec<String>> {
        self.with_db(|db| db.list_authors())
    }
}

#[async_trait]
impl FavoriteStore for LocalBackend {
    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<UserFavorite>> {
        self.with_db(|db| db.list_favorites(user_id))
    }

    async fn insert_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<UserFavorite> {
        self.with_db(|db| db.insert_favorite(user_id, quote_id))
    }

    async fn delete_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool> {
        self.with_db(|db| db.delete_favorite(user_id, quote_id))
    }
}

#[async_trait]
impl CollectionStore for LocalBackend {
    async fn list_collections(&self, user_id: Uuid) -> Result<Vec<Collection>> {
        self.with_db(|db| db.list_collections(user_id))
    }

    async fn insert_collection(&self, user_id: Uuid, name: &str) -> Result<Collection> {
        self.with_db(|db| db.insert_collection(user_id, name))
    }

    async fn rename_collection(&self, collection_id: Uuid, name: &str) -> Result<()> {
        self.with_db(|db| db.rename_collection(collection_id, name))
            .map_err(|e| match e {
                QuoteVaultError::NotFound(_) => QuoteVaultError::NotFound("Collection".into()),
                other => other,
            })
    }

    async fn delete_collection(&self, collection_id: Uuid) -> Result<bool> {
        self.with_db(|db| db.delete_collection(collection_id))
    }

    async fn list_collection_quotes(&self, collection_id: Uuid) -> Result<Vec<CollectionQuote>> {
        self.with_db(|db| db.list_collection_quotes(collection_id))
    }

    async fn insert_collection_quote(
        &self,
        collection_id: Uuid,
        quote_id: Uuid,
    ) -> Result<CollectionQuote> {
        self.with_db(|db| db.insert_collection_quote(collection_id, quote_id))
    }

    async fn delete_collection_quote(&self, collection_id: Uuid, quote_id: Uuid) -> Result<bool> {
        self.with_db(|db| db.delete_collection_quote(collection_id, quote_id))
    }
}

#[async_trait]
impl AccountStore for LocalBackend {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        self.with_db(|db| db.get_profile(user_id))
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<()> {
        self.with_db(|db| db.upsert_profile(profile))
    }

    async fn get_settings(&self, user_id: Uuid) -> Result<Option<UserSettings>> {
        self.with_db(|db| db.get_settings(user_id))
    }

    async fn upsert_settings(&self, settings: &UserSettings) -> Result<()> {
        self.with_db(|db| db.upsert_settings(settings))
    }
}
