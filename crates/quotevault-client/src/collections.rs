use std::sync::Arc;

use quotevault_shared::validation::validate_collection_name;
use quotevault_shared::{Collection, Quote, QuoteQuery, QuoteVaultError, Result, SearchQuery};
use tracing::info;
use uuid::Uuid;

use crate::backend::{CollectionStore, QuoteSource};

#[derive(Clone)]
pub struct CollectionsService {
    store: Arc<dyn CollectionStore>,
    quotes: Arc<dyn QuoteSource>,
}

impl CollectionsService {
    pub fn new(store: Arc<dyn CollectionStore>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { store, quotes }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Collection>> {
        self.store.list_collections(user_id).await
    }

    pub async fn create(&self, user_id: Uuid, name: &str) -> Result<Collection> {
        validate_collection_name(name)?;
        let collection = self.store.insert_collection(user_id, name.trim()).await?;
        info!(collection_id = %collection.id, name = %collection.name, "collection created");
        Ok(collection)
    }

    pub async fn rename(&self, collection_id: Uuid, name: &str) -> Result<()> {
        validate_collection_name(name)?;
        self.store.rename_collection(collection_id, name.trim()).await
    }

    pub async fn delete(&self, collection_id: Uuid) -> Result<()> {
        if !self.store.delete_collection(collection_id).await? {
            return Err(QuoteVaultError::NotFound("Collection".into()));
        }
        info!(%collection_id, "collection deleted");
        Ok(())
    }

    /// Quotes in the collection, newest quote first, the same order the
    /// feed uses. The remote junction rows carry no timestamp, so insertion
    /// order is not available on every backend.
    pub async fn quotes_in(&self, collection_id: Uuid) -> Result<Vec<Quote>> {
        let ids: Vec<Uuid> = self
            .store
            .list_collection_quotes(collection_id)
            .await?
            .into_iter()
            .map(|cq| cq.quote_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.quotes
            .fetch_quotes(&QuoteQuery::default().ids_in(ids))
            .await
    }

    pub async fn contains(&self, collection_id: Uuid, quote_id: Uuid) -> Result<bool> {
        Ok(self
            .store
            .list_collection_quotes(collection_id)
            .await?
            .iter()
            .any(|cq| cq.quote_id == quote_id))
    }

    /// Adds a quote unless it is already present.
    ///
    /// The presence check and the insert are separate calls, so a concurrent
    /// insert from another device can still race; the store's unique pair
    /// constraint reports that case as `AlreadyExists` too.
    pub async fn add_quote(&self, collection_id: Uuid, quote_id: Uuid) -> Result<()> {
        if self.contains(collection_id, quote_id).await? {
            return Err(QuoteVaultError::AlreadyExists("Quote in collection".into()));
        }
        self.store
            .insert_collection_quote(collection_id, quote_id)
            .await
            .map_err(|e| match e {
                QuoteVaultError::AlreadyExists(_) => {
                    QuoteVaultError::AlreadyExists("Quote in collection".into())
                }
                other => other,
            })?;
        info!(%collection_id, %quote_id, "quote added to collection");
        Ok(())
    }

    pub async fn remove_quote(&self, collection_id: Uuid, quote_id: Uuid) -> Result<()> {
        if !self
            .store
            .delete_collection_quote(collection_id, quote_id)
            .await?
        {
            return Err(QuoteVaultError::NotFound("Quote in collection".into()));
        }
        Ok(())
    }

    /// Dual-field search used when picking quotes to add.
    pub async fn search_candidates(
        &self,
        term: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Quote>> {
        let term = term.trim();
        if term.is_empty() {
            return self
                .quotes
                .fetch_quotes(&QuoteQuery::default().range(offset, limit))
                .await;
        }
        self.quotes
            .search_quotes(&SearchQuery::new(term, offset, limit))
            .await
    }
}
