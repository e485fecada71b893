use std::collections::HashMap;
use std::sync::Arc;

use quotevault_shared::{Quote, QuoteQuery, QuoteVaultError, Result};
use tracing::info;
use uuid::Uuid;

use crate::backend::{FavoriteStore, QuoteSource};

#[derive(Clone)]
pub struct FavoritesService {
    store: Arc<dyn FavoriteStore>,
    quotes: Arc<dyn QuoteSource>,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn FavoriteStore>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { store, quotes }
    }

    /// Favorited quotes, most recently favorited first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Quote>> {
        let ids = self.favorite_ids(user_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self
            .quotes
            .fetch_quotes(&QuoteQuery::default().ids_in(ids.clone()))
            .await?;
        let mut by_id: HashMap<Uuid, Quote> = rows.into_iter().map(|q| (q.id, q)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub async fn favorite_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let rows = self.store.list_favorites(user_id).await?;
        Ok(rows.into_iter().map(|f| f.quote_id).collect())
    }

    pub async fn is_favorite(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool> {
        Ok(self.favorite_ids(user_id).await?.contains(&quote_id))
    }

    pub async fn add(&self, user_id: Uuid, quote_id: Uuid) -> Result<()> {
        if self.is_favorite(user_id, quote_id).await? {
            return Err(QuoteVaultError::AlreadyExists("Favorite".into()));
        }
        self.store.insert_favorite(user_id, quote_id).await?;
        info!(%user_id, %quote_id, "favorite added");
        Ok(())
    }

    pub async fn remove(&self, user_id: Uuid, quote_id: Uuid) -> Result<()> {
        if !self.store.delete_favorite(user_id, quote_id).await? {
            return Err(QuoteVaultError::NotFound("Favorite".into()));
        }
        info!(%user_id, %quote_id, "favorite removed");
        Ok(())
    }

    /// Flips the favorite state and returns the new one.
    pub async fn toggle(&self, user_id: Uuid, quote_id: Uuid) -> Result<bool> {
        if self.is_favorite(user_id, quote_id).await? {
            self.remove(user_id, quote_id).await?;
            Ok(false)
        } else {
            self.add(user_id, quote_id).await?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use chrono::{Duration, TimeZone, Utc};
    use quotevault_shared::ErrorKind;

    async fn setup() -> (FavoritesService, Vec<Uuid>) {
        let backend = LocalBackend::in_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        backend
            .with_db(|db| {
                for (i, id) in ids.iter().enumerate() {
                    db.insert_quote(&Quote {
                        id: *id,
                        text: format!("q{i}"),
                        author: "A".into(),
                        category_id: None,
                        created_at: base + Duration::minutes(i as i64),
                    })?;
                }
                Ok(())
            })
            .unwrap();
        let backend = Arc::new(backend);
        (FavoritesService::new(backend.clone(), backend), ids)
    }

    #[tokio::test]
    async fn add_remove_and_toggle() {
        let (service, ids) = setup().await;
        let user = Uuid::new_v4();

        service.add(user, ids[0]).await.unwrap();
        let err = service.add(user, ids[0]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        assert!(service.toggle(user, ids[1]).await.unwrap());
        assert!(!service.toggle(user, ids[0]).await.unwrap());
        assert_eq!(service.favorite_ids(user).await.unwrap(), [ids[1]]);

        let err = service.remove(user, ids[2]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn list_resolves_quotes() {
        let (service, ids) = setup().await;
        let user = Uuid::new_v4();
        assert!(service.list(user).await.unwrap().is_empty());

        service.add(user, ids[2]).await.unwrap();
        service.add(user, ids[0]).await.unwrap();
        let texts: Vec<String> = service
            .list(user)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.text)
            .collect();
        assert_eq!(texts.len(), 2);
        assert!(texts.contains(&"q0".to_string()));
        assert!(texts.contains(&"q2".to_string()));
    }
}
