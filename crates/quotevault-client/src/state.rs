//! Application state: every service, built once around one backend handle.

use std::sync::Arc;

use quotevault_shared::{QuoteVaultError, Result};
use tracing::info;
use uuid::Uuid;

use crate::account::{ProfileService, SettingsService};
use crate::auth::{AuthClient, SessionStore};
use crate::backend::{Backend, LocalBackend, QuoteSource, RestBackend};
use crate::collections::CollectionsService;
use crate::config::ClientConfig;
use crate::daily::DailyQuoteService;
use crate::favorites::FavoritesService;
use crate::feed::QuoteFeed;
use crate::notifications::{DailyReminder, InMemoryNotificationCenter, NotificationCenter};

pub struct AppState {
    pub config: ClientConfig,
    pub session: SessionStore,
    /// Present only against the hosted backend.
    pub auth: Option<AuthClient>,
    /// Direct reads (categories, authors, single quotes).
    pub quotes: Arc<dyn QuoteSource>,
    pub feed: QuoteFeed,
    pub daily: DailyQuoteService,
    pub favorites: FavoritesService,
    pub collections: CollectionsService,
    pub profile: ProfileService,
    pub settings: SettingsService,
    pub reminder: DailyReminder,
}

impl AppState {
    pub fn new<B: Backend + 'static>(
        config: ClientConfig,
        session: SessionStore,
        backend: Arc<B>,
        notifications: Arc<dyn NotificationCenter>,
    ) -> Result<Self> {
        let auth = if config.is_remote() {
            Some(AuthClient::new(&config, session.clone())?)
        } else {
            None
        };
        let daily = DailyQuoteService::new(backend.clone());

        Ok(Self {
            quotes: backend.clone(),
            feed: QuoteFeed::new(backend.clone(), config.page_size),
            favorites: FavoritesService::new(backend.clone(), backend.clone()),
            collections: CollectionsService::new(backend.clone(), backend.clone()),
            profile: ProfileService::new(backend.clone()),
            settings: SettingsService::new(backend),
            reminder: DailyReminder::new(notifications, daily.clone()),
            daily,
            auth,
            session,
            config,
        })
    }

    /// Picks the adapter from the configuration: REST when an API URL is
    /// set, otherwise the local database.
    pub fn connect(config: ClientConfig, session: SessionStore) -> Result<Self> {
        let notifications = Arc::new(InMemoryNotificationCenter::new());
        if config.is_remote() {
            info!(api_url = ?config.api_url, "using remote backend");
            let backend = Arc::new(RestBackend::new(&config, session.clone())?);
            Self::new(config, session, backend, notifications)
        } else {
            let backend = match &config.db_path {
                Some(path) => LocalBackend::open(path)?,
                None => LocalBackend::open_default()?,
            };
            info!(db_path = ?config.db_path, "using local backend");
            Self::new(config, session, Arc::new(backend), notifications)
        }
    }

    /// The acting user: the signed-in account remotely, the configured id
    /// locally.
    pub fn user_id(&self) -> Result<Uuid> {
        if self.config.is_remote() {
            self.session.user_id().ok_or(QuoteVaultError::Unauthorized)
        } else {
            Ok(self.config.local_user_id)
        }
    }

    pub fn auth(&self) -> Result<&AuthClient> {
        self.auth.as_ref().ok_or_else(|| {
            QuoteVaultError::Config("Sign-in needs QUOTEVAULT_API_URL to be set".into())
        })
    }
}
