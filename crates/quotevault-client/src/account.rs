//! Profile and settings of the signed-in user.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use quotevault_shared::validation::validate_name;
use quotevault_shared::{Field, QuoteVaultError, Result, UserProfile, UserSettings};
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::AccountStore;

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn AccountStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        self.store.get_profile(user_id).await
    }

    pub async fn update_name(&self, user_id: Uuid, name: &str) -> Result<UserProfile> {
        validate_name(name)?;
        let mut profile = self.load_or_new(user_id).await?;
        profile.name = Some(name.trim().to_string());
        self.store.upsert_profile(&profile).await?;
        info!(%user_id, "profile name updated");
        Ok(profile)
    }

    pub async fn update_avatar_url(&self, user_id: Uuid, url: &str) -> Result<UserProfile> {
        let parsed = reqwest::Url::parse(url.trim())
            .map_err(|e| QuoteVaultError::validation(Field::Url, format!("Invalid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(QuoteVaultError::validation(
                Field::Url,
                "Avatar URL must use http or https",
            ));
        }
        let mut profile = self.load_or_new(user_id).await?;
        profile.avatar_url = Some(parsed.to_string());
        self.store.upsert_profile(&profile).await?;
        Ok(profile)
    }

    async fn load_or_new(&self, user_id: Uuid) -> Result<UserProfile> {
        Ok(self.load(user_id).await?.unwrap_or_else(|| UserProfile {
            id: user_id,
            name: None,
            avatar_url: None,
            created_at: Utc::now(),
        }))
    }
}

/// Settings with an in-process cache.
///
/// One instance is built at startup and shared, replacing a global settings
/// singleton; `current` never touches the backend.
pub struct SettingsService {
    store: Arc<dyn AccountStore>,
    cache: RwLock<Option<UserSettings>>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
        }
    }

    /// Stored settings, or defaults when the user never saved any.
    pub async fn load(&self, user_id: Uuid) -> Result<UserSettings> {
        let settings = match self.store.get_settings(user_id).await? {
            Some(settings) => settings,
            None => {
                debug!(%user_id, "no stored settings, using defaults");
                UserSettings::defaults_for(user_id)
            }
        };
        self.set_cache(Some(settings.clone()));
        Ok(settings)
    }

    pub fn current(&self) -> Option<UserSettings> {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub async fn update(&self, settings: UserSettings) -> Result<UserSettings> {
        if !is_hex_color(&settings.accent_color) {
            return Err(QuoteVaultError::validation(
                Field::AccentColor,
                "Accent color must look like #RRGGBB",
            ));
        }
        self.store.upsert_settings(&settings).await?;
        info!(user_id = %settings.user_id, theme = settings.theme.as_str(), "settings saved");
        self.set_cache(Some(settings.clone()));
        Ok(settings)
    }

    pub fn clear(&self) {
        self.set_cache(None);
    }

    fn set_cache(&self, value: Option<UserSettings>) {
        *self.cache.write().unwrap_or_else(|e| e.into_inner()) = value;
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
