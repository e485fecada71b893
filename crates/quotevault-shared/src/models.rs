//! Records mirrored from the remote tables.
//!
//! The client never owns these rows: every screen re-fetches them, so the
//! structs are plain data with serde derives matching the column names.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Junction row linking a user to a quote they marked as favorite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserFavorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quote_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// A user-defined named group of quotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Junction row linking a collection to one of its quotes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionQuote {
    pub id: Uuid,
    pub collection_id: Uuid,
    pub quote_id: Uuid,
}

// ---------------------------------------------------------------------------
// Profile & settings
// ---------------------------------------------------------------------------

/// Public profile; `id` equals the auth user id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Point size used when rendering quote text.
    pub fn points(&self) -> f32 {
        match self {
            Self::Small => 14.0,
            Self::Medium => 17.0,
            Self::Large => 21.0,
        }
    }
}

impl std::str::FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(format!("unknown font size: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: Uuid,
    pub theme: Theme,
    pub font_size: FontSize,
    /// `#RRGGBB`
    pub accent_color: String,
    pub notification_enabled: bool,
    pub notification_time: NaiveTime,
}

impl UserSettings {
    pub const DEFAULT_ACCENT: &'static str = "#007AFF";

    /// Settings used for users that never saved any.
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            theme: Theme::System,
            font_size: FontSize::Medium,
            accent_color: Self::DEFAULT_ACCENT.to_string(),
            notification_enabled: false,
            notification_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Filter applied by the feed and search screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    pub category_id: Option<Uuid>,
    /// Matched against quote text OR author, case-insensitively.
    pub search_text: Option<String>,
    /// Exact author match.
    pub author: Option<String>,
}

impl QuoteFilter {
    pub fn new(
        category_id: Option<Uuid>,
        search_text: Option<String>,
        author: Option<String>,
    ) -> Self {
        Self {
            category_id,
            search_text: non_blank(search_text),
            author: non_blank(author),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.search_text.is_none() && self.author.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_drops_blank_terms() {
        let filter = QuoteFilter::new(None, Some("   ".into()), Some(" Seneca ".into()));
        assert_eq!(filter.search_text, None);
        assert_eq!(filter.author.as_deref(), Some("Seneca"));
        assert!(!filter.is_empty());
        assert!(QuoteFilter::new(None, Some(String::new()), None).is_empty());
    }

    #[test]
    fn settings_wire_format() {
        let settings = UserSettings::defaults_for(Uuid::nil());
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["theme"], "system");
        assert_eq!(json["font_size"], "medium");
        assert_eq!(json["notification_time"], "09:00:00");

        let back: UserSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!("LARGE".parse::<FontSize>().unwrap(), FontSize::Large);
    }
}
