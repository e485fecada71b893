/// Number of quotes requested per page by list screens
pub const PAGE_SIZE: usize = 20;

/// Rows remaining before the end of the list that trigger the next page
pub const PREFETCH_THRESHOLD: usize = 5;

/// Upper bound on rows merged in memory by the dual-field search
pub const SEARCH_MERGE_CAP: usize = 500;

/// Custom URL scheme used for deep links
pub const URL_SCHEME: &str = "quotevault";

/// Deep-link host carrying a password recovery code
pub const HOST_RESET_PASSWORD: &str = "reset-password";

/// Deep-link host opened by the home-screen widget
pub const HOST_QUOTE_OF_THE_DAY: &str = "quote-of-the-day";

/// Identifier of the single daily reminder notification
pub const DAILY_NOTIFICATION_ID: &str = "daily_quote_notification";

/// Notification title
pub const DAILY_NOTIFICATION_TITLE: &str = "Quote of the Day";

/// Body used when the quote of the day cannot be fetched
pub const DAILY_NOTIFICATION_FALLBACK: &str =
    "Your daily inspiration is waiting. Open QuoteVault to read today's quote.";

/// Minimum password length accepted at sign-up and reset
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum length of display names and collection names
pub const MAX_NAME_LEN: usize = 50;

/// Remote table names
pub const TABLE_QUOTES: &str = "quotes";
pub const TABLE_CATEGORIES: &str = "categories";
pub const TABLE_USER_FAVORITES: &str = "user_favorites";
pub const TABLE_COLLECTIONS: &str = "collections";
pub const TABLE_COLLECTION_QUOTES: &str = "collection_quotes";
pub const TABLE_PROFILES: &str = "profiles";
pub const TABLE_USER_SETTINGS: &str = "user_settings";
