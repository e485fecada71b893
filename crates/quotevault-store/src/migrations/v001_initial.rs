//! v001 -- Initial schema creation.
//!
//! Mirrors the seven remote tables: `categories`, `quotes`,
//! `user_favorites`, `collections`, `collection_quotes`, `profiles` and
//! `user_settings`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Categories
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS categories (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL                  -- RFC-3339, fixed width
);

-- ----------------------------------------------------------------
-- Quotes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS quotes (
    id          TEXT PRIMARY KEY NOT NULL,
    text        TEXT NOT NULL,
    author      TEXT NOT NULL,
    category_id TEXT,                         -- nullable FK -> categories(id)
    created_at  TEXT NOT NULL,

    FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_quotes_created ON quotes(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_quotes_category ON quotes(category_id, created_at DESC);

-- ----------------------------------------------------------------
-- Favorites (user <-> quote junction)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS user_favorites (
    id         TEXT PRIMARY KEY NOT NULL,
    user_id    TEXT NOT NULL,
    quote_id   TEXT NOT NULL,
    created_at TEXT NOT NULL,

    UNIQUE (user_id, quote_id),
    FOREIGN KEY (quote_id) REFERENCES quotes(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Collections
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS collections (
    id         TEXT PRIMARY KEY NOT NULL,
    user_id    TEXT NOT NULL,
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_collections_user ON collections(user_id, created_at DESC);

-- ----------------------------------------------------------------
-- Collection quotes (collection <-> quote junction)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS collection_quotes (
    id            TEXT PRIMARY KEY NOT NULL,
    collection_id TEXT NOT NULL,
    quote_id      TEXT NOT NULL,
    added_at      TEXT NOT NULL,

    UNIQUE (collection_id, quote_id),
    FOREIGN KEY (collection_id) REFERENCES collections(id) ON DELETE CASCADE,
    FOREIGN KEY (quote_id) REFERENCES quotes(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Profiles (one per user)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS profiles (
    id         TEXT PRIMARY KEY NOT NULL,     -- = auth user id
    name       TEXT,
    avatar_url TEXT,
    created_at TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- User settings (one per user)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS user_settings (
    user_id              TEXT PRIMARY KEY NOT NULL,
    theme                TEXT NOT NULL,
    font_size            TEXT NOT NULL,
    accent_color         TEXT NOT NULL,
    notification_enabled INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1
    notification_time    TEXT NOT NULL                -- HH:MM
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
