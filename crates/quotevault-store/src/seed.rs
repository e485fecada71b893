//! Bulk import of categories and quotes from a JSON file.
//!
//! The file mirrors a dump of the remote `categories` and `quotes` tables:
//!
//! ```json
//! { "categories": [{ "id": "...", "name": "Wisdom", "created_at": "..." }],
//!   "quotes": [{ "id": "...", "text": "...", "author": "...",
//!               "category_id": "...", "created_at": "..." }] }
//! ```

use std::path::Path;

use quotevault_shared::{Category, Quote};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Result;
use crate::rows::fmt_ts;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

impl SeedFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Rows actually inserted; rows whose id already exists are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub quotes: usize,
}

impl Database {
    /// Imports the seed in a single transaction.
    pub fn import_seed(&mut self, seed: &SeedFile) -> Result<SeedReport> {
        let tx = self.conn_mut().transaction()?;
        let mut report = SeedReport::default();

        for c in &seed.categories {
            report.categories += tx.execute(
                "INSERT OR IGNORE INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![c.id.to_string(), c.name, fmt_ts(&c.created_at)],
            )?;
        }
        for q in &seed.quotes {
            report.quotes += tx.execute(
                "INSERT OR IGNORE INTO quotes (id, text, author, category_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    q.id.to_string(),
                    q.text,
                    q.author,
                    q.category_id.map(|c| c.to_string()),
                    fmt_ts(&q.created_at),
                ],
            )?;
        }

        tx.commit()?;
        tracing::info!(
            categories = report.categories,
            quotes = report.quotes,
            "seed imported"
        );
        Ok(report)
    }
}
