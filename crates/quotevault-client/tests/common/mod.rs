#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use quotevault_client::backend::QuoteSource;
use quotevault_shared::{Category, Quote, QuoteQuery, QuoteVaultError, Result};
use tokio::sync::Notify;
use uuid::Uuid;

/// Quote source over a fixed table that counts calls and can hold
/// selected calls until released.
pub struct ScriptedSource {
    rows: Vec<Quote>,
    calls: AtomicUsize,
    held: Mutex<HashMap<usize, Arc<Notify>>>,
    failing: Mutex<Vec<usize>>,
}

impl ScriptedSource {
    /// `n` quotes, newest first, with ids `1..=n` (id `n` is the newest).
    pub fn with_rows(n: usize) -> Arc<Self> {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut rows: Vec<Quote> = (1..=n)
            .map(|i| Quote {
                id: Uuid::from_u128(i as u128),
                text: format!("Quote number {i}"),
                author: if i % 2 == 0 { "Even Author" } else { "Odd Author" }.into(),
                category_id: None,
                created_at: base + Duration::minutes(i as i64),
            })
            .collect();
        rows.reverse();
        Arc::new(Self {
            rows,
            calls: AtomicUsize::new(0),
            held: Mutex::new(HashMap::new()),
            failing: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Blocks the `call`-th read (0-based) until the returned handle is
    /// notified.
    pub fn hold_call(&self, call: usize) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.held.lock().unwrap().insert(call, gate.clone());
        gate
    }

    /// Makes the `call`-th read fail with a network error.
    pub fn fail_call(&self, call: usize) {
        self.failing.lock().unwrap().push(call);
    }

    /// Waits until at least `n` reads have started.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch_quotes(&self, query: &QuoteQuery) -> Result<Vec<Quote>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.held.lock().unwrap().get(&call).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&call) {
            return Err(QuoteVaultError::Network("connection reset".into()));
        }

        let matches = |q: &&Quote| {
            let contains = |hay: &str, needle: &Option<String>| {
                needle
                    .as_ref()
                    .map_or(true, |n| hay.to_lowercase().contains(&n.to_lowercase()))
            };
            let text = contains(&q.text, &query.text_contains);
            let author = contains(&q.author, &query.author_contains);
            let terms = if query.match_any {
                (query.text_contains.is_some() && text) || (query.author_contains.is_some() && author)
            } else {
                text && author
            };
            terms && query.author.as_ref().map_or(true, |a| &q.author == a)
        };
        Ok(self
            .rows
            .iter()
            .filter(matches)
            .skip(query.offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_quotes(&self, _query: &QuoteQuery) -> Result<u64> {
        Ok(self.rows.len() as u64)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(Vec::new())
    }

    async fn list_authors(&self) -> Result<Vec<String>> {
        Ok(vec!["Even Author".into(), "Odd Author".into()])
    }
}
