//! The paginated quote list behind the home feed and the search screen.

use std::sync::{Arc, Mutex, MutexGuard};

use quotevault_shared::{ErrorKind, Quote, QuoteFilter, QuoteQuery, Result, SearchQuery};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::QuoteSource;
use crate::events::{EventBus, FeedEvent};
use crate::pagination::{should_prefetch, PageOutcome, PageRequest, PaginationCoordinator};

/// What a call to [`QuoteFeed::fetch_quotes`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { count: usize, has_more: bool },
    /// Not started: a page is already in flight or the end was reached.
    Skipped,
    /// Finished after a newer reset; the result was dropped.
    Stale,
    Failed { kind: ErrorKind, message: String },
}

struct FeedState {
    coordinator: PaginationCoordinator,
    quotes: Vec<Quote>,
    filter: QuoteFilter,
}

pub struct QuoteFeed {
    source: Arc<dyn QuoteSource>,
    state: Mutex<FeedState>,
    events: EventBus<FeedEvent>,
}

impl QuoteFeed {
    pub fn new(source: Arc<dyn QuoteSource>, page_size: usize) -> Self {
        Self {
            source,
            state: Mutex::new(FeedState {
                coordinator: PaginationCoordinator::new(page_size),
                quotes: Vec::new(),
                filter: QuoteFilter::default(),
            }),
            events: EventBus::new(),
        }
    }

    /// Fetches the first page (`reset`) or the next one.
    ///
    /// A reset replaces the active filter and the list. An increment with a
    /// filter other than the active one is promoted to a reset.
    pub async fn fetch_quotes(&self, reset: bool, filter: &QuoteFilter) -> FetchOutcome {
        let (request, filter) = {
            let mut state = self.lock();
            let reset = reset || state.filter != *filter;
            if reset {
                state.filter = filter.clone();
            }
            let Some(request) = state.coordinator.begin(reset) else {
                debug!(
                    loading = state.coordinator.is_loading(),
                    has_more = state.coordinator.has_more(),
                    "page fetch skipped"
                );
                return FetchOutcome::Skipped;
            };
            (request, state.filter.clone())
        };

        debug!(
            generation = request.generation,
            offset = request.offset,
            reset = request.reset,
            "fetching page"
        );
        let result = self.read_page(&request, &filter).await;
        self.finish(&request, result)
    }

    /// Next page with the active filter.
    pub async fn load_more(&self) -> FetchOutcome {
        let filter = self.lock().filter.clone();
        self.fetch_quotes(false, &filter).await
    }

    /// Called as row `row_index` is rendered; loads the next page when the
    /// end of the list is within the look-ahead window.
    pub async fn on_row_displayed(&self, row_index: usize) -> Option<FetchOutcome> {
        let total = self.lock().quotes.len();
        if !should_prefetch(row_index, total) {
            return None;
        }
        Some(self.load_more().await)
    }

    pub fn quotes(&self) -> Vec<Quote> {
        self.lock().quotes.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().quotes.is_empty()
    }

    pub fn filter(&self) -> QuoteFilter {
        self.lock().filter.clone()
    }

    pub fn has_more(&self) -> bool {
        self.lock().coordinator.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().coordinator.is_loading()
    }

    pub fn current_page(&self) -> usize {
        self.lock().coordinator.current_page()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<FeedEvent> {
        self.events.subscribe()
    }

    async fn read_page(&self, request: &PageRequest, filter: &QuoteFilter) -> Result<Vec<Quote>> {
        match SearchQuery::from_filter(filter, request.offset, request.limit) {
            Some(search) => self.source.search_quotes(&search).await,
            None => {
                let query = QuoteQuery::from_filter(filter).range(request.offset, request.limit);
                self.source.fetch_quotes(&query).await
            }
        }
    }

    fn finish(&self, request: &PageRequest, result: Result<Vec<Quote>>) -> FetchOutcome {
        let mut state = self.lock();
        match result {
            Ok(page) => {
                let count = page.len();
                if state.coordinator.complete(request, count) == PageOutcome::Stale {
                    info!(generation = request.generation, count, "dropping stale page");
                    return FetchOutcome::Stale;
                }
                if request.reset {
                    state.quotes = page.clone();
                } else {
                    state.quotes.extend(page.iter().cloned());
                }
                let has_more = state.coordinator.has_more();
                drop(state);

                self.events.publish(FeedEvent::PageLoaded {
                    generation: request.generation,
                    reset: request.reset,
                    quotes: page,
                    has_more,
                });
                FetchOutcome::Loaded { count, has_more }
            }
            Err(e) => {
                if state.coordinator.fail(request) == PageOutcome::Stale {
                    info!(generation = request.generation, error = %e, "dropping stale failure");
                    return FetchOutcome::Stale;
                }
                drop(state);

                warn!(error = %e, kind = %e.kind(), "page fetch failed");
                let (kind, message) = (e.kind(), e.to_string());
                self.events.publish(FeedEvent::Failed {
                    generation: request.generation,
                    kind,
                    message: message.clone(),
                });
                FetchOutcome::Failed { kind, message }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
