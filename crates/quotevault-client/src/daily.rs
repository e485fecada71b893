use std::sync::Arc;

use chrono::{Local, NaiveDate};
use quotevault_shared::daily::daily_offset;
use quotevault_shared::{Quote, QuoteQuery, Result};
use tracing::{debug, warn};

use crate::backend::QuoteSource;

/// Quote of the day. Failures are never shown to the user: they are logged
/// and the caller just gets no quote.
#[derive(Clone)]
pub struct DailyQuoteService {
    source: Arc<dyn QuoteSource>,
}

impl DailyQuoteService {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    pub async fn today(&self) -> Option<Quote> {
        self.quote_for(Local::now().date_naive()).await
    }

    pub async fn quote_for(&self, date: NaiveDate) -> Option<Quote> {
        match self.try_quote_for(date).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!(%date, error = %e, "quote of the day unavailable");
                None
            }
        }
    }

    /// Counts all quotes, then reads the single row at the day's offset.
    pub async fn try_quote_for(&self, date: NaiveDate) -> Result<Option<Quote>> {
        let all = QuoteQuery::default();
        let total = self.source.count_quotes(&all).await?;
        let Some(offset) = daily_offset(date, total) else {
            debug!(%date, "no quotes to pick from");
            return Ok(None);
        };
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let rows = self.source.fetch_quotes(&all.range(offset, 1)).await?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn backend(n: i64) -> LocalBackend {
        let backend = LocalBackend::in_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        backend
            .with_db(|db| {
                for i in 0..n {
                    db.insert_quote(&Quote {
                        id: Uuid::new_v4(),
                        text: format!("quote {i}"),
                        author: "Anon".into(),
                        category_id: None,
                        created_at: base + Duration::minutes(i),
                    })?;
                }
                Ok(())
            })
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn same_day_same_quote() {
        let service = DailyQuoteService::new(Arc::new(backend(7)));
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(); // day 69
        let first = service.quote_for(date).await.unwrap();
        let second = service.quote_for(date).await.unwrap();
        assert_eq!(first, second);
        // 69 % 7 = 6: newest first, so the oldest of seven.
        assert_eq!(first.text, "quote 0");
    }

    #[tokio::test]
    async fn empty_table_yields_nothing() {
        let service = DailyQuoteService::new(Arc::new(backend(0)));
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(service.try_quote_for(date).await.unwrap().is_none());
        assert!(service.quote_for(date).await.is_none());
    }
}
