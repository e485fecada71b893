//! Daily reminder scheduling.
//!
//! The platform notification API sits behind [`NotificationCenter`]; the
//! in-memory center is what the CLI and tests use.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Timelike};
use quotevault_shared::constants::{
    DAILY_NOTIFICATION_FALLBACK, DAILY_NOTIFICATION_ID, DAILY_NOTIFICATION_TITLE,
};
use quotevault_shared::share::share_text;
use quotevault_shared::UserSettings;
use serde::Serialize;
use tracing::info;

use crate::daily::DailyQuoteService;

/// A calendar-triggered local notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationRequest {
    pub id: String,
    pub title: String,
    pub body: String,
    pub hour: u32,
    pub minute: u32,
    pub repeats: bool,
}

pub trait NotificationCenter: Send + Sync {
    /// Adds the request, replacing any pending one with the same id.
    fn schedule(&self, request: NotificationRequest);

    fn cancel(&self, id: &str);

    fn pending(&self) -> Vec<NotificationRequest>;
}

#[derive(Default)]
pub struct InMemoryNotificationCenter {
    pending: Mutex<BTreeMap<String, NotificationRequest>>,
}

impl InMemoryNotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationCenter for InMemoryNotificationCenter {
    fn schedule(&self, request: NotificationRequest) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.insert(request.id.clone(), request);
    }

    fn cancel(&self, id: &str) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.remove(id);
    }

    fn pending(&self) -> Vec<NotificationRequest> {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.values().cloned().collect()
    }
}

pub struct DailyReminder {
    center: Arc<dyn NotificationCenter>,
    daily: DailyQuoteService,
}

impl DailyReminder {
    pub fn new(center: Arc<dyn NotificationCenter>, daily: DailyQuoteService) -> Self {
        Self { center, daily }
    }

    /// Replaces the reminder according to `settings`.
    ///
    /// Returns the scheduled request, or `None` when reminders are off.
    pub async fn reschedule(
        &self,
        settings: &UserSettings,
        today: NaiveDate,
    ) -> Option<NotificationRequest> {
        self.center.cancel(DAILY_NOTIFICATION_ID);
        if !settings.notification_enabled {
            info!("daily reminder disabled");
            return None;
        }

        let body = match self.daily.quote_for(today).await {
            Some(quote) => share_text(&quote),
            None => DAILY_NOTIFICATION_FALLBACK.to_string(),
        };
        let request = NotificationRequest {
            id: DAILY_NOTIFICATION_ID.to_string(),
            title: DAILY_NOTIFICATION_TITLE.to_string(),
            body,
            hour: settings.notification_time.hour(),
            minute: settings.notification_time.minute(),
            repeats: true,
        };
        info!(
            hour = request.hour,
            minute = request.minute,
            "daily reminder scheduled"
        );
        self.center.schedule(request.clone());
        Some(request)
    }

    pub fn cancel(&self) {
        self.center.cancel(DAILY_NOTIFICATION_ID);
    }
}
