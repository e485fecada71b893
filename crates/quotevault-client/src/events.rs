//! Listener registration for service events.
//!
//! Presenters subscribe and receive events on an unbounded channel; a
//! dropped receiver is forgotten on the next publish.

use std::sync::Mutex;

use quotevault_shared::{ErrorKind, Quote};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum FeedEvent {
    PageLoaded {
        generation: u64,
        /// The list was replaced rather than extended.
        reset: bool,
        quotes: Vec<Quote>,
        has_more: bool,
    },
    Failed {
        generation: u64,
        kind: ErrorKind,
        message: String,
    },
}

pub struct EventBus<E> {
    listeners: Mutex<Vec<mpsc::UnboundedSender<E>>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Clone> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        rx
    }

    /// Delivers `event` to every live listener.
    pub fn publish(&self, event: E) {
        self.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<E>>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_listeners_are_pruned() {
        let bus: EventBus<u32> = EventBus::new();
        let mut kept = bus.subscribe();
        let dropped = bus.subscribe();
        drop(dropped);

        bus.publish(7);
        assert_eq!(kept.recv().await, Some(7));
        assert_eq!(bus.listener_count(), 1);
    }
}
