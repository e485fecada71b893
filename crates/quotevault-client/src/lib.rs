//! # quotevault-client
//!
//! Client-side services for QuoteVault.
//!
//! Everything talks to the data tier through the traits in [`backend`]; the
//! REST adapter speaks to the hosted service, the local adapter to an SQLite
//! mirror. Services are constructed once in [`state::AppState`] and handed
//! the same backend handle, so tests can swap in fakes.

pub mod account;
pub mod auth;
pub mod backend;
pub mod collections;
pub mod config;
pub mod daily;
pub mod deeplink;
pub mod events;
pub mod favorites;
pub mod feed;
pub mod notifications;
pub mod pagination;
pub mod search;
pub mod state;

pub use config::ClientConfig;
pub use state::AppState;
