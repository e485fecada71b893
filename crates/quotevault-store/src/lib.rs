//! # quotevault-store
//!
//! Local SQLite mirror of the QuoteVault tables.
//!
//! The remote service stays the source of truth; this crate backs the
//! offline mode of the client and doubles as a faithful stand-in for the
//! remote tables in tests. The crate exposes a synchronous [`Database`]
//! handle wrapping a `rusqlite::Connection` with typed CRUD helpers for
//! every table.

pub mod accounts;
pub mod categories;
pub mod collections;
pub mod database;
pub mod favorites;
pub mod migrations;
pub mod quotes;
pub mod seed;

mod error;
mod rows;

pub use database::Database;
pub use error::{Result, StoreError};
pub use seed::{SeedFile, SeedReport};
