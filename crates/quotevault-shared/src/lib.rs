//! # quotevault-shared
//!
//! Types shared by every QuoteVault crate: the data model mirrored from the
//! remote tables, the error taxonomy, input validation and the small pieces
//! of deterministic arithmetic (quote of the day) that both the client and
//! the local store rely on.

pub mod constants;
pub mod daily;
pub mod error;
pub mod models;
pub mod query;
pub mod share;
pub mod validation;

pub use error::{ErrorKind, Field, QuoteVaultError, Result};
pub use models::*;
pub use query::{QuoteQuery, SearchQuery, SortOrder};
