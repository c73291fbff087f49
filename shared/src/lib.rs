//! Shared domain types for the Souq commerce backend.
//!
//! Contains the database row models, the bilingual API response envelope,
//! and id/time utilities used by every service crate.

pub mod models;
pub mod response;
pub mod util;
