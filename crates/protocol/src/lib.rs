//! Shared types for studydesk
//!
//! Defines the `/search` wire record and the persisted preference keys
//! and values used by the browser front-end.

pub mod keys;
pub mod prefs;
pub mod search;

pub use keys::*;
pub use prefs::*;
pub use search::*;
