//! Scoped question answering over a student roster.
//!
//! ```text
//!  dataset.csv / .tsv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Roster
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  scope    │  (grade, class, region) → scoped records
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐      no intent      ┌──────────┐
//!   │  intent   │ ──────────────────▶ │ fallback  │
//!   └──────────┘                      └──────────┘
//!        │                                 │
//!        ▼                                 │
//!   ┌──────────┐                           │
//!   │  format   │ ◀────────────────────────┘
//!   └──────────┘   answer string
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod fallback;
pub mod query;

pub use config::Settings;
pub use data::cache::RosterCache;
pub use data::model::{Roster, StudentRecord};
pub use data::scope::{apply_scope, scoped_indices, ScopeSpec};
pub use error::{ConfigError, FallbackError, LoadError};
pub use fallback::{FallbackResponder, HuggingFaceResponder, OfflineResponder};
pub use query::engine::QueryEngine;
pub use query::intent::{classify, Intent};
