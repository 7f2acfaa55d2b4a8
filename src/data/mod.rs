/// Data layer: record types, loading, scoping and the reload cache.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Roster (bad cells degrade to null)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  Arc<Roster>, reloaded when the file's mtime changes
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  scope    │  (grade, class, region) → scoped records / indices
///   └──────────┘
/// ```

pub mod cache;
pub mod loader;
pub mod model;
pub mod scope;
