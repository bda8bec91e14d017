//! Result caching module
//!
//! Classification results are cached per keyword in a single JSON file so
//! repeated runs spend API quota only on keywords whose entries have gone
//! stale. Freshness is a read-time policy: entries are never evicted, and
//! the smart-TTL table makes promising ranks expire faster than hopeless
//! ones.

mod store;

pub use store::ResultCache;
