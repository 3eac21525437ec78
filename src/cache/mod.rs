//! Durable local cache for API responses
//!
//! One JSON file per cache directory, guarded by an advisory lock on the
//! directory so that only one session, across all processes, reads and
//! rewrites it at a time.
//!
//! # Layout
//!
//! | Path | Purpose |
//! |------|---------|
//! | `<cache-root>/hnposts/` | Cache directory, mode `0700`, the lock target |
//! | `cache.json` | Canonical store: `__version__` plus one field per entry |
//! | `cache.json.tmp` | Staging file, renamed over `cache.json` on release |
//!
//! # Session lifecycle
//!
//! 1. `ProcessCache::acquire` locks the directory (waiting if needed) and
//!    loads the store, resetting it on a schema mismatch
//! 2. `get`/`set` operate on the in-memory copy only
//! 3. `CacheSession::release` (or drop) writes the store atomically, then unlocks

pub mod lock;
pub mod paths;
pub mod session;
pub mod store;

pub use lock::{DirLock, PendingLock, TryLock};
pub use paths::{default_cache_dir, ensure_cache_dir, APP_DIR, CACHE_HOME_ENV};
pub use session::{CacheSession, ProcessCache};
pub use store::{CacheStore, SCHEMA_VERSION, STORE_FILE, STORE_TMP_FILE, VERSION_KEY};
