//! Process-exclusive cache sessions
//!
//! A `ProcessCache` hands out at most one `CacheSession` at a time, and the
//! directory lock extends that guarantee to every process on the machine.
//! The session loads the store on acquisition and persists it on release;
//! release also runs from `Drop`, so every exit path unlocks the directory.

use super::lock::{DirLock, TryLock};
use super::paths::ensure_cache_dir;
use super::store::{CacheStore, STORE_FILE};
use crate::error::{HnError, HnResult};
use console::style;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

type ContentionNotice = Box<dyn Fn(&Path) + Send + Sync>;

/// Durable key-value cache shared between invocations
pub struct ProcessCache {
    dir: PathBuf,
    held: AtomicBool,
    on_contention: ContentionNotice,
}

impl fmt::Debug for ProcessCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessCache")
            .field("dir", &self.dir)
            .field("held", &self.held.load(Ordering::Acquire))
            .finish()
    }
}

impl ProcessCache {
    /// Create a cache rooted at `dir`
    ///
    /// Nothing touches the filesystem until [`ProcessCache::acquire`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            held: AtomicBool::new(false),
            on_contention: Box::new(print_waiting_notice),
        }
    }

    /// Replace the notice emitted when acquisition has to wait for another holder
    pub fn with_contention_notice(
        mut self,
        notice: impl Fn(&Path) + Send + Sync + 'static,
    ) -> Self {
        self.on_contention = Box::new(notice);
        self
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the canonical store file
    pub fn store_path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    /// Lock the cache directory and load the store
    ///
    /// Blocks without timeout while another session, in this or any other
    /// process, holds the directory. Fails with `AlreadyAcquired` if a session
    /// from this handle is still live.
    pub fn acquire(&self) -> HnResult<CacheSession<'_>> {
        if self.held.swap(true, Ordering::AcqRel) {
            return Err(HnError::AlreadyAcquired);
        }

        match self.lock_and_load() {
            Ok((lock, store)) => Ok(CacheSession {
                cache: self,
                lock: Some(lock),
                store: Some(store),
            }),
            Err(e) => {
                self.held.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Run `f` inside a session, releasing it afterwards on every path
    ///
    /// The store is persisted even when `f` fails; an error from `f` takes
    /// precedence over a persistence error.
    pub fn with_session<T, F>(&self, f: F) -> HnResult<T>
    where
        F: FnOnce(&mut CacheSession<'_>) -> HnResult<T>,
    {
        let mut session = self.acquire()?;
        let outcome = f(&mut session);
        let released = session.release();
        let value = outcome?;
        released?;
        Ok(value)
    }

    fn lock_and_load(&self) -> HnResult<(DirLock, CacheStore)> {
        ensure_cache_dir(&self.dir)?;

        let lock = match DirLock::try_acquire(&self.dir)? {
            TryLock::Acquired(lock) => lock,
            TryLock::Contended(pending) => {
                (self.on_contention)(&self.dir);
                pending.wait()?
            }
        };

        // An error here drops `lock`, which unlocks the directory.
        let store = CacheStore::load(&self.dir)?;
        debug!("Cache session started with {} entries", store.len());
        Ok((lock, store))
    }
}

fn print_waiting_notice(dir: &Path) {
    info!("Cache directory {} is locked, waiting", dir.display());
    eprintln!(
        "{} another hnposts process is using {}, waiting for it to finish...",
        style("Waiting:").yellow().bold(),
        dir.display()
    );
}

/// Exclusive handle on the cache for one acquire/mutate/release cycle
#[derive(Debug)]
pub struct CacheSession<'a> {
    cache: &'a ProcessCache,
    lock: Option<DirLock>,
    store: Option<CacheStore>,
}

impl CacheSession<'_> {
    /// Whether this session still holds the lock
    pub fn is_live(&self) -> bool {
        self.lock.is_some()
    }

    /// Look up an entry; `None` means the key was never set
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.as_ref().and_then(|store| store.get(key))
    }

    /// Look up an entry and decode it into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> HnResult<Option<T>> {
        self.get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(HnError::from)
    }

    /// Insert or overwrite an entry in memory
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> HnResult<()> {
        let store = self.store.as_mut().ok_or(HnError::SessionReleased)?;
        store.insert(key.into(), value)
    }

    /// Encode `value` as JSON and store it under `key`
    pub fn set_as<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> HnResult<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value)
    }

    /// Number of entries in the store
    pub fn len(&self) -> usize {
        self.store.as_ref().map_or(0, CacheStore::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry keys, in no particular order
    pub fn keys(&self) -> Vec<&str> {
        self.store
            .as_ref()
            .map(|store| store.keys().collect())
            .unwrap_or_default()
    }

    /// Persist the store and unlock the directory
    ///
    /// A no-op once the session has been released. The lock is released even
    /// if persisting fails; the persistence error is returned afterwards.
    pub fn release(&mut self) -> HnResult<()> {
        let Some(lock) = self.lock.take() else {
            return Ok(());
        };

        let persisted = match self.store.take() {
            Some(store) => store.persist(lock.path()),
            None => Ok(()),
        };

        drop(lock);
        self.cache.held.store(false, Ordering::Release);
        debug!("Cache session released");
        persisted
    }

    /// Release the session, consuming it
    pub fn finish(mut self) -> HnResult<()> {
        self.release()
    }
}

impl Drop for CacheSession<'_> {
    fn drop(&mut self) {
        if self.is_live() {
            if let Err(e) = self.release() {
                warn!("Failed to persist cache on drop: {}", e);
            }
        }
    }
}
