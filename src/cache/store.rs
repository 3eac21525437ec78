//! On-disk cache store
//!
//! The store is a single JSON object: a `__version__` integer plus one field
//! per cached entry. Writes go through a sibling temp file and a rename so the
//! canonical file is always either the previous or the new complete store.

use crate::error::{HnError, HnResult};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Schema version written to and expected from `cache.json`
pub const SCHEMA_VERSION: u64 = 0;

/// Field holding the schema version in the on-disk object
pub const VERSION_KEY: &str = "__version__";

/// Canonical store file name
pub const STORE_FILE: &str = "cache.json";

/// Staging file name used while persisting
pub const STORE_TMP_FILE: &str = "cache.json.tmp";

/// In-memory cache contents
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStore {
    version: u64,
    entries: Map<String, Value>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    /// Create an empty store at the current schema version
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            entries: Map::new(),
        }
    }

    /// Schema version of this store
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or overwrite an entry
    pub fn insert(&mut self, key: String, value: Value) -> HnResult<()> {
        if key == VERSION_KEY {
            return Err(HnError::ReservedKey(key));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entry keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Load the store from `dir`
    ///
    /// A missing file yields an empty store. A file written under a different
    /// schema version is discarded and an empty store is returned instead.
    pub fn load(dir: &Path) -> HnResult<Self> {
        let path = dir.join(STORE_FILE);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cache file at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(HnError::io(format!("reading {}", path.display()), e)),
        };

        let parsed: Value = serde_json::from_str(&content).map_err(|e| HnError::CacheCorrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let Value::Object(mut entries) = parsed else {
            return Err(HnError::CacheCorrupt {
                path,
                reason: "top-level value is not an object".to_string(),
            });
        };

        let version = entries.remove(VERSION_KEY).and_then(|v| v.as_u64());
        if version != Some(SCHEMA_VERSION) {
            debug!(
                "Cache schema {:?} does not match {}, discarding {} entries",
                version,
                SCHEMA_VERSION,
                entries.len()
            );
            return Ok(Self::new());
        }

        debug!("Loaded {} cache entries from {}", entries.len(), path.display());
        Ok(Self {
            version: SCHEMA_VERSION,
            entries,
        })
    }

    /// Serialize to the on-disk JSON object
    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.entries.len() + 1);
        object.insert(VERSION_KEY.to_string(), Value::from(self.version));
        for (key, value) in &self.entries {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }

    /// Atomically write the store into `dir`
    ///
    /// The temp file is fully written and synced before it is renamed over
    /// the canonical file. On failure the canonical file is left untouched.
    pub fn persist(&self, dir: &Path) -> HnResult<()> {
        let path = dir.join(STORE_FILE);
        let temp_path = dir.join(STORE_TMP_FILE);

        let temp_err = |source| HnError::CachePersist {
            path: temp_path.clone(),
            source,
        };

        let json = serde_json::to_vec(&self.to_json())?;

        let mut file = fs::File::create(&temp_path).map_err(temp_err)?;
        file.write_all(&json).map_err(temp_err)?;
        file.sync_all().map_err(temp_err)?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|source| HnError::CachePersist {
            path: path.clone(),
            source,
        })?;

        debug!("Persisted {} cache entries to {}", self.len(), path.display());
        Ok(())
    }
}
