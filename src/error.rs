//! Error types for hnposts
//!
//! All modules use `HnResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for hnposts operations
pub type HnResult<T> = Result<T, HnError>;

/// All errors that can occur in hnposts
#[derive(Error, Debug)]
pub enum HnError {
    // Cache errors
    #[error("Cache already acquired by this handle; release the current session first")]
    AlreadyAcquired,

    #[error("Cache session already released")]
    SessionReleased,

    #[error("Cache key is reserved: {0}")]
    ReservedKey(String),

    #[error("Cache file {path} is corrupt: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("Failed to lock cache directory {path}: {source}")]
    CacheLock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to persist cache to {path}: {source}")]
    CachePersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cache entry not found: {0}")]
    CacheEntryNotFound(String),

    #[error("Cannot determine cache directory: neither XDG_CACHE_HOME nor HOME is usable")]
    CacheDirUnavailable,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No user given and no default user configured")]
    MissingUser,

    // API errors
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Network error requesting {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Unexpected API response from {url}: {reason}")]
    ApiDecode { url: String, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl HnError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable
    ///
    /// Nothing retries automatically; this only shapes the hint shown to the user.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingUser => Some("Pass a user name or set posts.user in the config file"),
            Self::CacheCorrupt { .. } => {
                Some("Remove the cache file shown above; it will be recreated on the next run")
            }
            Self::CacheDirUnavailable => Some("Set XDG_CACHE_HOME to an absolute path"),
            Self::AlreadyAcquired | Self::SessionReleased => {
                Some("This is a bug in hnposts, please report it")
            }
            _ if self.is_retryable() => Some("The API may be temporarily unavailable, try again"),
            _ => None,
        }
    }
}
