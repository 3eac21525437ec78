//! Configuration schema for hnposts
//!
//! Configuration is stored at `~/.config/hnposts/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote API settings
    pub api: ApiConfig,

    /// Post listing defaults
    pub posts: PostsConfig,

    /// Cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without trailing slash
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hacker-news.firebaseio.com/v0".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Defaults for the posts command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    /// User to show when none is given on the command line
    pub user: Option<String>,

    /// Number of posts to render
    pub limit: usize,

    /// Include comments as well as stories
    pub include_comments: bool,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            user: None,
            limit: 10,
            include_comments: true,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Explicit cache directory; resolved from XDG_CACHE_HOME or ~/.cache when unset
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.general.log_format, "text");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.api.base_url.starts_with("https://"));
        assert_eq!(config.posts.limit, 10);
        assert!(config.posts.include_comments);
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [posts]
            user = "pg"
            limit = 3

            [cache]
            dir = "/tmp/hn"
            "#,
        )
        .unwrap();

        assert_eq!(config.posts.user.as_deref(), Some("pg"));
        assert_eq!(config.posts.limit, 3);
        assert!(config.posts.include_comments);
        assert_eq!(config.cache.dir, Some(PathBuf::from("/tmp/hn")));
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn serialize_roundtrip() {
        let mut config = Config::default();
        config.posts.user = Some("dang".to_string());

        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[api]"));
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.posts.user.as_deref(), Some("dang"));
    }
}
