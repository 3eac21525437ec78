//! Post retrieval through the local cache
//!
//! `PostSource` abstracts the remote API so the cache merge logic can be
//! exercised without network access.

use super::types::{item_path, user_path, Item, User};
use crate::cache::CacheSession;
use crate::error::{HnError, HnResult};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Anything that can answer API paths with JSON
pub trait PostSource {
    /// GET one API path (e.g. `item/8863.json`) and decode the body
    fn fetch_json(&self, path: &str) -> HnResult<Value>;

    /// Fetch a user profile; the API answers `null` for unknown users
    fn user(&self, name: &str) -> HnResult<User> {
        let value = self.fetch_json(&user_path(name))?;
        if value.is_null() {
            return Err(HnError::UserNotFound(name.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Options controlling which posts are collected
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Maximum number of posts to return
    pub limit: usize,
    /// Include comments, not only stories/jobs/polls
    pub include_comments: bool,
    /// Ignore cached items and overwrite them with fresh copies
    pub refresh: bool,
}

/// Counters for one fetch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub cache_hits: usize,
    pub fetched: usize,
    pub skipped: usize,
}

/// A profile together with the posts selected from it
#[derive(Debug, Clone, Serialize)]
pub struct UserPosts {
    pub user: User,
    pub posts: Vec<Item>,
}

/// Collects a user's posts, serving items from the cache session when possible
pub struct PostFetcher<'s, S: PostSource> {
    source: &'s S,
    options: FetchOptions,
    stats: FetchStats,
}

impl<'s, S: PostSource> PostFetcher<'s, S> {
    pub fn new(source: &'s S, options: FetchOptions) -> Self {
        Self {
            source,
            options,
            stats: FetchStats::default(),
        }
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Walk the user's submissions newest first until `limit` posts are found
    ///
    /// The profile is always fetched fresh since its submission list grows.
    /// Items are cached under their API path.
    pub fn posts(&mut self, session: &mut CacheSession<'_>, user: &str) -> HnResult<UserPosts> {
        let profile = self.source.user(user)?;
        debug!(
            "User {} has {} submissions",
            profile.id,
            profile.submitted.len()
        );

        let mut posts = Vec::with_capacity(self.options.limit);
        for id in &profile.submitted {
            if posts.len() >= self.options.limit {
                break;
            }

            let item = self.item(session, *id)?;
            if item.is_hidden() || (!self.options.include_comments && item.is_comment()) {
                self.stats.skipped += 1;
                continue;
            }
            posts.push(item);
        }

        info!(
            "Collected {} posts for {} ({} cached, {} fetched, {} skipped)",
            posts.len(),
            user,
            self.stats.cache_hits,
            self.stats.fetched,
            self.stats.skipped
        );
        Ok(UserPosts {
            user: profile,
            posts,
        })
    }

    /// Get one item, from the session if present, else from the source
    pub fn item(&mut self, session: &mut CacheSession<'_>, id: u64) -> HnResult<Item> {
        let key = item_path(id);

        if !self.options.refresh {
            if let Some(item) = session.get_as::<Item>(&key)? {
                self.stats.cache_hits += 1;
                return Ok(item);
            }
        }

        let value = self.source.fetch_json(&key)?;
        if value.is_null() {
            return Err(HnError::ApiDecode {
                url: key,
                reason: "item does not exist".to_string(),
            });
        }
        let item: Item = serde_json::from_value(value.clone())?;
        session.set(key, value)?;
        self.stats.fetched += 1;
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ProcessCache;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// In-memory API answering from a fixed table and recording requests
    struct FakeApi {
        responses: HashMap<String, Value>,
        requests: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn new() -> Self {
            let mut responses = HashMap::new();
            responses.insert(
                "user/alice.json".to_string(),
                json!({"id": "alice", "created": 1, "karma": 10, "submitted": [4, 3, 2, 1]}),
            );
            responses.insert(
                "item/4.json".to_string(),
                json!({"id": 4, "type": "comment", "by": "alice", "text": "hi", "parent": 1}),
            );
            responses.insert(
                "item/3.json".to_string(),
                json!({"id": 3, "type": "story", "deleted": true}),
            );
            responses.insert(
                "item/2.json".to_string(),
                json!({"id": 2, "type": "story", "by": "alice", "title": "Second"}),
            );
            responses.insert(
                "item/1.json".to_string(),
                json!({"id": 1, "type": "story", "by": "alice", "title": "First"}),
            );
            Self {
                responses,
                requests: RefCell::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl PostSource for FakeApi {
        fn fetch_json(&self, path: &str) -> HnResult<Value> {
            self.requests.borrow_mut().push(path.to_string());
            Ok(self.responses.get(path).cloned().unwrap_or(Value::Null))
        }
    }

    fn options(limit: usize) -> FetchOptions {
        FetchOptions {
            limit,
            include_comments: true,
            refresh: false,
        }
    }

    fn ids(found: &UserPosts) -> Vec<u64> {
        found.posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn collects_newest_first_and_skips_deleted() {
        let temp = TempDir::new().unwrap();
        let cache = ProcessCache::new(temp.path());
        let api = FakeApi::new();

        let mut session = cache.acquire().unwrap();
        let mut fetcher = PostFetcher::new(&api, options(3));
        let found = fetcher.posts(&mut session, "alice").unwrap();

        assert_eq!(found.user.karma, 10);
        assert_eq!(ids(&found), vec![4, 2, 1]);
        assert_eq!(
            fetcher.stats(),
            FetchStats {
                cache_hits: 0,
                fetched: 4,
                skipped: 1
            }
        );
    }

    #[test]
    fn second_run_serves_items_from_cache() {
        let temp = TempDir::new().unwrap();
        let cache = ProcessCache::new(temp.path());

        let first = FakeApi::new();
        cache
            .with_session(|session| {
                PostFetcher::new(&first, options(2)).posts(session, "alice")
            })
            .unwrap();

        let second = FakeApi::new();
        let (found, stats) = cache
            .with_session(|session| {
                let mut fetcher = PostFetcher::new(&second, options(2));
                let found = fetcher.posts(session, "alice")?;
                Ok((found, fetcher.stats()))
            })
            .unwrap();

        assert_eq!(ids(&found), vec![4, 2]);
        assert_eq!(stats.fetched, 0);
        assert_eq!(stats.cache_hits, 3);
        // Only the profile is requested again.
        assert_eq!(second.requests(), vec!["user/alice.json".to_string()]);
    }

    #[test]
    fn refresh_refetches_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let cache = ProcessCache::new(temp.path());
        cache
            .with_session(|session| session.set("item/1.json", json!({"id": 1, "title": "Old"})))
            .unwrap();

        let api = FakeApi::new();
        let mut fetch = options(1);
        fetch.refresh = true;
        let item = cache
            .with_session(|session| PostFetcher::new(&api, fetch).item(session, 1))
            .unwrap();
        assert_eq!(item.title.as_deref(), Some("First"));

        let session = cache.acquire().unwrap();
        assert_eq!(session.get("item/1.json").unwrap()["title"], json!("First"));
    }

    #[test]
    fn comments_can_be_excluded() {
        let temp = TempDir::new().unwrap();
        let cache = ProcessCache::new(temp.path());
        let api = FakeApi::new();
        let mut fetch = options(5);
        fetch.include_comments = false;

        let found = cache
            .with_session(|session| PostFetcher::new(&api, fetch).posts(session, "alice"))
            .unwrap();
        assert_eq!(ids(&found), vec![2, 1]);
    }

    #[test]
    fn unknown_user() {
        let temp = TempDir::new().unwrap();
        let cache = ProcessCache::new(temp.path());
        let api = FakeApi::new();

        let err = cache
            .with_session(|session| PostFetcher::new(&api, options(1)).posts(session, "nobody"))
            .unwrap_err();
        assert!(matches!(err, HnError::UserNotFound(name) if name == "nobody"));
    }
}
