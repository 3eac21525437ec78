//! Hacker News API access
//!
//! A thin request/decode client plus the logic that merges API items with
//! the local cache.

pub mod client;
pub mod source;
pub mod types;

pub use client::HnClient;
pub use source::{FetchOptions, FetchStats, PostFetcher, PostSource, UserPosts};
pub use types::{item_path, user_path, Item, ItemKind, User};
