//! hnposts - Hacker News posts from the terminal
//!
//! Fetches a user's posts from the Hacker News API, keeps every item in a
//! durable, process-exclusive local cache, and renders them as text.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod ui;

pub use cache::{CacheSession, ProcessCache};
pub use error::{HnError, HnResult};
