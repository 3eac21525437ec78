//! Records returned by the Hacker News API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user profile (`user/<id>.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Account creation time, Unix seconds
    #[serde(default)]
    pub created: i64,

    #[serde(default)]
    pub karma: i64,

    /// Profile text, HTML
    #[serde(default)]
    pub about: Option<String>,

    /// Ids of stories, comments and polls, newest first
    #[serde(default)]
    pub submitted: Vec<u64>,
}

/// Kind of item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Job,
    Poll,
    Pollopt,
}

/// A story, comment, job or poll (`item/<id>.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,

    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,

    #[serde(default)]
    pub by: Option<String>,

    /// Creation time, Unix seconds
    #[serde(default)]
    pub time: Option<i64>,

    /// Body, HTML
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub score: Option<i64>,

    #[serde(default)]
    pub parent: Option<u64>,

    #[serde(default)]
    pub descendants: Option<u64>,

    #[serde(default)]
    pub kids: Vec<u64>,

    #[serde(default)]
    pub deleted: bool,

    #[serde(default)]
    pub dead: bool,
}

impl Item {
    /// Whether the item should be hidden from listings
    pub fn is_hidden(&self) -> bool {
        self.deleted || self.dead
    }

    pub fn is_comment(&self) -> bool {
        self.kind == Some(ItemKind::Comment)
    }

    /// Creation time as a UTC timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// API path of a user record, also its cache key
pub fn user_path(name: &str) -> String {
    format!("user/{}.json", name)
}

/// API path of an item, also its cache key
pub fn item_path(id: u64) -> String {
    format!("item/{}.json", id)
}
