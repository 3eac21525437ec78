//! Plain-text rendering of posts

use super::html::html_to_text;
use crate::api::{Item, ItemKind, User};
use std::fmt::Write;

const ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

/// Render a user header followed by each post
pub fn render_posts(user: Option<&User>, posts: &[Item]) -> String {
    let mut out = String::new();

    if let Some(user) = user {
        let _ = writeln!(out, "{} ({} karma)", user.id, user.karma);
        if let Some(about) = user.about.as_deref().map(html_to_text) {
            if !about.is_empty() {
                out.push_str(&indent(&about, "  "));
            }
        }
        out.push('\n');
    }

    if posts.is_empty() {
        out.push_str("No posts.\n");
        return out;
    }

    for (i, post) in posts.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&render_post(post));
    }
    out
}

/// Render one item as a header, a meta line and its body
pub fn render_post(item: &Item) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", headline(item));
    let meta = meta_line(item);
    if !meta.is_empty() {
        let _ = writeln!(out, "  {}", meta);
    }
    if let Some(url) = &item.url {
        let _ = writeln!(out, "  {}", url);
    }
    let _ = writeln!(out, "  {}{}", ITEM_URL, item.id);

    if let Some(text) = item.text.as_deref().map(html_to_text) {
        if !text.is_empty() {
            out.push('\n');
            out.push_str(&indent(&text, "  "));
        }
    }
    out
}

fn headline(item: &Item) -> String {
    match (item.kind, &item.title, item.parent) {
        (Some(ItemKind::Comment), _, Some(parent)) => {
            format!("Comment on {}{}", ITEM_URL, parent)
        }
        (_, Some(title), _) => title.clone(),
        (Some(kind), None, _) => format!("Untitled {}", kind_name(kind)),
        (None, None, _) => format!("Item {}", item.id),
    }
}

fn meta_line(item: &Item) -> String {
    let mut parts = Vec::new();
    if let Some(by) = &item.by {
        parts.push(format!("by {}", by));
    }
    if let Some(score) = item.score {
        parts.push(format!("{} points", score));
    }
    if let Some(at) = item.created_at() {
        parts.push(at.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    if let Some(n) = item.descendants {
        parts.push(format!("{} comments", n));
    }
    parts.join(" | ")
}

fn kind_name(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Story => "story",
        ItemKind::Comment => "comment",
        ItemKind::Job => "job",
        ItemKind::Poll => "poll",
        ItemKind::Pollopt => "poll option",
    }
}

fn indent(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(prefix);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
