//! Text rendering for posts and profiles

pub mod html;
pub mod post;

pub use html::{decode_entities, html_to_text};
pub use post::{render_post, render_posts};
