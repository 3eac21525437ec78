//! Posts command - fetch and render a user's posts

use crate::api::{FetchOptions, HnClient, PostFetcher};
use crate::cache::ProcessCache;
use crate::cli::args::{OutputFormat, PostsArgs};
use crate::config::Config;
use crate::error::{HnError, HnResult};
use crate::render::render_posts;
use crate::ui::{TaskSpinner, UiContext};
use tracing::debug;

/// Execute the posts command
pub fn execute(args: PostsArgs, config: &Config) -> HnResult<()> {
    let user = args
        .user
        .or_else(|| config.posts.user.clone())
        .ok_or(HnError::MissingUser)?;

    let options = FetchOptions {
        limit: args.limit.unwrap_or(config.posts.limit),
        include_comments: config.posts.include_comments && !args.no_comments,
        refresh: args.refresh,
    };
    debug!("Fetching posts for {} with {:?}", user, options);

    let client = HnClient::new(&config.api);
    let cache = ProcessCache::new(config.cache_dir()?);

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);

    let found = cache.with_session(|session| {
        spinner.start(&format!("Fetching posts for {}...", user));
        PostFetcher::new(&client, options).posts(session, &user)
    });
    spinner.clear();
    let found = found?;

    match args.format {
        OutputFormat::Text => print!("{}", render_posts(Some(&found.user), &found.posts)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
    }

    Ok(())
}
