//! Cache command - inspect the local cache

use crate::cache::ProcessCache;
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::{HnError, HnResult};
use crate::ui::{self, UiContext};
use serde::Serialize;
use std::fs;

/// Summary of the cache contents
#[derive(Debug, Serialize)]
struct CacheStats {
    dir: String,
    schema_version: u64,
    entries: usize,
    file_bytes: u64,
}

/// Execute the cache command
pub fn execute(args: CacheArgs, config: &Config) -> HnResult<()> {
    let cache = ProcessCache::new(config.cache_dir()?);

    match args.action {
        CacheAction::Path => {
            println!("{}", cache.dir().display());
            Ok(())
        }
        CacheAction::Stats { format } => show_stats(&cache, format),
        CacheAction::Show { key } => show_entry(&cache, &key),
    }
}

fn show_stats(cache: &ProcessCache, format: OutputFormat) -> HnResult<()> {
    let entries = cache.with_session(|session| Ok(session.len()))?;

    // Read after release so the size reflects the file just written.
    let file_bytes = fs::metadata(cache.store_path())
        .map(|m| m.len())
        .unwrap_or(0);

    let stats = CacheStats {
        dir: cache.dir().display().to_string(),
        schema_version: crate::cache::SCHEMA_VERSION,
        entries,
        file_bytes,
    };

    match format {
        OutputFormat::Text => {
            let ctx = UiContext::detect();
            ui::key_value(&ctx, "dir", &stats.dir);
            ui::key_value(&ctx, "schema", &stats.schema_version.to_string());
            ui::key_value(&ctx, "entries", &stats.entries.to_string());
            ui::key_value(&ctx, "size", &format!("{} bytes", stats.file_bytes));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

fn show_entry(cache: &ProcessCache, key: &str) -> HnResult<()> {
    let value = cache.with_session(|session| Ok(session.get(key).cloned()))?;

    match value {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        None => Err(HnError::CacheEntryNotFound(key.to_string())),
    }
}
