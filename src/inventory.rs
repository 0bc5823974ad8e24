//! Live tag inventory queries against the engine.
//!
//! Inventories are re-read on every invocation; nothing is cached, so two
//! concurrent invocations against the same image name race with last-writer-
//! wins semantics on the engine side.

use crate::engine::EngineClient;
use crate::errors::WorkflowError;
use crate::tags;

/// All auto-managed tags of an image, ascending. An image that was never
/// built yields an empty inventory, not an error.
pub fn list_auto_tags(engine: &EngineClient, image: &str) -> Result<Vec<String>, WorkflowError> {
    list_tags_matching(engine, image, tags::is_auto_tag)
}

/// The timestamp tags of an image, ascending by creation time.
pub fn list_timestamp_tags(
    engine: &EngineClient,
    image: &str,
) -> Result<Vec<String>, WorkflowError> {
    list_tags_matching(engine, image, tags::is_timestamp_tag)
}

fn list_tags_matching(
    engine: &EngineClient,
    image: &str,
    keep: fn(&str) -> bool,
) -> Result<Vec<String>, WorkflowError> {
    let listing = engine.capture(&["image".to_string(), "ls".to_string()])?;
    Ok(tags_from_listing(&listing, image, keep))
}

/// Extract matching tags from `image ls` output: repository in column 1, tag
/// in column 2, whitespace delimited. Rows for other repositories (including
/// the header row) fail the exact repository match.
pub fn tags_from_listing(listing: &str, image: &str, keep: fn(&str) -> bool) -> Vec<String> {
    let mut tags: Vec<String> = listing
        .lines()
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            match (cols.next(), cols.next()) {
                (Some(repo), Some(tag)) if repo == image && keep(tag) => Some(tag.to_string()),
                _ => None,
            }
        })
        .collect();
    tags.sort();
    tags
}
