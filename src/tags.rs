#![allow(clippy::module_name_repetitions)]
//! Timestamp tag codec.
//!
//! Auto-managed tags are either the literal `latest` marker or a UTC
//! timestamp rendered as `YYYY-MM-DDTHH-MM-SSZ`. The format is fixed-width
//! and zero-padded, so lexicographic order over tag strings equals
//! chronological order and tag inventories can be sorted without parsing.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// The floating marker tag re-pointed to the most recent build.
pub const LATEST: &str = "latest";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]-[minute]-[second]Z");

/// Render an instant as a timestamp tag (UTC, second precision).
pub fn timestamp_tag(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(&TIMESTAMP_FORMAT)
        .expect("fixed timestamp format")
}

/// True when `tag` is exactly a fixed-width UTC timestamp tag.
pub fn is_timestamp_tag(tag: &str) -> bool {
    tag.len() == 20 && PrimitiveDateTime::parse(tag, &TIMESTAMP_FORMAT).is_ok()
}

/// True for tags this tool creates and may later delete: timestamp tags and
/// the `latest` marker. Anything else belongs to the user.
pub fn is_auto_tag(tag: &str) -> bool {
    tag == LATEST || is_timestamp_tag(tag)
}
