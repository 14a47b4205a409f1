//! Content normalization for panel entries.
//!
//! Unwraps the entry's `content.fields` envelope into the flat
//! [`MessageContent`] record: icon references are rewritten onto the fixed
//! chrome logo path and the publish date is parsed to epoch milliseconds.

use chrono::{DateTime, NaiveDate};

use crate::entry::{Fields, IconFields, RawEntry};
use crate::message::MessageContent;

/// Fixed logical path the panel loads message icons from. All icons are
/// shipped inside Firefox; only the file name comes from the CMS.
pub const ICON_BASE_URL: &str = "chrome://browser/content/logos/";

/// Normalize one entry's content into the flat message record.
///
/// Scalar fields pass through untouched (no trimming, no case folding).
/// `cta_url` defaults to the empty string when the entry has none.
pub fn normalize_content(entry: &RawEntry) -> MessageContent {
    let raw = &entry.content.fields;

    MessageContent {
        bucket_id: entry.id.clone(),
        publish_date: parse_publish_date(&raw.publish_date),
        title: raw.title.clone(),
        body: raw.body.clone(),
        icon_url: resolve_icon(raw.icon_url.as_ref()),
        icon_alt: raw.icon_alt.clone(),
        cta_type: raw.cta_type.clone(),
        cta_url: raw.cta_url.clone().unwrap_or_default(),
        cta_where: raw.cta_where.clone(),
        link_text: raw.link_text.clone(),
    }
}

/// Resolve an optional icon asset to its chrome URL.
///
/// Returns the empty string when the entry has no icon. The file name is not
/// validated as a path segment - the CMS is trusted to supply sane names.
pub fn resolve_icon(icon: Option<&Fields<IconFields>>) -> String {
    match icon {
        Some(icon) => format!("{}{}", ICON_BASE_URL, icon.fields.file.file_name),
        None => String::new(),
    }
}

/// Parse a Contentful date string to epoch milliseconds.
///
/// Contentful date fields are ISO 8601, either date-only (`2020-11-06`,
/// taken as UTC midnight) or a full timestamp. Anything else yields `None`,
/// which the caller surfaces as-is rather than treating as an error.
pub fn parse_publish_date(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp_millis())
}
