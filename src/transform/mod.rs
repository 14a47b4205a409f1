//! Entry-to-message transform pipeline.
//!
//! Combines the two pure stages - content normalization and targeting
//! compilation - into one message per entry, attaching the fixed template
//! and trigger identifiers. Both stages are side-effect free: transforming
//! the same entry twice yields identical messages.

mod content;
mod targeting;

pub use content::{normalize_content, parse_publish_date, resolve_icon, ICON_BASE_URL};
pub use targeting::compile_targeting;

use serde_json::Value as JsonValue;

use crate::entry::RawEntry;
use crate::message::{Message, MessageTrigger, MESSAGE_TEMPLATE};

/// Error type for the transform pipeline.
///
/// The only failure the pipeline itself can signal is a raw value that does
/// not match the expected entry shape (e.g. `content` missing). Everything
/// past shaping is infallible by construction.
#[derive(Debug)]
pub enum TransformError {
    Shape(serde_json::Error),
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        TransformError::Shape(err)
    }
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::Shape(e) => {
                write!(f, "entry does not match the What's New Panel shape: {}", e)
            }
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::Shape(e) => Some(e),
        }
    }
}

/// Transform one entry into a panel message.
///
/// `id` and `order` are preserved unchanged; `template` and `trigger` are
/// fixed constants.
pub fn transform_entry(entry: &RawEntry) -> Message {
    Message {
        id: entry.id.clone(),
        template: MESSAGE_TEMPLATE.to_string(),
        order: entry.order,
        content: normalize_content(entry),
        targeting: compile_targeting(entry),
        trigger: MessageTrigger::default(),
    }
}

/// Transform a batch of entries, preserving order.
pub fn transform(entries: &[RawEntry]) -> Vec<Message> {
    entries.iter().map(transform_entry).collect()
}

/// Shape and transform a batch of raw JSON values.
///
/// Each value is shaped into a [`RawEntry`] first; the first value that does
/// not conform fails the whole batch. Entries are never individually skipped.
pub fn transform_values(values: &[JsonValue]) -> Result<Vec<Message>, TransformError> {
    values
        .iter()
        .map(|value| {
            let entry: RawEntry = serde_json::from_value(value.clone())?;
            Ok(transform_entry(&entry))
        })
        .collect()
}
