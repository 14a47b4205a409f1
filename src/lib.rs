//! # whatsnew: Contentful to Firefox What's New Panel proxy
//!
//! Ingests What's New Panel content entries from Contentful and converts
//! them into the message records Firefox's "what's new" surface consumes.
//!
//! The core is a pure, two-stage transform applied per entry:
//!
//! - **Content normalization**: unwrap the CMS's nested `{fields: {...}}`
//!   envelopes into a flat content record (title, body, icon chrome URL,
//!   call-to-action fields, epoch-millisecond publish date).
//! - **Targeting compilation**: compile the optional targeting sub-records
//!   (version, locale, region, free-form fragment) into one boolean JEXL
//!   filter expression, AND-joining the active clauses in a fixed order.
//!
//! ## Example
//!
//! ```
//! use whatsnew::{transform, RawEntry};
//!
//! let entry: RawEntry = serde_json::from_value(serde_json::json!({
//!     "id": "WHATS_NEW_82",
//!     "order": 0,
//!     "content": {
//!         "fields": {
//!             "publish_date": "2020-11-06",
//!             "title": "A Better PDF Experience in Firefox",
//!             "body": "Browse and edit PDF files like a breeze.",
//!             "icon_alt": "PDF icon",
//!             "cta_type": "OPEN_URL",
//!             "cta_where": "tabshifted",
//!             "link_text": "Learn more"
//!         }
//!     }
//! })).unwrap();
//!
//! let messages = transform::transform(&[entry]);
//! assert_eq!(messages[0].template, "whatsnew_panel_message");
//! assert_eq!(messages[0].targeting, "true");
//! ```
//!
//! Around the core, [`contentful`] fetches entries, [`remote_settings`]
//! delivers transformed messages to the Kinto collection clients read, and
//! [`webhook`] models the CMS's publish/unpublish notifications. The
//! `wnp-api` binary wires these into the HTTP service.

// Data models
pub mod entry;
pub mod message;

// The pure transform pipeline
pub mod transform;

// Service boundary: CMS source, record-store sink, webhook contract
pub mod contentful;
pub mod remote_settings;
pub mod webhook;

// Re-export key types
pub use entry::{ContentFields, Fields, RawEntry, TargetingFields};
pub use message::{Message, MessageContent, MessageTrigger, MESSAGE_TEMPLATE, MESSAGE_TRIGGER_ID};
pub use transform::{compile_targeting, normalize_content, transform_entry, TransformError};

// Re-export boundary types
pub use contentful::{ContentfulClient, ContentfulConfig, ContentfulError};
pub use remote_settings::{RemoteSettingsClient, RemoteSettingsConfig, RemoteSettingsError};
pub use webhook::{PublishAction, WebhookPayload};
