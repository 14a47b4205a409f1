//! Contentful webhook contract.
//!
//! Publish/unpublish notifications arrive as POSTs carrying the affected
//! entry id in the body and the action in the `x-contentful-topic` header,
//! e.g. `ContentManagement.Entry.publish`.

use serde::Deserialize;

/// Header carrying the shared webhook token.
pub const WEBHOOK_TOKEN_HEADER: &str = "x-contentful-webhooks-token";

/// Header carrying the webhook topic.
pub const WEBHOOK_TOPIC_HEADER: &str = "x-contentful-topic";

/// Action signaled by a webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Publish,
    Unpublish,
}

impl PublishAction {
    /// Parse the action from a `x-contentful-topic` header value.
    ///
    /// Topics have the form `ContentManagement.Entry.<action>`; anything
    /// other than `publish`/`unpublish` in the third segment yields `None`.
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic.split('.').nth(2)? {
            "publish" => Some(PublishAction::Publish),
            "unpublish" => Some(PublishAction::Unpublish),
            _ => None,
        }
    }
}

/// Webhook request body; only the entry id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub sys: WebhookSys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSys {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_topic() {
        assert_eq!(
            PublishAction::from_topic("ContentManagement.Entry.publish"),
            Some(PublishAction::Publish)
        );
    }

    #[test]
    fn test_unpublish_topic() {
        assert_eq!(
            PublishAction::from_topic("ContentManagement.Entry.unpublish"),
            Some(PublishAction::Unpublish)
        );
    }

    #[test]
    fn test_unknown_or_short_topic() {
        assert_eq!(PublishAction::from_topic("ContentManagement.Entry.save"), None);
        assert_eq!(PublishAction::from_topic("ContentManagement.Entry"), None);
        assert_eq!(PublishAction::from_topic(""), None);
    }

    #[test]
    fn test_payload_deserializes_entry_id() {
        let payload: WebhookPayload =
            serde_json::from_value(serde_json::json!({ "sys": { "id": "entry-1" } })).unwrap();

        assert_eq!(payload.sys.id, "entry-1");
    }
}
