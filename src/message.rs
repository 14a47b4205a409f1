//! Output message model consumed by the Firefox What's New Panel.
//!
//! One [`Message`] is produced per raw entry. The shape matches what the
//! panel's messaging system expects, including the fixed template and
//! trigger identifiers.

use serde::{Deserialize, Serialize};

/// Template identifier attached to every transformed message.
pub const MESSAGE_TEMPLATE: &str = "whatsnew_panel_message";

/// Trigger identifier attached to every transformed message.
pub const MESSAGE_TRIGGER_ID: &str = "whatsNewPanelOpened";

/// One What's New Panel message, ready for delivery to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub template: String,
    pub order: i64,
    pub content: MessageContent,
    /// Compiled boolean filter expression in the JEXL dialect the messaging
    /// system evaluates. `"true"` when the entry carries no targeting.
    pub targeting: String,
    pub trigger: MessageTrigger,
}

/// Flattened content of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContent {
    pub bucket_id: String,
    /// Publish date as epoch milliseconds. `None` (JSON `null`) when the
    /// raw date string did not parse.
    pub publish_date: Option<i64>,
    pub title: String,
    pub body: String,
    /// Fixed logo path plus the icon's file name, or empty when the entry
    /// has no icon.
    pub icon_url: String,
    pub icon_alt: String,
    pub cta_type: String,
    pub cta_url: String,
    pub cta_where: String,
    pub link_text: String,
}

/// Trigger record of a message. Always [`MESSAGE_TRIGGER_ID`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTrigger {
    pub id: String,
}

impl Default for MessageTrigger {
    fn default() -> Self {
        Self {
            id: MESSAGE_TRIGGER_ID.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trigger_id() {
        assert_eq!(MessageTrigger::default().id, "whatsNewPanelOpened");
    }

    #[test]
    fn test_missing_publish_date_serializes_to_null() {
        let content = MessageContent {
            bucket_id: "MSG_1".to_string(),
            publish_date: None,
            title: String::new(),
            body: String::new(),
            icon_url: String::new(),
            icon_alt: String::new(),
            cta_type: String::new(),
            cta_url: String::new(),
            cta_where: String::new(),
            link_text: String::new(),
        };

        let json = serde_json::to_value(&content).unwrap();
        assert!(json["publish_date"].is_null());
    }
}
