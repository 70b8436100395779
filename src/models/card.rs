//! Rendered app card and outbound message models.

use serde::{Deserialize, Serialize};

/// Button attached to an app card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardButton {
    pub label: String,
    pub action: String,
    pub color: String,
}

/// Card rendered for a single dispatch
///
/// Serializes to the chat network's app-card JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedCard {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub title: String,
    /// Card body: excerpt, separator and localized description
    pub description: String,
    pub shareable: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<CardButton>,
}

impl RenderedCard {
    /// The action button, if the event kind routes to one
    pub fn button(&self) -> Option<&CardButton> {
        self.actions.first()
    }
}

/// Message category understood by the chat network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCategory {
    #[serde(rename = "PLAIN_TEXT")]
    PlainText,
    #[serde(rename = "APP_CARD")]
    AppCard,
}

/// Outbound message handed to the chat transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub conversation_id: String,
    pub recipient_id: String,
    /// Unique trace id of this message
    pub message_id: String,
    pub category: MessageCategory,
    /// Raw text, or base64 of the card JSON
    pub data: String,
}
