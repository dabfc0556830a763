pub mod slack;

use serde::Deserialize;
use std::fmt;

use crate::timestamp::Timestamp;

/// An attachment as sent by Slack, keys kept in the order they were received.
pub type Attachment = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationKind {
    PublicChannel,
    PrivateChannel,
    DirectMessage,
}

impl ConversationKind {
    /// Conversation type token understood by `conversations.*` methods.
    pub fn api_type(&self) -> &'static str {
        match self {
            ConversationKind::PublicChannel => "public_channel",
            ConversationKind::PrivateChannel => "private_channel",
            ConversationKind::DirectMessage => "im",
        }
    }
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationKind::PublicChannel => write!(f, "public channel"),
            ConversationKind::PrivateChannel => write!(f, "private channel"),
            ConversationKind::DirectMessage => write!(f, "direct message"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub name: String,
    pub id: String,
    pub kind: ConversationKind,
}

impl Conversation {
    pub fn new(name: impl Into<String>, id: impl Into<String>, kind: ConversationKind) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Missing for bot posts, which then fail identity lookup.
    #[serde(rename = "user", default)]
    pub author_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "ts")]
    pub send_time: Timestamp,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryPage {
    pub messages: Vec<Message>,
    pub next_cursor: Option<String>,
}
