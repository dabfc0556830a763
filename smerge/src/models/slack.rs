use serde::Deserialize;

use super::Message;

/// Fields every Web API response carries.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthTest {
    pub team: String,
    pub user: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile: UserProfile,
}

impl User {
    /// Real name when set, account name otherwise.
    pub fn display_name(&self) -> &str {
        match self.profile.real_name.as_deref() {
            Some(real_name) if !real_name.is_empty() => real_name,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UserProfile {
    pub real_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

impl ResponseMetadata {
    pub fn cursor(&self) -> Option<String> {
        let cursor = self.next_cursor.trim();
        (!cursor.is_empty()).then(|| cursor.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct UsersList {
    pub members: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsList {
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsHistory {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}
