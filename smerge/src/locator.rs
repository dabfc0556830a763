use anyhow::Result;
use log::{debug, warn};

use crate::api::slack::SlackApi;
use crate::models::slack::Channel;
use crate::models::{Conversation, ConversationKind};

/// Find a channel by exact name, private channels first.
///
/// Direct messages are never matched.
pub async fn locate_conversation(
    api: &impl SlackApi,
    name: &str,
) -> Result<Option<Conversation>> {
    let name = normalize_name(name);

    let private_channels = api.list_private_channels().await?;
    if let Some(channel) = find_by_name(&private_channels, name) {
        debug!("{} is private channel {}", name, channel.id);
        return Ok(Some(Conversation::new(
            name,
            channel.id.clone(),
            ConversationKind::PrivateChannel,
        )));
    }

    let public_channels = api.list_channels().await?;
    if let Some(channel) = find_by_name(&public_channels, name) {
        debug!("{} is public channel {}", name, channel.id);
        return Ok(Some(Conversation::new(
            name,
            channel.id.clone(),
            ConversationKind::PublicChannel,
        )));
    }

    Ok(None)
}

/// Locate every requested name, dropping the ones that cannot be found.
pub async fn locate_all(api: &impl SlackApi, names: &[String]) -> Vec<Conversation> {
    let mut conversations = Vec::new();

    for name in names {
        match locate_conversation(api, name).await {
            Ok(Some(conversation)) => conversations.push(conversation),
            Ok(None) => warn!("channel {} not found, skip.", normalize_name(name)),
            Err(e) => warn!("cannot look up channel {}, skip: {:#}", normalize_name(name), e),
        }
    }

    conversations
}

pub fn normalize_name(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix('#').unwrap_or(name)
}

fn find_by_name<'a>(channels: &'a [Channel], name: &str) -> Option<&'a Channel> {
    channels.iter().find(|channel| channel.name == name)
}
