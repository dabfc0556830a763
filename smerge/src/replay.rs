use anyhow::Result;
use log::{error, info};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::api::slack::SlackApi;
use crate::format::format_message;
use crate::identity::IdentityMap;
use crate::models::{Conversation, Message};

pub const DEFAULT_POST_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFailure {
    pub source: String,
    /// 1-based position within the source channel's history.
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub posted: usize,
    pub failures: Vec<PostFailure>,
}

impl ReplaySummary {
    pub fn attempted(&self) -> usize {
        self.posted + self.failures.len()
    }
}

/// Re-posts sorted histories into the destination channel, one message at a time.
pub struct ReplayEngine<'a, A: SlackApi> {
    api: &'a A,
    destination: String,
    identities: &'a IdentityMap,
    delay: Duration,
}

impl<'a, A: SlackApi> ReplayEngine<'a, A> {
    pub fn new(api: &'a A, destination: String, identities: &'a IdentityMap, delay: Duration) -> Self {
        Self {
            api,
            destination,
            identities,
            delay,
        }
    }

    /// Every message is rendered before the first post, so an unknown author
    /// fails the replay without touching the destination. A failed post is
    /// recorded and skipped.
    pub async fn replay(&self, histories: &[(Conversation, Vec<Message>)]) -> Result<ReplaySummary> {
        let rendered = histories
            .iter()
            .map(|(conversation, messages)| {
                messages
                    .iter()
                    .map(|message| format_message(message, self.identities, &conversation.name))
                    .collect::<Result<Vec<_>>>()
                    .map(|entries| (conversation, entries))
            })
            .collect::<Result<Vec<_>>>()?;

        println!(
            "Writing {} channel histories to new channel {}",
            rendered.len(),
            self.destination.bright_cyan()
        );

        let mut summary = ReplaySummary::default();

        for (conversation, entries) in rendered {
            println!(
                "Working on channel {} (id {}) with {} messages",
                conversation.name.bright_cyan(),
                conversation.id,
                entries.len()
            );

            let total = entries.len();
            for (i, entry) in entries.iter().enumerate() {
                let index = i + 1;

                if summary.attempted() > 0 && !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }

                match self.api.post_message(&self.destination, entry).await {
                    Ok(()) => {
                        summary.posted += 1;
                        println!("{} {} {index} / {total}", "✓".bright_green(), conversation.name);
                    }
                    Err(e) => {
                        error!(
                            "failed to post message {index} / {total} of {}: {:#}",
                            conversation.name, e
                        );
                        println!(
                            "{} {} {index} / {total}: {:#}",
                            "✗".bright_red(),
                            conversation.name,
                            e
                        );
                        summary.failures.push(PostFailure {
                            source: conversation.name.clone(),
                            index,
                            error: format!("{:#}", e),
                        });
                    }
                }
            }
        }

        info!(
            "replay finished, {} posted, {} failed",
            summary.posted,
            summary.failures.len()
        );

        Ok(summary)
    }
}
