use anyhow::{Context, Result, bail};
use log::{info, warn};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::api::slack::{DEFAULT_API_URL, SlackApi, SlackClient};
use crate::cli::Args;
use crate::history::{fetch_history, sort_chronologically};
use crate::identity::resolve_identities;
use crate::locator::{locate_all, locate_conversation, normalize_name};
use crate::replay::{DEFAULT_POST_DELAY, ReplayEngine, ReplaySummary};
use crate::settings::merge_settings_with_args;

pub async fn run(args: Args) -> Result<()> {
    let args = merge_settings_with_args(&args)?;

    if args.token.is_empty() {
        bail!("no Slack token, pass --token, set SLACK_TOKEN or add `token` to the config file");
    }

    let api_url = args.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let delay = args
        .post_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_POST_DELAY);

    let client = SlackClient::new(api_url, args.token)?;
    let summary = merge_channels(&client, &args.new_channel, &args.previous_channels, delay).await?;

    if summary.failures.is_empty() {
        println!("{} Success!", "✓".bright_green());
    } else {
        println!(
            "{} Done, {} messages posted, {} skipped",
            "⚠".yellow(),
            summary.posted,
            summary.failures.len()
        );
    }

    Ok(())
}

/// Copy the history of `previous_channels` into `new_channel`, oldest first.
pub async fn merge_channels(
    api: &impl SlackApi,
    new_channel: &str,
    previous_channels: &[String],
    delay: Duration,
) -> Result<ReplaySummary> {
    let auth = api
        .auth_test()
        .await
        .context("Slack authentication failed")?;
    println!(
        "Successfully authenticated for team {} and user {}",
        auth.team.bright_cyan(),
        auth.user.bright_cyan()
    );

    let identities = resolve_identities(api).await?;
    println!("found {} users", identities.len());

    println!("Merging from {} channels", previous_channels.len());
    for channel in previous_channels {
        println!("  {}", channel);
    }
    println!("New channel for merge: {}", new_channel.bright_cyan());

    let sources = locate_all(api, previous_channels).await;
    if sources.is_empty() {
        println!("{} None of the channels to merge from were found.", "⚠".yellow());
        return Ok(ReplaySummary::default());
    }

    let destination = match locate_conversation(api, new_channel).await {
        Ok(Some(conversation)) => conversation.id,
        Ok(None) => {
            warn!("channel {} not found, posting by name", new_channel);
            normalize_name(new_channel).to_string()
        }
        Err(e) => {
            warn!("cannot look up channel {}, posting by name: {:#}", new_channel, e);
            normalize_name(new_channel).to_string()
        }
    };

    let mut histories = Vec::new();
    for conversation in sources {
        println!(
            "getting history for {} {} with id {}",
            conversation.kind,
            conversation.name.bright_cyan(),
            conversation.id
        );

        match fetch_history(api, &conversation).await {
            Ok(messages) => histories.push((conversation, sort_chronologically(messages))),
            Err(e) => warn!("skip channel {}: {:#}", conversation.name, e),
        }
    }

    let engine = ReplayEngine::new(api, destination, &identities, delay);
    let summary = engine.replay(&histories).await?;

    info!(
        "merged {} channels into {}",
        histories.len(),
        normalize_name(new_channel)
    );

    Ok(summary)
}
