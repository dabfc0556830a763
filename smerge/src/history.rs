use anyhow::{Context, Result, bail};
use log::debug;
use std::collections::HashSet;

use crate::api::slack::SlackApi;
use crate::models::{Conversation, Message};

/// Fetch every page of a conversation's history, in the order Slack returns them.
pub async fn fetch_history(api: &impl SlackApi, conversation: &Conversation) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen = HashSet::new();
    let mut pages = 0;

    loop {
        let page = api
            .fetch_history_page(conversation.kind, &conversation.id, cursor.as_deref())
            .await
            .with_context(|| {
                format!(
                    "cannot fetch history of {} {} ({})",
                    conversation.kind, conversation.name, conversation.id
                )
            })?;
        pages += 1;
        messages.extend(page.messages);

        match page.next_cursor {
            Some(next) if !seen.insert(next.clone()) => {
                bail!(
                    "history of {} returned cursor {} twice",
                    conversation.name,
                    next
                );
            }
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(
        "fetched {} messages of {} in {} pages",
        messages.len(),
        conversation.name,
        pages
    );

    Ok(messages)
}

/// Oldest first. Messages sent in the same microsecond keep their fetch order.
pub fn sort_chronologically(mut messages: Vec<Message>) -> Vec<Message> {
    messages.sort_by_key(|message| message.send_time.as_micros());
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str, ts: &str) -> Message {
        serde_json::from_value(serde_json::json!({"user": "U1", "text": text, "ts": ts})).unwrap()
    }

    fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn test_sort_reverses_newest_first_pages() {
        let sorted = sort_chronologically(vec![
            message("third", "1500000002.000000"),
            message("second", "1500000001.000500"),
            message("first", "1500000001.000001"),
        ]);
        assert_eq!(texts(&sorted), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_sort_compares_integers_not_strings() {
        let sorted = sort_chronologically(vec![
            message("later", "1000.000100"),
            message("earlier", "999.000200"),
        ]);
        assert_eq!(texts(&sorted), vec!["earlier", "later"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let sorted = sort_chronologically(vec![
            message("b", "20.000000"),
            message("a1", "10.000000"),
            message("a2", "10.000000"),
            message("a3", "10.000000"),
        ]);
        assert_eq!(texts(&sorted), vec!["a1", "a2", "a3", "b"]);
    }

    #[test]
    fn test_sort_output_is_non_decreasing() {
        let stamps = [
            "1612345678.000009",
            "1612345677.999999",
            "1612345678.000010",
            "1512345678.000000",
            "1612345678.000009",
        ];
        let sorted = sort_chronologically(
            stamps
                .iter()
                .enumerate()
                .map(|(i, ts)| message(&i.to_string(), ts))
                .collect(),
        );
        assert_eq!(sorted.len(), stamps.len());
        assert!(
            sorted
                .windows(2)
                .all(|pair| pair[0].send_time.as_micros() <= pair[1].send_time.as_micros())
        );
        // ties at .000009 keep input order
        assert_eq!(texts(&sorted)[2..4], ["0", "4"]);
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_chronologically(Vec::new()).is_empty());
    }
}
