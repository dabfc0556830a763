use anyhow::Result;
use serde_json::Value;

use crate::identity::IdentityMap;
use crate::models::{Attachment, Message};

/// Render a message as the text posted to the merged channel:
///
/// ```text
/// [<source> | <author> on <time>]
/// <text>
/// Attachments:
/// {
/// 'key':'value'
/// }
/// ```
///
/// The attachment section is only present when the message carried some.
pub fn format_message(message: &Message, identities: &IdentityMap, source_name: &str) -> Result<String> {
    let author = identities.display_name(&message.author_id)?;

    let mut entry = format!(
        "[{} | {} on {}]\n{}",
        source_name,
        author,
        message.send_time.decode(),
        message.text
    );

    if let Some(attachments) = message.attachments.as_ref().filter(|a| !a.is_empty()) {
        entry.push_str("\nAttachments:\n");
        entry.push_str(
            &attachments
                .iter()
                .map(format_attachment)
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }

    Ok(entry)
}

fn format_attachment(attachment: &Attachment) -> String {
    let mut block = String::from("{\n");
    for (key, value) in attachment {
        block.push_str(&format!("'{}':'{}'\n", key, format_value(value)));
    }
    block.push('}');
    block
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
