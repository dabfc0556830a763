use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, header};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;

use crate::models::slack::*;
use crate::models::{ConversationKind, HistoryPage};

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

const PAGE_SIZE: &str = "200";

#[async_trait]
pub trait SlackApi {
    async fn auth_test(&self) -> Result<AuthTest>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn list_channels(&self) -> Result<Vec<Channel>>;
    async fn list_private_channels(&self) -> Result<Vec<Channel>>;
    async fn fetch_history_page(
        &self,
        kind: ConversationKind,
        conversation_id: &str,
        cursor: Option<&str>,
    ) -> Result<HistoryPage>;
    async fn post_message(&self, channel: &str, text: &str) -> Result<()>;
}

pub struct SlackClient {
    client: Client,
    base_url: String,
}

impl SlackClient {
    pub fn new(base_url: String, token: String) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Slack token contains invalid characters")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, method: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        debug!("GET {} {:?}", method, query);
        let response = self.client.get(&url).query(query).send().await?;
        read_response(method, response).await
    }

    async fn post<T: DeserializeOwned>(&self, method: &str, body: &serde_json::Value) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        debug!("POST {}", method);
        let response = self.client.post(&url).json(body).send().await?;
        read_response(method, response).await
    }

    async fn list_conversations(&self, kind: ConversationKind) -> Result<Vec<Channel>> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let page: ConversationsList = {
                let mut query = vec![("types", kind.api_type()), ("limit", PAGE_SIZE)];
                if let Some(next) = cursor.as_deref() {
                    query.push(("cursor", next));
                }
                self.get("conversations.list", &query).await?
            };
            channels.extend(page.channels);

            match page.response_metadata.cursor() {
                Some(next) if !seen.insert(next.clone()) => {
                    bail!("Slack conversations.list returned cursor {} twice", next);
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!("listed {} {}s", channels.len(), kind);
        Ok(channels)
    }
}

async fn read_response<T: DeserializeOwned>(method: &str, response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(anyhow::anyhow!(
            "Slack {} failed with status {}: {}",
            method,
            status,
            body
        ));
    }

    let envelope: Envelope = serde_json::from_str(&body)
        .with_context(|| format!("Slack {} returned an unexpected body", method))?;
    if !envelope.ok {
        return Err(anyhow::anyhow!(
            "Slack {} failed: {}",
            method,
            envelope.error.as_deref().unwrap_or("unknown error")
        ));
    }

    serde_json::from_str(&body).with_context(|| format!("cannot parse Slack {} response", method))
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn auth_test(&self) -> Result<AuthTest> {
        self.get("auth.test", &[]).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users: UsersList = self.get("users.list", &[]).await?;
        Ok(users.members)
    }

    async fn list_channels(&self) -> Result<Vec<Channel>> {
        self.list_conversations(ConversationKind::PublicChannel).await
    }

    async fn list_private_channels(&self) -> Result<Vec<Channel>> {
        self.list_conversations(ConversationKind::PrivateChannel).await
    }

    async fn fetch_history_page(
        &self,
        kind: ConversationKind,
        conversation_id: &str,
        cursor: Option<&str>,
    ) -> Result<HistoryPage> {
        debug!("fetch history page of {} {}", kind, conversation_id);

        let mut query = vec![("channel", conversation_id), ("limit", PAGE_SIZE)];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let history: ConversationsHistory = self.get("conversations.history", &query).await?;
        let next_cursor = if history.has_more {
            history.response_metadata.cursor()
        } else {
            None
        };

        Ok(HistoryPage {
            messages: history.messages,
            next_cursor,
        })
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "channel": channel,
            "text": text,
        });

        let _: Envelope = self.post("chat.postMessage", &body).await?;
        Ok(())
    }
}
