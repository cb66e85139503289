use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::info;
use yubot_core::ReplyEngine;

use crate::retry::retry_with_backoff;

/// HTTP client for the retrieval-based reply service.
///
/// The service ranks candidate utterances for a joined context and keeps
/// per-session candidate state behind `register`, so the relay treats it as
/// stateless per call.
pub struct RetrievalProvider {
    client: Client,
    base_url: String,
}

impl RetrievalProvider {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating RetrievalProvider for {base_url}");
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Helper method to send a single reply request
    async fn try_reply(&self, request: &serde_json::Value) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/reply", self.base_url))
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let reply = response["reply"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing reply"))?
            .to_string();

        Ok(reply)
    }
}

#[async_trait]
impl ReplyEngine for RetrievalProvider {
    async fn register(&self, id: &str) -> anyhow::Result<()> {
        self.client
            .post(format!("{}/register", self.base_url))
            .json(&json!({ "session_id": id }))
            .send()
            .await?
            .error_for_status()?;

        info!("Registered session {id} with retrieval service");
        Ok(())
    }

    async fn reply(&self, context: &str, id: &str) -> anyhow::Result<String> {
        let request = json!({
            "context": context,
            "session_id": id,
            "show_candidate": false,
        });

        info!("Requesting reply for session {id}");

        // Short backoff only; the caller bounds the whole turn.
        let base_delays: [u64; 2] = [1, 2];
        let reply = retry_with_backoff(|| self.try_reply(&request), &base_delays).await?;

        info!("Received reply for session {id}");
        Ok(reply)
    }
}
