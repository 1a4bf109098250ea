// Discord webhook sink. Posts `{"content": ...}` to the webhook URL;
// messages are wrapped in a code fence for monospace table rendering.

use async_trait::async_trait;
use serde_json::json;

use super::{check_status, Sink, SinkError};
use crate::report::codeblock;

/// Discord caps messages at 2000 characters; the code fence costs 8.
const MAX_LEN: usize = 2000 - 8;

pub struct DiscordSink {
    http: reqwest::Client,
    webhook_url: String,
}

impl DiscordSink {
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl Sink for DiscordSink {
    fn name(&self) -> &'static str {
        "discord"
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    async fn send(&self, text: &str) -> Result<(), SinkError> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&json!({ "content": codeblock(text) }))
            .send()
            .await
            .map_err(|source| SinkError::Request {
                sink: "discord",
                source,
            })?;
        check_status("discord", response.status())
    }
}
