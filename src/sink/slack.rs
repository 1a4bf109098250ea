// Slack incoming-webhook sink. Posts `{"text": ...}` to the webhook URL.

use async_trait::async_trait;
use serde_json::json;

use super::{check_status, Sink, SinkError};
use crate::report::codeblock;

/// Slack truncates messages past 4000 characters; the code fence costs 8.
const MAX_LEN: usize = 4000 - 8;

pub struct SlackSink {
    http: reqwest::Client,
    webhook_url: String,
}

impl SlackSink {
    pub fn new(webhook_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }
}

#[async_trait]
impl Sink for SlackSink {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    async fn send(&self, text: &str) -> Result<(), SinkError> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&json!({ "text": codeblock(text) }))
            .send()
            .await
            .map_err(|source| SinkError::Request {
                sink: "slack",
                source,
            })?;
        check_status("slack", response.status())
    }
}
