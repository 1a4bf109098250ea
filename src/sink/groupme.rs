// GroupMe bot sink. Posts `{"bot_id", "text"}` to the bot gateway.
// GroupMe has no monospace rendering, so text goes out unfenced.

use async_trait::async_trait;
use serde_json::json;

use super::{check_status, Sink, SinkError};

const POST_URL: &str = "https://api.groupme.com/v3/bots/post";

/// GroupMe rejects messages over 1000 characters.
const MAX_LEN: usize = 1000;

pub struct GroupMeSink {
    http: reqwest::Client,
    bot_id: String,
    post_url: String,
}

impl GroupMeSink {
    pub fn new(bot_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            bot_id,
            post_url: POST_URL.to_string(),
        }
    }
}

#[async_trait]
impl Sink for GroupMeSink {
    fn name(&self) -> &'static str {
        "groupme"
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    async fn send(&self, text: &str) -> Result<(), SinkError> {
        let response = self
            .http
            .post(&self.post_url)
            .json(&json!({ "bot_id": self.bot_id, "text": text }))
            .send()
            .await
            .map_err(|source| SinkError::Request {
                sink: "groupme",
                source,
            })?;
        check_status("groupme", response.status())
    }
}
