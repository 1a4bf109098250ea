// Chat sinks: outbound webhook delivery.
//
// Each platform implements `Sink`; `deliver` handles splitting a report
// into platform-sized chunks before posting. Sinks never fail delivery as
// a group: the caller posts to each configured sink independently.

pub mod discord;
pub mod groupme;
pub mod slack;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::config::CredentialsConfig;
use crate::report::split_message;

pub use discord::DiscordSink;
pub use groupme::GroupMeSink;
pub use slack::SlackSink;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("webhook request to {sink} failed: {source}")]
    Request {
        sink: &'static str,
        source: reqwest::Error,
    },

    #[error("{sink} rejected the message with HTTP {status}")]
    Rejected { sink: &'static str, status: u16 },
}

// ---------------------------------------------------------------------------
// The Sink trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Maximum characters per message on this platform.
    fn max_len(&self) -> usize;

    /// Post a single chunk, already within `max_len`.
    async fn send(&self, text: &str) -> Result<(), SinkError>;
}

/// Split a report at row boundaries and post every chunk in order. An empty
/// report posts nothing.
pub async fn deliver(sink: &dyn Sink, text: &str) -> Result<(), SinkError> {
    let chunks = split_message(text, sink.max_len());
    debug!(sink = sink.name(), chunks = chunks.len(), "delivering report");
    for chunk in &chunks {
        sink.send(chunk).await?;
    }
    Ok(())
}

/// Build every sink the credentials configure.
pub fn from_credentials(credentials: &CredentialsConfig) -> Vec<Box<dyn Sink>> {
    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
    if let Some(url) = &credentials.discord_webhook_url {
        sinks.push(Box::new(DiscordSink::new(url.clone())));
    }
    if let Some(url) = &credentials.slack_webhook_url {
        sinks.push(Box::new(SlackSink::new(url.clone())));
    }
    if let Some(bot_id) = &credentials.groupme_bot_id {
        sinks.push(Box::new(GroupMeSink::new(bot_id.clone())));
    }
    sinks
}

pub(crate) fn check_status(sink: &'static str, status: reqwest::StatusCode) -> Result<(), SinkError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(SinkError::Rejected {
            sink,
            status: status.as_u16(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
