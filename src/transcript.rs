//! The chat transcript boundary: visible lines in, replies out.
//!
//! There is no stored cursor. Every poll fetches the full visible transcript
//! and [`resolve_window`] recomputes which trailing lines still need answers,
//! using the origin tag the bridge stamps on each line at ingestion time.
//! Writing a reply back into the transcript is what marks the window as
//! processed, which makes the reply pipeline its own durability mechanism.

use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

/// Who authored a transcript line. Stamped by the transcript collaborator so
/// that correctness does not hinge on sniffing the reply prefix out of text a
/// user could coincidentally type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Bot,
    External,
}

/// One visible transcript line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub origin: Origin,
}

impl Line {
    pub fn new(text: impl Into<String>, origin: Origin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The contiguous suffix of unprocessed lines, oldest to newest.
///
/// Scans from the newest line backward and stops at the first bot-authored or
/// blank line. When the newest line is itself bot-authored or blank there is
/// nothing to do this poll.
pub fn resolve_window(lines: &[Line]) -> &[Line] {
    let start = lines
        .iter()
        .rposition(|line| line.origin == Origin::Bot || line.is_blank())
        .map(|i| i + 1)
        .unwrap_or(0);
    &lines[start..]
}

/// The transcript collaborator: a producer and consumer of plain strings.
/// Rendering, selectors and scrolling are entirely its concern.
#[async_trait::async_trait]
pub trait Transcript: Send + Sync {
    /// All currently visible lines, oldest to newest.
    async fn fetch_visible_lines(&self) -> Result<Vec<Line>>;

    /// Appends a reply to the conversation.
    async fn send_reply(&self, text: &str) -> Result<()>;
}

/// Talks to the browser-automation bridge over its small REST surface:
/// `GET {base}/lines` returns the visible transcript, `POST {base}/reply`
/// types and sends a message.
pub struct HttpTranscript {
    http: reqwest::Client,
    lines_url: Url,
    reply_url: Url,
}

impl HttpTranscript {
    pub fn new(base: &Url) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            lines_url: base.join("lines")?,
            reply_url: base.join("reply")?,
        })
    }
}

#[async_trait::async_trait]
impl Transcript for HttpTranscript {
    async fn fetch_visible_lines(&self) -> Result<Vec<Line>> {
        trace!("GET {}", self.lines_url);
        let lines: Vec<Line> = self
            .http
            .get(self.lines_url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(lines)
    }

    async fn send_reply(&self, text: &str) -> Result<()> {
        trace!("POST {}", self.reply_url);
        self.http
            .post(self.reply_url.clone())
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
