//! The reply pipeline: classify each new message, consult the interpreter or
//! the assistant when needed, apply ledger operations and produce the reply.

use crate::assistant::Assistant;
use crate::interpret::Interpreter;
use crate::ledger::{LedgerClient, LedgerEngine};
use crate::model::{invalid_reply, Classifier, Intent, Lexicon, Message, SYSTEM_ERROR_REPLY};
use crate::transcript::{resolve_window, Transcript};
use crate::Result;
use anyhow::Context;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Bot<C> {
    classifier: Classifier,
    interpreter: Interpreter,
    engine: LedgerEngine<C>,
    assistant: Option<Box<dyn Assistant>>,
}

impl<C: LedgerClient> Bot<C> {
    pub fn new(client: C, lexicon: Lexicon) -> Self {
        Self {
            classifier: Classifier::new(lexicon.clone()),
            interpreter: Interpreter::new(lexicon),
            engine: LedgerEngine::new(client),
            assistant: None,
        }
    }

    pub fn with_assistant(mut self, assistant: Box<dyn Assistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// Produces the reply for one message, or `None` for the bot's own
    /// replies, which are never answered.
    ///
    /// Ledger failures never escape: they are logged and replaced with the
    /// system-error reply so the poll loop can keep going.
    pub async fn reply_to(&self, text: &str) -> Option<String> {
        let message = Message::new(text);
        let intent = self.classifier.classify(&message);
        if intent == Intent::SystemReply {
            // The window resolver already excludes bot lines; this guard
            // covers a prefixed line arriving through any other path.
            debug!("skipping a system reply");
            return None;
        }

        if let Some(assistant) = &self.assistant {
            match assistant.format(message.raw()).await {
                Ok(Some(tx)) => {
                    info!("assistant recognized a transaction");
                    return Some(self.record(&tx).await);
                }
                Ok(None) => {}
                Err(e) => warn!("assistant unavailable, continuing without it: {e:#}"),
            }
        }

        let reply = match intent {
            Intent::SystemReply => return None,
            Intent::Transaction(tx) => self.record(&tx).await,
            Intent::DailyOutcome => self.or_system_error(self.engine.daily_outcome().await),
            Intent::Balance => self.or_system_error(self.engine.balance().await),
            Intent::Reset => self.or_system_error(self.engine.reset_daily_outcome().await),
            Intent::DetailedBalance => self.or_system_error(self.engine.detailed_balance().await),
            Intent::Empty | Intent::Unrecognized => {
                match self.interpreter.interpret(message.raw()) {
                    Some(tx) => self.record(&tx).await,
                    None => invalid_reply(message.raw().trim()),
                }
            }
        };
        Some(reply)
    }

    /// Polls the transcript until the process is terminated.
    pub async fn run<T: Transcript>(&self, transcript: &T, interval: Duration) -> Result<()> {
        info!("watching the transcript, polling every {interval:?}");
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_cycle(transcript).await {
                // The next tick recomputes the window from scratch, so an
                // aborted cycle loses nothing.
                warn!("poll cycle aborted: {e:#}");
            }
        }
    }

    /// One cycle: snapshot the transcript, resolve the unprocessed window
    /// and answer each message in chat order, oldest first.
    async fn poll_cycle<T: Transcript>(&self, transcript: &T) -> Result<()> {
        let lines = transcript
            .fetch_visible_lines()
            .await
            .context("transcript fetch failed")?;
        let window = resolve_window(&lines);
        if window.is_empty() {
            return Ok(());
        }
        info!("processing {} new message(s)", window.len());
        for line in window {
            if let Some(reply) = self.reply_to(&line.text).await {
                transcript
                    .send_reply(&reply)
                    .await
                    .context("reply send failed")?;
            }
        }
        Ok(())
    }

    async fn record(&self, tx: &crate::model::Transaction) -> String {
        self.or_system_error(self.engine.record(tx).await)
    }

    fn or_system_error(&self, result: Result<String>) -> String {
        match result {
            Ok(reply) => reply,
            Err(e) => {
                warn!("ledger operation failed: {e:#}");
                SYSTEM_ERROR_REPLY.to_string()
            }
        }
    }
}
