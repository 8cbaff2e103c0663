//! Command handlers for the sheetbot CLI.

mod query;
mod run;
mod serve;

pub use query::query;
pub use run::run;
pub use serve::serve;

use crate::assistant::OllamaAssistant;
use crate::bot::Bot;
use crate::ledger::GoogleLedger;
use crate::model::Lexicon;
use crate::Config;

/// The outcome of a command execution: a message for the user.
#[derive(Debug, Clone)]
pub struct Out {
    message: String,
}

impl Out {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Print the message to stdout.
    pub fn print(&self) {
        println!("{}", self.message);
    }
}

/// Builds the full reply pipeline from config: Google-backed ledger plus the
/// assistant when one is configured.
fn build_bot(config: &Config) -> Bot<GoogleLedger> {
    let ledger = GoogleLedger::new(config);
    let mut bot = Bot::new(ledger, Lexicon::default());
    if let Some(assistant) = config.assistant() {
        bot = bot.with_assistant(Box::new(OllamaAssistant::new(assistant)));
    }
    bot
}
